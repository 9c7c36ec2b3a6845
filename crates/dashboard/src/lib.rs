//! Client domain for the BigBoat dashboard's remote management API.
//!
//! The dashboard API exists in two incompatible wire-level generations. This
//! crate defines the single logical interface both are mapped onto: the
//! entity model, the [`Driver`] capability set each generation implements,
//! the [`Client`] façade application code talks to, and the error taxonomy
//! every driver maps its responses onto.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. Drivers
//! (`api-v1`, `api-v2`) and the HTTP transport (`transport`) live in
//! infrastructure crates and implement the traits defined here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `AppName`, `AppVersion`, `InstanceName`, `ApiVersion`, `BaseUrl`, `ApiKey` |
//! | [`entities`] | `Application`, `Instance` and their unbound records |
//! | [`driver`] | The `Driver` capability set |
//! | [`client`] | The `Client` façade |
//! | [`outcome`] | `Outcome`, the uniform driver result |
//! | [`errors`] | `DashboardError`, `TransportError` |
//! | [`transport`] | The `Transport` port and its request/response values |
//! | [`state`] | Canonical instance state vocabulary |
//! | [`manifest`] | Manifest validation and decoding |
//! | [`types`] | Pass-through payload types (`StatusRecord`, `Options`) |

pub mod client;
pub mod driver;
pub mod entities;
pub mod errors;
pub mod identifiers;
pub mod manifest;
pub mod outcome;
pub mod state;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::Client;
pub use driver::Driver;
pub use entities::{AppRef, Application, Instance, InstanceSnapshot};
pub use errors::{DashboardError, DashboardResult, TransportError};
pub use identifiers::{ApiKey, ApiVersion, AppName, AppVersion, BaseUrl, InstanceName};
pub use outcome::Outcome;
pub use transport::{path_segment, HttpRequest, HttpResponse, Method, Transport};
pub use types::{Options, Services, StatusRecord, Timestamp};
