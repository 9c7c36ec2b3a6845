//! The capability set every protocol driver implements.
//!
//! [`Driver`] names the full operation surface of the dashboard API. A driver
//! for one API generation overrides the operations that generation supports;
//! every operation it leaves alone fails with
//! [`DashboardError::Unsupported`](crate::DashboardError::Unsupported), so a
//! caller can always tell "this backend cannot do this" apart from "this call
//! failed".
//!
//! Drivers decode into unbound records ([`AppRef`], [`InstanceSnapshot`]);
//! binding them to a client is the façade's job.

use async_trait::async_trait;

use crate::{ApiVersion, AppRef, DashboardError, InstanceSnapshot, Options, Outcome, StatusRecord};

fn unsupported<T>(operation: &'static str, api: ApiVersion) -> Outcome<T> {
    Outcome::Failure(DashboardError::unsupported(operation, api))
}

/// Encodes requests and decodes responses for one API generation.
#[async_trait]
pub trait Driver: Send + Sync {
    /// API generation this driver speaks.
    fn api_version(&self) -> ApiVersion;

    /// Lists application definitions.
    async fn apps(&self) -> Outcome<Vec<AppRef>> {
        unsupported("apps", self.api_version())
    }

    /// Fetches one application definition.
    async fn get_app(&self, _name: &str, _version: &str) -> Outcome<AppRef> {
        unsupported("get_app", self.api_version())
    }

    /// Creates or replaces an application definition.
    async fn update_app(
        &self,
        _name: &str,
        _version: &str,
        _options: Option<&Options>,
    ) -> Outcome<AppRef> {
        unsupported("update_app", self.api_version())
    }

    /// Deletes an application definition. `Value(())` means deleted.
    async fn delete_app(&self, _name: &str, _version: &str) -> Outcome<()> {
        unsupported("delete_app", self.api_version())
    }

    /// Lists instances.
    async fn instances(&self) -> Outcome<Vec<InstanceSnapshot>> {
        unsupported("instances", self.api_version())
    }

    /// Fetches one instance.
    async fn get_instance(&self, _name: &str) -> Outcome<InstanceSnapshot> {
        unsupported("get_instance", self.api_version())
    }

    /// Starts (or reconfigures) instance `name` of application
    /// `app_name`/`app_version`.
    async fn update_instance(
        &self,
        _name: &str,
        _app_name: &str,
        _app_version: &str,
        _parameters: Option<&Options>,
        _options: Option<&Options>,
    ) -> Outcome<InstanceSnapshot> {
        unsupported("update_instance", self.api_version())
    }

    /// Stops instance `name`.
    async fn delete_instance(&self, _name: &str) -> Outcome<InstanceSnapshot> {
        unsupported("delete_instance", self.api_version())
    }

    /// Fetches the dashboard's health-check records.
    async fn statuses(&self) -> Outcome<Vec<StatusRecord>> {
        unsupported("statuses", self.api_version())
    }

    /// Fetches the manifest file `file_type` of an application.
    async fn get_compose(&self, _name: &str, _version: &str, _file_type: &str) -> Outcome<String> {
        unsupported("get_compose", self.api_version())
    }

    /// Replaces the manifest file `file_type` of an application.
    /// `Value(())` means written.
    async fn update_compose(
        &self,
        _name: &str,
        _version: &str,
        _file_type: &str,
        _content: &str,
    ) -> Outcome<()> {
        unsupported("update_compose", self.api_version())
    }
}
