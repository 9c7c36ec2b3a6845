//! BigBoat dashboard v2 protocol driver.
//!
//! Implements [`dashboard::Driver`] for the JSON dashboard API. Every request
//! carries the API key in the `api-key` header; path segments are
//! percent-escaped.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request encoding, the status-code policy
//! ([`response`]), JSON decoding ([`wire`]), and manifest pre-validation live
//! here. The [`dashboard`] crate sees only [`dashboard::Driver`].
//!
//! ## Wire contract
//!
//! All paths are below `{base_url}/api/v2/`.
//!
//! | Operation | Request | Expected |
//! |-----------|---------|----------|
//! | `apps` | `GET apps` | 200, `[{name, version}]` |
//! | `get_app` | `GET apps/{name}/{version}` | 200 |
//! | `update_app` | `PUT apps/{name}/{version}` with options | 201 |
//! | `delete_app` | `DELETE apps/{name}/{version}` | 204 |
//! | `instances` | `GET instances` | 200, `[{name, state, app, services}]` |
//! | `get_instance` | `GET instances/{name}` | 200 |
//! | `update_instance` | `PUT instances/{name}` with `{app, version, parameters, options}` | 200 |
//! | `delete_instance` | `DELETE instances/{name}` | 200 |
//! | `statuses` | `GET status` | 200, list of records |
//! | `get_compose` | `GET apps/{name}/{version}/files/{file_type}` | 200, `text/plain` |
//! | `update_compose` | `PUT apps/{name}/{version}/files/{file_type}` | 201 |
//!
//! A 404 is always absence. A 401 is always an authentication error.

pub mod compose;
mod response;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use dashboard::{
    manifest, path_segment, ApiKey, ApiVersion, AppRef, BaseUrl, DashboardError, DashboardResult,
    Driver, HttpRequest, HttpResponse, InstanceSnapshot, Options, Outcome, StatusRecord, Transport,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

pub use compose::ComposeFileType;
use response::{accept, Rejection};
use wire::{AppRecord, InstanceRecord};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "api-key";

fn app_path(name: &str, version: &str) -> String {
    format!("apps/{}/{}", path_segment(name), path_segment(version))
}

fn instance_path(name: &str) -> String {
    format!("instances/{}", path_segment(name))
}

fn object(options: Option<&Options>) -> Value {
    Value::Object(options.cloned().unwrap_or_default())
}

/// [`Driver`] for the v2 dashboard API.
pub struct VersionTwoDriver {
    base_url: BaseUrl,
    api_key: ApiKey,
    transport: Arc<dyn Transport>,
}

impl VersionTwoDriver {
    /// Creates a driver for the dashboard at `base_url`, authenticating every
    /// request with `api_key`.
    pub fn new(base_url: BaseUrl, api_key: ApiKey, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            api_key,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        self.base_url.join(ApiVersion::V2.path_prefix(), path)
    }

    /// Sends `request` with the API key attached. Transport failures are
    /// propagated.
    async fn send(&self, request: HttpRequest) -> DashboardResult<HttpResponse> {
        let request = request.header(API_KEY_HEADER, self.api_key.expose());
        Ok(self.transport.send(request).await?)
    }

    /// Sends `request` and decodes the body when the status is `expected`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        expected: u16,
        context: &'static str,
    ) -> DashboardResult<Option<T>> {
        let response = self.send(request).await?;
        if !accept(&response, expected, Rejection::Api)? {
            return Ok(None);
        }
        response
            .json()
            .map(Some)
            .map_err(|e| DashboardError::decode(context, e))
    }

    async fn fetch_apps(&self) -> DashboardResult<Option<Vec<AppRef>>> {
        let records: Option<Vec<AppRecord>> = self
            .fetch(HttpRequest::get(self.url("apps")), 200, "application list")
            .await?;
        Ok(records.map(|records| records.into_iter().map(AppRef::from).collect()))
    }

    async fn fetch_app(&self, request: HttpRequest, expected: u16) -> DashboardResult<Option<AppRef>> {
        let record: Option<AppRecord> = self.fetch(request, expected, "application").await?;
        Ok(record.map(AppRef::from))
    }

    async fn fetch_instances(&self) -> DashboardResult<Option<Vec<InstanceSnapshot>>> {
        let records: Option<Vec<InstanceRecord>> = self
            .fetch(HttpRequest::get(self.url("instances")), 200, "instance list")
            .await?;
        Ok(records.map(|records| records.into_iter().map(InstanceSnapshot::from).collect()))
    }

    async fn fetch_instance(&self, request: HttpRequest) -> DashboardResult<Option<InstanceSnapshot>> {
        let record: Option<InstanceRecord> = self.fetch(request, 200, "instance").await?;
        Ok(record.map(InstanceSnapshot::from))
    }

    async fn remove_app(&self, name: &str, version: &str) -> DashboardResult<Option<()>> {
        let response = self
            .send(HttpRequest::delete(self.url(&app_path(name, version))))
            .await?;
        Ok(accept(&response, 204, Rejection::Api)?.then_some(()))
    }

    async fn read_compose(
        &self,
        name: &str,
        version: &str,
        file_type: ComposeFileType,
    ) -> DashboardResult<Option<String>> {
        let path = format!("{}/files/{}", app_path(name, version), file_type);
        let response = self.send(HttpRequest::get(self.url(&path))).await?;
        if !accept(&response, 200, Rejection::Api)? {
            return Ok(None);
        }
        if !response.is_plain_text() {
            debug!(content_type = ?response.content_type(), "compose file is not plain text");
            return Ok(None);
        }
        Ok(Some(response.body))
    }

    async fn write_compose(
        &self,
        name: &str,
        version: &str,
        file_type: ComposeFileType,
        content: &str,
    ) -> DashboardResult<Option<()>> {
        if file_type.requires_validation() {
            manifest::validate_compose(name, content)?;
        }
        let path = format!("{}/files/{}", app_path(name, version), file_type);
        let response = self
            .send(HttpRequest::put(self.url(&path)).text_body(content))
            .await?;
        Ok(accept(&response, 201, Rejection::Validation)?.then_some(()))
    }
}

#[async_trait]
impl Driver for VersionTwoDriver {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn apps(&self) -> Outcome<Vec<AppRef>> {
        self.fetch_apps().await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn get_app(&self, name: &str, version: &str) -> Outcome<AppRef> {
        let request = HttpRequest::get(self.url(&app_path(name, version)));
        self.fetch_app(request, 200).await.into()
    }

    #[instrument(skip(self, options), fields(api = "v2"))]
    async fn update_app(&self, name: &str, version: &str, options: Option<&Options>) -> Outcome<AppRef> {
        let request = HttpRequest::put(self.url(&app_path(name, version))).json_body(&object(options));
        self.fetch_app(request, 201).await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn delete_app(&self, name: &str, version: &str) -> Outcome<()> {
        self.remove_app(name, version).await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn instances(&self) -> Outcome<Vec<InstanceSnapshot>> {
        self.fetch_instances().await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn get_instance(&self, name: &str) -> Outcome<InstanceSnapshot> {
        let request = HttpRequest::get(self.url(&instance_path(name)));
        self.fetch_instance(request).await.into()
    }

    #[instrument(skip(self, parameters, options), fields(api = "v2"))]
    async fn update_instance(
        &self,
        name: &str,
        app_name: &str,
        app_version: &str,
        parameters: Option<&Options>,
        options: Option<&Options>,
    ) -> Outcome<InstanceSnapshot> {
        let body = json!({
            "app": app_name,
            "version": app_version,
            "parameters": object(parameters),
            "options": object(options),
        });
        let request = HttpRequest::put(self.url(&instance_path(name))).json_body(&body);
        self.fetch_instance(request).await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn delete_instance(&self, name: &str) -> Outcome<InstanceSnapshot> {
        let request = HttpRequest::delete(self.url(&instance_path(name)));
        self.fetch_instance(request).await.into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn statuses(&self) -> Outcome<Vec<StatusRecord>> {
        self.fetch::<Vec<StatusRecord>>(HttpRequest::get(self.url("status")), 200, "status list")
            .await
            .into()
    }

    #[instrument(skip(self), fields(api = "v2"))]
    async fn get_compose(&self, name: &str, version: &str, file_type: &str) -> Outcome<String> {
        match file_type.parse::<ComposeFileType>() {
            Ok(file_type) => self.read_compose(name, version, file_type).await.into(),
            Err(reason) => {
                debug!(%reason, "no such compose file");
                Outcome::Absent
            }
        }
    }

    #[instrument(skip(self, content), fields(api = "v2"))]
    async fn update_compose(
        &self,
        name: &str,
        version: &str,
        file_type: &str,
        content: &str,
    ) -> Outcome<()> {
        match file_type.parse::<ComposeFileType>() {
            Ok(file_type) => self
                .write_compose(name, version, file_type, content)
                .await
                .into(),
            Err(reason) => {
                debug!(%reason, "no such compose file");
                Outcome::Absent
            }
        }
    }
}
