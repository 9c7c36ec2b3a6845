//! BigBoat dashboard v1 protocol driver.
//!
//! Implements [`dashboard::Driver`] for the legacy dashboard API. The v1 API
//! has no authentication and no JSON envelope for most resources: application
//! definitions are YAML manifests, instance state is a bare token, and start
//! and stop are `GET` requests against action endpoints.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL layout, response interpretation, and state token
//! translation live here. The [`dashboard`] crate sees only
//! [`dashboard::Driver`].
//!
//! ## Wire contract
//!
//! All paths are below `{base_url}/api/v1/`; path segments are
//! percent-escaped.
//!
//! | Operation | Request | Result |
//! |-----------|---------|--------|
//! | `apps` | none (no listing endpoint) | always empty |
//! | `get_app` | `GET appdef/{name}/{version}` | 200 → definition; anything else, including no response → absent |
//! | `update_app` | none (no update endpoint) | always absent |
//! | `delete_app` | `DELETE appdef/{name}/{version}` | 2xx → deleted; anything else → not deleted |
//! | `instances` | `GET instances` | 200 → `{statusCode, instances: [name]}`; anything else, including no response → empty |
//! | `get_instance` | `GET state/{name}` | 200 → state token; anything else, including no response → absent |
//! | `update_instance` | `GET start-app/{app}/{version}/{name}` | 2xx → `running`; anything else → absent |
//! | `delete_instance` | `GET stop-app/{name}` | 2xx → `created`; anything else → absent |
//!
//! Read operations treat a transport failure as "not found", so an outage
//! looks like absence. Write operations propagate transport failures.
//!
//! `statuses`, `get_compose` and `update_compose` do not exist in v1 and fail
//! with [`dashboard::DashboardError::Unsupported`].

use std::sync::Arc;

use async_trait::async_trait;
use dashboard::{
    manifest, path_segment, state, ApiVersion, AppRef, BaseUrl, DashboardResult, Driver,
    HttpRequest, HttpResponse, InstanceName, InstanceSnapshot, Options, Outcome, Transport,
};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Body of `GET instances`.
#[derive(Debug, Deserialize)]
struct InstanceList {
    #[serde(default)]
    instances: Vec<String>,
}

fn app_path(name: &str, version: &str) -> String {
    format!("appdef/{}/{}", path_segment(name), path_segment(version))
}

/// [`Driver`] for the v1 dashboard API.
pub struct VersionOneDriver {
    base_url: BaseUrl,
    transport: Arc<dyn Transport>,
}

impl VersionOneDriver {
    /// Creates a driver for the dashboard at `base_url`.
    pub fn new(base_url: BaseUrl, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        self.base_url.join(ApiVersion::V1.path_prefix(), path)
    }

    /// Sends a read request. A transport failure is logged and reported as
    /// `None`.
    async fn read(&self, path: &str) -> Option<HttpResponse> {
        let url = self.url(path);
        match self.transport.send(HttpRequest::get(url)).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(error = %err, "v1 read failed; treating resource as absent");
                None
            }
        }
    }

    /// Sends a write request. Transport failures are propagated.
    async fn write(&self, request: HttpRequest) -> DashboardResult<HttpResponse> {
        Ok(self.transport.send(request).await?)
    }

    async fn fetch_app(&self, name: &str, version: &str) -> DashboardResult<Option<AppRef>> {
        let Some(response) = self.read(&app_path(name, version)).await else {
            return Ok(None);
        };
        if response.status != 200 {
            debug!(status = response.status, "application definition not found");
            return Ok(None);
        }
        manifest::parse_definition(&response.body).map(Some)
    }

    async fn list_instances(&self) -> DashboardResult<Option<Vec<InstanceSnapshot>>> {
        let Some(response) = self.read("instances").await else {
            return Ok(None);
        };
        if response.status != 200 {
            debug!(status = response.status, "instance listing unavailable");
            return Ok(None);
        }
        let list: InstanceList = response
            .json()
            .map_err(|e| dashboard::DashboardError::decode("instance list", e))?;
        Ok(Some(
            list.instances
                .into_iter()
                .filter_map(InstanceName::new)
                .map(InstanceSnapshot::new)
                .collect(),
        ))
    }

    async fn action(&self, path: &str) -> DashboardResult<bool> {
        let response = self.write(HttpRequest::get(self.url(path))).await?;
        if !response.is_success() {
            debug!(status = response.status, "v1 action rejected");
        }
        Ok(response.is_success())
    }
}

#[async_trait]
impl Driver for VersionOneDriver {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    /// The v1 API has no listing endpoint.
    async fn apps(&self) -> Outcome<Vec<AppRef>> {
        Outcome::Value(Vec::new())
    }

    #[instrument(skip(self), fields(api = "v1"))]
    async fn get_app(&self, name: &str, version: &str) -> Outcome<AppRef> {
        self.fetch_app(name, version).await.into()
    }

    /// The v1 API has no update endpoint; nothing is sent.
    async fn update_app(&self, _name: &str, _version: &str, _options: Option<&Options>) -> Outcome<AppRef> {
        Outcome::Absent
    }

    #[instrument(skip(self), fields(api = "v1"))]
    async fn delete_app(&self, name: &str, version: &str) -> Outcome<()> {
        let request = HttpRequest::delete(self.url(&app_path(name, version)));
        match self.write(request).await {
            Ok(response) if response.is_success() => Outcome::Value(()),
            Ok(_) => Outcome::Absent,
            Err(err) => Outcome::Failure(err),
        }
    }

    #[instrument(skip(self), fields(api = "v1"))]
    async fn instances(&self) -> Outcome<Vec<InstanceSnapshot>> {
        self.list_instances().await.into()
    }

    #[instrument(skip(self), fields(api = "v1"))]
    async fn get_instance(&self, name: &str) -> Outcome<InstanceSnapshot> {
        let Some(instance) = InstanceName::new(name) else {
            return Outcome::Absent;
        };
        match self.read(&format!("state/{}", path_segment(name))).await {
            Some(response) if response.status == 200 => Outcome::Value(
                InstanceSnapshot::new(instance).with_current_state(state::normalize(&response.body)),
            ),
            Some(response) => {
                debug!(status = response.status, "instance state not found");
                Outcome::Absent
            }
            None => Outcome::Absent,
        }
    }

    #[instrument(skip(self, parameters, options), fields(api = "v1"))]
    async fn update_instance(
        &self,
        name: &str,
        app_name: &str,
        app_version: &str,
        parameters: Option<&Options>,
        options: Option<&Options>,
    ) -> Outcome<InstanceSnapshot> {
        if parameters.is_some() || options.is_some() {
            debug!("v1 start requests take no parameters or options; ignoring them");
        }
        let (Some(instance), Some(app)) = (InstanceName::new(name), AppRef::parse(app_name, app_version))
        else {
            debug!("empty instance or application name; nothing to start");
            return Outcome::Absent;
        };
        let path = format!(
            "start-app/{}/{}/{}",
            path_segment(app_name),
            path_segment(app_version),
            path_segment(name)
        );
        match self.action(&path).await {
            Ok(true) => Outcome::Value(
                InstanceSnapshot::new(instance)
                    .with_current_state(state::RUNNING)
                    .with_app(Some(app)),
            ),
            Ok(false) => Outcome::Absent,
            Err(err) => Outcome::Failure(err),
        }
    }

    #[instrument(skip(self), fields(api = "v1"))]
    async fn delete_instance(&self, name: &str) -> Outcome<InstanceSnapshot> {
        let Some(instance) = InstanceName::new(name) else {
            return Outcome::Absent;
        };
        match self.action(&format!("stop-app/{}", path_segment(name))).await {
            Ok(true) => {
                Outcome::Value(InstanceSnapshot::new(instance).with_current_state(state::CREATED))
            }
            Ok(false) => Outcome::Absent,
            Err(err) => Outcome::Failure(err),
        }
    }
}
