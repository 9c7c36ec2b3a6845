//! Entity model: applications and instances.
//!
//! Drivers decode responses into unbound records ([`AppRef`],
//! [`InstanceSnapshot`]). The [`Client`] binds each record to itself, giving
//! an [`Application`] or [`Instance`] whose actions round-trip through the
//! same driver. Entities hold a cloned client handle; the client never keeps
//! track of the entities it hands out.
//!
//! All entities are immutable. Actions that change backend state return a new
//! entity rather than modifying the receiver.

use serde::{Deserialize, Serialize};

use crate::{state, AppName, AppVersion, Client, DashboardResult, InstanceName, Options, Services};

// ---------------------------------------------------------------------------
// Unbound records
// ---------------------------------------------------------------------------

/// Compound key identifying an application definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppRef {
    name: AppName,
    version: AppVersion,
}

impl AppRef {
    /// Creates a key from validated parts.
    pub fn new(name: AppName, version: AppVersion) -> Self {
        Self { name, version }
    }

    /// Creates a key from raw text, returning `None` if either part is empty.
    pub fn parse(name: impl Into<String>, version: impl Into<String>) -> Option<Self> {
        Some(Self::new(AppName::new(name)?, AppVersion::new(version)?))
    }

    /// Application name as text.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Application version as text.
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// The name as its identifier type.
    pub fn app_name(&self) -> &AppName {
        &self.name
    }

    /// The version as its identifier type.
    pub fn app_version(&self) -> &AppVersion {
        &self.version
    }
}

/// Decoded state of one instance, as reported by a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    name: InstanceName,
    current_state: String,
    desired_state: Option<String>,
    app: Option<AppRef>,
    services: Services,
}

impl InstanceSnapshot {
    /// Creates a snapshot for `name` in state [`state::RUNNING`], with no
    /// desired state, application, or services.
    pub fn new(name: InstanceName) -> Self {
        Self {
            name,
            current_state: state::RUNNING.to_owned(),
            desired_state: None,
            app: None,
            services: Services::new(),
        }
    }

    /// Replaces the current state token.
    pub fn with_current_state(mut self, current_state: impl Into<String>) -> Self {
        self.current_state = current_state.into();
        self
    }

    /// Sets the state the backend is driving the instance towards.
    pub fn with_desired_state(mut self, desired_state: Option<String>) -> Self {
        self.desired_state = desired_state;
        self
    }

    /// Sets the application the instance runs.
    pub fn with_app(mut self, app: Option<AppRef>) -> Self {
        self.app = app;
        self
    }

    /// Sets the per-service details, kept verbatim.
    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    /// Instance name as text.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The name as its identifier type.
    pub fn instance_name(&self) -> &InstanceName {
        &self.name
    }

    /// Current state token, e.g. `running` or `starting`.
    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    /// Desired state token, when the backend reports one.
    pub fn desired_state(&self) -> Option<&str> {
        self.desired_state.as_deref()
    }

    /// Key of the application the instance runs, when known.
    pub fn app(&self) -> Option<&AppRef> {
        self.app.as_ref()
    }

    /// Per-service details, empty when the backend reports none.
    pub fn services(&self) -> &Services {
        &self.services
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// An application definition bound to the client that produced it.
///
/// Two applications are equal iff their names and versions are equal; the
/// client handle does not take part in comparisons.
#[derive(Clone)]
pub struct Application {
    client: Client,
    key: AppRef,
}

impl Application {
    /// Binds a known name/version pair to `client` without fetching it.
    /// Returns `None` if either part is empty.
    pub fn new(client: Client, name: impl Into<String>, version: impl Into<String>) -> Option<Self> {
        AppRef::parse(name, version).map(|key| Self::bind(client, key))
    }

    pub(crate) fn bind(client: Client, key: AppRef) -> Self {
        Self { client, key }
    }

    /// Application name.
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// Application version.
    pub fn version(&self) -> &str {
        self.key.version()
    }

    /// The `(name, version)` key identifying this definition.
    pub fn key(&self) -> &AppRef {
        &self.key
    }

    /// The client this application is bound to.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Creates or replaces this definition on the dashboard.
    pub async fn update(&self) -> DashboardResult<Option<Application>> {
        self.client.update_app(self.name(), self.version(), None).await
    }

    /// Deletes this definition. Returns `false` if it did not exist.
    pub async fn delete(&self) -> DashboardResult<bool> {
        self.client.delete_app(self.name(), self.version()).await
    }

    /// Starts an instance of this application.
    ///
    /// The instance is named `instance_name`, or after the application when
    /// no name is given.
    pub async fn start(
        &self,
        instance_name: Option<&str>,
        options: Option<&Options>,
    ) -> DashboardResult<Option<Instance>> {
        self.client
            .update_instance(
                instance_name.unwrap_or(self.name()),
                self.name(),
                self.version(),
                None,
                options,
            )
            .await
    }
}

impl PartialEq for Application {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Application {}

impl std::hash::Hash for Application {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Application(name='{}', version='{}')",
            self.name(),
            self.version()
        )
    }
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// A running or transitioning deployment bound to the client that produced
/// it.
///
/// Every call that returns instance data builds a fresh `Instance`; two
/// lookups of the same name give two independent snapshots.
#[derive(Clone)]
pub struct Instance {
    client: Client,
    snapshot: InstanceSnapshot,
}

impl Instance {
    pub(crate) fn bind(client: Client, snapshot: InstanceSnapshot) -> Self {
        Self { client, snapshot }
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        self.snapshot.name()
    }

    /// Current state token.
    pub fn current_state(&self) -> &str {
        self.snapshot.current_state()
    }

    /// Desired state token, when reported.
    pub fn desired_state(&self) -> Option<&str> {
        self.snapshot.desired_state()
    }

    /// The application this instance runs, bound to the same client.
    ///
    /// Only reported by the v2 API, or by a v1 start request.
    pub fn application(&self) -> Option<Application> {
        self.snapshot
            .app()
            .map(|key| Application::bind(self.client.clone(), key.clone()))
    }

    /// Per-service details, verbatim.
    pub fn services(&self) -> &Services {
        self.snapshot.services()
    }

    /// The decoded record behind this instance.
    pub fn snapshot(&self) -> &InstanceSnapshot {
        &self.snapshot
    }

    /// The client this instance is bound to.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot == other.snapshot
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name())
            .field("current_state", &self.current_state())
            .field("desired_state", &self.desired_state())
            .field("application", &self.application())
            .finish()
    }
}
