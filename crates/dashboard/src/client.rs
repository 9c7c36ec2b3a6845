//! Client façade over one protocol driver.
//!
//! [`Client`] is the only type application code talks to. It wraps a single
//! [`Driver`], forwards each call to it, and turns the driver's [`Outcome`]
//! into the operation's declared contract. Entities it returns are bound to a
//! clone of the client, so their actions go through the same driver.
//!
//! The client holds immutable configuration only: the canonical endpoint and
//! the driver. Cloning is cheap and clones may be used concurrently.

use std::sync::Arc;

use crate::{
    ApiVersion, Application, BaseUrl, DashboardResult, Driver, Instance, Options, StatusRecord,
};

/// Façade over one API generation of the dashboard.
#[derive(Clone)]
pub struct Client {
    base_url: BaseUrl,
    driver: Arc<dyn Driver>,
}

impl Client {
    /// Wraps `driver`, which talks to the dashboard at `base_url`.
    pub fn new(base_url: BaseUrl, driver: Arc<dyn Driver>) -> Self {
        Self { base_url, driver }
    }

    /// Dashboard endpoint without trailing `/`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// API generation of the underlying driver.
    pub fn api_version(&self) -> ApiVersion {
        self.driver.api_version()
    }

    // -----------------------------------------------------------------------
    // Applications
    // -----------------------------------------------------------------------

    /// Lists application definitions.
    pub async fn apps(&self) -> DashboardResult<Vec<Application>> {
        let keys = self.driver.apps().await.into_list()?;
        Ok(keys
            .into_iter()
            .map(|key| Application::bind(self.clone(), key))
            .collect())
    }

    /// Fetches an application definition, or `None` if it does not exist.
    pub async fn get_app(&self, name: &str, version: &str) -> DashboardResult<Option<Application>> {
        let key = self.driver.get_app(name, version).await.into_option()?;
        Ok(key.map(|key| Application::bind(self.clone(), key)))
    }

    /// Creates or replaces an application definition.
    pub async fn update_app(
        &self,
        name: &str,
        version: &str,
        options: Option<&Options>,
    ) -> DashboardResult<Option<Application>> {
        let key = self
            .driver
            .update_app(name, version, options)
            .await
            .into_option()?;
        Ok(key.map(|key| Application::bind(self.clone(), key)))
    }

    /// Deletes an application definition. Returns `false` if it was not
    /// deleted (for example because it does not exist).
    pub async fn delete_app(&self, name: &str, version: &str) -> DashboardResult<bool> {
        self.driver.delete_app(name, version).await.into_flag()
    }

    // -----------------------------------------------------------------------
    // Instances
    // -----------------------------------------------------------------------

    /// Lists instances.
    pub async fn instances(&self) -> DashboardResult<Vec<Instance>> {
        let snapshots = self.driver.instances().await.into_list()?;
        Ok(snapshots
            .into_iter()
            .map(|snapshot| Instance::bind(self.clone(), snapshot))
            .collect())
    }

    /// Fetches an instance, or `None` if it does not exist.
    pub async fn get_instance(&self, name: &str) -> DashboardResult<Option<Instance>> {
        let snapshot = self.driver.get_instance(name).await.into_option()?;
        Ok(snapshot.map(|snapshot| Instance::bind(self.clone(), snapshot)))
    }

    /// Starts instance `name` of application `app_name`/`app_version`.
    ///
    /// `parameters` and `options` are forwarded to backends that accept
    /// them.
    pub async fn update_instance(
        &self,
        name: &str,
        app_name: &str,
        app_version: &str,
        parameters: Option<&Options>,
        options: Option<&Options>,
    ) -> DashboardResult<Option<Instance>> {
        let snapshot = self
            .driver
            .update_instance(name, app_name, app_version, parameters, options)
            .await
            .into_option()?;
        Ok(snapshot.map(|snapshot| Instance::bind(self.clone(), snapshot)))
    }

    /// Stops instance `name`.
    pub async fn delete_instance(&self, name: &str) -> DashboardResult<Option<Instance>> {
        let snapshot = self.driver.delete_instance(name).await.into_option()?;
        Ok(snapshot.map(|snapshot| Instance::bind(self.clone(), snapshot)))
    }

    // -----------------------------------------------------------------------
    // System
    // -----------------------------------------------------------------------

    /// Fetches the dashboard's health-check records, verbatim.
    pub async fn statuses(&self) -> DashboardResult<Vec<StatusRecord>> {
        self.driver.statuses().await.into_list()
    }

    // -----------------------------------------------------------------------
    // Manifest files
    // -----------------------------------------------------------------------

    /// Fetches manifest file `file_type` of an application, or `None` if the
    /// application, version, or file type does not exist.
    pub async fn get_compose(
        &self,
        name: &str,
        version: &str,
        file_type: &str,
    ) -> DashboardResult<Option<String>> {
        self.driver
            .get_compose(name, version, file_type)
            .await
            .into_option()
    }

    /// Replaces manifest file `file_type` of an application.
    ///
    /// Returns `false` if the target does not exist. Content rejected by
    /// validation raises [`crate::DashboardError::Validation`].
    pub async fn update_compose(
        &self,
        name: &str,
        version: &str,
        file_type: &str,
        content: &str,
    ) -> DashboardResult<bool> {
        self.driver
            .update_compose(name, version, file_type, content)
            .await
            .into_flag()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("api_version", &self.api_version())
            .finish()
    }
}
