//! In-crate test doubles.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    ApiVersion, AppRef, BaseUrl, Client, Driver, InstanceName, InstanceSnapshot, Options, Outcome,
};

fn snapshot(name: &str) -> InstanceSnapshot {
    InstanceSnapshot::new(InstanceName::new(name).unwrap())
}

/// A driver call as observed by [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    UpdateApp {
        name: String,
        version: String,
        options: Option<Options>,
    },
    DeleteApp {
        name: String,
        version: String,
    },
    GetInstance {
        name: String,
    },
    UpdateInstance {
        name: String,
        app_name: String,
        app_version: String,
        parameters: Option<Options>,
        options: Option<Options>,
    },
}

/// Records every call and answers with canned outcomes.
#[derive(Default)]
pub(crate) struct RecordingDriver {
    calls: Mutex<Vec<Call>>,
    update_app: Mutex<Option<Outcome<AppRef>>>,
}

impl RecordingDriver {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn respond_update_app(&self, outcome: Outcome<AppRef>) {
        *self.update_app.lock().unwrap() = Some(outcome);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    async fn update_app(&self, name: &str, version: &str, options: Option<&Options>) -> Outcome<AppRef> {
        self.record(Call::UpdateApp {
            name: name.to_owned(),
            version: version.to_owned(),
            options: options.cloned(),
        });
        self.update_app
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Outcome::Value(AppRef::parse(name, version).unwrap()))
    }

    async fn delete_app(&self, name: &str, version: &str) -> Outcome<()> {
        self.record(Call::DeleteApp {
            name: name.to_owned(),
            version: version.to_owned(),
        });
        Outcome::Value(())
    }

    async fn get_instance(&self, name: &str) -> Outcome<InstanceSnapshot> {
        self.record(Call::GetInstance {
            name: name.to_owned(),
        });
        Outcome::Value(snapshot(name))
    }

    async fn update_instance(
        &self,
        name: &str,
        app_name: &str,
        app_version: &str,
        parameters: Option<&Options>,
        options: Option<&Options>,
    ) -> Outcome<InstanceSnapshot> {
        self.record(Call::UpdateInstance {
            name: name.to_owned(),
            app_name: app_name.to_owned(),
            app_version: app_version.to_owned(),
            parameters: parameters.cloned(),
            options: options.cloned(),
        });
        Outcome::Value(snapshot(name).with_app(AppRef::parse(app_name, app_version)))
    }
}

/// A client bound to a fresh [`RecordingDriver`].
pub(crate) fn recording_client() -> (Client, Arc<RecordingDriver>) {
    let driver = Arc::new(RecordingDriver::default());
    let client = Client::new(
        BaseUrl::new("http://dashboard.example/").unwrap(),
        driver.clone(),
    );
    (client, driver)
}
