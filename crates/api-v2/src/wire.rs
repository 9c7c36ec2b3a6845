//! JSON shapes of the v2 API.
//!
//! Only the fields the client uses are declared; everything else the backend
//! sends (record ids, timestamps) is ignored.

use dashboard::{AppName, AppRef, AppVersion, InstanceName, InstanceSnapshot, Services};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AppRecord {
    name: AppName,
    version: AppVersion,
}

impl From<AppRecord> for AppRef {
    fn from(record: AppRecord) -> Self {
        AppRef::new(record.name, record.version)
    }
}

#[derive(Debug, Default, Deserialize)]
struct StateRecord {
    current: Option<String>,
    desired: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstanceRecord {
    name: InstanceName,
    #[serde(default)]
    state: Option<StateRecord>,
    #[serde(default)]
    app: Option<AppRecord>,
    #[serde(default)]
    services: Option<Services>,
}

impl From<InstanceRecord> for InstanceSnapshot {
    fn from(record: InstanceRecord) -> Self {
        let state = record.state.unwrap_or_default();
        let mut snapshot = InstanceSnapshot::new(record.name)
            .with_desired_state(state.desired)
            .with_app(record.app.map(AppRef::from))
            .with_services(record.services.unwrap_or_default());
        if let Some(current) = state.current {
            snapshot = snapshot.with_current_state(current);
        }
        snapshot
    }
}

/// Error body the backend sends with some rejections.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}
