//! Manifest text handling.
//!
//! Two kinds of YAML manifest cross the wire: the v1 application definition
//! returned by the definition endpoint, and the compose files managed through
//! the v2 files endpoint. Parsing is delegated to `serde_yaml`; this module
//! only applies the client-side rules on top of the parsed document.

use serde::Deserialize;
use serde_yaml::Value;

use crate::{AppName, AppRef, AppVersion, DashboardError, DashboardResult};

/// The part of a compose file the client checks. Plain scalars deserialised
/// into a string keep the text the author wrote, so `1.10` stays `1.10`.
#[derive(Debug, Deserialize)]
struct ComposeHeader {
    #[serde(default)]
    name: Option<String>,
}

/// The identifying part of a v1 application definition.
#[derive(Debug, Deserialize)]
struct Definition {
    name: AppName,
    version: AppVersion,
}

/// Validates compose content before it is written for application `name`.
///
/// The content must parse as YAML, the document must be a mapping, and its
/// `name` field must equal `name`. Every failure is a
/// [`DashboardError::Validation`].
pub fn validate_compose(name: &str, content: &str) -> DashboardResult<()> {
    let document: Value = serde_yaml::from_str(content)
        .map_err(|e| DashboardError::validation(format!("content is not valid YAML: {e}")))?;

    if !document.is_mapping() {
        return Err(DashboardError::validation(
            "compose content must be a YAML mapping",
        ));
    }

    let header: ComposeHeader = serde_yaml::from_str(content)
        .map_err(|e| DashboardError::validation(format!("name property is not text: {e}")))?;
    match header.name {
        Some(declared) if declared == name => Ok(()),
        Some(declared) => Err(DashboardError::validation(format!(
            "name property '{declared}' of the compose file must be equal to the application name '{name}'"
        ))),
        None => Err(DashboardError::validation(
            "compose content has no name property",
        )),
    }
}

/// Decodes a v1 application definition into its `(name, version)` key.
///
/// The definition also carries an `instance` section describing the
/// container; it is not needed to identify the application and is ignored.
pub fn parse_definition(text: &str) -> DashboardResult<AppRef> {
    const CONTEXT: &str = "application definition";

    let definition: Definition =
        serde_yaml::from_str(text).map_err(|e| DashboardError::decode(CONTEXT, e))?;
    Ok(AppRef::new(definition.name, definition.version))
}
