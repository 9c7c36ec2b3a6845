//! Manifest file selectors for the v2 files endpoint.

use std::str::FromStr;

/// Manifest files the dashboard stores per application version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposeFileType {
    /// Plain Docker Compose file.
    DockerCompose,
    /// BigBoat compose file: dashboard-specific service settings. Its `name`
    /// property must equal the application name.
    BigboatCompose,
}

impl ComposeFileType {
    /// Every known selector.
    pub const ALL: [ComposeFileType; 2] = [ComposeFileType::DockerCompose, ComposeFileType::BigboatCompose];

    /// Selector as used in the resource path.
    pub fn as_str(self) -> &'static str {
        match self {
            ComposeFileType::DockerCompose => "dockerCompose",
            ComposeFileType::BigboatCompose => "bigboatCompose",
        }
    }

    /// Whether content must pass [`dashboard::manifest::validate_compose`]
    /// before it is written.
    pub fn requires_validation(self) -> bool {
        matches!(self, ComposeFileType::BigboatCompose)
    }
}

impl std::fmt::Display for ComposeFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComposeFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.as_str() == s)
            .ok_or_else(|| {
                format!("unknown compose file type '{s}' (expected dockerCompose or bigboatCompose)")
            })
    }
}
