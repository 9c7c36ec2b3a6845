//! Canonical instance state vocabulary.
//!
//! Both API generations report instance states as strings. The v2 backend
//! already uses the canonical tokens below; the v1 backend reports the raw
//! unit state of the host's service manager, which [`normalize`] maps onto
//! the same vocabulary. Tokens without a mapping pass through verbatim.

/// The instance has been created but is not running (also the state after a
/// stop request).
pub const CREATED: &str = "created";

/// The instance is running.
pub const RUNNING: &str = "running";

/// The instance is transitioning towards `running`.
pub const STARTING: &str = "starting";

/// The instance is transitioning towards a stopped state.
pub const STOPPING: &str = "stopping";

/// Maps a backend state token onto the canonical vocabulary.
///
/// Surrounding whitespace (including the trailing newline the v1 backend
/// sends) is ignored.
pub fn normalize(raw: &str) -> String {
    let token = raw.trim();
    match token {
        "active" => RUNNING,
        "activating" => STARTING,
        "deactivating" => STOPPING,
        "inactive" => CREATED,
        other => other,
    }
    .to_owned()
}
