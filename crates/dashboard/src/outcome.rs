//! Uniform result of a driver operation.
//!
//! Drivers never decide which Rust shape a caller sees. Each operation returns
//! an [`Outcome`] and the [`crate::Client`] derives the declared contract from
//! it: an optional value, a list, a success flag, or a raised error.

use crate::DashboardError;

/// What a single driver operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation succeeded and produced a value.
    Value(T),
    /// The resource does not exist, or the operation had nothing to report.
    Absent,
    /// The operation failed in a way the caller must handle.
    Failure(DashboardError),
}

impl<T> Outcome<T> {
    /// Optional-value contract: absence becomes `None`, failures are raised.
    pub fn into_option(self) -> Result<Option<T>, DashboardError> {
        match self {
            Outcome::Value(value) => Ok(Some(value)),
            Outcome::Absent => Ok(None),
            Outcome::Failure(err) => Err(err),
        }
    }

    /// Success-flag contract: any value is `true`, absence is `false`,
    /// failures are raised.
    pub fn into_flag(self) -> Result<bool, DashboardError> {
        self.into_option().map(|value| value.is_some())
    }

    /// Maps the value, leaving absence and failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Absent => Outcome::Absent,
            Outcome::Failure(err) => Outcome::Failure(err),
        }
    }

    /// `true` if the operation found nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }
}

impl<T> Outcome<Vec<T>> {
    /// List contract: absence is an empty list, failures are raised.
    pub fn into_list(self) -> Result<Vec<T>, DashboardError> {
        self.into_option().map(Option::unwrap_or_default)
    }
}

impl<T> From<Result<Option<T>, DashboardError>> for Outcome<T> {
    fn from(result: Result<Option<T>, DashboardError>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::Value(value),
            Ok(None) => Outcome::Absent,
            Err(err) => Outcome::Failure(err),
        }
    }
}

impl<T> From<DashboardError> for Outcome<T> {
    fn from(err: DashboardError) -> Self {
        Outcome::Failure(err)
    }
}
