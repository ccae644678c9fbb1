use thiserror::Error;

/// Input errors reported to the user when a sync cannot start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("cannot determine term from '{0}'")]
    InvalidTerm(String),
    #[error("no weeks of {0} found on the page; select the matching year on the portal")]
    NoWeeksInTerm(String),
}
