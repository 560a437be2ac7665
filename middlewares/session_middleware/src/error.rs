use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("session storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
