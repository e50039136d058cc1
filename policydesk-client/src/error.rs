use shared::models::PolicyId;
use std::fmt;
use thiserror::Error;

/// Failure of a request that was actually sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No HTTP response was received.
    #[error("unable to reach the server: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("server responded with {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected response from the server: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Whether an HTTP response came back, whatever its status.
    #[must_use]
    pub fn has_response(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

/// The user-triggered operations, used to key in-flight guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Authenticate,
    FetchPolicies,
    CreatePolicy,
    DeletePolicy(PolicyId),
    UpdatePolicy(PolicyId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticate => f.write_str("sign in"),
            Self::FetchPolicies => f.write_str("loading policies"),
            Self::CreatePolicy => f.write_str("adding a policy"),
            Self::DeletePolicy(id) => write!(f, "deleting policy {id}"),
            Self::UpdatePolicy(id) => write!(f, "updating policy {id}"),
        }
    }
}

/// An operation refused locally, before any request was sent.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("already signed in")]
    AlreadyAuthenticated,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("nothing to update")]
    EmptyPatch,
    #[error("{0} is already in progress")]
    InFlight(Action),
}
