//! # PolicyDesk client
//!
//! Front-end state and API access shared by the web and command-line
//! clients:
//!
//! - [`api`] speaks the five-endpoint policy HTTP API.
//! - [`state`] holds the session, drafts and cached policy list.
//! - [`desk`] drives one against the other for front ends that can await.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod desk;
pub mod error;
pub mod state;

pub use api::{HttpPolicyApi, PolicyApi};
pub use desk::PolicyDesk;
pub use error::{Action, ApiError, ClientError};
pub use state::{AuthMode, ClientState, Session, View};
