pub mod auth;
pub mod errors;
pub mod policy;

pub use auth::{Credentials, Role, TokenResponse};
pub use errors::ErrorResponse;
pub use policy::{NewPolicy, Policy, PolicyId, PolicyPatch};
