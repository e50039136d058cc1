//! Client view state.
//!
//! [`ClientState`] is the single owned container for the session, the form
//! drafts and the cached policy list. Every operation is split into a
//! `begin_*` step that validates and marks the action in flight, returning a
//! request ticket, and a `finish_*` step that applies the outcome. The
//! request itself happens in between, outside the state, so the same entry
//! points serve the async driver in [`crate::desk`] and UI stores that can
//! only be mutated synchronously.

use std::{collections::BTreeSet, fmt};

use shared::{
    models::{Credentials, NewPolicy, Policy, PolicyId, PolicyPatch, Role, TokenResponse},
    token::TokenClaims,
};
use tracing::{debug, info, warn};

use crate::error::{Action, ApiError, ClientError};

/// Which endpoint the auth form submits to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    /// Label of the control that switches to the other mode.
    #[must_use]
    pub fn switch_label(self) -> &'static str {
        match self {
            Self::Login => "Switch to Register",
            Self::Register => "Switch to Login",
        }
    }
}

/// The two mutually exclusive views, keyed solely on session presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Dashboard,
}

/// Bearer token plus the identity shown for it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Label a fresh token, preferring its claims over what the form asserted.
    fn establish(token: &str, submitted: &Credentials) -> Self {
        let claims = TokenClaims::decode_unverified(token).unwrap_or_default();
        Self {
            token: token.to_string(),
            username: claims
                .subject()
                .map_or_else(|| submitted.username.clone(), str::to_string),
            role: claims.role.unwrap_or(submitted.role),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InFlight {
    auth: bool,
    fetch: bool,
    create: bool,
    delete: BTreeSet<PolicyId>,
    update: BTreeSet<PolicyId>,
}

/// Ticket for an auth request.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    generation: u64,
    pub mode: AuthMode,
    pub credentials: Credentials,
}

/// Ticket for a policy list request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    generation: u64,
    pub token: String,
}

/// Ticket for a create request.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    generation: u64,
    pub token: String,
    pub draft: NewPolicy,
}

/// Ticket for a delete request.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    generation: u64,
    pub token: String,
    pub id: PolicyId,
}

/// Ticket for a partial update request.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    generation: u64,
    pub token: String,
    pub id: PolicyId,
    pub patch: PolicyPatch,
}

/// Session, drafts and the cached policy list.
///
/// The list is a local projection of server state: it is replaced by the
/// one fetch issued after authentication and afterwards only appended to,
/// patched, or trimmed by this client's own operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Submit target of the auth form.
    pub mode: AuthMode,
    /// Auth form draft.
    pub auth_form: Credentials,
    /// Create form draft.
    pub policy_draft: NewPolicy,
    session: Option<Session>,
    policies: Vec<Policy>,
    in_flight: InFlight,
    last_error: Option<String>,
    generation: u64,
}

impl ClientState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> View {
        if self.session.is_some() {
            View::Dashboard
        } else {
            View::Auth
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether edit and delete controls are offered. A presentation gate
    /// only: the server decides whether the request succeeds.
    #[must_use]
    pub fn can_manage(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Show a locally refused submit in the error banner. Duplicate submits
    /// are not reported; their controls are already disabled.
    pub fn report_refusal(&mut self, err: ClientError) {
        if !matches!(err, ClientError::InFlight(_)) {
            self.last_error = Some(format!("Cannot continue: {err}"));
        }
    }

    #[must_use]
    pub fn is_busy(&self, action: Action) -> bool {
        match action {
            Action::Authenticate => self.in_flight.auth,
            Action::FetchPolicies => self.in_flight.fetch,
            Action::CreatePolicy => self.in_flight.create,
            Action::DeletePolicy(id) => self.in_flight.delete.contains(&id),
            Action::UpdatePolicy(id) => self.in_flight.update.contains(&id),
        }
    }

    /// Flip between login and register. Ignored once signed in or while an
    /// auth request is outstanding.
    pub fn toggle_mode(&mut self) {
        if self.session.is_none() && !self.in_flight.auth {
            self.mode = self.mode.toggled();
        }
    }

    /// Start a login or register request from the auth form.
    ///
    /// # Errors
    /// Refuses when already signed in, when a request is outstanding, or
    /// when username or password is blank.
    pub fn begin_auth(&mut self) -> Result<AuthRequest, ClientError> {
        if self.session.is_some() {
            return Err(ClientError::AlreadyAuthenticated);
        }
        if self.in_flight.auth {
            return Err(ClientError::InFlight(Action::Authenticate));
        }
        if self.auth_form.username.trim().is_empty() {
            return Err(ClientError::MissingField("username"));
        }
        if self.auth_form.password.is_empty() {
            return Err(ClientError::MissingField("password"));
        }

        self.in_flight.auth = true;
        self.last_error = None;
        debug!(mode = self.mode.label(), username = %self.auth_form.username, "auth requested");
        Ok(AuthRequest {
            generation: self.generation,
            mode: self.mode,
            credentials: self.auth_form.clone(),
        })
    }

    /// Apply an auth outcome.
    ///
    /// A token-bearing body opens the session and returns the follow-up
    /// fetch ticket; anything else leaves the session untouched and records
    /// an error.
    pub fn finish_auth(
        &mut self,
        request: AuthRequest,
        outcome: Result<TokenResponse, ApiError>,
    ) -> Option<FetchRequest> {
        if !self.is_current(request.generation, "auth") {
            return None;
        }
        self.in_flight.auth = false;

        let label = request.mode.label();
        match outcome {
            Ok(body) => {
                let Some(token) = body.token() else {
                    self.last_error = Some(format!(
                        "{label} failed: the server did not return an access token"
                    ));
                    warn!(mode = label, "auth response carried no access token");
                    return None;
                };
                let session = Session::establish(token, &request.credentials);
                info!(mode = label, username = %session.username, role = %session.role, "session established");
                self.session = Some(session);
                self.generation += 1;
                self.policies.clear();
                self.auth_form.password.clear();
                self.begin_fetch().ok()
            }
            Err(err) => {
                self.last_error = Some(format!("{label} failed: {err}"));
                None
            }
        }
    }

    /// Start the policy list request.
    ///
    /// # Errors
    /// Refuses without a session or while a fetch is outstanding.
    pub fn begin_fetch(&mut self) -> Result<FetchRequest, ClientError> {
        let token = self.token()?;
        if self.in_flight.fetch {
            return Err(ClientError::InFlight(Action::FetchPolicies));
        }
        self.in_flight.fetch = true;
        Ok(FetchRequest {
            generation: self.generation,
            token,
        })
    }

    /// Replace the list with the fetched one, in response order.
    pub fn finish_fetch(&mut self, request: FetchRequest, outcome: Result<Vec<Policy>, ApiError>) {
        if !self.is_current(request.generation, "fetch") {
            return;
        }
        self.in_flight.fetch = false;
        match outcome {
            Ok(policies) => {
                debug!(count = policies.len(), "policies loaded");
                self.policies = policies;
            }
            Err(err) => self.last_error = Some(format!("Loading policies failed: {err}")),
        }
    }

    /// Start a create request from the policy draft.
    ///
    /// # Errors
    /// Refuses without a session, while a create is outstanding, or when a
    /// draft field is blank.
    pub fn begin_create(&mut self) -> Result<CreateRequest, ClientError> {
        let token = self.token()?;
        if self.in_flight.create {
            return Err(ClientError::InFlight(Action::CreatePolicy));
        }
        if let Some(field) = self.policy_draft.missing_field() {
            return Err(ClientError::MissingField(field));
        }
        self.in_flight.create = true;
        self.last_error = None;
        Ok(CreateRequest {
            generation: self.generation,
            token,
            draft: self.policy_draft.clone(),
        })
    }

    /// Append the created policy exactly as the server returned it.
    pub fn finish_create(&mut self, request: CreateRequest, outcome: Result<Policy, ApiError>) {
        if !self.is_current(request.generation, "create") {
            return;
        }
        self.in_flight.create = false;
        match outcome {
            Ok(policy) => {
                debug!(id = policy.id, "policy created");
                self.policies.push(policy);
                // keep edits typed while the request was outstanding
                if self.policy_draft == request.draft {
                    self.policy_draft = NewPolicy::default();
                }
            }
            Err(err) => self.last_error = Some(format!("Adding policy failed: {err}")),
        }
    }

    /// Start a delete request.
    ///
    /// # Errors
    /// Refuses without a session or while a delete of the same id is outstanding.
    pub fn begin_delete(&mut self, id: PolicyId) -> Result<DeleteRequest, ClientError> {
        let token = self.token()?;
        if !self.in_flight.delete.insert(id) {
            return Err(ClientError::InFlight(Action::DeletePolicy(id)));
        }
        self.last_error = None;
        Ok(DeleteRequest {
            generation: self.generation,
            token,
            id,
        })
    }

    /// Apply a delete outcome.
    ///
    /// Any HTTP response removes the first entry with the id, whatever its
    /// status; a rejection is reported alongside. Without a response the
    /// list is left alone.
    pub fn finish_delete(&mut self, request: DeleteRequest, outcome: Result<(), ApiError>) {
        if !self.is_current(request.generation, "delete") {
            return;
        }
        let id = request.id;
        self.in_flight.delete.remove(&id);
        match outcome {
            Ok(()) => {
                self.remove_first(id);
            }
            Err(err) if err.has_response() => {
                self.remove_first(id);
                self.last_error = Some(format!(
                    "Deleting policy {id} was rejected ({err}); the list may be out of date"
                ));
            }
            Err(err) => self.last_error = Some(format!("Deleting policy {id} failed: {err}")),
        }
    }

    /// Start a partial update.
    ///
    /// # Errors
    /// Refuses without a session, for an empty patch, or while an update of
    /// the same id is outstanding.
    pub fn begin_update(
        &mut self,
        id: PolicyId,
        patch: PolicyPatch,
    ) -> Result<UpdateRequest, ClientError> {
        let token = self.token()?;
        if patch.is_empty() {
            return Err(ClientError::EmptyPatch);
        }
        if !self.in_flight.update.insert(id) {
            return Err(ClientError::InFlight(Action::UpdatePolicy(id)));
        }
        self.last_error = None;
        Ok(UpdateRequest {
            generation: self.generation,
            token,
            id,
            patch,
        })
    }

    /// Swap in the updated record, keeping its position.
    pub fn finish_update(&mut self, request: UpdateRequest, outcome: Result<Policy, ApiError>) {
        if !self.is_current(request.generation, "update") {
            return;
        }
        let id = request.id;
        self.in_flight.update.remove(&id);
        match outcome {
            Ok(policy) => {
                if let Some(slot) = self.policies.iter_mut().find(|entry| entry.id == id) {
                    *slot = policy;
                } else {
                    debug!(id, "updated policy is no longer listed");
                }
            }
            Err(err) => self.last_error = Some(format!("Updating policy {id} failed: {err}")),
        }
    }

    /// Discard the session and everything fetched under it. Responses to
    /// requests issued before this point are dropped when they arrive.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(username = %session.username, "signed out");
        }
        self.generation += 1;
        self.policies.clear();
        self.policy_draft = NewPolicy::default();
        self.auth_form.password.clear();
        self.in_flight = InFlight::default();
        self.last_error = None;
        self.mode = AuthMode::Login;
    }

    fn token(&self) -> Result<String, ClientError> {
        self.session
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    fn is_current(&self, generation: u64, operation: &'static str) -> bool {
        let current = generation == self.generation;
        if !current {
            warn!(operation, "dropping response issued under a previous session");
        }
        current
    }

    fn remove_first(&mut self, id: PolicyId) -> Option<Policy> {
        let index = self.policies.iter().position(|policy| policy.id == id)?;
        Some(self.policies.remove(index))
    }
}
