//! Async driver that pairs a [`PolicyApi`] with a [`ClientState`].

use shared::models::{PolicyId, PolicyPatch, TokenResponse};

use crate::{
    api::PolicyApi,
    error::{ApiError, ClientError},
    state::{AuthMode, AuthRequest, ClientState, FetchRequest},
};

/// Runs each operation end to end: begin, one request, finish.
///
/// Front ends that own their state exclusively (the CLI shell, tests) use
/// this directly. The web store drives [`ClientState`] itself because it
/// cannot hold a borrow across an await.
#[derive(Debug)]
pub struct PolicyDesk<A> {
    api: A,
    state: ClientState,
}

impl<A: PolicyApi> PolicyDesk<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ClientState::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    /// Submit the auth form in its current mode, then load the policy list
    /// if a session was opened.
    ///
    /// Returns whether a session is now open.
    ///
    /// # Errors
    /// Returns [`ClientError`] when the submit is refused locally. Request
    /// failures are recorded on the state instead.
    pub async fn authenticate(&mut self) -> Result<bool, ClientError> {
        let request = self.state.begin_auth()?;
        let outcome = self.send_auth(&request).await;
        if let Some(fetch) = self.state.finish_auth(request, outcome) {
            self.run_fetch(fetch).await;
        }
        Ok(self.state.is_authenticated())
    }

    async fn send_auth(
        &self,
        request: &AuthRequest,
    ) -> Result<TokenResponse, ApiError> {
        match request.mode {
            AuthMode::Login => self.api.login(&request.credentials).await,
            AuthMode::Register => self.api.register(&request.credentials).await,
        }
    }

    async fn run_fetch(&mut self, request: FetchRequest) {
        let outcome = self.api.list_policies(&request.token).await;
        self.state.finish_fetch(request, outcome);
    }

    /// Submit the policy draft.
    ///
    /// # Errors
    /// Returns [`ClientError`] when the draft is incomplete or no session is open.
    pub async fn create_policy(&mut self) -> Result<(), ClientError> {
        let request = self.state.begin_create()?;
        let outcome = self
            .api
            .create_policy(&request.token, &request.draft)
            .await;
        self.state.finish_create(request, outcome);
        Ok(())
    }

    /// # Errors
    /// Returns [`ClientError`] without a session or while the same id is being deleted.
    pub async fn delete_policy(&mut self, id: PolicyId) -> Result<(), ClientError> {
        let request = self.state.begin_delete(id)?;
        let outcome = self.api.delete_policy(&request.token, request.id).await;
        self.state.finish_delete(request, outcome);
        Ok(())
    }

    /// # Errors
    /// Returns [`ClientError`] for an empty patch, without a session, or
    /// while the same id is being updated.
    pub async fn update_policy(
        &mut self,
        id: PolicyId,
        patch: PolicyPatch,
    ) -> Result<(), ClientError> {
        let request = self.state.begin_update(id, patch)?;
        let outcome = self
            .api
            .update_policy(&request.token, request.id, &request.patch)
            .await;
        self.state.finish_update(request, outcome);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.state.logout();
    }
}
