//! Store-driven operations.
//!
//! Each action begins on the store, issues its single request on the local
//! executor, and finishes on the store again. The store is never borrowed
//! across the await; responses that arrive after a logout are discarded by
//! the state itself.

use client::{AuthMode, ClientError, ClientState, PolicyApi, state::FetchRequest};
use shared::models::{PolicyId, PolicyPatch};
use wasm_bindgen_futures::spawn_local;
use yewdux::Dispatch;

use crate::{api, models::app_state::AppState};

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

/// Run a `begin_*` step on the store, reporting refusals in the banner.
fn begin<T>(
    dispatch: &Dispatch<AppState>,
    start: impl FnOnce(&mut ClientState) -> Result<T, ClientError>,
) -> Option<T> {
    let mut ticket = None;
    dispatch.reduce_mut(|state| match start(&mut state.desk) {
        Ok(request) => ticket = Some(request),
        Err(err) => {
            log(&format!("PolicyDesk: request refused: {err}"));
            state.desk.report_refusal(err);
        }
    });
    ticket
}

/// Run a `finish_*` step on the store, logging any failure it recorded.
fn finish(dispatch: &Dispatch<AppState>, apply: impl FnOnce(&mut ClientState)) {
    dispatch.reduce_mut(|state| {
        apply(&mut state.desk);
        if let Some(message) = state.desk.last_error() {
            log(&format!("PolicyDesk: {message}"));
        }
    });
}

pub fn authenticate(dispatch: &Dispatch<AppState>) {
    let Some(request) = begin(dispatch, ClientState::begin_auth) else {
        return;
    };
    let dispatch = dispatch.clone();
    spawn_local(async move {
        let api = api::shared();
        let outcome = match request.mode {
            AuthMode::Login => api.login(&request.credentials).await,
            AuthMode::Register => api.register(&request.credentials).await,
        };
        let mut follow_up = None;
        finish(&dispatch, |desk| follow_up = desk.finish_auth(request, outcome));
        if let Some(fetch) = follow_up {
            log("PolicyDesk: signed in, loading policies");
            load_policies(&dispatch, fetch).await;
        }
    });
}

async fn load_policies(dispatch: &Dispatch<AppState>, request: FetchRequest) {
    let outcome = api::shared().list_policies(&request.token).await;
    finish(dispatch, |desk| desk.finish_fetch(request, outcome));
}

pub fn create_policy(dispatch: &Dispatch<AppState>) {
    let Some(request) = begin(dispatch, ClientState::begin_create) else {
        return;
    };
    let dispatch = dispatch.clone();
    spawn_local(async move {
        let outcome = api::shared()
            .create_policy(&request.token, &request.draft)
            .await;
        finish(&dispatch, |desk| desk.finish_create(request, outcome));
    });
}

pub fn delete_policy(dispatch: &Dispatch<AppState>, id: PolicyId) {
    let Some(request) = begin(dispatch, |desk| desk.begin_delete(id)) else {
        return;
    };
    let dispatch = dispatch.clone();
    spawn_local(async move {
        let outcome = api::shared().delete_policy(&request.token, request.id).await;
        finish(&dispatch, |desk| desk.finish_delete(request, outcome));
    });
}

pub fn update_policy(dispatch: &Dispatch<AppState>, id: PolicyId, patch: PolicyPatch) {
    let Some(request) = begin(dispatch, |desk| desk.begin_update(id, patch)) else {
        return;
    };
    let dispatch = dispatch.clone();
    spawn_local(async move {
        let outcome = api::shared()
            .update_policy(&request.token, request.id, &request.patch)
            .await;
        finish(&dispatch, |desk| desk.finish_update(request, outcome));
    });
}

pub fn logout(dispatch: &Dispatch<AppState>) {
    log("PolicyDesk: signed out");
    dispatch.reduce_mut(|state| state.desk.logout());
}

pub fn toggle_mode(dispatch: &Dispatch<AppState>) {
    dispatch.reduce_mut(|state| state.desk.toggle_mode());
}

pub fn dismiss_error(dispatch: &Dispatch<AppState>) {
    dispatch.reduce_mut(|state| state.desk.dismiss_error());
}
