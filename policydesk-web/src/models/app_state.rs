use client::ClientState;
use yewdux::Store;

/// Page store. All session and list state lives in [`ClientState`]; the
/// store only makes it observable to components.
#[derive(Debug, Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub desk: ClientState,
}
