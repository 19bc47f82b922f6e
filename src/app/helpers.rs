//! Contains helper functions to reduce boilerplate code in other `app` modules.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

/// Locks the shared state. A panic in another holder does not leave the state
/// half-written in a way that matters to the UI, so poisoning is ignored.
pub fn lock_state(state: &Arc<Mutex<AppState>>) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends the current state of an already-locked `AppState` to the UI.
pub fn notify<P: EventProxy>(state: &AppState, proxy: &P) {
    proxy.send_event(UserEvent::StateUpdate(Box::new(generate_ui_state(state))));
}

/// A helper function that locks the `AppState`, performs a mutation,
/// and then automatically sends a `StateUpdate` event to the UI.
pub fn with_state_and_notify<F, P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    update_fn: F,
) where
    F: FnOnce(&mut AppState),
{
    let mut state_guard = lock_state(state);
    update_fn(&mut state_guard);
    notify(&state_guard, proxy);
}

/// Shows `message` in the error banner and schedules its dismissal after the configured
/// timeout. A newer banner is not cleared by this one's timer.
pub fn report_error<P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    message: impl Into<String>,
) {
    let (id, timeout) = {
        let mut state_guard = lock_state(state);
        let id = state_guard.raise_error(message);
        notify(&state_guard, proxy);
        (id, state_guard.config.error_banner_timeout_secs)
    };

    let state = state.clone();
    let proxy = proxy.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout)).await;
        let mut state_guard = lock_state(&state);
        if state_guard.dismiss_error(Some(id)) {
            notify(&state_guard, &proxy);
        }
    });
}

/// Cleans up a path typed or pasted by the user: surrounding quotes are stripped,
/// backslashes become `/` and `file://` URLs become plain paths.
pub fn normalize_input_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix(['"', '\'']).unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix(['"', '\'']).unwrap_or(unquoted);
    let path = unquoted.replace('\\', "/").trim().to_string();

    if path.starts_with("file://") {
        if let Some(file_path) = reqwest::Url::parse(&path)
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return file_path.to_string_lossy().replace('\\', "/");
        }
        return path.trim_start_matches("file://").to_string();
    }
    path
}
