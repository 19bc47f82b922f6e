//! The coordinating layer between the webview and the engine.
//!
//! IPC messages from the UI are parsed here and routed to `commands`; `UserEvent`s coming
//! back from commands and background tasks are turned into calls to `window.*` functions
//! in the webview.

pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod filtering;
pub mod helpers;
pub mod proxy;
pub mod shortcuts;
pub mod state;
pub mod tasks;
pub mod view_model;

use std::sync::{Arc, Mutex};

use self::events::{IpcMessage, UserEvent};
use self::file_dialog::DialogService;
use self::proxy::EventProxy;
use self::state::AppState;
use crate::provider::ContentProvider;

/// Parses a raw IPC message and dispatches it to the matching command handler.
pub fn handle_ipc_message<P: EventProxy>(
    message: String,
    dialog: Arc<dyn DialogService>,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg: IpcMessage = match serde_json::from_str(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Ignoring malformed IPC message ({}): {}", e, message);
            return;
        }
    };
    tracing::debug!("IPC command '{}'", msg.command);

    let payload = msg.payload;
    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "selectDirectory" => commands::select_directory(dialog.as_ref(), provider, proxy, state),
        "loadDirectory" => commands::load_directory(payload, provider, proxy, state),
        "clearDirectory" => commands::clear_directory(proxy, state),
        "toggleSelection" => commands::toggle_selection(payload, provider, proxy, state),
        "toggleAll" => commands::toggle_all(provider, proxy, state),
        "toggleExpansion" => commands::toggle_expansion(payload, proxy, state),
        "expandAll" => commands::expand_all(proxy, state),
        "collapseAll" => commands::collapse_all(proxy, state),
        "updateFilters" => commands::update_filters(payload, proxy, state),
        "buildBundle" => commands::build_bundle(payload, provider, proxy, state),
        "loadRecentPath" => commands::load_recent_path(payload, provider, proxy, state),
        "removeRecentPath" => commands::remove_recent_path(payload, proxy, state),
        "clearRecentPaths" => commands::clear_recent_paths(proxy, state),
        "keyPressed" => commands::key_pressed(payload, provider, proxy, state),
        "dismissError" => commands::dismiss_error(proxy, state),
        unknown => tracing::warn!("Unknown IPC command: {}", unknown),
    }
}

/// Renders a `UserEvent` as the JavaScript call the webview should run.
pub fn event_script(event: &UserEvent) -> Option<String> {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => {
            format!("window.render({})", serde_json::to_string(ui_state).ok()?)
        }
        UserEvent::BundleReady {
            content,
            token_count,
            copy,
        } => format!(
            "window.showBundle({}, {}, {})",
            serde_json::to_string(content).ok()?,
            serde_json::to_string(token_count).ok()?,
            copy
        ),
        UserEvent::FocusSearch => "window.focusSearch()".to_string(),
        UserEvent::DragStateChanged(active) => format!("window.setDragState({})", active),
    };
    Some(script)
}

/// Forwards a `UserEvent` to the webview.
pub fn handle_user_event(event: UserEvent, webview: &wry::WebView) {
    let Some(script) = event_script(&event) else {
        tracing::error!("Failed to serialize event for the UI: {:?}", event);
        return;
    };
    if let Err(e) = webview.evaluate_script(&script) {
        tracing::error!("Failed to evaluate script in webview: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::file_dialog::DialogService;
    use crate::config::AppConfig;
    use crate::provider::LocalProvider;
    use std::path::PathBuf;
    use tokio::sync::mpsc;
    use tracing_test::traced_test;

    #[derive(Clone)]
    struct ChannelProxy(mpsc::UnboundedSender<UserEvent>);

    impl EventProxy for ChannelProxy {
        fn send_event(&self, event: UserEvent) {
            let _ = self.0.send(event);
        }
    }

    struct NoDialog;

    impl DialogService for NoDialog {
        fn pick_directory(&self) -> Option<PathBuf> {
            None
        }
    }

    fn dispatch(message: &str) -> mpsc::UnboundedReceiver<UserEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let config_dir = tempfile::tempdir().unwrap();
        let state = AppState::new(AppConfig::default(), Some(config_dir.path().to_path_buf()));
        handle_ipc_message(
            message.to_string(),
            Arc::new(NoDialog),
            Arc::new(LocalProvider::new()),
            ChannelProxy(tx),
            Arc::new(Mutex::new(state)),
        );
        rx
    }

    #[tokio::test]
    async fn test_initialize_message_renders_state() {
        let mut rx = dispatch(r#"{"command":"initialize"}"#);
        let event = rx.try_recv().unwrap();
        let script = event_script(&event).unwrap();
        assert!(script.starts_with("window.render({"));
        assert!(script.contains("\"currentPath\":\"\""));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unknown_and_malformed_messages_are_logged() {
        let mut rx = dispatch(r#"{"command":"launchRockets"}"#);
        assert!(rx.try_recv().is_err());
        assert!(logs_contain("Unknown IPC command: launchRockets"));

        let mut rx = dispatch("not json");
        assert!(rx.try_recv().is_err());
        assert!(logs_contain("Ignoring malformed IPC message"));
    }

    #[test]
    fn test_bundle_script_escapes_content() {
        let script = event_script(&UserEvent::BundleReady {
            content: "<files>\n\"quoted\"\n</files>".to_string(),
            token_count: Some(7),
            copy: true,
        })
        .unwrap();
        assert_eq!(
            script,
            r#"window.showBundle("<files>\n\"quoted\"\n</files>", 7, true)"#
        );

        let cleared = event_script(&UserEvent::BundleReady {
            content: String::new(),
            token_count: None,
            copy: false,
        })
        .unwrap();
        assert_eq!(cleared, r#"window.showBundle("", null, false)"#);
    }

    #[test]
    fn test_simple_event_scripts() {
        assert_eq!(
            event_script(&UserEvent::FocusSearch).as_deref(),
            Some("window.focusSearch()")
        );
        assert_eq!(
            event_script(&UserEvent::DragStateChanged(true)).as_deref(),
            Some("window.setDragState(true)")
        );
    }
}
