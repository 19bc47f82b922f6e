//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! These handlers are responsible for interacting with the `AppState` and the `core`
//! logic, and for sending `UserEvent`s back to the UI.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::events::UserEvent;
use super::filtering;
use super::helpers::{lock_state, notify, with_state_and_notify};
use super::proxy::EventProxy;
use super::shortcuts::{self, KeyPress, ShortcutAction};
use super::state::AppState;
use super::tasks::{refresh_preview, start_bundle, start_load};
use crate::app::file_dialog::DialogService;
use crate::provider::ContentProvider;

#[derive(Debug, Deserialize, Default)]
struct FilterUpdate {
    #[serde(default)]
    query: String,
    #[serde(default)]
    extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BundleRequest {
    #[serde(default)]
    copy: bool,
}

/// Handles the initial request for state from the frontend when it loads.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let state_guard = lock_state(&state);
    notify(&state_guard, &proxy);
}

/// Opens a folder dialog and loads the chosen directory.
pub fn select_directory<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match dialog.pick_directory() {
        Some(path) => start_load(&path.to_string_lossy(), provider, proxy, state),
        None => tracing::info!("User cancelled directory selection."),
    }
}

/// Loads the directory path typed or pasted by the user.
pub fn load_directory<P: EventProxy>(
    payload: serde_json::Value,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match serde_json::from_value::<String>(payload.clone()) {
        Ok(path) => start_load(&path, provider, proxy, state),
        Err(_) => tracing::warn!("Failed to deserialize path from payload: {:?}", payload),
    }
}

/// Clears the currently loaded directory and forgets it as the last directory.
pub fn clear_directory<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.reset_directory_state();
        s.config.last_directory = None;
        s.persist_config();
    });
    proxy.send_event(UserEvent::BundleReady {
        content: String::new(),
        token_count: None,
        copy: false,
    });
}

/// Toggles a file or directory, cascading to its subtree and ancestors.
pub fn toggle_selection<P: EventProxy>(
    payload: serde_json::Value,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(path) = serde_json::from_value::<String>(payload.clone()) else {
        tracing::warn!("Failed to deserialize path from payload: {:?}", payload);
        return;
    };
    let changed = {
        let mut state_guard = lock_state(&state);
        let s = &mut *state_guard;
        let changed = s.selection.toggle(&path, &s.view_index);
        if changed {
            notify(s, &proxy);
        } else {
            tracing::debug!("Ignoring toggle of unknown path {}", path);
        }
        changed
    };
    if changed {
        refresh_preview(provider, proxy, state);
    }
}

/// Selects everything visible when nothing is selected, otherwise clears the selection.
pub fn toggle_all<P: EventProxy>(
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    {
        let mut state_guard = lock_state(&state);
        if !state_guard.has_tree() {
            return;
        }
        let s = &mut *state_guard;
        s.selection.toggle_all(&s.view_index);
        notify(s, &proxy);
    }
    refresh_preview(provider, proxy, state);
}

/// Toggles the expanded/collapsed state of a directory in the UI tree.
pub fn toggle_expansion<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match serde_json::from_value::<String>(payload.clone()) {
        Ok(path) => with_state_and_notify(&state, &proxy, |s| s.expanded.toggle(&path)),
        Err(_) => tracing::warn!("Failed to deserialize path from payload: {:?}", payload),
    }
}

/// Expands every directory of the loaded tree.
pub fn expand_all<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| s.expanded.expand_all(&s.full_index));
}

pub fn collapse_all<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| s.expanded.collapse_all());
}

/// Updates the search query and the extension filter and recomputes the view.
pub fn update_filters<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(update) = serde_json::from_value::<FilterUpdate>(payload.clone()) else {
        tracing::warn!("Failed to deserialize filters from payload: {:?}", payload);
        return;
    };
    let extensions: BTreeSet<String> = update
        .extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    with_state_and_notify(&state, &proxy, |s| {
        s.search_query = update.query;
        s.extension_filter = extensions;
        filtering::apply_filters(s);
    });
}

/// Builds the bundle for the current selection, optionally for the clipboard.
pub fn build_bundle<P: EventProxy>(
    payload: serde_json::Value,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let request = if payload.is_null() {
        BundleRequest::default()
    } else {
        match serde_json::from_value::<BundleRequest>(payload.clone()) {
            Ok(request) => request,
            Err(_) => {
                tracing::warn!("Failed to deserialize bundle request: {:?}", payload);
                return;
            }
        }
    };
    start_bundle(request.copy, provider, proxy, state);
}

pub fn load_recent_path<P: EventProxy>(
    payload: serde_json::Value,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    load_directory(payload, provider, proxy, state);
}

pub fn remove_recent_path<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(path) = serde_json::from_value::<String>(payload.clone()) else {
        tracing::warn!("Failed to deserialize path from payload: {:?}", payload);
        return;
    };
    with_state_and_notify(&state, &proxy, |s| {
        if s.recent_paths.remove(&path) {
            s.persist_recent_paths();
        }
    });
}

pub fn clear_recent_paths<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.recent_paths.clear();
        s.persist_recent_paths();
    });
}

/// Runs the action bound to a key press, if any.
pub fn key_pressed<P: EventProxy>(
    payload: serde_json::Value,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(press) = serde_json::from_value::<KeyPress>(payload.clone()) else {
        tracing::warn!("Failed to deserialize key press: {:?}", payload);
        return;
    };
    let Some(action) = shortcuts::dispatch(&press.key, press.modifier, press.focus()) else {
        return;
    };
    tracing::debug!("Shortcut {:?}", action);

    match action {
        ShortcutAction::ToggleSelectAll => toggle_all(provider, proxy, state),
        ShortcutAction::CopyBundle => start_bundle(true, provider, proxy, state),
        ShortcutAction::FocusSearch => proxy.send_event(UserEvent::FocusSearch),
        ShortcutAction::ClearSearch => with_state_and_notify(&state, &proxy, |s| {
            s.search_query.clear();
            filtering::apply_filters(s);
        }),
    }
}

pub fn dismiss_error<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = lock_state(&state);
    if state_guard.dismiss_error(None) {
        notify(&state_guard, &proxy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::view_model::UiState;
    use crate::config::AppConfig;
    use crate::core::SelectionState;
    use crate::provider::LocalProvider;
    use serde_json::json;
    use std::fs as std_fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};
    use tokio::sync::mpsc;

    // A mock EventProxy for capturing events sent to the UI.
    #[derive(Clone)]
    struct TestEventProxy {
        sender: mpsc::UnboundedSender<UserEvent>,
    }

    impl EventProxy for TestEventProxy {
        fn send_event(&self, event: UserEvent) {
            // Timers may outlive the receiver at the end of a test.
            let _ = self.sender.send(event);
        }
    }

    #[derive(Default)]
    struct MockDialogService {
        picked_folder: Mutex<Option<PathBuf>>,
    }

    impl MockDialogService {
        fn set_pick_folder(&self, path: Option<PathBuf>) {
            *self.picked_folder.lock().unwrap() = path;
        }
    }

    impl DialogService for MockDialogService {
        fn pick_directory(&self) -> Option<PathBuf> {
            self.picked_folder.lock().unwrap().clone()
        }
    }

    struct TestHarness {
        state: Arc<Mutex<AppState>>,
        proxy: TestEventProxy,
        event_rx: mpsc::UnboundedReceiver<UserEvent>,
        dialog: Arc<MockDialogService>,
        provider: Arc<dyn ContentProvider>,
        _temp_dir: TempDir,
        _config_dir: TempDir,
        root_path: PathBuf,
    }

    impl TestHarness {
        fn new() -> Self {
            Self::with_config(AppConfig::default())
        }

        fn with_config(config: AppConfig) -> Self {
            let temp_dir = tempdir().expect("Failed to create temp dir");
            let config_dir = tempdir().expect("Failed to create config dir");
            let root_path = temp_dir.path().to_path_buf();
            let (tx, rx) = mpsc::unbounded_channel();
            let state = AppState::new(config, Some(config_dir.path().to_path_buf()));

            Self {
                state: Arc::new(Mutex::new(state)),
                proxy: TestEventProxy { sender: tx },
                event_rx: rx,
                dialog: Arc::new(MockDialogService::default()),
                provider: Arc::new(LocalProvider::new()),
                _temp_dir: temp_dir,
                _config_dir: config_dir,
                root_path,
            }
        }

        fn root(&self) -> String {
            self.root_path.to_string_lossy().replace('\\', "/")
        }

        fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
            let path = self.root_path.join(relative_path);
            if let Some(parent) = path.parent() {
                std_fs::create_dir_all(parent).unwrap();
            }
            std_fs::write(&path, content).unwrap();
            path
        }

        fn create_project(&self) {
            self.create_file("src/main.rs", "fn main() {}");
            self.create_file("src/lib.rs", "pub mod app;");
            self.create_file("README.md", "# Demo");
            self.create_file("target/debug/out.bin", "bin");
            self.create_file(".gitignore", "target/\n");
        }

        async fn get_next_event(&mut self) -> Option<UserEvent> {
            tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv())
                .await
                .ok()
                .flatten()
        }

        async fn get_next_event_quickly(&mut self) -> Option<UserEvent> {
            tokio::time::timeout(Duration::from_millis(200), self.event_rx.recv())
                .await
                .ok()
                .flatten()
        }

        async fn get_last_state_update(&mut self) -> Option<Box<UiState>> {
            let mut last_update = None;
            let timeout = tokio::time::sleep(Duration::from_millis(300));
            tokio::pin!(timeout);
            loop {
                tokio::select! {
                    event = self.event_rx.recv() => {
                        match event {
                            Some(UserEvent::StateUpdate(ui_state)) => last_update = Some(ui_state),
                            Some(_) => {}
                            None => break,
                        }
                    },
                    _ = &mut timeout => { break; }
                }
            }
            last_update
        }

        async fn wait_for_state<F>(&mut self, predicate: F) -> Option<Box<UiState>>
        where
            F: Fn(&UiState) -> bool,
        {
            while let Some(event) = self.get_next_event().await {
                if let UserEvent::StateUpdate(ui_state) = event {
                    if predicate(&ui_state) {
                        return Some(ui_state);
                    }
                }
            }
            None
        }

        async fn wait_for_bundle(&mut self) -> Option<(String, bool)> {
            while let Some(event) = self.get_next_event().await {
                if let UserEvent::BundleReady { content, copy, .. } = event {
                    if !content.is_empty() {
                        return Some((content, copy));
                    }
                }
            }
            None
        }

        async fn load_project(&mut self) -> Box<UiState> {
            self.create_project();
            load_directory(
                json!(self.root()),
                self.provider.clone(),
                self.proxy.clone(),
                self.state.clone(),
            );
            let loaded = self
                .wait_for_state(|s| !s.is_loading && s.root.is_some())
                .await
                .expect("directory should load");
            // Discard the preview reset that follows a load.
            while self.get_next_event_quickly().await.is_some() {}
            loaded
        }
    }

    #[tokio::test]
    async fn test_initialize_sends_initial_state() {
        let mut harness = TestHarness::new();
        initialize(harness.proxy.clone(), harness.state.clone());
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.root.is_none());
        assert!(!ui_state.is_loading);
    }

    #[tokio::test]
    async fn test_load_directory_applies_gitignore_and_records_recent_path() {
        let mut harness = TestHarness::new();
        let ui_state = harness.load_project().await;

        assert_eq!(ui_state.current_path, harness.root());
        assert_eq!(ui_state.total_files, 3);
        let root = ui_state.root.as_ref().unwrap();
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["src", "README.md"]);

        let state = harness.state.lock().unwrap();
        assert_eq!(state.config.last_directory.as_deref(), Some(harness.root().as_str()));
        assert_eq!(state.recent_paths.entries()[0].path, harness.root());
    }

    #[tokio::test]
    async fn test_load_directory_rejects_empty_path() {
        let mut harness = TestHarness::new();
        load_directory(
            json!("   "),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert_eq!(ui_state.error.as_deref(), Some("Please enter a directory path"));
        assert!(!ui_state.is_loading);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_tree() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        let missing = harness.root_path.join("missing").to_string_lossy().to_string();
        load_directory(
            json!(missing),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness
            .wait_for_state(|s| s.error.is_some())
            .await
            .unwrap();
        assert_eq!(ui_state.error.as_deref(), Some("Unable to read directory"));
        assert_eq!(ui_state.current_path, harness.root());
        assert!(ui_state.root.is_some());
    }

    #[tokio::test]
    async fn test_select_directory_loads_picked_folder() {
        let mut harness = TestHarness::new();
        harness.create_project();
        harness.dialog.set_pick_folder(Some(harness.root_path.clone()));

        select_directory(
            harness.dialog.as_ref(),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );

        let ui_state = harness
            .wait_for_state(|s| !s.is_loading && s.root.is_some())
            .await
            .unwrap();
        assert_eq!(ui_state.total_files, 3);
    }

    #[tokio::test]
    async fn test_select_directory_does_nothing_on_cancel() {
        let mut harness = TestHarness::new();
        harness.dialog.set_pick_folder(None);
        select_directory(
            harness.dialog.as_ref(),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        assert!(harness.get_last_state_update().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_selection_cascades_and_builds_preview() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        toggle_selection(
            json!("src"),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );

        let (content, copy) = harness.wait_for_bundle().await.unwrap();
        assert!(!copy);
        assert!(content.starts_with("<files>\n"));
        assert!(content.contains("  <file path=\"src/main.rs\">\nfn main() {}\n  </file>"));
        assert!(!content.contains("README.md\">"));

        let state = harness.state.lock().unwrap();
        assert!(state.selection.contains("src/lib.rs"));
        assert_eq!(state.selection.file_count(&state.full_index), 2);
        assert!(state.preview.as_ref().unwrap().token_count.is_some());
    }

    #[tokio::test]
    async fn test_toggle_selection_ignores_unknown_path() {
        let mut harness = TestHarness::new();
        harness.load_project().await;
        toggle_selection(
            json!("nope/missing.rs"),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        assert!(harness.get_last_state_update().await.is_none());
        assert!(harness.state.lock().unwrap().selection.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_all_selects_then_clears() {
        let config = AppConfig {
            auto_preview: false,
            ..AppConfig::default()
        };
        let mut harness = TestHarness::with_config(config);
        harness.load_project().await;

        toggle_all(
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness.get_last_state_update().await.unwrap();
        let root = ui_state.root.unwrap();
        assert_eq!(root.selection_state, SelectionState::Selected);
        assert_eq!(ui_state.selected_file_count, 3);

        toggle_all(
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert_eq!(ui_state.selected_count, 0);
    }

    #[tokio::test]
    async fn test_update_filters_narrows_and_expands() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        update_filters(
            json!({ "query": "MAIN", "extensions": [".RS"] }),
            harness.proxy.clone(),
            harness.state.clone(),
        );

        let ui_state = harness.get_last_state_update().await.unwrap();
        assert_eq!(ui_state.visible_files, 1);
        assert_eq!(ui_state.extension_filter, vec!["rs".to_string()]);
        let root = ui_state.root.unwrap();
        assert_eq!(root.children.len(), 1);
        assert!(root.children[0].is_expanded);

        let state = harness.state.lock().unwrap();
        assert!(state.expanded.is_expanded("src"));
    }

    #[tokio::test]
    async fn test_update_filters_handles_invalid_payload() {
        let mut harness = TestHarness::new();
        update_filters(json!(42), harness.proxy.clone(), harness.state.clone());
        assert!(harness.get_last_state_update().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_expansion_and_expand_collapse_all() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        toggle_expansion(json!("src"), harness.proxy.clone(), harness.state.clone());
        harness.get_last_state_update().await.unwrap();
        assert!(harness.state.lock().unwrap().expanded.is_expanded("src"));

        toggle_expansion(json!("src"), harness.proxy.clone(), harness.state.clone());
        harness.get_last_state_update().await.unwrap();
        assert!(!harness.state.lock().unwrap().expanded.is_expanded("src"));

        expand_all(harness.proxy.clone(), harness.state.clone());
        harness.get_last_state_update().await.unwrap();
        {
            let state = harness.state.lock().unwrap();
            assert!(state.expanded.is_expanded("src"));
            assert!(state.expanded.is_expanded(&harness.root()));
        }

        collapse_all(harness.proxy.clone(), harness.state.clone());
        harness.get_last_state_update().await.unwrap();
        assert!(harness.state.lock().unwrap().expanded.is_empty());
    }

    #[tokio::test]
    async fn test_build_bundle_with_copy() {
        let config = AppConfig {
            auto_preview: false,
            include_file_map: false,
            ..AppConfig::default()
        };
        let mut harness = TestHarness::with_config(config);
        harness.load_project().await;
        {
            let mut state = harness.state.lock().unwrap();
            let state = &mut *state;
            assert!(state.selection.toggle("README.md", &state.view_index));
        }

        build_bundle(
            json!({ "copy": true }),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );

        let (content, copy) = harness.wait_for_bundle().await.unwrap();
        assert!(copy);
        assert_eq!(
            content,
            "<files>\n  <file path=\"README.md\">\n# Demo\n  </file>\n</files>"
        );
    }

    #[tokio::test]
    async fn test_build_bundle_copy_with_empty_selection_does_nothing() {
        let mut harness = TestHarness::new();
        harness.load_project().await;
        build_bundle(
            json!({ "copy": true }),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        assert!(harness.get_next_event_quickly().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_directory_resets_state() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        clear_directory(harness.proxy.clone(), harness.state.clone());

        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.current_path.is_empty());
        assert!(ui_state.root.is_none());
        let state = harness.state.lock().unwrap();
        assert!(state.config.last_directory.is_none());
        assert!(state.selection.is_empty());
    }

    #[tokio::test]
    async fn test_recent_paths_remove_and_clear() {
        let mut harness = TestHarness::new();
        harness.load_project().await;

        remove_recent_path(json!(harness.root()), harness.proxy.clone(), harness.state.clone());
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.recent_paths.is_empty());

        {
            let mut state = harness.state.lock().unwrap();
            state.recent_paths.add("/a");
            state.recent_paths.add("/b");
        }
        clear_recent_paths(harness.proxy.clone(), harness.state.clone());
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.recent_paths.is_empty());
    }

    #[tokio::test]
    async fn test_load_recent_path_loads_directory() {
        let mut harness = TestHarness::new();
        harness.create_project();
        load_recent_path(
            json!(harness.root()),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness
            .wait_for_state(|s| !s.is_loading && s.root.is_some())
            .await
            .unwrap();
        assert_eq!(ui_state.current_path, harness.root());
    }

    #[tokio::test]
    async fn test_key_pressed_escape_clears_search() {
        let mut harness = TestHarness::new();
        harness.load_project().await;
        update_filters(
            json!({ "query": "main" }),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        harness.get_last_state_update().await.unwrap();

        key_pressed(
            json!({ "key": "Escape", "modifier": false, "inputFocused": true }),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.search_query.is_empty());
        assert_eq!(ui_state.visible_files, 3);
    }

    #[tokio::test]
    async fn test_key_pressed_focus_search() {
        let mut harness = TestHarness::new();
        key_pressed(
            json!({ "key": "f", "modifier": true, "inputFocused": false }),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        assert!(matches!(
            harness.get_next_event().await,
            Some(UserEvent::FocusSearch)
        ));
    }

    #[tokio::test]
    async fn test_key_pressed_select_all_ignored_in_inputs() {
        let mut harness = TestHarness::new();
        harness.load_project().await;
        key_pressed(
            json!({ "key": "a", "modifier": true, "inputFocused": true }),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        assert!(harness.get_last_state_update().await.is_none());
        assert!(harness.state.lock().unwrap().selection.is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_error() {
        let mut harness = TestHarness::new();
        harness.state.lock().unwrap().raise_error("boom");
        dismiss_error(harness.proxy.clone(), harness.state.clone());
        let ui_state = harness.get_last_state_update().await.unwrap();
        assert!(ui_state.error.is_none());
    }

    #[tokio::test]
    async fn test_error_banner_auto_dismisses() {
        let config = AppConfig {
            error_banner_timeout_secs: 1,
            ..AppConfig::default()
        };
        let mut harness = TestHarness::with_config(config);
        load_directory(
            json!(""),
            harness.provider.clone(),
            harness.proxy.clone(),
            harness.state.clone(),
        );
        let shown = harness.get_next_event().await;
        assert!(matches!(shown, Some(UserEvent::StateUpdate(s)) if s.error.is_some()));

        let cleared = harness.wait_for_state(|s| s.error.is_none()).await;
        assert!(cleared.is_some());
    }
}
