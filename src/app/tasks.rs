//! Background work: loading a directory through the provider and building bundles.

use std::sync::{Arc, Mutex, OnceLock};

use tiktoken_rs::CoreBPE;

use super::events::UserEvent;
use super::filtering::apply_filters;
use super::helpers::{lock_state, normalize_input_path, notify, report_error};
use super::proxy::EventProxy;
use super::state::{AppState, Preview};

use crate::core::{BundleOptions, CoreError, PatternList, Tree};
use crate::provider::ContentProvider;

const BUNDLE_FAILED: &str = "Failed to generate bundle";

/// Starts loading the directory the user entered, dropped or picked.
///
/// Loads are not cancelled: when two overlap, whichever finishes last wins. A failed load
/// leaves the previously loaded tree in place.
pub fn start_load<P: EventProxy>(
    raw_path: &str,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let path = normalize_input_path(raw_path);
    if path.is_empty() {
        report_error(&state, &proxy, CoreError::PathMissing.user_message());
        return;
    }

    {
        let mut state_guard = lock_state(&state);
        state_guard.is_loading = true;
        state_guard.dismiss_error(None);
        notify(&state_guard, &proxy);
    }

    tokio::spawn(async move {
        tracing::info!("Loading directory {}", path);
        let result = async {
            let gitignore = provider.read_gitignore(&path).await?;
            let patterns = PatternList::from_gitignore(gitignore.as_deref());
            let nodes = provider.list_directory(&path, &patterns).await?;
            Ok::<_, CoreError>((nodes, patterns))
        }
        .await;

        match result {
            Ok((nodes, patterns)) => {
                let mut state_guard = lock_state(&state);
                let tree = Tree::new(path.clone(), nodes);
                state_guard.install_tree(path.clone(), tree, patterns);
                state_guard.config.last_directory = Some(path.clone());
                state_guard.persist_config();
                state_guard.recent_paths.add(&path);
                state_guard.persist_recent_paths();
                apply_filters(&mut state_guard);
                state_guard.is_loading = false;
                tracing::info!(
                    "Loaded {} entries from {}",
                    state_guard.full_index.len(),
                    path
                );
                notify(&state_guard, &proxy);
                drop(state_guard);
                proxy.send_event(UserEvent::BundleReady {
                    content: String::new(),
                    token_count: None,
                    copy: false,
                });
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", path, e);
                {
                    let mut state_guard = lock_state(&state);
                    state_guard.is_loading = false;
                    notify(&state_guard, &proxy);
                }
                report_error(&state, &proxy, e.user_message());
            }
        }
    });
}

/// Builds the bundle for the current selection. With `copy`, the UI is asked to put the
/// result on the clipboard; an empty selection then does nothing.
pub fn start_bundle<P: EventProxy>(
    copy: bool,
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let (root, selections, patterns, options) = {
        let mut state_guard = lock_state(&state);
        if !state_guard.has_tree() || state_guard.selection.is_empty() {
            if !copy && state_guard.preview.take().is_some() {
                notify(&state_guard, &proxy);
                proxy.send_event(UserEvent::BundleReady {
                    content: String::new(),
                    token_count: None,
                    copy: false,
                });
            }
            return;
        }
        state_guard.is_bundling = true;
        notify(&state_guard, &proxy);
        (
            state_guard.current_path.clone(),
            state_guard.selected_paths_in_order(),
            state_guard.patterns.clone(),
            BundleOptions {
                include_file_map: state_guard.config.include_file_map,
            },
        )
    };

    tokio::spawn(async move {
        match provider
            .read_files(&root, &selections, &patterns, options)
            .await
        {
            Ok(content) => {
                let token_count = tokio::task::spawn_blocking({
                    let content = content.clone();
                    move || count_tokens(&content)
                })
                .await
                .ok()
                .flatten();

                let mut state_guard = lock_state(&state);
                state_guard.is_bundling = false;
                // A bundle for a selection that has since changed is only good for the clipboard.
                let current = state_guard.current_path == root
                    && state_guard.selected_paths_in_order() == selections;
                if current {
                    state_guard.preview = Some(Preview {
                        content: content.clone(),
                        token_count,
                    });
                }
                notify(&state_guard, &proxy);
                drop(state_guard);
                if current || copy {
                    proxy.send_event(UserEvent::BundleReady {
                        content,
                        token_count,
                        copy,
                    });
                }
            }
            Err(e) => {
                tracing::error!("Failed to build bundle for {}: {}", root, e);
                {
                    let mut state_guard = lock_state(&state);
                    state_guard.is_bundling = false;
                    notify(&state_guard, &proxy);
                }
                report_error(&state, &proxy, BUNDLE_FAILED);
            }
        }
    });
}

/// Rebuilds the preview after a selection change when auto-preview is on.
pub fn refresh_preview<P: EventProxy>(
    provider: Arc<dyn ContentProvider>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if !lock_state(&state).config.auto_preview {
        return;
    }
    start_bundle(false, provider, proxy, state);
}

/// Estimates the token count of `text` with the `cl100k_base` encoding.
/// Returns `None` if the encoding could not be loaded.
pub fn count_tokens(text: &str) -> Option<usize> {
    static ENCODING: OnceLock<Option<CoreBPE>> = OnceLock::new();
    let encoding = ENCODING.get_or_init(|| match tiktoken_rs::cl100k_base() {
        Ok(bpe) => Some(bpe),
        Err(e) => {
            tracing::warn!("Token counting unavailable: {}", e);
            None
        }
    });
    encoding
        .as_ref()
        .map(|bpe| bpe.encode_with_special_tokens(text).len())
}
