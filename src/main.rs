use llm_context_builder::app;
use llm_context_builder::app::file_dialog::NativeDialogService;
use llm_context_builder::app::helpers::lock_state;
use llm_context_builder::config::AppConfig;
use llm_context_builder::{provider, web_assets};
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing_subscriber::EnvFilter;
use wry::WebViewBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let event_loop = EventLoopBuilder::<app::events::UserEvent>::with_user_event().build();

    let initial_config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    let (width, height) = initial_config.window_size;
    let (pos_x, pos_y) = initial_config.window_position;

    let window = WindowBuilder::new()
        .with_title("LLM Context Builder")
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(900, 600))
        .build(&event_loop)?;
    let window = Arc::new(window);

    // Create the shared application state, the provider and the event loop proxy
    let proxy = event_loop.create_proxy();
    let content_provider = provider::from_config(&initial_config);
    let last_directory = initial_config.last_directory.clone();
    let state = Arc::new(Mutex::new(app::state::AppState::new(initial_config, None)));
    let dialog_service: Arc<dyn app::file_dialog::DialogService> = Arc::new(NativeDialogService);

    let ipc_handler_state = state.clone();
    let ipc_handler_proxy = proxy.clone();
    let ipc_handler_provider = content_provider.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(
            message,
            dialog_service.clone(),
            ipc_handler_provider.clone(),
            ipc_handler_proxy.clone(),
            ipc_handler_state.clone(),
        );
    };

    let drop_handler_state = state.clone();
    let drop_handler_proxy = proxy.clone();
    let drop_handler_provider = content_provider.clone();
    let file_drop_handler = move |event| {
        use app::events::UserEvent;
        use app::proxy::EventProxy;
        use wry::FileDropEvent;
        match event {
            FileDropEvent::Hovered { .. } => {
                EventProxy::send_event(&drop_handler_proxy, UserEvent::DragStateChanged(true));
            }
            FileDropEvent::Dropped { paths, .. } => {
                EventProxy::send_event(&drop_handler_proxy, UserEvent::DragStateChanged(false));
                // A dropped file stands for the directory containing it.
                if let Some(path) = paths.first() {
                    let directory = if path.is_dir() {
                        path.clone()
                    } else {
                        path.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| path.clone())
                    };
                    app::tasks::start_load(
                        &directory.to_string_lossy(),
                        drop_handler_provider.clone(),
                        drop_handler_proxy.clone(),
                        drop_handler_state.clone(),
                    );
                }
            }
            FileDropEvent::Cancelled => {
                EventProxy::send_event(&drop_handler_proxy, UserEvent::DragStateChanged(false));
            }
            _ => (),
        }
        true
    };

    let webview = WebViewBuilder::new(&*window)
        .with_custom_protocol(web_assets::PROTOCOL.to_string(), web_assets::serve)
        .with_url(web_assets::INDEX_URL)
        .with_devtools(cfg!(debug_assertions))
        .with_ipc_handler(ipc_handler)
        .with_file_drop_handler(file_drop_handler)
        .build()?;

    if let Some(directory) = last_directory {
        tracing::info!("Reopening last directory {}", directory);
        app::tasks::start_load(&directory, content_provider, proxy.clone(), state.clone());
    }

    let state_for_events = state.clone();
    let window_for_events = window.clone();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("Close requested. Saving final window state...");
                    let mut state_guard = lock_state(&state_for_events);
                    let scale = window_for_events.scale_factor();
                    let size = window_for_events.inner_size().to_logical::<f64>(scale);
                    state_guard.config.window_size = (size.width, size.height);
                    if let Ok(position) = window_for_events.outer_position() {
                        let position = position.to_logical::<f64>(scale);
                        state_guard.config.window_position = (position.x, position.y);
                    }
                    state_guard.persist_config();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let size = size.to_logical::<f64>(window_for_events.scale_factor());
                    lock_state(&state_for_events).config.window_size = (size.width, size.height);
                }
                WindowEvent::Moved(position) => {
                    let position = position.to_logical::<f64>(window_for_events.scale_factor());
                    lock_state(&state_for_events).config.window_position =
                        (position.x, position.y);
                }
                _ => (),
            },
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    });
}
