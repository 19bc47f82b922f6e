//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// Sends `UserEvent`s towards the UI thread. Sending never fails from the caller's
/// point of view; tests substitute a channel-backed implementation.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // The event loop is gone once the window closes; late task results are dropped.
        if let Err(e) = EventLoopProxy::send_event(self, event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
