//! Hand-off of authorized actions to whatever carries them out.

use eventsub_verify::ActionKind;
use tokio::sync::mpsc;

/// An authorized action and the viewer's input that came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub user_input: String,
}

/// Receives actions once they have been verified and authorized.
///
/// Implementations must not block; the request is answered after
/// `dispatch` returns.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

/// Only logs what would have been done.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl Dispatch for LogDispatcher {
    fn dispatch(&self, action: Action) {
        tracing::info!(
            action = %action.kind,
            user_input = %action.user_input,
            "dispatching action"
        );
    }
}

/// Forwards actions to a consumer over a channel.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelDispatcher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Dispatch for ChannelDispatcher {
    fn dispatch(&self, action: Action) {
        if let Err(mpsc::error::SendError(action)) = self.tx.send(action) {
            tracing::warn!(action = %action.kind, "action consumer is gone, dropping action");
        }
    }
}
