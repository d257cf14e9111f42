//! Receive EventSub webhook deliveries and hand off the actions they authorize.

pub mod config;
pub mod dispatch;
pub mod webhook;

pub use config::Config;
pub use dispatch::{Action, ChannelDispatcher, Dispatch, LogDispatcher};
pub use webhook::{router, AppState};
