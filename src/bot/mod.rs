//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Turns incoming Telegram messages into dialogue events
//! - `router`: Dispatch table from (state, event) to a route
//! - `dialogue_manager`: The order dialogue state machine
//! - `notifier`: Delivers orders to the administrator
//! - `ui_builder`: Creates keyboards and formats messages

pub mod dialogue_manager;
pub mod message_handler;
pub mod notifier;
pub mod router;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use dialogue_manager::{FlowSettings, OrderFlow};
pub use message_handler::message_handler;
