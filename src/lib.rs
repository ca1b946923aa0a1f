//! # Order Intake Telegram Bot
//!
//! A Telegram bot that greets users with promotional content, collects a
//! name and a phone contact through a short dialogue, and forwards the order
//! to an administrator.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod order;
pub mod transport;
