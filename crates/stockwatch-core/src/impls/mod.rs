//! Reference implementations for the ports (JSON files, Telegram Bot API).

pub mod json_store;
pub mod json_subscribers;
pub mod telegram;

pub use json_store::JsonSnapshotStore;
pub use json_subscribers::JsonSubscriberDirectory;
pub use telegram::{TelegramChannel, TelegramConfig};
