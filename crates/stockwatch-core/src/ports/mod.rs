//! Ports - 抽象化レイヤー
//!
//! このモジュールは外部コラボレーターへの「ポート」を定義します。
//! 各 trait は外部システム（ブラウザ自動化、UI、Telegram、JSON ファイル）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - core はレンダリング技術にもスクレイピング技術にも依存しない
//! - ワーカーはここで定義された能力だけを通じて外界に触れる

pub mod clock;
pub mod id_generator;
pub mod message_channel;
pub mod page_automation;
pub mod snapshot_store;
pub mod status_sink;
pub mod subscriber_directory;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::message_channel::MessageChannel;
pub use self::page_automation::{AutomationLauncher, PageAutomation};
pub use self::snapshot_store::SnapshotStore;
pub use self::status_sink::{NoopStatusSink, StatusSink};
pub use self::subscriber_directory::{Subscriber, SubscriberDirectory};
