//! stockwatch-core
//!
//! Core building blocks for the stockwatch restock monitor.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, state, alert, outcome, snapshot, errors）
//! - **ports**: 抽象化レイヤー（PageAutomation, StatusSink, SubscriberDirectory, など）
//! - **app**: アプリケーションロジック（worker, manager, dispatch, status）
//! - **impls**: 実装（JSON snapshot store, JSON subscriber file, Telegram channel）

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;

#[cfg(test)]
pub(crate) mod test_support;
