//! PageAutomation port - ブラウザ自動化の抽象化
//!
//! ワーカーが外部ページに触れる唯一の窓口。どの呼び出しも失敗しうる。

use async_trait::async_trait;

use crate::domain::{AutomationError, ProductInfo};

/// One live page session, owned by exactly one worker.
///
/// Design intent:
/// - The worker drives the session single-threaded; `&mut self` makes that
///   explicit and keeps implementations lock-free.
/// - Any error here moves the owning worker to its `Error` state, except
///   `purchase`, whose failure is recorded but does not stop the
///   notification.
#[async_trait]
pub trait PageAutomation: Send {
    /// Navigate the session to the product URL.
    async fn open(&mut self, url: &str) -> Result<(), AutomationError>;

    /// Scrape the product block (title, price, stock text).
    async fn product_info(&mut self) -> Result<ProductInfo, AutomationError>;

    /// Current availability as rendered by the page.
    async fn is_available(&mut self) -> Result<bool, AutomationError>;

    /// Attempt the purchase action (set quantity, click the cart control).
    /// `Ok(false)` means the click path did not go through.
    async fn purchase(&mut self) -> Result<bool, AutomationError>;

    /// Release the browser session.
    async fn close(&mut self) -> Result<(), AutomationError>;
}

/// Factory for page sessions; each worker launches its own.
#[async_trait]
pub trait AutomationLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageAutomation>, AutomationError>;
}
