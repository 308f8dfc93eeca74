//! MonitoringTask and request validation.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::domain::{MonitorError, TaskId};

/// Allow-list for the monitored storefront.
///
/// Accepts product-view URLs, short URLs and `vt.` share links, with optional
/// query parameters. Anything else is rejected before a worker is created.
static STOREFRONT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^https?://
        (?:(?:shop|www|vt)\.)?      # optional subdomain
        tiktok\.com/
        (?:
            view/product/\d+        # product view path
          | [A-Za-z0-9]+/?          # short URL
          | ZS[A-Za-z0-9]+/?        # vt share link
        )
        (?:\?[^/\s]*)?              # optional query string
        $",
    )
    .expect("storefront pattern is a valid regex")
});

/// One monitored URL plus its polling cadence.
///
/// Immutable after creation; the runtime state lives in the worker, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringTask {
    pub id: TaskId,
    pub url: String,
    pub interval: Duration,
}

impl MonitoringTask {
    pub fn new(id: TaskId, url: impl Into<String>, interval: Duration) -> Self {
        Self {
            id,
            url: url.into(),
            interval,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval.as_secs()
    }
}

/// Validate a `start_task` request. Nothing is allocated on failure.
pub fn validate_request(url: &str, interval_secs: u64) -> Result<(), MonitorError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(MonitorError::Validation("URL cannot be empty".into()));
    }
    if !STOREFRONT_URL.is_match(url) {
        return Err(MonitorError::Validation(format!(
            "not a recognized storefront URL: {url}"
        )));
    }
    if interval_secs == 0 {
        return Err(MonitorError::Validation(
            "interval must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://shop.tiktok.com/view/product/1729382256910231033")]
    #[case("https://www.tiktok.com/view/product/123")]
    #[case("http://tiktok.com/view/product/42?checkout=1")]
    #[case("https://vt.tiktok.com/ZS8abc123/")]
    #[case("https://tiktok.com/Ab3xY9")]
    fn accepts_storefront_urls(#[case] url: &str) {
        assert!(validate_request(url, 5).is_ok(), "{url}");
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("https://example.com/view/product/123")]
    #[case("ftp://shop.tiktok.com/view/product/123")]
    #[case("https://shop.tiktok.com/view/product/")]
    #[case("https://shop.tiktok.com/view/product/123/extra")]
    fn rejects_foreign_or_malformed_urls(#[case] url: &str) {
        let err = validate_request(url, 5).unwrap_err();
        assert!(matches!(err, MonitorError::Validation(_)), "{url}");
    }

    #[test]
    fn rejects_zero_interval() {
        let err =
            validate_request("https://shop.tiktok.com/view/product/123", 0).unwrap_err();
        assert!(matches!(err, MonitorError::Validation(_)));
    }
}
