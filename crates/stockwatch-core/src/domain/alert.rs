//! ProductAlert - 通知ペイロード
//!
//! 1回の rising edge につき 1 つ作られ、全 subscriber に同じ本文が送られる。

use serde::{Deserialize, Serialize};

/// Product fields scraped from the page after the session opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,
    pub price: Option<String>,
    pub stock_detail: Option<String>,
}

/// Payload for one availability notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAlert {
    pub title: String,
    pub url: String,
    pub stock_detail: String,
}

impl ProductAlert {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        stock_detail: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            stock_detail: stock_detail.into(),
        }
    }

    /// Render the outbound Markdown body.
    pub fn message_body(&self) -> String {
        format!(
            "\u{1F514} *Product Alert!*\n\n\
             *Product Name:* \n\n{}\n\n\
             *Status:* Available now\n\n\
             *Available Stocks:*\n\n{}\n\n\
             [Click here to buy the product]({})",
            self.title, self.stock_detail, self.url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_body_carries_title_link_and_stock() {
        let alert = ProductAlert::new(
            "Mechanical Keyboard",
            "https://shop.tiktok.com/view/product/123",
            "Black x2, White x1",
        );
        let body = alert.message_body();
        assert!(body.contains("*Product Alert!*"));
        assert!(body.contains("Mechanical Keyboard"));
        assert!(body.contains("Black x2, White x1"));
        assert!(body.contains("(https://shop.tiktok.com/view/product/123)"));
    }
}
