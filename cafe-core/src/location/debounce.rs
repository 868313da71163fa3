//! 地址搜索防抖
//!
//! 单槽位：新的查询会取消上一个尚未完成的查询（等待中或请求中）。

use std::sync::Arc;
use std::time::Duration;

use cafe_client::GeocodingApi;
use parking_lot::Mutex;
use shared::models::{AutocompleteSuggestion, Coordinates};
use tokio_util::sync::CancellationToken;

use super::MIN_QUERY_CHARS;

/// Result of one debounced query
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Suggestions(Vec<AutocompleteSuggestion>),
    /// A newer query replaced this one
    Superseded,
}

impl SearchOutcome {
    pub fn suggestions(&self) -> &[AutocompleteSuggestion] {
        match self {
            SearchOutcome::Suggestions(s) => s,
            SearchOutcome::Superseded => &[],
        }
    }
}

pub struct SearchDebouncer {
    api: Arc<dyn GeocodingApi>,
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl SearchDebouncer {
    pub fn new(api: Arc<dyn GeocodingApi>, delay: Duration) -> Self {
        Self {
            api,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 提交查询，取消上一个
    pub async fn query(&self, text: &str, bias: Option<Coordinates>) -> SearchOutcome {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return SearchOutcome::Suggestions(Vec::new());
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => return SearchOutcome::Superseded,
            _ = tokio::time::sleep(self.delay) => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return SearchOutcome::Superseded,
            result = self.api.search(query, bias) => result,
        };
        if token.is_cancelled() {
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(suggestions) => {
                tracing::debug!(query, results = suggestions.len(), "Place search completed");
                SearchOutcome::Suggestions(suggestions)
            }
            // 搜索失败时仍允许手动填写
            Err(e) => {
                tracing::warn!(query, error = %e, "Place search failed");
                SearchOutcome::Suggestions(Vec::new())
            }
        }
    }

    /// 取消等待中的查询
    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }
}
