//! 支付状态轮询
//!
//! 提交成功后按固定间隔查询 `GET /orders/status/{clientReference}`，直到：
//!
//! - 支付成功 (`paid`) / 失败 (`failed`)
//! - 达到最大次数 (超时)
//! - 被取消 (离开支付页 / 重新下单)
//!
//! 计数器、定时器和取消令牌都在同一个 `PaymentPoller` 内，取消后不会再处理任何 tick。

use std::sync::Arc;
use std::time::Duration;

use cafe_client::CheckoutApi;
use shared::models::{OrderStatusResponse, PaymentStatus};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// 轮询配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// 两次查询的间隔，第一次查询在启动一个间隔之后
    pub interval: Duration,
    /// 最大查询次数
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 60,
        }
    }
}

/// 轮询结果
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Paid(OrderStatusResponse),
    Failed(OrderStatusResponse),
    TimedOut { attempts: u32 },
    Cancelled,
}

/// 单次支付会话的轮询任务
pub struct PaymentPoller {
    api: Arc<dyn CheckoutApi>,
    config: PollConfig,
    client_reference: String,
    cancel: CancellationToken,
}

impl PaymentPoller {
    pub fn new(
        api: Arc<dyn CheckoutApi>,
        config: PollConfig,
        client_reference: impl Into<String>,
    ) -> Self {
        Self {
            api,
            config,
            client_reference: client_reference.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// 使用外部令牌 (由调用方持有以便取消)
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn client_reference(&self) -> &str {
        &self.client_reference
    }

    /// 主循环
    pub async fn run(self) -> PollOutcome {
        let PollConfig {
            interval,
            max_attempts,
        } = self.config;
        tracing::info!(
            client_reference = %self.client_reference,
            interval_ms = interval.as_millis() as u64,
            max_attempts,
            "Payment polling started"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 1..=max_attempts {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.cancelled(attempt - 1),
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.cancelled(attempt),
                result = self.api.order_status(&self.client_reference) => result,
            };

            // 响应返回时可能已被取消
            if self.cancel.is_cancelled() {
                return self.cancelled(attempt);
            }

            match result {
                Ok(status) => match status.payment() {
                    PaymentStatus::Paid => {
                        tracing::info!(
                            client_reference = %self.client_reference,
                            order_id = status.order_id,
                            attempt,
                            "Payment confirmed"
                        );
                        return PollOutcome::Paid(status);
                    }
                    PaymentStatus::Failed => {
                        tracing::warn!(
                            client_reference = %self.client_reference,
                            order_id = status.order_id,
                            attempt,
                            "Payment failed"
                        );
                        return PollOutcome::Failed(status);
                    }
                    PaymentStatus::Pending => {
                        tracing::debug!(
                            client_reference = %self.client_reference,
                            attempt,
                            payment_status = %status.payment_status,
                            "Payment pending"
                        );
                    }
                },
                // 网络抖动，继续轮询
                Err(e) => {
                    tracing::debug!(
                        client_reference = %self.client_reference,
                        attempt,
                        error = %e,
                        "Status check failed, will retry"
                    );
                }
            }
        }

        tracing::warn!(
            client_reference = %self.client_reference,
            attempts = max_attempts,
            "Payment polling timed out"
        );
        PollOutcome::TimedOut {
            attempts: max_attempts,
        }
    }

    fn cancelled(&self, attempts: u32) -> PollOutcome {
        tracing::info!(
            client_reference = %self.client_reference,
            attempts,
            "Payment polling cancelled"
        );
        PollOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cafe_client::{ClientError, ClientResult};
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use shared::models::{CheckoutRequest, CheckoutResponse};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scripted status responses; pending once the script runs out
    struct ScriptedStatus {
        script: Mutex<VecDeque<ClientResult<&'static str>>>,
        calls: AtomicU32,
    }

    impl ScriptedStatus {
        fn new(script: Vec<ClientResult<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CheckoutApi for ScriptedStatus {
        async fn submit_checkout(&self, _: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
            Err(ClientError::NotConfigured)
        }

        async fn order_status(&self, _: &str) -> ClientResult<OrderStatusResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().pop_front().unwrap_or(Ok("pending"));
            next.map(|payment_status| OrderStatusResponse {
                order_id: 101,
                status: "pending".into(),
                payment_status: payment_status.into(),
                total_ghs: Decimal::from(128),
                created_at: "2026-01-01T00:00:00Z".into(),
            })
        }
    }

    fn poller(api: Arc<ScriptedStatus>) -> PaymentPoller {
        PaymentPoller::new(api, PollConfig::default(), "ref-1")
    }

    #[tokio::test(start_paused = true)]
    async fn test_paid_after_pending() {
        let api = ScriptedStatus::new(vec![Ok("pending"), Ok("initiated"), Ok("pending"), Ok("paid")]);
        let outcome = poller(api.clone()).run().await;
        assert!(matches!(outcome, PollOutcome::Paid(ref s) if s.order_id == 101));
        assert_eq!(api.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stops_polling() {
        let api = ScriptedStatus::new(vec![Ok("failed")]);
        let outcome = poller(api.clone()).run().await;
        assert!(matches!(outcome, PollOutcome::Failed(_)));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_swallowed() {
        let api = ScriptedStatus::new(vec![
            Err(ClientError::InvalidResponse("bad gateway".into())),
            Err(ClientError::NotConfigured),
            Ok("paid"),
        ]);
        assert!(matches!(poller(api).run().await, PollOutcome::Paid(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_interval() {
        let api = ScriptedStatus::new(vec![]);
        let poller = poller(api.clone());
        let cancel = poller.cancel_token();
        let task = tokio::spawn(poller.run());

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert_eq!(api.calls(), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(api.calls(), 1);

        cancel.cancel();
        assert_eq!(task.await.unwrap(), PollOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_max_attempts() {
        let api = ScriptedStatus::new(vec![]);
        let started = Instant::now();
        let outcome = poller(api.clone()).run().await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 60 });
        assert_eq!(api.calls(), 60);
        assert_eq!(started.elapsed(), Duration::from_secs(180));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paid_on_last_attempt_wins_over_timeout() {
        let mut script: Vec<ClientResult<&'static str>> = (0..59).map(|_| Ok("pending")).collect();
        script.push(Ok("paid"));
        let api = ScriptedStatus::new(script);
        assert!(matches!(poller(api).run().await, PollOutcome::Paid(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let api = ScriptedStatus::new(vec![]);
        let poller = poller(api.clone());
        let cancel = poller.cancel_token();
        let task = tokio::spawn(poller.run());

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(api.calls(), 2);

        cancel.cancel();
        cancel.cancel();
        assert_eq!(task.await.unwrap(), PollOutcome::Cancelled);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.calls(), 2);
    }
}
