//! Checkout orchestrator
//!
//! ```text
//! Idle ─place_order─▶ Submitting ─ok─▶ AwaitingPayment ─paid──▶ Confirmed
//!  ▲                      │                 │    │      ─failed─▶ Failed
//!  │                      └─err─────────────┘    │      ─60×────▶ TimedOut
//!  └────────────── cancel / retry / reset ───────┘
//! ```
//!
//! One session at a time. The poller runs as a spawned task; its outcome is
//! applied only if the session that started it is still current.

use std::sync::Arc;

use cafe_client::CheckoutApi;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{CheckoutResponse, Order, OrderStatus};
use shared::util::{new_line_id, now_rfc3339};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::error::{CheckoutError, CheckoutResult};
use super::poller::{PaymentPoller, PollConfig, PollOutcome};
use super::request::{build_checkout_request, delivery_notes, location_text};
use super::validation::validate;
use crate::catalog::CatalogCache;
use crate::pricing::Totals;
use crate::store::{CafeStore, StoreState};

const FAILED_MESSAGE: &str = "Your payment could not be completed. You have not been charged.";
const TIMED_OUT_MESSAGE: &str = "Payment timed out. Please contact us if you were charged.";

/// Checkout session state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    /// Backend accepted the order; customer is paying at `checkout_direct_url`
    AwaitingPayment { response: CheckoutResponse },
    Confirmed {
        order_id: String,
        api_order_id: i64,
        client_reference: String,
    },
    Failed { client_reference: String },
    TimedOut { client_reference: String },
}

impl CheckoutState {
    /// Not submitting and not waiting on the payment provider
    pub fn is_settled(&self) -> bool {
        !matches!(
            self,
            CheckoutState::Submitting | CheckoutState::AwaitingPayment { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::Confirmed { .. }
                | CheckoutState::Failed { .. }
                | CheckoutState::TimedOut { .. }
        )
    }

    pub fn client_reference(&self) -> Option<&str> {
        match self {
            CheckoutState::AwaitingPayment { response } => Some(&response.client_reference),
            CheckoutState::Confirmed {
                client_reference, ..
            }
            | CheckoutState::Failed { client_reference }
            | CheckoutState::TimedOut { client_reference } => Some(client_reference),
            CheckoutState::Idle | CheckoutState::Submitting => None,
        }
    }

    /// Message for the failure screen
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CheckoutState::Failed { .. } => Some(FAILED_MESSAGE),
            CheckoutState::TimedOut { .. } => Some(TIMED_OUT_MESSAGE),
            _ => None,
        }
    }
}

/// Orchestrator settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutSettings {
    pub poll: PollConfig,
    pub delivery_fee: Decimal,
}

impl From<&crate::Config> for CheckoutSettings {
    fn from(config: &crate::Config) -> Self {
        Self {
            poll: config.poll,
            delivery_fee: config.delivery_fee,
        }
    }
}

/// Submitted order awaiting payment
struct Session {
    response: CheckoutResponse,
    cancel: CancellationToken,
    /// Store contents at submit time
    snapshot: StoreState,
    totals: Totals,
}

struct Inner {
    store: Arc<CafeStore>,
    catalog: CatalogCache,
    api: Arc<dyn CheckoutApi>,
    settings: CheckoutSettings,
    state: watch::Sender<CheckoutState>,
    /// Guards session identity and every state transition after submit
    session: Mutex<Option<Session>>,
}

/// Drives validation, submission and payment polling
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CheckoutOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("state", &*self.inner.state.borrow())
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl CheckoutOrchestrator {
    pub fn new(
        store: Arc<CafeStore>,
        catalog: CatalogCache,
        api: Arc<dyn CheckoutApi>,
        settings: CheckoutSettings,
    ) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            inner: Arc::new(Inner {
                store,
                catalog,
                api,
                settings,
                state,
                session: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.inner.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<CheckoutState> {
        self.inner.state.subscribe()
    }

    /// Wait until the current session leaves Submitting / AwaitingPayment
    pub async fn wait_settled(&self) -> CheckoutState {
        let mut rx = self.watch();
        match rx.wait_for(CheckoutState::is_settled).await {
            Ok(state) => state.clone(),
            // Sender lives in `inner`, which we hold
            Err(_) => self.state(),
        }
    }

    /// Totals for the current cart
    pub fn totals(&self) -> Totals {
        let fee = self.inner.settings.delivery_fee;
        self.inner.store.read(|s| {
            Totals::compute(s.cart.lines(), &self.inner.catalog, s.delivery_method, fee)
        })
    }

    /// Validate, submit, and start payment polling.
    ///
    /// Returns the backend response; `checkout_direct_url` is where the
    /// customer pays. The cart stays untouched until payment is confirmed.
    pub async fn place_order(&self) -> CheckoutResult<CheckoutResponse> {
        let inner = &self.inner;
        let claimed = inner.state.send_if_modified(|state| {
            if matches!(state, CheckoutState::Idle) {
                *state = CheckoutState::Submitting;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(CheckoutError::InProgress);
        }
        // Back to Idle on every exit before AwaitingPayment, including drop
        let mut claim = SubmitClaim::new(&inner.state);

        let snapshot = inner.store.snapshot();
        validate(&snapshot).map_err(|errors| {
            tracing::debug!(errors = %errors, "Checkout validation failed");
            CheckoutError::Validation(errors)
        })?;

        let request = build_checkout_request(&snapshot);
        tracing::info!(
            items = request.items.len(),
            location = %request.location_text,
            "Submitting checkout"
        );

        let response = match inner.api.submit_checkout(&request).await {
            Ok(response) => response,
            Err(e) => {
                if e.is_configuration() {
                    tracing::error!(error = %e, "Checkout submit failed: backend not configured");
                } else {
                    tracing::warn!(error = %e, "Checkout submit failed");
                }
                return Err(CheckoutError::Submit(e));
            }
        };

        tracing::info!(
            order_id = response.order_id,
            client_reference = %response.client_reference,
            total_ghs = %response.total_ghs,
            "Checkout accepted, awaiting payment"
        );

        let totals = Totals::compute(
            snapshot.cart.lines(),
            &inner.catalog,
            snapshot.delivery_method,
            inner.settings.delivery_fee,
        );
        let cancel = CancellationToken::new();
        let poller = PaymentPoller::new(
            inner.api.clone(),
            inner.settings.poll,
            response.client_reference.clone(),
        )
        .with_cancel_token(cancel.clone());

        {
            let mut session = inner.session.lock();
            *session = Some(Session {
                response: response.clone(),
                cancel,
                snapshot,
                totals,
            });
            inner.state.send_replace(CheckoutState::AwaitingPayment {
                response: response.clone(),
            });
            claim.disarm();
        }

        let task_inner = inner.clone();
        let reference = response.client_reference.clone();
        tokio::spawn(async move {
            let outcome = poller.run().await;
            task_inner.apply_outcome(&reference, outcome);
        });

        Ok(response)
    }

    /// Stop polling and return to Idle. Safe to call repeatedly.
    pub fn cancel(&self) {
        let inner = &self.inner;
        let mut session = inner.session.lock();
        if let Some(current) = session.take() {
            current.cancel.cancel();
            tracing::info!(
                client_reference = %current.response.client_reference,
                "Checkout session cancelled"
            );
        }
        inner.state.send_if_modified(|state| {
            if matches!(state, CheckoutState::AwaitingPayment { .. }) {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Back to Idle after a failed or timed-out payment. The cart is intact.
    pub fn retry(&self) -> bool {
        self.inner.state.send_if_modified(|state| {
            if matches!(
                state,
                CheckoutState::Failed { .. } | CheckoutState::TimedOut { .. }
            ) {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        })
    }

    /// Back to Idle from any terminal state, ready for the next order
    pub fn reset(&self) -> bool {
        self.inner.state.send_if_modified(|state| {
            if state.is_terminal() {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        })
    }
}

/// Holds the Submitting state for one `place_order` call
struct SubmitClaim<'a> {
    state: &'a watch::Sender<CheckoutState>,
    armed: bool,
}

impl<'a> SubmitClaim<'a> {
    fn new(state: &'a watch::Sender<CheckoutState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitClaim<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let released = self.state.send_if_modified(|state| {
            if matches!(state, CheckoutState::Submitting) {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        });
        if released {
            tracing::debug!("Checkout claim released, back to Idle");
        }
    }
}

impl Inner {
    fn apply_outcome(&self, client_reference: &str, outcome: PollOutcome) {
        let mut session = self.session.lock();
        let is_current = session
            .as_ref()
            .is_some_and(|s| s.response.client_reference == client_reference && !s.cancel.is_cancelled());
        if !is_current {
            tracing::debug!(client_reference, "Discarding outcome of stale checkout session");
            return;
        }
        let Some(current) = session.take() else {
            return;
        };

        let reference = current.response.client_reference.clone();
        let next = match outcome {
            PollOutcome::Paid(status) => {
                let order = build_order(current, status.order_id);
                let state = CheckoutState::Confirmed {
                    order_id: order.id.clone(),
                    api_order_id: order.api_order_id,
                    client_reference: reference,
                };
                self.store.confirm_order(order);
                state
            }
            PollOutcome::Failed(_) => CheckoutState::Failed {
                client_reference: reference,
            },
            PollOutcome::TimedOut { .. } => CheckoutState::TimedOut {
                client_reference: reference,
            },
            // cancel() already cleared the session
            PollOutcome::Cancelled => return,
        };
        self.state.send_replace(next);
    }
}

/// History entry for a paid session. Local totals come from the submit-time
/// cart; backend totals are kept as sent.
fn build_order(session: Session, status_order_id: i64) -> Order {
    let Session {
        response,
        snapshot,
        totals,
        ..
    } = session;
    if status_order_id != response.order_id {
        tracing::warn!(
            checkout_order_id = response.order_id,
            status_order_id,
            "Status order id differs from checkout order id"
        );
    }

    Order {
        id: new_line_id(),
        api_order_id: response.order_id,
        client_reference: response.client_reference,
        subtotal: totals.subtotal,
        delivery_fee: totals.delivery_fee,
        total: totals.total,
        total_ghs: response.total_ghs,
        total_pesewas: response.total_pesewas,
        delivery_method: snapshot.delivery_method,
        customer_name: snapshot.customer_name.trim().to_string(),
        customer_phone: snapshot.customer_phone.trim().to_string(),
        delivery_address: location_text(&snapshot).unwrap_or_default(),
        delivery_note: delivery_notes(&snapshot).unwrap_or_default(),
        delivery_location: snapshot.delivery_location,
        items: snapshot.cart.into_lines(),
        status: OrderStatus::Confirmed,
        created_at: now_rfc3339(),
    }
}
