//! Checkout
//!
//! Validation, request building, submission and payment polling.

pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod request;
pub mod validation;

pub use error::{CheckoutError, CheckoutResult};
pub use orchestrator::{CheckoutOrchestrator, CheckoutSettings, CheckoutState};
pub use poller::{PaymentPoller, PollConfig, PollOutcome};
pub use request::build_checkout_request;
pub use validation::{CheckoutField, FieldErrors, validate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_messages() {
        let failed = CheckoutState::Failed {
            client_reference: "r".into(),
        };
        let timed_out = CheckoutState::TimedOut {
            client_reference: "r".into(),
        };
        assert_eq!(
            failed.message(),
            Some("Your payment could not be completed. You have not been charged.")
        );
        assert_eq!(
            timed_out.message(),
            Some("Payment timed out. Please contact us if you were charged.")
        );
        assert_ne!(failed.message(), timed_out.message());
        assert_eq!(CheckoutState::Idle.message(), None);
    }

    #[test]
    fn test_settled_states() {
        assert!(CheckoutState::Idle.is_settled());
        assert!(!CheckoutState::Submitting.is_settled());
        assert!(!CheckoutState::Idle.is_terminal());
        let confirmed = CheckoutState::Confirmed {
            order_id: "o".into(),
            api_order_id: 1,
            client_reference: "r".into(),
        };
        assert!(confirmed.is_settled() && confirmed.is_terminal());
        assert_eq!(confirmed.client_reference(), Some("r"));
    }

    #[test]
    fn test_configuration_error_is_distinct() {
        let err = CheckoutError::Submit(cafe_client::ClientError::NotConfigured);
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "API URL is not configured. Set CAFE_API_URL");

        let err = CheckoutError::Submit(cafe_client::ClientError::Api {
            status: 400,
            message: "phone must be valid".into(),
        });
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "phone must be valid");
    }
}
