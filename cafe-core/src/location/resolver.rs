//! Location resolver
//!
//! Writes the delivery location into the store from one of three sources:
//! a selected search suggestion, a GPS fix (reverse geocoded), or a manual
//! clear. Directions typed by the customer ("notes") survive every switch.

use std::sync::Arc;

use async_trait::async_trait;
use cafe_client::{ClientError, GeocodingApi};
use parking_lot::Mutex;
use shared::models::{AutocompleteSuggestion, Coordinates, DeliveryLocationPayload};
use thiserror::Error;

use super::debounce::{SearchDebouncer, SearchOutcome};
use crate::store::CafeStore;

/// Device positioning failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("timed out")]
    Timeout,
    #[error("geolocation unsupported")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

/// Device GPS
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// "Use my location" failures, one per cause
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation unsupported")]
    Unsupported,

    #[error("Could not get location: {0}")]
    Unknown(String),

    #[error("Reverse geocoding failed: {0}")]
    ReverseGeocodeFailed(#[source] ClientError),
}

impl LocationError {
    /// Text shown under the location button
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Location permission denied. Please allow access.",
            LocationError::PositionUnavailable => "Position unavailable. Try again.",
            LocationError::Timeout => "Location request timed out. Try again.",
            LocationError::Unsupported => "Geolocation is not supported by your browser.",
            LocationError::Unknown(_) => "Could not get your location.",
            LocationError::ReverseGeocodeFailed(_) => {
                "We could not resolve your location. Please search for a nearby place instead."
            }
        }
    }
}

impl From<PositionError> for LocationError {
    fn from(e: PositionError) -> Self {
        match e {
            PositionError::PermissionDenied => LocationError::PermissionDenied,
            PositionError::Unavailable => LocationError::PositionUnavailable,
            PositionError::Timeout => LocationError::Timeout,
            PositionError::Unsupported => LocationError::Unsupported,
            PositionError::Other(msg) => LocationError::Unknown(msg),
        }
    }
}

pub struct LocationResolver {
    store: Arc<CafeStore>,
    api: Arc<dyn GeocodingApi>,
    debouncer: SearchDebouncer,
    /// Directions, kept even while no location is selected
    notes: Mutex<String>,
}

impl LocationResolver {
    pub fn new(
        store: Arc<CafeStore>,
        api: Arc<dyn GeocodingApi>,
        debounce: std::time::Duration,
    ) -> Self {
        let notes = store
            .delivery_location()
            .and_then(|l| l.notes)
            .unwrap_or_default();
        Self {
            debouncer: SearchDebouncer::new(api.clone(), debounce),
            store,
            api,
            notes: Mutex::new(notes),
        }
    }

    fn current_notes(&self) -> Option<String> {
        let notes = self.notes.lock();
        (!notes.is_empty()).then(|| notes.clone())
    }

    /// Debounced place search, biased toward the current location
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let bias = self
            .store
            .delivery_location()
            .and_then(|l| l.coordinates());
        self.debouncer.query(query, bias).await
    }

    pub fn select_suggestion(&self, suggestion: &AutocompleteSuggestion) -> DeliveryLocationPayload {
        self.debouncer.cancel();
        let payload = DeliveryLocationPayload::from_suggestion(suggestion, self.current_notes());
        tracing::debug!(place_id = %suggestion.id, label = %payload.label, "Delivery location selected");
        self.store.set_delivery_location(Some(payload.clone()));
        payload
    }

    /// GPS fix → reverse geocode → store.
    ///
    /// On failure the current location is left unchanged.
    pub async fn use_my_location(
        &self,
        source: &dyn PositionSource,
    ) -> Result<DeliveryLocationPayload, LocationError> {
        let position = source.current_position().await.map_err(|e| {
            tracing::warn!(error = %e, "Device position unavailable");
            LocationError::from(e)
        })?;

        let result = self.api.reverse(position).await.map_err(|e| {
            tracing::warn!(lat = position.lat, lng = position.lng, error = %e, "Reverse geocoding failed");
            LocationError::ReverseGeocodeFailed(e)
        })?;

        let payload = DeliveryLocationPayload::from_reverse(&result, self.current_notes());
        tracing::debug!(label = %payload.label, "Delivery location resolved from GPS");
        self.store.set_delivery_location(Some(payload.clone()));
        Ok(payload)
    }

    /// Drop the matched place; keep typed directions
    pub fn clear(&self) -> DeliveryLocationPayload {
        self.debouncer.cancel();
        let payload = DeliveryLocationPayload::manual(self.current_notes());
        self.store.set_delivery_location(Some(payload.clone()));
        payload
    }

    /// Update directions, merged into the current location if there is one
    pub fn set_notes(&self, notes: impl Into<String>) {
        let notes = notes.into();
        {
            let mut current = self.notes.lock();
            if *current == notes {
                return;
            }
            *current = notes.clone();
        }
        self.store
            .set_location_notes((!notes.is_empty()).then_some(notes));
    }

    pub fn notes(&self) -> String {
        self.notes.lock().clone()
    }
}
