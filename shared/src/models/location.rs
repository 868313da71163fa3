//! Delivery location model
//!
//! Shared between the location API (`/api/location/*`) and checkout.

use serde::{Deserialize, Serialize};

/// How a delivery location was resolved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationProvider {
    /// Geocoded (place search or reverse geocode)
    Tomtom,
    /// Typed by hand, no coordinates
    #[default]
    Manual,
}

impl LocationProvider {
    pub fn is_geocoded(&self) -> bool {
        matches!(self, LocationProvider::Tomtom)
    }
}

/// Latitude / longitude pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Resolved delivery target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLocationPayload {
    pub label: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub provider: LocationProvider,
    #[serde(default)]
    pub provider_place_id: Option<String>,
}

impl DeliveryLocationPayload {
    /// Empty manual payload (free-form directions, no matched place)
    pub fn manual(notes: Option<String>) -> Self {
        Self {
            notes,
            ..Default::default()
        }
    }

    /// Payload from a selected search suggestion
    pub fn from_suggestion(s: &AutocompleteSuggestion, notes: Option<String>) -> Self {
        Self {
            label: s.label.clone(),
            area: None,
            landmark: s.landmark.clone(),
            notes,
            lat: Some(s.lat),
            lng: Some(s.lng),
            provider: LocationProvider::Tomtom,
            provider_place_id: Some(s.id.clone()),
        }
    }

    /// Payload from a reverse-geocoded GPS fix
    pub fn from_reverse(r: &ReverseGeocodeResult, notes: Option<String>) -> Self {
        Self {
            label: r.label.clone(),
            area: r.area.clone(),
            landmark: r.landmark.clone(),
            notes,
            lat: Some(r.lat),
            lng: Some(r.lng),
            provider: LocationProvider::Tomtom,
            provider_place_id: r.provider_place_id.clone(),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates().is_some()
    }

    /// A label with visible characters
    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }

    /// Replace notes, keeping label and coordinates
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.is_empty());
        self
    }
}

/// Single suggestion from `/api/location/autocomplete`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutocompleteSuggestion {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub landmark: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// `/api/location/autocomplete` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub results: Vec<AutocompleteSuggestion>,
}

/// `/api/location/reverse` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeResult {
    pub label: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub provider_place_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_payload_has_no_coordinates() {
        let p = DeliveryLocationPayload::manual(Some("blue gate".into()));
        assert_eq!(p.provider, LocationProvider::Manual);
        assert!(!p.has_coordinates());
        assert!(!p.has_label());
        assert_eq!(p.notes.as_deref(), Some("blue gate"));
    }

    #[test]
    fn test_with_notes_keeps_resolution() {
        let s = AutocompleteSuggestion {
            id: "poi-1".into(),
            label: "A&C Mall, East Legon".into(),
            landmark: Some("A&C Mall".into()),
            lat: 5.63,
            lng: -0.15,
        };
        let p = DeliveryLocationPayload::from_suggestion(&s, None)
            .with_notes(Some("call on arrival".into()));
        assert_eq!(p.label, "A&C Mall, East Legon");
        assert_eq!(p.coordinates(), Some(Coordinates::new(5.63, -0.15)));
        assert_eq!(p.notes.as_deref(), Some("call on arrival"));

        let cleared = p.with_notes(Some(String::new()));
        assert!(cleared.notes.is_none());
        assert!(cleared.provider.is_geocoded());
    }

    #[test]
    fn test_provider_wire_format() {
        let json = serde_json::to_value(DeliveryLocationPayload::manual(None)).unwrap();
        assert_eq!(json["provider"], "manual");
        assert!(json["providerPlaceId"].is_null());
    }
}
