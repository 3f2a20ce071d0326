//! Service catalog types and the per-appointment service selection

use serde::{Deserialize, Serialize};

/// A bookable salon service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: u32,
    pub price: f64,
}

/// The set of services a customer has chosen for one appointment
///
/// Product rule: at most one service may be selected at a time; selecting a
/// new one replaces the prior selection. The container is still a `Vec` so
/// that a future multi-select only has to change [`ServiceSelection::select`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    services: Vec<Service>,
}

impl ServiceSelection {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a service, replacing any prior selection
    pub fn select(&mut self, service: Service) {
        self.services.clear();
        self.services.push(service);
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// Whether no service is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Selected services, in selection order
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Ids of the selected services
    #[must_use]
    pub fn service_ids(&self) -> Vec<String> {
        self.services.iter().map(|s| s.id.clone()).collect()
    }

    /// Sum of `duration_minutes` over the selection (0 when empty)
    #[must_use]
    pub fn total_duration(&self) -> u32 {
        self.services.iter().map(|s| s.duration_minutes).sum()
    }

    /// Sum of `price` over the selection
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.services.iter().map(|s| s.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, minutes: u32, price: f64) -> Service {
        Service {
            id: id.to_string(),
            name: format!("service-{id}"),
            category: "hair".to_string(),
            duration_minutes: minutes,
            price,
        }
    }

    #[test]
    fn empty_selection_has_zero_duration() {
        let selection = ServiceSelection::new();
        assert!(selection.is_empty());
        assert_eq!(selection.total_duration(), 0);
    }

    #[test]
    fn selecting_replaces_prior_choice() {
        let mut selection = ServiceSelection::new();
        selection.select(service("cut", 30, 25.0));
        selection.select(service("color", 90, 80.0));

        assert_eq!(selection.services().len(), 1);
        assert_eq!(selection.service_ids(), vec!["color".to_string()]);
        assert_eq!(selection.total_duration(), 90);
        assert_eq!(selection.total_price(), 80.0);
    }

    #[test]
    fn service_id_maps_from_mongo_style_field() {
        let json = r#"{"_id":"abc","name":"Cut","category":"hair","durationMinutes":30,"price":25.0}"#;
        let parsed: Service = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, "abc");
        assert_eq!(parsed.duration_minutes, 30);
    }
}
