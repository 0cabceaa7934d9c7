//! The listing under construction and the payloads that flow through the
//! wizard.
//!
//! Step values are an open JSON object: the wizard never inspects them, it
//! only forwards them to the persistence gateway.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ListingId, ListingPageType, Timestamp};

/// Submitted values of one step (title, description, pricing, geolocation,
/// public data, ...).
pub type ListingValues = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A listing as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    #[serde(default)]
    pub attributes: ListingValues,
    #[serde(default)]
    pub images: Vec<ListingImage>,
}

impl Listing {
    pub fn new(id: ListingId, attributes: ListingValues) -> Self {
        Self {
            id,
            attributes,
            images: Vec::new(),
        }
    }

    /// Shallow-merge submitted values into the attribute bag.
    pub fn merge(&mut self, values: &ListingValues) {
        for (key, value) in values {
            self.attributes.insert(key.clone(), value.clone());
        }
    }
}

/// Body of an update call: the submitted values plus the listing id.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingUpdate {
    pub id: ListingId,
    pub values: ListingValues,
}

impl ListingUpdate {
    /// The request body as one JSON object (`{ ...values, id }`).
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = self.values.clone();
        body.insert("id".to_string(), serde_json::Value::String(self.id.to_string()));
        serde_json::Value::Object(body)
    }
}

// ---------------------------------------------------------------------------
// Persistence state
// ---------------------------------------------------------------------------

/// Lifecycle of the listing as seen from the current URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceState {
    NotCreated,
    Draft,
    Published,
}

impl PersistenceState {
    /// Derive the state from the URL `type` and whether an id is known.
    ///
    /// `new` is always not-created (including while the create call is in
    /// flight). Without an id nothing can have been persisted.
    pub fn derive(page_type: ListingPageType, id: Option<ListingId>) -> Self {
        match (page_type, id) {
            (ListingPageType::New, _) | (_, None) => Self::NotCreated,
            (ListingPageType::Draft, Some(_)) => Self::Draft,
            (ListingPageType::Edit, Some(_)) => Self::Published,
        }
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: Uuid,
    pub file_name: String,
}

/// A file the photos step asks to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Availability exceptions
// ---------------------------------------------------------------------------

/// A period that overrides the default availability plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub id: Uuid,
    pub listing_id: ListingId,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Seats available during the period; `0` blocks the period.
    pub seats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAvailabilityException {
    pub listing_id: ListingId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub seats: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: serde_json::Value) -> ListingValues {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn persistence_state_from_url() {
        let id = Some(ListingId::new_v4());
        assert_eq!(
            PersistenceState::derive(ListingPageType::New, None),
            PersistenceState::NotCreated
        );
        assert_eq!(
            PersistenceState::derive(ListingPageType::New, id),
            PersistenceState::NotCreated
        );
        assert_eq!(
            PersistenceState::derive(ListingPageType::Draft, id),
            PersistenceState::Draft
        );
        assert_eq!(
            PersistenceState::derive(ListingPageType::Edit, id),
            PersistenceState::Published
        );
        assert_eq!(
            PersistenceState::derive(ListingPageType::Draft, None),
            PersistenceState::NotCreated
        );
    }

    #[test]
    fn update_body_carries_id() {
        let id = ListingId::new_v4();
        let update = ListingUpdate {
            id,
            values: values(json!({ "title": "Bike" })),
        };
        let body = update.to_body();
        assert_eq!(body["title"], "Bike");
        assert_eq!(body["id"], id.to_string());
    }

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut listing = Listing::new(
            ListingId::new_v4(),
            values(json!({ "title": "Old", "description": "kept" })),
        );
        listing.merge(&values(json!({ "title": "New" })));
        assert_eq!(listing.attributes["title"], "New");
        assert_eq!(listing.attributes["description"], "kept");
    }
}
