//! Identifier and URL path-parameter types shared across the workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::step::Step;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Listing id
// ---------------------------------------------------------------------------

/// Opaque listing identifier assigned by the backend on draft creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The UUID used when building URLs.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ListingId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::Validation(format!("Invalid listing id '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Listing page type
// ---------------------------------------------------------------------------

/// Slug used in the URL before the listing has a title.
pub const NEW_LISTING_SLUG: &str = "draft";

/// Id used in the URL before the listing has been created.
pub const NEW_LISTING_PLACEHOLDER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// The `type` path parameter of the edit-listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPageType {
    /// Nothing has been created yet; the first submission creates a draft.
    New,
    /// A draft exists and the user is still inside the guided sequence.
    Draft,
    /// The listing is published and is being edited. Any other value of
    /// the parameter lands here.
    #[serde(other)]
    Edit,
}

impl ListingPageType {
    /// Parse the `type` path parameter.
    ///
    /// Anything other than `new` or `draft` is treated as the published
    /// marker, matching how the page resolves unknown types.
    pub fn from_param(s: &str) -> Self {
        match s {
            "new" => Self::New,
            "draft" => Self::Draft,
            _ => Self::Edit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Draft => "draft",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for ListingPageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Path params
// ---------------------------------------------------------------------------

/// Path parameters of the edit-listing page.
///
/// `tab` is kept as the raw string from the URL: a stale URL may reference a
/// step this build does not support, and that must be reported by the tab
/// resolver rather than rejected while parsing the location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParams {
    pub slug: String,
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: ListingPageType,
    pub tab: String,
}

impl PathParams {
    /// Params of a brand new listing positioned on `first_tab`.
    pub fn new_listing(first_tab: Step) -> Self {
        Self {
            slug: NEW_LISTING_SLUG.to_string(),
            id: NEW_LISTING_PLACEHOLDER_ID.to_string(),
            page_type: ListingPageType::New,
            tab: first_tab.as_str().to_string(),
        }
    }

    /// The listing id carried by the URL, if it is a real one.
    pub fn listing_id(&self) -> Option<ListingId> {
        if self.id == NEW_LISTING_PLACEHOLDER_ID {
            return None;
        }
        self.id.parse().ok()
    }

    /// The current tab, if it names a supported step.
    pub fn step(&self) -> Option<Step> {
        self.tab.parse().ok()
    }

    pub fn with_tab(mut self, tab: Step) -> Self {
        self.tab = tab.as_str().to_string();
        self
    }

    /// Same location re-typed as a draft of `id`.
    pub fn into_draft(mut self, id: ListingId) -> Self {
        self.page_type = ListingPageType::Draft;
        self.id = id.to_string();
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_from_param() {
        assert_eq!(ListingPageType::from_param("new"), ListingPageType::New);
        assert_eq!(ListingPageType::from_param("draft"), ListingPageType::Draft);
        assert_eq!(ListingPageType::from_param("edit"), ListingPageType::Edit);
        assert_eq!(ListingPageType::from_param("whatever"), ListingPageType::Edit);
    }

    #[test]
    fn new_listing_params_have_no_listing_id() {
        let params = PathParams::new_listing(Step::Details);
        assert_eq!(params.page_type, ListingPageType::New);
        assert_eq!(params.slug, NEW_LISTING_SLUG);
        assert_eq!(params.tab, "details");
        assert!(params.listing_id().is_none());
    }

    #[test]
    fn unknown_page_type_reads_as_edit_from_json() {
        let params: PathParams = serde_json::from_value(serde_json::json!({
            "slug": "bike",
            "id": "0b1e0000-0000-4000-8000-0000000000aa",
            "type": "published",
            "tab": "pricing",
        }))
        .unwrap();
        assert_eq!(params.page_type, ListingPageType::Edit);
        assert_eq!(params.page_type, ListingPageType::from_param("published"));

        let draft: ListingPageType = serde_json::from_value(serde_json::json!("draft")).unwrap();
        assert_eq!(draft, ListingPageType::Draft);
        assert_eq!(serde_json::to_value(ListingPageType::Edit).unwrap(), "edit");
    }

    #[test]
    fn into_draft_sets_type_and_id() {
        let id = ListingId::new_v4();
        let params = PathParams::new_listing(Step::Details).into_draft(id);
        assert_eq!(params.page_type, ListingPageType::Draft);
        assert_eq!(params.listing_id(), Some(id));
        assert_eq!(params.tab, "details");
    }

    #[test]
    fn unsupported_tab_has_no_step() {
        let mut params = PathParams::new_listing(Step::Details);
        params.tab = "shipping-zones".into();
        assert!(params.step().is_none());
    }

    #[test]
    fn listing_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ListingId>().is_err());
    }

    #[test]
    fn path_params_serialize_type_key() {
        let json = serde_json::to_value(PathParams::new_listing(Step::Photos)).unwrap();
        assert_eq!(json["type"], "new");
        assert_eq!(json["tab"], "photos");
    }
}
