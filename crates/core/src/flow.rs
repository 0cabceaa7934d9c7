//! Creation vs editing flow.

use serde::{Deserialize, Serialize};

use crate::step::Step;
use crate::tabs::{MarketplaceTabs, TabPosition};
use crate::types::ListingPageType;

pub const PUBLISH_BUTTON_TEXT: &str = "Publish listing";
pub const SAVE_BUTTON_TEXT: &str = "Save changes";

/// Whether the user is inside the guided creation sequence or editing a
/// published listing.
///
/// Creation flow advances tab by tab and publishes on the last tab. Editing
/// flow saves in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    Creation,
    Editing,
}

impl FlowMode {
    pub fn from_page_type(page_type: ListingPageType) -> Self {
        match page_type {
            ListingPageType::New | ListingPageType::Draft => Self::Creation,
            ListingPageType::Edit => Self::Editing,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, Self::Creation)
    }
}

/// Text of the submit button on `step`'s panel.
pub fn submit_button_text(mode: FlowMode, step: Step, tabs: &MarketplaceTabs) -> String {
    match mode {
        FlowMode::Editing => SAVE_BUTTON_TEXT.to_string(),
        FlowMode::Creation => match tabs.position(step) {
            TabPosition::Intermediate { next } => format!("Next: {}", next.label()),
            TabPosition::Last | TabPosition::NotConfigured => PUBLISH_BUTTON_TEXT.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
