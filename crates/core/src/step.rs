//! Wizard step identifiers.
//!
//! The set of steps is closed: every step the editor knows how to render is a
//! variant here, and the tab resolver matches on it exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One editing step (tab) of the listing wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Details,
    Pricing,
    PricingAndStock,
    Delivery,
    Location,
    Availability,
    Photos,
}

/// Every step the wizard supports, in declaration order.
pub const SUPPORTED_STEPS: [Step; 7] = [
    Step::Details,
    Step::Pricing,
    Step::PricingAndStock,
    Step::Delivery,
    Step::Location,
    Step::Availability,
    Step::Photos,
];

impl Step {
    /// The URL tag of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Pricing => "pricing",
            Self::PricingAndStock => "pricing-and-stock",
            Self::Delivery => "delivery",
            Self::Location => "location",
            Self::Availability => "availability",
            Self::Photos => "photos",
        }
    }

    /// Human-readable label for the step.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Details => "Details",
            Self::Pricing => "Pricing",
            Self::PricingAndStock => "Pricing & stock",
            Self::Delivery => "Delivery",
            Self::Location => "Location",
            Self::Availability => "Availability",
            Self::Photos => "Photos",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_STEPS
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unsupported wizard tab '{s}'. Must be one of: {}",
                    SUPPORTED_STEPS.map(|step| step.as_str()).join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
