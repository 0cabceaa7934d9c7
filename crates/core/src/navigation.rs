//! What happens after a step has been saved.
//!
//! The decision is returned as a list of [`NavigationAction`] values instead
//! of being performed here; the wizard controller executes them in order
//! (history mutations through the router, publish through the gateway).

use serde::Serialize;

use crate::error::CoreError;
use crate::flow::FlowMode;
use crate::step::Step;
use crate::tabs::{MarketplaceTabs, TabPosition};
use crate::types::{ListingId, ListingPageType, PathParams};

/// Route name of the edit-listing page.
pub const EDIT_LISTING_PAGE: &str = "EditListingPage";

/// How to treat a submitted step that is not in the configured sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TabLookup {
    /// Treat the step as the last reachable one (and log it).
    #[default]
    Lenient,
    /// Reject the submission as a configuration error.
    Strict,
}

/// A named route plus the params to fill it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    pub route_name: &'static str,
    pub path_params: PathParams,
}

impl NavigationTarget {
    pub fn edit_listing(path_params: PathParams) -> Self {
        Self {
            route_name: EDIT_LISTING_PAGE,
            path_params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum NavigationAction {
    /// Overwrite the current history entry.
    Replace(NavigationTarget),
    /// Add a new history entry.
    Push(NavigationTarget),
    /// Publish the listing; any redirect afterwards belongs to the publish
    /// flow, not to the wizard.
    PublishTriggered(ListingId),
}

/// Reject a submission for an unconfigured step when lookups are strict.
pub fn check_submittable(
    step: Step,
    tabs: &MarketplaceTabs,
    lookup: TabLookup,
) -> Result<(), CoreError> {
    if lookup == TabLookup::Strict && !tabs.contains(step) {
        return Err(CoreError::Validation(format!(
            "Tab '{step}' is not enabled for this marketplace"
        )));
    }
    Ok(())
}

/// Actions to take after `step` was saved successfully.
///
/// - Editing flow: nothing; the user stays on the tab.
/// - Creation flow, last step: publish.
/// - Creation flow, any other step: move to the next tab (see
///   [`redirect_after_draft_update`]).
///
/// A step missing from `tabs` is treated as the last reachable step.
pub fn plan_after_save(
    params: &PathParams,
    step: Step,
    tabs: &MarketplaceTabs,
    listing_id: ListingId,
) -> Vec<NavigationAction> {
    if !FlowMode::from_page_type(params.page_type).is_creation() {
        return Vec::new();
    }

    match tabs.position(step) {
        TabPosition::Intermediate { .. } => {
            redirect_after_draft_update(listing_id, params, step, tabs)
        }
        TabPosition::Last => vec![NavigationAction::PublishTriggered(listing_id)],
        TabPosition::NotConfigured => {
            tracing::warn!(
                step = %step,
                %listing_id,
                "Submitted tab is not in the marketplace tabs, treating it as the last tab"
            );
            vec![NavigationAction::PublishTriggered(listing_id)]
        }
    }
}

/// Move from `step` to the following tab of the draft.
///
/// When the current URL is still a `new` one it is first replaced by the
/// equivalent draft URL, so that going back leads to editing this draft
/// instead of creating another one. The next tab is clamped to the last
/// configured step.
pub fn redirect_after_draft_update(
    listing_id: ListingId,
    params: &PathParams,
    step: Step,
    tabs: &MarketplaceTabs,
) -> Vec<NavigationAction> {
    let current = params.clone().into_draft(listing_id).with_tab(step);
    let next = current.clone().with_tab(tabs.next_after(step));

    let mut actions = Vec::with_capacity(2);
    if params.page_type == ListingPageType::New {
        actions.push(NavigationAction::Replace(NavigationTarget::edit_listing(
            current,
        )));
    }
    actions.push(NavigationAction::Push(NavigationTarget::edit_listing(next)));
    actions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
