//! Tab resolver: maps a tab of the URL to the panel that renders it and the
//! props every panel receives.

use listflow_core::flow::{submit_button_text, FlowMode};
use listflow_core::listing::{AvailabilityException, Listing, ListingImage, ListingValues};
use listflow_core::step::Step;
use serde::Serialize;

use crate::controller::{PanelState, SubmitOutcome, WizardController};
use crate::error::{ErrorBag, WizardError};

/// Step-specific props on top of the common ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PanelExtras {
    Details {
        process_alias: Option<String>,
    },
    Pricing,
    PricingAndStock,
    Delivery,
    Location,
    Availability {
        availability_exceptions: Vec<AvailabilityException>,
        fetch_exceptions_in_progress: bool,
    },
    Photos {
        images: Vec<ListingImage>,
    },
}

/// Props shared by every step panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelProps {
    pub step: Step,
    /// This step was the last one saved successfully.
    pub panel_updated: bool,
    /// A create, update or publish call is in flight; submitting is blocked.
    pub update_in_progress: bool,
    pub errors: ErrorBag,
    /// The listing is being (re)loaded.
    pub disabled: bool,
    /// The new listing has been published.
    pub ready: bool,
    pub submit_button_text: String,
    pub listing: Option<Listing>,
    pub extras: PanelExtras,
}

/// A resolved panel bound to its step.
pub struct Panel<'a> {
    pub props: PanelProps,
    controller: &'a WizardController,
}

impl std::fmt::Debug for Panel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

impl Panel<'_> {
    pub fn step(&self) -> Step {
        self.props.step
    }

    /// Submit the panel's values through the completion handler.
    pub async fn submit(&self, values: ListingValues) -> Result<SubmitOutcome, WizardError> {
        self.controller.submit(self.props.step, values).await
    }

    /// The availability panel's "next" button. Other panels have none.
    pub async fn next_tab(&self) -> Option<Result<Option<Step>, WizardError>> {
        match self.props.step {
            Step::Availability => Some(self.controller.next_tab().await),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum TabResolution<'a> {
    Panel(Panel<'a>),
    /// The tab is not a supported step. Treat it as a configuration error.
    NoRenderer { tab: String },
}

impl WizardController {
    /// Resolve the tab named by the current URL.
    pub async fn resolve_current(&self) -> TabResolution<'_> {
        let tab = self.params().await.tab;
        self.resolve(&tab).await
    }

    /// Resolve `tab` to its panel.
    pub async fn resolve(&self, tab: &str) -> TabResolution<'_> {
        let Ok(step) = tab.parse::<Step>() else {
            tracing::warn!(tab = %tab, "No panel renders this tab");
            return TabResolution::NoRenderer {
                tab: tab.to_string(),
            };
        };

        let props = self
            .read_for_panel(|state| panel_props(step, state, self))
            .await;
        TabResolution::Panel(Panel {
            props,
            controller: self,
        })
    }
}

fn panel_props(step: Step, state: &PanelState<'_>, controller: &WizardController) -> PanelProps {
    let mode = FlowMode::from_page_type(state.params.page_type);
    PanelProps {
        step,
        panel_updated: state.updated_tab == Some(step),
        update_in_progress: state.update_in_progress,
        errors: state.errors.clone(),
        disabled: state.fetch_in_progress,
        ready: state.new_listing_published,
        submit_button_text: submit_button_text(mode, step, controller.marketplace_tabs()),
        listing: state.listing.cloned(),
        extras: extras_for(step, state),
    }
}

fn extras_for(step: Step, state: &PanelState<'_>) -> PanelExtras {
    match step {
        Step::Details => PanelExtras::Details {
            process_alias: state.process_alias.map(str::to_string),
        },
        Step::Pricing => PanelExtras::Pricing,
        Step::PricingAndStock => PanelExtras::PricingAndStock,
        Step::Delivery => PanelExtras::Delivery,
        Step::Location => PanelExtras::Location,
        Step::Availability => PanelExtras::Availability {
            availability_exceptions: state.availability_exceptions.to_vec(),
            fetch_exceptions_in_progress: state.fetch_exceptions_in_progress,
        },
        Step::Photos => PanelExtras::Photos {
            images: state.images.to_vec(),
        },
    }
}
