//! Integration tests for tab resolution and the props each panel receives.

mod common;

use assert_matches::assert_matches;
use common::{values, Harness};
use listflow_core::error::GatewayError;
use listflow_core::flow::{PUBLISH_BUTTON_TEXT, SAVE_BUTTON_TEXT};
use listflow_core::step::Step;
use listflow_core::types::{ListingPageType, PathParams};
use listflow_wizard::{PanelExtras, SubmitOutcome, TabResolution, WizardOperation};
use serde_json::json;

const TABS: [Step; 4] = [Step::Details, Step::Location, Step::Availability, Step::Photos];

#[tokio::test]
async fn unsupported_tab_has_no_renderer() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Details));
    assert_matches!(
        h.controller.resolve("shipping-zones").await,
        TabResolution::NoRenderer { tab } if tab == "shipping-zones"
    );
}

#[tokio::test]
async fn current_tab_comes_from_url() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Location));
    let TabResolution::Panel(panel) = h.controller.resolve_current().await else {
        panic!("location should resolve");
    };
    assert_eq!(panel.step(), Step::Location);
    assert_eq!(panel.props.extras, PanelExtras::Location);
    assert!(format!("{panel:?}").contains("Location"));
}

#[tokio::test]
async fn each_step_gets_its_own_extras() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Details));
    h.controller.process_change("default-booking/release-1").await;

    let TabResolution::Panel(details) = h.controller.resolve("details").await else {
        panic!("details should resolve");
    };
    assert_eq!(
        details.props.extras,
        PanelExtras::Details {
            process_alias: Some("default-booking/release-1".to_string())
        }
    );

    let TabResolution::Panel(photos) = h.controller.resolve("photos").await else {
        panic!("photos should resolve");
    };
    assert_matches!(photos.props.extras, PanelExtras::Photos { ref images } if images.is_empty());

    let TabResolution::Panel(availability) = h.controller.resolve("availability").await else {
        panic!("availability should resolve");
    };
    assert_matches!(
        availability.props.extras,
        PanelExtras::Availability {
            fetch_exceptions_in_progress: false,
            ..
        }
    );
}

#[tokio::test]
async fn submit_button_text_follows_flow_and_position() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Details));
    let TabResolution::Panel(details) = h.controller.resolve("details").await else {
        panic!("details should resolve");
    };
    assert_eq!(details.props.submit_button_text, "Next: Location");

    let TabResolution::Panel(photos) = h.controller.resolve("photos").await else {
        panic!("photos should resolve");
    };
    assert_eq!(photos.props.submit_button_text, PUBLISH_BUTTON_TEXT);

    let (edit, _) = Harness::on_listing(&TABS, ListingPageType::Edit, Step::Details);
    let TabResolution::Panel(details) = edit.controller.resolve("details").await else {
        panic!("details should resolve");
    };
    assert_eq!(details.props.submit_button_text, SAVE_BUTTON_TEXT);
}

#[tokio::test]
async fn panel_submit_is_bound_to_its_step() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Details));
    let TabResolution::Panel(panel) = h.controller.resolve("details").await else {
        panic!("details should resolve");
    };

    let outcome = panel.submit(values(json!({ "title": "Tent" }))).await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Advanced { next: Step::Location, .. });
    assert!(panel.next_tab().await.is_none());
}

#[tokio::test]
async fn props_expose_errors_and_listing() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Details));
    h.gateway.fail_next(
        WizardOperation::CreateDraft,
        GatewayError::Network("offline".into()),
    );
    let _ = h.controller.submit(Step::Details, values(json!({}))).await;

    let TabResolution::Panel(panel) = h.controller.resolve("details").await else {
        panic!("details should resolve");
    };
    assert!(panel.props.errors.create_listing_draft_error.is_some());
    assert!(!panel.props.update_in_progress);
    assert!(!panel.props.panel_updated);
    assert!(panel.props.listing.is_none());
    assert!(!panel.props.ready);
    assert!(!panel.props.disabled);

    let json = serde_json::to_value(&panel.props).unwrap();
    assert_eq!(json["errors"]["createListingDraftError"]["kind"], "network");
    assert_eq!(json["submitButtonText"], "Next: Location");
}
