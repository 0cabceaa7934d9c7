//! Integration tests for the availability and photos step extras and the
//! listing/exception fetches.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use common::{fixed_id, values, Harness};
use listflow_core::error::GatewayError;
use listflow_core::listing::{ImageUpload, NewAvailabilityException};
use listflow_core::step::Step;
use listflow_core::types::{ListingPageType, PathParams};
use listflow_wizard::{PanelExtras, TabResolution, WizardError, WizardOperation};
use serde_json::json;

const TABS: [Step; 3] = [Step::Availability, Step::Location, Step::Photos];

fn exception(hours: i64) -> NewAvailabilityException {
    let start = Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).unwrap();
    NewAvailabilityException {
        listing_id: fixed_id(),
        start,
        end: start + Duration::hours(hours),
        seats: 0,
    }
}

// ---------------------------------------------------------------------------
// Availability: next tab without saving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn next_tab_redirects_without_gateway_call() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);

    let next = h.controller.next_tab().await.unwrap();

    assert_eq!(next, Some(Step::Location));
    assert!(h.gateway.calls().is_empty());
    assert_eq!(h.history.len(), 2);
    h.sync_location().await;
    assert_eq!(h.controller.params().await.step(), Some(Step::Location));
}

#[tokio::test]
async fn next_tab_matches_submit_redirect() {
    let (via_next, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);
    let (via_submit, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);

    via_next.controller.next_tab().await.unwrap();
    via_submit
        .controller
        .submit(Step::Availability, values(json!({})))
        .await
        .unwrap();

    assert_eq!(via_next.history.entries(), via_submit.history.entries());
}

#[tokio::test]
async fn next_tab_through_panel() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);
    let TabResolution::Panel(panel) = h.controller.resolve("availability").await else {
        panic!("availability should resolve");
    };
    assert_matches!(panel.next_tab().await, Some(Ok(Some(Step::Location))));
}

#[tokio::test]
async fn next_tab_is_a_no_op_when_editing() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Edit, Step::Availability);
    assert_eq!(h.controller.next_tab().await.unwrap(), None);
    assert_eq!(h.history.len(), 1);
}

#[tokio::test]
async fn next_tab_needs_a_listing() {
    let h = Harness::new(&TABS, PathParams::new_listing(Step::Availability));
    assert_matches!(
        h.controller.next_tab().await,
        Err(WizardError::MissingListingId)
    );
    assert_eq!(h.history.len(), 1);
}

// ---------------------------------------------------------------------------
// Availability: exceptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_fetch_and_delete_exceptions() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);

    let created = h
        .controller
        .add_availability_exception(exception(4))
        .await
        .unwrap();
    assert_eq!(h.availability.exceptions().len(), 1);

    h.controller.fetch_exceptions().await.unwrap();
    let snapshot = h.controller.snapshot().await;
    assert_eq!(snapshot.availability_exceptions, vec![created.clone()]);
    assert!(!snapshot.fetch_exceptions_in_progress);

    let TabResolution::Panel(panel) = h.controller.resolve("availability").await else {
        panic!("availability should resolve");
    };
    assert_matches!(
        panel.props.extras,
        PanelExtras::Availability { ref availability_exceptions, .. } if availability_exceptions.len() == 1
    );

    h.controller
        .delete_availability_exception(created.id)
        .await
        .unwrap();
    assert!(h.controller.snapshot().await.availability_exceptions.is_empty());
    assert!(h.availability.exceptions().is_empty());
}

#[tokio::test]
async fn invalid_exception_is_reported() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);
    assert_matches!(
        h.controller.add_availability_exception(exception(0)).await,
        Err(WizardError::AvailabilityExceptionFailed(GatewayError::Rejected(_)))
    );
    assert!(h.controller.snapshot().await.availability_exceptions.is_empty());
}

#[tokio::test]
async fn fetch_exceptions_failure_goes_to_bag() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Availability);
    h.availability
        .fail_next_fetch(GatewayError::Network("timeout".into()));

    assert_matches!(
        h.controller.fetch_exceptions().await,
        Err(WizardError::FetchExceptionsFailed(_))
    );
    let snapshot = h.controller.snapshot().await;
    assert!(snapshot.errors.fetch_exceptions_error.is_some());
    assert!(!snapshot.fetch_exceptions_in_progress);
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_and_remove_images() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Photos);

    let image = h
        .controller
        .upload_image(ImageUpload {
            file_name: "front.jpg".into(),
            bytes: vec![0xff, 0xd8, 0xff],
        })
        .await
        .unwrap();

    let TabResolution::Panel(panel) = h.controller.resolve("photos").await else {
        panic!("photos should resolve");
    };
    assert_eq!(
        panel.props.extras,
        PanelExtras::Photos {
            images: vec![image.clone()]
        }
    );

    h.controller.remove_image(image.id).await;
    assert!(h.controller.snapshot().await.images.is_empty());
    assert_eq!(h.images.removed(), vec![image.id]);
}

#[tokio::test]
async fn upload_failure_goes_to_bag_and_retry_clears_it() {
    let (h, _) = Harness::on_listing(&TABS, ListingPageType::Draft, Step::Photos);
    h.images
        .fail_next_upload(GatewayError::Api {
            status: 413,
            message: "too large".into(),
        });
    let upload = ImageUpload {
        file_name: "huge.png".into(),
        bytes: vec![1, 2, 3],
    };

    assert_matches!(
        h.controller.upload_image(upload.clone()).await,
        Err(WizardError::UploadImageFailed(_))
    );
    assert!(h.controller.errors().await.get(WizardOperation::UploadImage).is_some());

    h.controller.upload_image(upload).await.unwrap();
    assert!(h.controller.errors().await.is_empty());
    assert_eq!(h.images.uploaded().len(), 1);
}

// ---------------------------------------------------------------------------
// Fetch listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_listing_loads_from_url_id() {
    let id = fixed_id();
    let mut params = PathParams::new_listing(Step::Location).into_draft(id);
    params.page_type = ListingPageType::Edit;
    let h = Harness::new(&TABS, params);
    h.gateway.insert(listflow_core::listing::Listing::new(
        id,
        values(json!({ "title": "Canoe" })),
    ));

    let listing = h.controller.fetch_listing().await.unwrap();
    assert_eq!(listing.attributes["title"], "Canoe");
    let snapshot = h.controller.snapshot().await;
    assert_eq!(snapshot.listing, Some(listing));
    assert!(!snapshot.fetch_in_progress);
}

#[tokio::test]
async fn fetch_listing_failure_goes_to_bag() {
    let id = fixed_id();
    let params = PathParams::new_listing(Step::Location).into_draft(id);
    let h = Harness::new(&TABS, params);

    assert_matches!(
        h.controller.fetch_listing().await,
        Err(WizardError::FetchListingFailed(GatewayError::NotFound(_)))
    );
    assert!(h.controller.errors().await.show_listings_error.is_some());
}
