//! `listflow-cli` -- walks the listing wizard against in-memory services.
//!
//! Creates a listing tab by tab, following the URL the wizard navigates to
//! after each step, publishes it on the last tab, then re-opens it in edit
//! mode and saves one tab.
//!
//! # Environment variables
//!
//! | Variable             | Default                                                 |
//! |----------------------|---------------------------------------------------------|
//! | `MARKETPLACE_TABS`   | `details,pricing,delivery,location,availability,photos` |
//! | `WIZARD_STRICT_TABS` | `false`                                                 |
//! | `EDIT_LISTING_ROUTE` | `/l/{slug}/{type}/{id}/{tab}`                           |
//! | `RUST_LOG`           | `listflow_cli=info,listflow_wizard=debug`               |

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::{Duration, Utc};
use listflow_core::config::WizardConfig;
use listflow_core::listing::{ImageUpload, ListingValues, NewAvailabilityException};
use listflow_core::navigation::EDIT_LISTING_PAGE;
use listflow_core::routes::{RouteTable, Router};
use listflow_core::step::Step;
use listflow_core::types::{ListingId, ListingPageType, PathParams};
use listflow_wizard::memory::{
    InMemoryAvailability, InMemoryGateway, InMemoryImages, MemoryHistory, RecordingScroll,
};
use listflow_wizard::{SubmitOutcome, TabResolution, WizardController, WizardServices};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listflow_cli=info,listflow_wizard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WizardConfig::from_env().context("Invalid wizard configuration")?;
    let router = Arc::new(config.route_table()?);
    tracing::info!(
        tabs = ?config.marketplace_tabs.steps(),
        route = %config.edit_listing_route,
        "Wizard configuration loaded"
    );

    let start = PathParams::new_listing(config.marketplace_tabs.first());
    let gateway = Arc::new(InMemoryGateway::new());
    let history = Arc::new(MemoryHistory::new(
        router.build_path(EDIT_LISTING_PAGE, &start)?,
    ));
    let services = WizardServices {
        gateway: gateway.clone(),
        router: router.clone(),
        history: history.clone(),
        scroll: Arc::new(RecordingScroll::new()),
        images: Arc::new(InMemoryImages::new()),
        availability: Arc::new(InMemoryAvailability::new()),
    };

    let controller = WizardController::new(services.clone(), &config, start);
    let listing_id = run_creation_flow(&controller, &router, &history).await?;

    tracing::info!("History after creation:");
    for (i, url) in history.entries().iter().enumerate() {
        tracing::info!("  {i}: {url}");
    }

    // Re-open the published listing and save one tab in place.
    let listing = gateway
        .listing(listing_id)
        .ok_or_else(|| anyhow!("Published listing {listing_id} is missing"))?;
    let edit_tab = config.marketplace_tabs.first();
    let mut edit_params = PathParams::new_listing(edit_tab).into_draft(listing_id);
    edit_params.page_type = ListingPageType::Edit;

    let history_len = history.len();
    let editor = WizardController::new(services, &config, edit_params).with_listing(listing);
    let outcome = editor
        .submit(edit_tab, sample_values(edit_tab))
        .await
        .context("Editing the published listing failed")?;
    tracing::info!(?outcome, "Edit saved");
    if history.len() != history_len {
        bail!("Editing a published listing must not navigate");
    }

    println!("{}", serde_json::to_string_pretty(&editor.snapshot().await)?);
    Ok(())
}

/// Submit every tab the wizard lands on until the listing is published.
async fn run_creation_flow(
    controller: &WizardController,
    router: &RouteTable,
    history: &MemoryHistory,
) -> anyhow::Result<ListingId> {
    let max_steps = controller.marketplace_tabs().steps().len();

    for _ in 0..max_steps {
        let panel = match controller.resolve_current().await {
            TabResolution::Panel(panel) => panel,
            TabResolution::NoRenderer { tab } => bail!("No panel for tab '{tab}'"),
        };
        let step = panel.step();
        tracing::info!(step = %step, button = %panel.props.submit_button_text, "Filling tab");

        match step {
            Step::Photos => {
                controller
                    .upload_image(ImageUpload {
                        file_name: "cover.jpg".into(),
                        bytes: vec![0xff, 0xd8, 0xff, 0xe0],
                    })
                    .await?;
            }
            Step::Availability => {
                if let Some(listing_id) = controller.params().await.listing_id() {
                    let start = Utc::now();
                    controller
                        .add_availability_exception(NewAvailabilityException {
                            listing_id,
                            start,
                            end: start + Duration::days(2),
                            seats: 0,
                        })
                        .await?;
                }
            }
            _ => {}
        }

        match panel.submit(sample_values(step)).await? {
            SubmitOutcome::Published { listing_id } => return Ok(listing_id),
            SubmitOutcome::Advanced { next, .. } => {
                tracing::info!(next = %next, url = %history.current(), "Moved to next tab");
            }
            SubmitOutcome::Saved { .. } => bail!("Creation flow saved without advancing"),
        }

        let (_, params) = router
            .match_path(&history.current())
            .ok_or_else(|| anyhow!("Unrecognised URL {}", history.current()))?;
        controller.set_location(params).await;
    }

    bail!("Wizard did not publish after {max_steps} tabs")
}

fn sample_values(step: Step) -> ListingValues {
    let value = match step {
        Step::Details => json!({
            "title": "Mountain bike",
            "description": "Full suspension, 29\" wheels",
            "publicData": { "category": "bikes" },
        }),
        Step::Pricing => json!({ "price": { "amount": 2500, "currency": "EUR" } }),
        Step::PricingAndStock => json!({
            "price": { "amount": 2500, "currency": "EUR" },
            "stock": 3,
        }),
        Step::Delivery => json!({ "publicData": { "shippingEnabled": true, "pickupEnabled": true } }),
        Step::Location => json!({
            "geolocation": { "lat": 60.17, "lng": 24.94 },
            "publicData": { "location": { "address": "Helsinki" } },
        }),
        Step::Availability => json!({ "availabilityPlan": { "type": "availability-plan/day" } }),
        Step::Photos => json!({}),
    };
    value.as_object().cloned().unwrap_or_default()
}
