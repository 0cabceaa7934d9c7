#![allow(dead_code)]

use std::sync::Arc;

use listflow_core::config::WizardConfig;
use listflow_core::listing::{Listing, ListingValues};
use listflow_core::navigation::{TabLookup, EDIT_LISTING_PAGE};
use listflow_core::routes::{RouteTable, Router, DEFAULT_EDIT_LISTING_ROUTE};
use listflow_core::step::Step;
use listflow_core::tabs::MarketplaceTabs;
use listflow_core::types::{ListingId, ListingPageType, PathParams};
use listflow_wizard::memory::{
    InMemoryAvailability, InMemoryGateway, InMemoryImages, MemoryHistory, RecordingScroll,
};
use listflow_wizard::{WizardController, WizardServices};
use uuid::Uuid;

/// A controller wired to in-memory collaborators, with handles to inspect
/// each of them.
pub struct Harness {
    pub controller: WizardController,
    pub gateway: Arc<InMemoryGateway>,
    pub history: Arc<MemoryHistory>,
    pub scroll: Arc<RecordingScroll>,
    pub images: Arc<InMemoryImages>,
    pub availability: Arc<InMemoryAvailability>,
    pub router: Arc<RouteTable>,
}

pub fn config(tabs: &[Step], tab_lookup: TabLookup) -> WizardConfig {
    WizardConfig {
        marketplace_tabs: MarketplaceTabs::new(tabs.to_vec()).unwrap(),
        tab_lookup,
        edit_listing_route: DEFAULT_EDIT_LISTING_ROUTE.to_string(),
    }
}

impl Harness {
    pub fn new(tabs: &[Step], params: PathParams) -> Self {
        Self::with_config(config(tabs, TabLookup::Lenient), params, None)
    }

    pub fn with_config(config: WizardConfig, params: PathParams, listing: Option<Listing>) -> Self {
        let router = Arc::new(config.route_table().unwrap());
        let initial_url = router.build_path(EDIT_LISTING_PAGE, &params).unwrap();

        let gateway = Arc::new(InMemoryGateway::new());
        let history = Arc::new(MemoryHistory::new(initial_url));
        let scroll = Arc::new(RecordingScroll::new());
        let images = Arc::new(InMemoryImages::new());
        let availability = Arc::new(InMemoryAvailability::new());

        let services = WizardServices {
            gateway: gateway.clone(),
            router: router.clone(),
            history: history.clone(),
            scroll: scroll.clone(),
            images: images.clone(),
            availability: availability.clone(),
        };

        let mut controller = WizardController::new(services, &config, params);
        if let Some(listing) = listing {
            gateway.insert(listing.clone());
            controller = controller.with_listing(listing);
        }

        Self {
            controller,
            gateway,
            history,
            scroll,
            images,
            availability,
            router,
        }
    }

    /// A harness on an existing listing, stored in the gateway and loaded
    /// into the controller.
    pub fn on_listing(tabs: &[Step], page_type: ListingPageType, tab: Step) -> (Self, ListingId) {
        let id = fixed_id();
        let mut params = PathParams::new_listing(tab).into_draft(id);
        params.page_type = page_type;
        params.slug = "bike".to_string();

        let listing = Listing::new(id, values(serde_json::json!({ "title": "Bike" })));
        let harness = Self::with_config(config(tabs, TabLookup::Lenient), params, Some(listing));
        (harness, id)
    }

    pub fn url(&self, params: &PathParams) -> String {
        self.router.build_path(EDIT_LISTING_PAGE, params).unwrap()
    }

    /// Feed the current history entry back into the controller, as the host
    /// does when the URL changes.
    pub async fn sync_location(&self) {
        let (_, params) = self
            .router
            .match_path(&self.history.current())
            .expect("history entry should be an edit-listing URL");
        self.controller.set_location(params).await;
    }
}

pub fn fixed_id() -> ListingId {
    ListingId(Uuid::from_u128(0x0b1e_0000_0000_4000_8000_0000_0000_00aa))
}

pub fn values(v: serde_json::Value) -> ListingValues {
    v.as_object().cloned().expect("values must be a JSON object")
}
