//! The wizard controller.
//!
//! Owns the per-page UI state (error bag, busy flags, last saved tab) and
//! runs the completion handler: pick create or update from the URL type,
//! wait for the gateway, then publish or move to the next tab.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use listflow_core::config::WizardConfig;
use listflow_core::error::{CoreError, GatewayError};
use listflow_core::flow::FlowMode;
use listflow_core::listing::{
    AvailabilityException, ImageUpload, Listing, ListingImage, ListingUpdate, ListingValues,
    NewAvailabilityException, PersistenceState,
};
use listflow_core::navigation::{
    check_submittable, plan_after_save, redirect_after_draft_update, NavigationAction, TabLookup,
};
use listflow_core::routes::Router;
use listflow_core::step::Step;
use listflow_core::tabs::MarketplaceTabs;
use listflow_core::types::{ListingId, ListingPageType, PathParams};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ErrorBag, WizardError, WizardOperation};
use crate::gateway::{AvailabilityHandler, HistorySink, ImageHandler, PersistenceGateway, ScrollHook};
use crate::navigator::{HistoryMutation, Navigator};

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// External collaborators the controller is wired to.
#[derive(Clone)]
pub struct WizardServices {
    pub gateway: Arc<dyn PersistenceGateway>,
    pub router: Arc<dyn Router>,
    pub history: Arc<dyn HistorySink>,
    pub scroll: Arc<dyn ScrollHook>,
    pub images: Arc<dyn ImageHandler>,
    pub availability: Arc<dyn AvailabilityHandler>,
}

// ---------------------------------------------------------------------------
// Outcomes and state
// ---------------------------------------------------------------------------

/// Result of a successful step submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Creation flow moved on to `next`.
    Advanced { listing_id: ListingId, next: Step },
    /// Creation flow finished and the listing was published.
    Published { listing_id: ListingId },
    /// A published listing was saved in place.
    Saved { listing_id: ListingId },
}

/// Read-only view of the controller state.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub params: PathParams,
    pub flow_mode: FlowMode,
    pub persistence_state: PersistenceState,
    pub updated_tab: Option<Step>,
    pub update_in_progress: bool,
    pub fetch_in_progress: bool,
    pub fetch_exceptions_in_progress: bool,
    pub new_listing_published: bool,
    pub errors: ErrorBag,
    pub listing: Option<Listing>,
    pub images: Vec<ListingImage>,
    pub availability_exceptions: Vec<AvailabilityException>,
    pub process_alias: Option<String>,
}

#[derive(Debug)]
struct WizardState {
    params: PathParams,
    listing: Option<Listing>,
    updated_tab: Option<Step>,
    fetch_in_progress: bool,
    fetch_exceptions_in_progress: bool,
    new_listing_published: bool,
    /// History still holds the `new` entry of a draft whose first redirect
    /// failed.
    new_entry_pending: bool,
    errors: ErrorBag,
    images: Vec<ListingImage>,
    availability_exceptions: Vec<AvailabilityException>,
    process_alias: Option<String>,
}

impl WizardState {
    fn listing_id(&self) -> Option<ListingId> {
        self.listing
            .as_ref()
            .map(|l| l.id)
            .or_else(|| self.params.listing_id())
    }

    /// Params to plan the redirect from. While the `new` entry is still in
    /// history it must be replaced like on the first save.
    fn redirect_params(&self) -> PathParams {
        let mut params = self.params.clone();
        if self.new_entry_pending {
            params.page_type = ListingPageType::New;
        }
        params
    }
}

/// Marks a create/update/publish call as in flight until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct WizardController {
    services: WizardServices,
    navigator: Navigator,
    tabs: MarketplaceTabs,
    tab_lookup: TabLookup,
    state: RwLock<WizardState>,
    in_flight: AtomicBool,
}

impl WizardController {
    /// Create a controller for the page at `params`.
    pub fn new(services: WizardServices, config: &WizardConfig, params: PathParams) -> Self {
        let navigator = Navigator::new(services.router.clone(), services.history.clone());
        Self {
            services,
            navigator,
            tabs: config.marketplace_tabs.clone(),
            tab_lookup: config.tab_lookup,
            state: RwLock::new(WizardState {
                params,
                listing: None,
                updated_tab: None,
                fetch_in_progress: false,
                fetch_exceptions_in_progress: false,
                new_listing_published: false,
                new_entry_pending: false,
                errors: ErrorBag::default(),
                images: Vec::new(),
                availability_exceptions: Vec::new(),
                process_alias: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Seed the controller with an already loaded listing.
    pub fn with_listing(mut self, listing: Listing) -> Self {
        let state = self.state.get_mut();
        state.images = listing.images.clone();
        state.listing = Some(listing);
        self
    }

    pub fn marketplace_tabs(&self) -> &MarketplaceTabs {
        &self.tabs
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Called by the host whenever the URL changes.
    ///
    /// Flow mode and persistence state are always derived from the current
    /// params, so re-entering a page after a reload behaves the same as
    /// arriving there through the wizard.
    pub async fn set_location(&self, params: PathParams) {
        let mut state = self.state.write().await;
        tracing::debug!(
            page_type = %params.page_type,
            tab = %params.tab,
            "Wizard location changed"
        );
        state.params = params;
    }

    pub async fn params(&self) -> PathParams {
        self.state.read().await.params.clone()
    }

    pub async fn flow_mode(&self) -> FlowMode {
        FlowMode::from_page_type(self.state.read().await.params.page_type)
    }

    pub async fn persistence_state(&self) -> PersistenceState {
        let state = self.state.read().await;
        PersistenceState::derive(state.params.page_type, state.listing_id())
    }

    pub async fn errors(&self) -> ErrorBag {
        self.state.read().await.errors.clone()
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        let state = self.state.read().await;
        WizardSnapshot {
            params: state.params.clone(),
            flow_mode: FlowMode::from_page_type(state.params.page_type),
            persistence_state: PersistenceState::derive(
                state.params.page_type,
                state.listing_id(),
            ),
            updated_tab: state.updated_tab,
            update_in_progress: self.is_busy(),
            fetch_in_progress: state.fetch_in_progress,
            fetch_exceptions_in_progress: state.fetch_exceptions_in_progress,
            new_listing_published: state.new_listing_published,
            errors: state.errors.clone(),
            listing: state.listing.clone(),
            images: state.images.clone(),
            availability_exceptions: state.availability_exceptions.clone(),
            process_alias: state.process_alias.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Completion handler
    // -----------------------------------------------------------------------

    /// Save the values of a completed step and continue the flow.
    ///
    /// `new` pages create a draft, every other page updates the current
    /// listing. On failure the error is stored in the error bag and nothing
    /// else changes: no navigation, no state transition. History is only
    /// touched after the gateway confirmed the save.
    pub async fn submit(
        &self,
        step: Step,
        values: ListingValues,
    ) -> Result<SubmitOutcome, WizardError> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::warn!(step = %step, "Rejecting submission while another save is in flight");
            return Err(WizardError::Busy);
        };

        let (params, redirect_params, current_id) = {
            let state = self.state.read().await;
            (state.params.clone(), state.redirect_params(), state.listing_id())
        };
        let mode = FlowMode::from_page_type(params.page_type);
        if mode.is_creation() {
            check_submittable(step, &self.tabs, self.tab_lookup)?;
        }

        let listing = if params.page_type == ListingPageType::New {
            tracing::debug!(step = %step, "Creating listing draft");
            self.call(WizardOperation::CreateDraft, self.services.gateway.create_draft(values))
                .await?
        } else {
            let id = current_id.ok_or(WizardError::MissingListingId)?;
            tracing::debug!(step = %step, listing_id = %id, "Updating listing");
            self.call(
                WizardOperation::Update,
                self.services.gateway.update(ListingUpdate { id, values }),
            )
            .await?
        };

        let listing_id = listing.id;
        tracing::info!(step = %step, %listing_id, flow = ?mode, "Listing saved");
        {
            let mut state = self.state.write().await;
            state.listing = Some(listing);
            state.updated_tab = Some(step);
        }

        if !mode.is_creation() {
            return Ok(SubmitOutcome::Saved { listing_id });
        }

        let actions = plan_after_save(&redirect_params, step, &self.tabs, listing_id);
        self.execute(actions, &params, listing_id).await
    }

    async fn execute(
        &self,
        actions: Vec<NavigationAction>,
        params: &PathParams,
        listing_id: ListingId,
    ) -> Result<SubmitOutcome, WizardError> {
        if let Some(NavigationAction::PublishTriggered(id)) = actions.first() {
            let id = *id;
            tracing::debug!(listing_id = %id, "Last tab saved, publishing");
            self.call(WizardOperation::Publish, self.services.gateway.publish(id))
                .await?;
            self.state.write().await.new_listing_published = true;
            tracing::info!(listing_id = %id, "Listing published");
            return Ok(SubmitOutcome::Published { listing_id: id });
        }

        let next = next_step_of(&actions);
        let mutations = self.resolve_navigation(&actions, params, listing_id).await?;
        self.services.scroll.notify_step_advance(false);
        self.navigator.commit(&mutations);
        match next {
            Some(next) => Ok(SubmitOutcome::Advanced { listing_id, next }),
            None => Err(WizardError::Core(CoreError::Internal(
                "Redirect produced no push action".to_string(),
            ))),
        }
    }

    /// Build the URLs of `actions` before anything observable happens.
    ///
    /// On failure the error goes to the bag and, if the page was `new`, the
    /// created id is kept in the params so a retry updates that draft
    /// instead of creating another one. The retry still replaces the `new`
    /// history entry.
    async fn resolve_navigation(
        &self,
        actions: &[NavigationAction],
        params: &PathParams,
        listing_id: ListingId,
    ) -> Result<Vec<HistoryMutation>, WizardError> {
        let resolved = self.navigator.resolve(actions);
        let mut state = self.state.write().await;
        match resolved {
            Ok(mutations) => {
                state.errors.navigation_error = None;
                state.new_entry_pending = false;
                Ok(mutations)
            }
            Err(err) => {
                tracing::error!(%listing_id, error = %err, "Building the next URL failed");
                state.errors.navigation_error = Some(err.to_string());
                if params.page_type == ListingPageType::New {
                    state.params = params.clone().into_draft(listing_id);
                    state.new_entry_pending = true;
                }
                Err(WizardError::NavigationFailed(err))
            }
        }
    }

    /// Run a gateway call, keeping its error-bag entry in sync.
    async fn call<T, F>(&self, op: WizardOperation, fut: F) -> Result<T, WizardError>
    where
        F: std::future::Future<Output = Result<T, GatewayError>>,
    {
        self.state.write().await.errors.clear(op);
        match fut.await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!(operation = ?op, error = %err, "Wizard operation failed");
                self.state.write().await.errors.set(op, err.clone());
                Err(WizardError::from_gateway(op, err))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Availability step
    // -----------------------------------------------------------------------

    /// Move from the availability tab to the next one without saving.
    ///
    /// The availability step persists its exceptions itself, so its "next"
    /// button only redirects. Uses the same redirect computation as a saved
    /// step. Returns `None` on a published listing, which has no next tab.
    pub async fn next_tab(&self) -> Result<Option<Step>, WizardError> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::warn!("Rejecting next tab while a save is in flight");
            return Err(WizardError::Busy);
        };

        let (params, listing_id) = {
            let state = self.state.read().await;
            (state.redirect_params(), state.listing_id())
        };
        if !FlowMode::from_page_type(params.page_type).is_creation() {
            return Ok(None);
        }
        let listing_id = listing_id.ok_or(WizardError::MissingListingId)?;

        let actions =
            redirect_after_draft_update(listing_id, &params, Step::Availability, &self.tabs);
        let next = next_step_of(&actions);
        let mutations = self.resolve_navigation(&actions, &params, listing_id).await?;
        self.navigator.commit(&mutations);
        Ok(next)
    }

    pub async fn fetch_exceptions(&self) -> Result<(), WizardError> {
        let listing_id = self
            .state
            .read()
            .await
            .listing_id()
            .ok_or(WizardError::MissingListingId)?;

        self.state.write().await.fetch_exceptions_in_progress = true;
        let result = self
            .call(
                WizardOperation::FetchExceptions,
                self.services.availability.fetch_exceptions(listing_id),
            )
            .await;

        let mut state = self.state.write().await;
        state.fetch_exceptions_in_progress = false;
        state.availability_exceptions = result?;
        Ok(())
    }

    pub async fn add_availability_exception(
        &self,
        exception: NewAvailabilityException,
    ) -> Result<AvailabilityException, WizardError> {
        let created = self
            .services
            .availability
            .add_exception(exception)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Adding availability exception failed");
                WizardError::AvailabilityExceptionFailed(err)
            })?;
        self.state
            .write()
            .await
            .availability_exceptions
            .push(created.clone());
        Ok(created)
    }

    pub async fn delete_availability_exception(
        &self,
        exception_id: Uuid,
    ) -> Result<(), WizardError> {
        self.services
            .availability
            .delete_exception(exception_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %exception_id, "Deleting availability exception failed");
                WizardError::AvailabilityExceptionFailed(err)
            })?;
        self.state
            .write()
            .await
            .availability_exceptions
            .retain(|e| e.id != exception_id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Photos step
    // -----------------------------------------------------------------------

    pub async fn upload_image(&self, upload: ImageUpload) -> Result<ListingImage, WizardError> {
        let listing_id = self.state.read().await.listing_id();
        let image = self
            .call(
                WizardOperation::UploadImage,
                self.services.images.upload_image(listing_id, upload),
            )
            .await?;
        self.state.write().await.images.push(image.clone());
        Ok(image)
    }

    pub async fn remove_image(&self, image_id: Uuid) {
        self.services.images.remove_image(image_id);
        self.state
            .write()
            .await
            .images
            .retain(|image| image.id != image_id);
    }

    // -----------------------------------------------------------------------
    // Details step and page load
    // -----------------------------------------------------------------------

    /// Record the transaction process picked on the details step.
    pub async fn process_change(&self, process_alias: impl Into<String>) {
        let alias = process_alias.into();
        tracing::debug!(process_alias = %alias, "Transaction process changed");
        self.state.write().await.process_alias = Some(alias);
    }

    /// Load the listing named by the URL. Panels are disabled meanwhile.
    pub async fn fetch_listing(&self) -> Result<Listing, WizardError> {
        let listing_id = self
            .state
            .read()
            .await
            .params
            .listing_id()
            .ok_or(WizardError::MissingListingId)?;

        self.state.write().await.fetch_in_progress = true;
        let result = self
            .call(
                WizardOperation::FetchListing,
                self.services.gateway.fetch_listing(listing_id),
            )
            .await;

        let mut state = self.state.write().await;
        state.fetch_in_progress = false;
        let listing = result?;
        state.images = listing.images.clone();
        state.listing = Some(listing.clone());
        Ok(listing)
    }

    pub(crate) async fn read_for_panel<R>(&self, f: impl FnOnce(&PanelState<'_>) -> R) -> R {
        let state = self.state.read().await;
        let view = PanelState {
            params: &state.params,
            listing: state.listing.as_ref(),
            updated_tab: state.updated_tab,
            update_in_progress: self.is_busy(),
            fetch_in_progress: state.fetch_in_progress,
            fetch_exceptions_in_progress: state.fetch_exceptions_in_progress,
            new_listing_published: state.new_listing_published,
            errors: &state.errors,
            images: &state.images,
            availability_exceptions: &state.availability_exceptions,
            process_alias: state.process_alias.as_deref(),
        };
        f(&view)
    }
}

/// Borrowed view of the state used to build panel props.
pub(crate) struct PanelState<'a> {
    pub params: &'a PathParams,
    pub listing: Option<&'a Listing>,
    pub updated_tab: Option<Step>,
    pub update_in_progress: bool,
    pub fetch_in_progress: bool,
    pub fetch_exceptions_in_progress: bool,
    pub new_listing_published: bool,
    pub errors: &'a ErrorBag,
    pub images: &'a [ListingImage],
    pub availability_exceptions: &'a [AvailabilityException],
    pub process_alias: Option<&'a str>,
}

fn next_step_of(actions: &[NavigationAction]) -> Option<Step> {
    actions.iter().rev().find_map(|action| match action {
        NavigationAction::Push(target) => target.path_params.step(),
        _ => None,
    })
}
