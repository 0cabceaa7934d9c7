//! In-memory collaborators.
//!
//! Used by the demo binary and the integration tests. Every implementation
//! records what it was asked to do and can be scripted to fail.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use listflow_core::error::GatewayError;
use listflow_core::listing::{
    AvailabilityException, ImageUpload, Listing, ListingImage, ListingUpdate, ListingValues,
    NewAvailabilityException,
};
use listflow_core::types::ListingId;
use uuid::Uuid;

use crate::error::WizardOperation;
use crate::gateway::{AvailabilityHandler, HistorySink, ImageHandler, PersistenceGateway, ScrollHook};

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One-shot failures keyed by operation.
#[derive(Debug, Default)]
struct FailureScript {
    pending: HashMap<WizardOperation, VecDeque<GatewayError>>,
}

impl FailureScript {
    fn push(&mut self, op: WizardOperation, err: GatewayError) {
        self.pending.entry(op).or_default().push_back(err);
    }

    fn take(&mut self, op: WizardOperation) -> Result<(), GatewayError> {
        match self.pending.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// A call received by [`InMemoryGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreateDraft(ListingValues),
    Update(ListingUpdate),
    Publish(ListingId),
    FetchListing(ListingId),
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    listings: Mutex<HashMap<ListingId, Listing>>,
    published: Mutex<Vec<ListingId>>,
    calls: Mutex<Vec<GatewayCall>>,
    failures: Mutex<FailureScript>,
    next_ids: Mutex<VecDeque<ListingId>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: WizardOperation, err: GatewayError) {
        lock(&self.failures).push(op, err);
    }

    /// Use `id` for the next created draft instead of a random one.
    pub fn assign_next_id(&self, id: ListingId) {
        lock(&self.next_ids).push_back(id);
    }

    /// Store a listing as if it had been created earlier.
    pub fn insert(&self, listing: Listing) {
        lock(&self.listings).insert(listing.id, listing);
    }

    pub fn listing(&self, id: ListingId) -> Option<Listing> {
        lock(&self.listings).get(&id).cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    pub fn published(&self) -> Vec<ListingId> {
        lock(&self.published).clone()
    }

    fn record(&self, call: GatewayCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn create_draft(&self, values: ListingValues) -> Result<Listing, GatewayError> {
        self.record(GatewayCall::CreateDraft(values.clone()));
        lock(&self.failures).take(WizardOperation::CreateDraft)?;

        let id = lock(&self.next_ids)
            .pop_front()
            .unwrap_or_else(ListingId::new_v4);
        let listing = Listing::new(id, values);
        lock(&self.listings).insert(id, listing.clone());
        tracing::debug!(listing_id = %id, "In-memory draft created");
        Ok(listing)
    }

    async fn update(&self, update: ListingUpdate) -> Result<Listing, GatewayError> {
        self.record(GatewayCall::Update(update.clone()));
        lock(&self.failures).take(WizardOperation::Update)?;

        let mut listings = lock(&self.listings);
        let listing = listings
            .get_mut(&update.id)
            .ok_or_else(|| GatewayError::NotFound(update.id.to_string()))?;
        listing.merge(&update.values);
        Ok(listing.clone())
    }

    async fn publish(&self, id: ListingId) -> Result<(), GatewayError> {
        self.record(GatewayCall::Publish(id));
        lock(&self.failures).take(WizardOperation::Publish)?;

        if !lock(&self.listings).contains_key(&id) {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        let mut published = lock(&self.published);
        if published.contains(&id) {
            return Err(GatewayError::Rejected(format!(
                "Listing {id} is already published"
            )));
        }
        published.push(id);
        Ok(())
    }

    async fn fetch_listing(&self, id: ListingId) -> Result<Listing, GatewayError> {
        self.record(GatewayCall::FetchListing(id));
        lock(&self.failures).take(WizardOperation::FetchListing)?;

        self.listing(id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct HistoryStack {
    entries: Vec<String>,
    index: usize,
}

/// Browser-like history: pushing drops forward entries, replacing
/// overwrites the current one.
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<HistoryStack>,
}

impl MemoryHistory {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(HistoryStack {
                entries: vec![initial_url.into()],
                index: 0,
            }),
        }
    }

    pub fn current(&self) -> String {
        let stack = lock(&self.stack);
        stack.entries[stack.index].clone()
    }

    pub fn entries(&self) -> Vec<String> {
        lock(&self.stack).entries.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.stack).entries.len()
    }

    /// Go back one entry. Returns the new current URL, or `None` at the start.
    pub fn back(&self) -> Option<String> {
        let mut stack = lock(&self.stack);
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        Some(stack.entries[stack.index].clone())
    }

    pub fn forward(&self) -> Option<String> {
        let mut stack = lock(&self.stack);
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        Some(stack.entries[stack.index].clone())
    }
}

impl HistorySink for MemoryHistory {
    fn push(&self, url: &str) {
        let mut stack = lock(&self.stack);
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(url.to_string());
        stack.index = keep;
    }

    fn replace(&self, url: &str) {
        let mut stack = lock(&self.stack);
        let index = stack.index;
        stack.entries[index] = url.to_string();
    }
}

// ---------------------------------------------------------------------------
// Scroll hook
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingScroll {
    calls: Mutex<Vec<bool>>,
}

impl RecordingScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<bool> {
        lock(&self.calls).clone()
    }
}

impl ScrollHook for RecordingScroll {
    fn notify_step_advance(&self, is_last_step: bool) {
        lock(&self.calls).push(is_last_step);
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryImages {
    uploaded: Mutex<Vec<ListingImage>>,
    removed: Mutex<Vec<Uuid>>,
    failures: Mutex<FailureScript>,
}

impl InMemoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_upload(&self, err: GatewayError) {
        lock(&self.failures).push(WizardOperation::UploadImage, err);
    }

    pub fn uploaded(&self) -> Vec<ListingImage> {
        lock(&self.uploaded).clone()
    }

    pub fn removed(&self) -> Vec<Uuid> {
        lock(&self.removed).clone()
    }
}

#[async_trait]
impl ImageHandler for InMemoryImages {
    async fn upload_image(
        &self,
        _listing_id: Option<ListingId>,
        upload: ImageUpload,
    ) -> Result<ListingImage, GatewayError> {
        lock(&self.failures).take(WizardOperation::UploadImage)?;
        if upload.bytes.is_empty() {
            return Err(GatewayError::Rejected(format!(
                "Image '{}' is empty",
                upload.file_name
            )));
        }
        let image = ListingImage {
            id: Uuid::new_v4(),
            file_name: upload.file_name,
        };
        lock(&self.uploaded).push(image.clone());
        Ok(image)
    }

    fn remove_image(&self, image_id: Uuid) {
        lock(&self.removed).push(image_id);
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryAvailability {
    exceptions: Mutex<Vec<AvailabilityException>>,
    failures: Mutex<FailureScript>,
}

impl InMemoryAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_fetch(&self, err: GatewayError) {
        lock(&self.failures).push(WizardOperation::FetchExceptions, err);
    }

    pub fn exceptions(&self) -> Vec<AvailabilityException> {
        lock(&self.exceptions).clone()
    }
}

#[async_trait]
impl AvailabilityHandler for InMemoryAvailability {
    async fn fetch_exceptions(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<AvailabilityException>, GatewayError> {
        lock(&self.failures).take(WizardOperation::FetchExceptions)?;
        Ok(lock(&self.exceptions)
            .iter()
            .filter(|e| e.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn add_exception(
        &self,
        exception: NewAvailabilityException,
    ) -> Result<AvailabilityException, GatewayError> {
        if exception.end <= exception.start {
            return Err(GatewayError::Rejected(
                "Exception must end after it starts".to_string(),
            ));
        }
        let created = AvailabilityException {
            id: Uuid::new_v4(),
            listing_id: exception.listing_id,
            start: exception.start,
            end: exception.end,
            seats: exception.seats,
        };
        lock(&self.exceptions).push(created.clone());
        Ok(created)
    }

    async fn delete_exception(&self, exception_id: Uuid) -> Result<(), GatewayError> {
        let mut exceptions = lock(&self.exceptions);
        let before = exceptions.len();
        exceptions.retain(|e| e.id != exception_id);
        if exceptions.len() == before {
            return Err(GatewayError::NotFound(exception_id.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
