//! Collaborator seams consumed by the wizard controller.
//!
//! The controller never talks to the API, the browser history or the
//! upload service directly; it goes through these traits so the same
//! controller runs against the real client, the in-memory doubles in
//! [`crate::memory`], or a test fake.

use async_trait::async_trait;
use listflow_core::error::GatewayError;
use listflow_core::listing::{
    AvailabilityException, ImageUpload, Listing, ListingImage, ListingUpdate, ListingValues,
    NewAvailabilityException,
};
use listflow_core::types::ListingId;
use uuid::Uuid;

/// Create, update and publish calls against the marketplace API.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Create a draft from the first submitted step. The response carries
    /// the newly assigned id.
    async fn create_draft(&self, values: ListingValues) -> Result<Listing, GatewayError>;

    async fn update(&self, update: ListingUpdate) -> Result<Listing, GatewayError>;

    async fn publish(&self, id: ListingId) -> Result<(), GatewayError>;

    async fn fetch_listing(&self, id: ListingId) -> Result<Listing, GatewayError>;
}

/// Browser history.
pub trait HistorySink: Send + Sync {
    fn push(&self, url: &str);

    fn replace(&self, url: &str);
}

/// Scroll/animation hook fired when the creation flow moves to another tab.
pub trait ScrollHook: Send + Sync {
    fn notify_step_advance(&self, is_last_step: bool);
}

/// Image upload service used by the photos step.
#[async_trait]
pub trait ImageHandler: Send + Sync {
    async fn upload_image(
        &self,
        listing_id: Option<ListingId>,
        upload: ImageUpload,
    ) -> Result<ListingImage, GatewayError>;

    fn remove_image(&self, image_id: Uuid);
}

/// Availability exception store used by the availability step.
#[async_trait]
pub trait AvailabilityHandler: Send + Sync {
    async fn fetch_exceptions(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<AvailabilityException>, GatewayError>;

    async fn add_exception(
        &self,
        exception: NewAvailabilityException,
    ) -> Result<AvailabilityException, GatewayError>;

    async fn delete_exception(&self, exception_id: Uuid) -> Result<(), GatewayError>;
}
