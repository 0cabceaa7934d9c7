use listflow_core::error::{CoreError, GatewayError};
use serde::Serialize;

/// An operation the wizard performs through a collaborator.
///
/// Errors are keyed by operation rather than by step: several steps report
/// the same update failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardOperation {
    CreateDraft,
    Update,
    Publish,
    UploadImage,
    FetchListing,
    FetchExceptions,
}

impl WizardOperation {
    /// Key under which renderers look the error up.
    pub fn bag_key(&self) -> &'static str {
        match self {
            Self::CreateDraft => "createListingDraftError",
            Self::Update => "updateListingError",
            Self::Publish => "publishListingError",
            Self::UploadImage => "uploadImageError",
            Self::FetchListing => "showListingsError",
            Self::FetchExceptions => "fetchExceptionsError",
        }
    }

    fn into_error(self, err: GatewayError) -> WizardError {
        match self {
            Self::CreateDraft => WizardError::CreateDraftFailed(err),
            Self::Update => WizardError::UpdateFailed(err),
            Self::Publish => WizardError::PublishFailed(err),
            Self::UploadImage => WizardError::UploadImageFailed(err),
            Self::FetchListing => WizardError::FetchListingFailed(err),
            Self::FetchExceptions => WizardError::FetchExceptionsFailed(err),
        }
    }
}

/// Controller-level error type.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Creating the listing draft failed: {0}")]
    CreateDraftFailed(GatewayError),

    #[error("Updating the listing failed: {0}")]
    UpdateFailed(GatewayError),

    #[error("Publishing the listing failed: {0}")]
    PublishFailed(GatewayError),

    #[error("Uploading the image failed: {0}")]
    UploadImageFailed(GatewayError),

    #[error("Fetching the listing failed: {0}")]
    FetchListingFailed(GatewayError),

    #[error("Fetching availability exceptions failed: {0}")]
    FetchExceptionsFailed(GatewayError),

    #[error("Changing availability exceptions failed: {0}")]
    AvailabilityExceptionFailed(GatewayError),

    /// A create, update or publish call for this listing is still in flight.
    #[error("Another save is already in progress")]
    Busy,

    #[error("No listing id is known for this page")]
    MissingListingId,

    /// The save succeeded but the next URL could not be built.
    #[error("Navigating after the save failed: {0}")]
    NavigationFailed(CoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl WizardError {
    pub(crate) fn from_gateway(op: WizardOperation, err: GatewayError) -> Self {
        op.into_error(err)
    }

    /// The operation whose error-bag entry this error fills, if any.
    pub fn operation(&self) -> Option<WizardOperation> {
        match self {
            Self::CreateDraftFailed(_) => Some(WizardOperation::CreateDraft),
            Self::UpdateFailed(_) => Some(WizardOperation::Update),
            Self::PublishFailed(_) => Some(WizardOperation::Publish),
            Self::UploadImageFailed(_) => Some(WizardOperation::UploadImage),
            Self::FetchListingFailed(_) => Some(WizardOperation::FetchListing),
            Self::FetchExceptionsFailed(_) => Some(WizardOperation::FetchExceptions),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error bag
// ---------------------------------------------------------------------------

/// Latest failure of each operation, as shown by the step renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBag {
    pub create_listing_draft_error: Option<GatewayError>,
    pub update_listing_error: Option<GatewayError>,
    pub publish_listing_error: Option<GatewayError>,
    pub upload_image_error: Option<GatewayError>,
    pub show_listings_error: Option<GatewayError>,
    pub fetch_exceptions_error: Option<GatewayError>,
    /// Set when a saved step could not move on to its next URL.
    pub navigation_error: Option<String>,
}

impl ErrorBag {
    fn slot(&mut self, op: WizardOperation) -> &mut Option<GatewayError> {
        match op {
            WizardOperation::CreateDraft => &mut self.create_listing_draft_error,
            WizardOperation::Update => &mut self.update_listing_error,
            WizardOperation::Publish => &mut self.publish_listing_error,
            WizardOperation::UploadImage => &mut self.upload_image_error,
            WizardOperation::FetchListing => &mut self.show_listings_error,
            WizardOperation::FetchExceptions => &mut self.fetch_exceptions_error,
        }
    }

    pub fn get(&self, op: WizardOperation) -> Option<&GatewayError> {
        match op {
            WizardOperation::CreateDraft => self.create_listing_draft_error.as_ref(),
            WizardOperation::Update => self.update_listing_error.as_ref(),
            WizardOperation::Publish => self.publish_listing_error.as_ref(),
            WizardOperation::UploadImage => self.upload_image_error.as_ref(),
            WizardOperation::FetchListing => self.show_listings_error.as_ref(),
            WizardOperation::FetchExceptions => self.fetch_exceptions_error.as_ref(),
        }
    }

    pub fn set(&mut self, op: WizardOperation, err: GatewayError) {
        *self.slot(op) = Some(err);
    }

    pub fn clear(&mut self, op: WizardOperation) {
        *self.slot(op) = None;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
