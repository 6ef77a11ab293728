use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::domain::{Points, ReceiptId, ReceiptSubmission};
use super::scoring::ScoringEngine;
use super::store::{AwardOutcome, ReceiptRecord, ReceiptStore, StoreError};
use super::validation::{ReceiptValidator, ValidationError};

/// Caller-facing classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    InternalServer,
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReceiptServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReceiptServiceError::Validation(ValidationError::Invalid { .. }) => {
                ErrorKind::BadRequest
            }
            ReceiptServiceError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ReceiptServiceError::Validation(ValidationError::Inconsistent(_))
            | ReceiptServiceError::Store(
                StoreError::InvalidIdentifier(_) | StoreError::Conflict(_) | StoreError::Poisoned,
            ) => ErrorKind::InternalServer,
        }
    }
}

/// Service composing the validator, scoring engine, and receipt store.
pub struct ReceiptService<S> {
    validator: ReceiptValidator,
    engine: ScoringEngine,
    store: Arc<S>,
}

impl<S> ReceiptService<S>
where
    S: ReceiptStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            validator: ReceiptValidator::new(),
            engine: ScoringEngine::new(),
            store,
        }
    }

    /// Validate and store a receipt, returning its freshly issued identifier.
    pub fn submit(&self, submission: ReceiptSubmission) -> Result<ReceiptId, ReceiptServiceError> {
        let receipt = match self.validator.validate(submission) {
            Ok(receipt) => receipt,
            Err(err) => {
                match &err {
                    ValidationError::Invalid { fields } => {
                        warn!(?fields, "rejected invalid receipt");
                    }
                    ValidationError::Inconsistent(detail) => {
                        error!(%detail, "receipt validator inconsistency");
                    }
                }
                return Err(err.into());
            }
        };

        let item_count = receipt.items.len();
        let id = self.store.create(receipt).inspect_err(|err| {
            error!(error = %err, "failed to store receipt");
        })?;

        info!(%id, item_count, "receipt processed");
        Ok(id)
    }

    /// Award the receipt's points once; later calls for the same id yield zero.
    pub fn award(&self, id: &ReceiptId) -> Result<Points, ReceiptServiceError> {
        let outcome = self.store.award_once(id, &self.engine).inspect_err(|err| match err {
            StoreError::NotFound(_) => debug!(%id, "award requested for unknown receipt"),
            other => error!(%id, error = %other, "failed to award receipt"),
        })?;

        match outcome {
            AwardOutcome::Awarded(points) => info!(%id, points, "receipt awarded"),
            AwardOutcome::AlreadyAwarded => debug!(%id, "receipt already awarded"),
        }
        Ok(outcome.points())
    }

    /// Fetch a snapshot of a stored receipt.
    pub fn get(&self, id: &ReceiptId) -> Result<ReceiptRecord, ReceiptServiceError> {
        Ok(self.store.get(id)?)
    }
}
