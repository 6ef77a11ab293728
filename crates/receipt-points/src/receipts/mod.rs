//! Receipt intake, validation, scoring, and the one-time award store.
//!
//! Submissions are validated into [`Receipt`] values, stored under a freshly
//! generated [`ReceiptId`], and later converted into points exactly once.

pub mod domain;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Amount, Item, ItemSubmission, Points, Receipt, ReceiptId, ReceiptSubmission};
pub use router::{receipt_router, AwardPointsResponse, ProcessReceiptResponse};
pub use scoring::{ScoreBreakdown, ScoreComponent, ScoreRule, ScoringEngine};
pub use service::{ErrorKind, ReceiptService, ReceiptServiceError};
pub use store::{
    AwardOutcome, IdGenerator, InMemoryReceiptStore, ReceiptRecord, ReceiptStore,
    SequentialIdGenerator, StoreError, UuidIdGenerator,
};
pub use validation::{ReceiptValidator, ValidationError};
