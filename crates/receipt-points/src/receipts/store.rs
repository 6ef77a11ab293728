use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde::Serialize;

use super::domain::{Points, Receipt, ReceiptId};
use super::scoring::ScoringEngine;

/// Source of fresh receipt identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-000001` style identifiers.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("receipt")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{id:06}", self.prefix)
    }
}

/// Store snapshot of a receipt and its award state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptRecord {
    pub id: ReceiptId,
    pub receipt: Receipt,
    pub awarded: bool,
}

/// Result of the one-time award transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Awarded(Points),
    AlreadyAwarded,
}

impl AwardOutcome {
    /// Points handed to the caller; repeat awards pay nothing.
    pub fn points(&self) -> Points {
        match self {
            AwardOutcome::Awarded(points) => *points,
            AwardOutcome::AlreadyAwarded => 0,
        }
    }
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("receipt not found: {0}")]
    NotFound(ReceiptId),
    #[error("generated identifier {0:?} is empty or contains whitespace")]
    InvalidIdentifier(String),
    #[error("generated identifier {0} is already in use")]
    Conflict(ReceiptId),
    #[error("receipt store lock poisoned")]
    Poisoned,
}

/// Storage abstraction so the service can be exercised in isolation.
///
/// Implementations own the authoritative copy of every receipt and only hand
/// out snapshots. `award_once` must check, score, and flag a receipt inside a
/// single exclusive section so concurrent awards pay out at most once.
pub trait ReceiptStore: Send + Sync {
    fn create(&self, receipt: Receipt) -> Result<ReceiptId, StoreError>;
    fn get(&self, id: &ReceiptId) -> Result<ReceiptRecord, StoreError>;
    fn award_once(
        &self,
        id: &ReceiptId,
        engine: &ScoringEngine,
    ) -> Result<AwardOutcome, StoreError>;
}

/// Process-lifetime store keyed by generated identifiers.
#[derive(Debug, Default)]
pub struct InMemoryReceiptStore<G = UuidIdGenerator> {
    records: RwLock<HashMap<ReceiptId, ReceiptRecord>>,
    ids: G,
}

impl<G: IdGenerator> InMemoryReceiptStore<G> {
    pub fn new(ids: G) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ids,
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

impl<G: IdGenerator> ReceiptStore for InMemoryReceiptStore<G> {
    fn create(&self, receipt: Receipt) -> Result<ReceiptId, StoreError> {
        let raw = self.ids.generate();
        if !is_valid_identifier(&raw) {
            return Err(StoreError::InvalidIdentifier(raw));
        }
        let id = ReceiptId(raw);

        let mut guard = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict(id));
        }
        guard.insert(
            id.clone(),
            ReceiptRecord {
                id: id.clone(),
                receipt,
                awarded: false,
            },
        );
        Ok(id)
    }

    fn get(&self, id: &ReceiptId) -> Result<ReceiptRecord, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::Poisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn award_once(
        &self,
        id: &ReceiptId,
        engine: &ScoringEngine,
    ) -> Result<AwardOutcome, StoreError> {
        let mut guard = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let record = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if record.awarded {
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        let points = engine.score(&record.receipt);
        record.awarded = true;
        Ok(AwardOutcome::Awarded(points))
    }
}
