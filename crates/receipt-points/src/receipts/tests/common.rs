use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::receipts::domain::{
    Amount, Item, ItemSubmission, Receipt, ReceiptId, ReceiptSubmission,
};
use crate::receipts::scoring::ScoringEngine;
use crate::receipts::store::{
    AwardOutcome, IdGenerator, InMemoryReceiptStore, ReceiptRecord, ReceiptStore,
    SequentialIdGenerator, StoreError,
};
use crate::receipts::{receipt_router, ReceiptService};

pub(super) fn item(short_description: &str, price: &str) -> ItemSubmission {
    ItemSubmission {
        short_description: short_description.to_string(),
        price: price.to_string(),
    }
}

/// Target sample receipt worth 28 points.
pub(super) fn target_submission() -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        total: "35.35".to_string(),
        items: vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
    }
}

/// Corner market sample receipt worth 84 points with exclusive total bonuses.
pub(super) fn corner_market_submission() -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: "M&M Corner Market".to_string(),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "14:33".to_string(),
        total: "9.00".to_string(),
        items: vec![
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
        ],
    }
}

/// Single item receipt worth 52 points.
pub(super) fn minimal_submission() -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: "A".to_string(),
        purchase_date: "2022-01-02".to_string(),
        purchase_time: "13:01".to_string(),
        total: "10.00".to_string(),
        items: vec![item("abc", "5.00")],
    }
}

pub(super) fn receipt(retailer: &str, date: (i32, u32, u32), time: (u32, u32), total: u64) -> Receipt {
    Receipt {
        retailer: retailer.to_string(),
        purchase_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
        purchase_time: NaiveTime::from_hms_opt(time.0, time.1, 0).expect("valid time"),
        total: Amount::from_cents(total),
        items: vec![Item {
            short_description: "ab".to_string(),
            price: Amount::from_cents(total),
        }],
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new()
}

pub(super) type MemoryStore = InMemoryReceiptStore<SequentialIdGenerator>;

pub(super) fn build_service() -> (ReceiptService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(InMemoryReceiptStore::new(SequentialIdGenerator::new("test")));
    let service = ReceiptService::new(store.clone());
    (service, store)
}

/// Generator that always hands out the same identifier.
pub(super) struct FixedIdGenerator(pub(super) &'static str);

impl IdGenerator for FixedIdGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Store whose lock is unusable.
#[derive(Default)]
pub(super) struct PoisonedStore;

impl ReceiptStore for PoisonedStore {
    fn create(&self, _receipt: Receipt) -> Result<ReceiptId, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn get(&self, _id: &ReceiptId) -> Result<ReceiptRecord, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn award_once(
        &self,
        _id: &ReceiptId,
        _engine: &ScoringEngine,
    ) -> Result<AwardOutcome, StoreError> {
        Err(StoreError::Poisoned)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn receipt_router_with_service(service: ReceiptService<MemoryStore>) -> axum::Router {
    receipt_router(Arc::new(service))
}
