use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use super::domain::{Amount, Item, ItemSubmission, Receipt, ReceiptSubmission};

static RETAILER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?-u:[\w\s\-&])+$").expect("invalid retailer pattern"));
static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?-u:[\w\s\-])+$").expect("invalid description pattern"));
static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]{2})$").expect("invalid amount pattern"));
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("invalid date pattern"));
static TIME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("invalid time pattern"));

/// Validation errors raised while turning a submission into a [`Receipt`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("receipt is invalid: {}", fields.join(", "))]
    Invalid { fields: Vec<String> },
    #[error("validator produced an inconsistent result: {0}")]
    Inconsistent(String),
}

impl ValidationError {
    /// Wire names of the rejected fields; empty for internal inconsistencies.
    pub fn fields(&self) -> &[String] {
        match self {
            ValidationError::Invalid { fields } => fields,
            ValidationError::Inconsistent(_) => &[],
        }
    }
}

pub fn is_valid_retailer(raw: &str) -> bool {
    RETAILER_PATTERN.is_match(raw)
}

pub fn is_valid_description(raw: &str) -> bool {
    DESCRIPTION_PATTERN.is_match(raw)
}

/// Parses a `D.CC` decimal string. Values too large to hold in cents are rejected.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let captures = AMOUNT_PATTERN.captures(raw)?;
    let whole: u64 = captures[1].parse().ok()?;
    let fraction: u64 = captures[2].parse().ok()?;
    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .map(Amount::from_cents)
}

/// Parses a zero-padded `YYYY-MM-DD` calendar date.
pub fn parse_purchase_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parses a zero-padded 24-hour `HH:MM` time.
pub fn parse_purchase_time(raw: &str) -> Option<NaiveTime> {
    if !TIME_SHAPE.is_match(raw) {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Stateless guard producing validated receipts from raw submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptValidator;

impl ReceiptValidator {
    pub fn new() -> Self {
        Self
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(&self, submission: ReceiptSubmission) -> Result<Receipt, ValidationError> {
        let ReceiptSubmission {
            retailer,
            purchase_date,
            purchase_time,
            total,
            items,
        } = submission;

        let mut invalid = Vec::new();

        let retailer = if is_valid_retailer(&retailer) {
            Some(retailer)
        } else {
            invalid.push("retailer".to_string());
            None
        };

        let purchase_date = parse_purchase_date(&purchase_date);
        if purchase_date.is_none() {
            invalid.push("purchaseDate".to_string());
        }

        let purchase_time = parse_purchase_time(&purchase_time);
        if purchase_time.is_none() {
            invalid.push("purchaseTime".to_string());
        }

        let total = parse_amount(&total);
        if total.is_none() {
            invalid.push("total".to_string());
        }

        if items.is_empty() {
            invalid.push("items".to_string());
        }

        let expected_items = items.len();
        let validated_items: Vec<Item> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| validate_item(index, item, &mut invalid))
            .collect();

        if !invalid.is_empty() {
            return Err(ValidationError::Invalid { fields: invalid });
        }

        if validated_items.len() != expected_items {
            return Err(ValidationError::Inconsistent(format!(
                "{} of {} items validated without a reported failure",
                validated_items.len(),
                expected_items
            )));
        }

        match (retailer, purchase_date, purchase_time, total) {
            (Some(retailer), Some(purchase_date), Some(purchase_time), Some(total)) => Ok(Receipt {
                retailer,
                purchase_date,
                purchase_time,
                total,
                items: validated_items,
            }),
            _ => Err(ValidationError::Inconsistent(
                "a receipt field was rejected without a reported failure".to_string(),
            )),
        }
    }
}

fn validate_item(index: usize, item: ItemSubmission, invalid: &mut Vec<String>) -> Option<Item> {
    let description_valid = is_valid_description(&item.short_description);
    if !description_valid {
        invalid.push(format!("items[{index}].shortDescription"));
    }

    let price = parse_amount(&item.price);
    if price.is_none() {
        invalid.push(format!("items[{index}].price"));
    }

    match (description_valid, price) {
        (true, Some(price)) => Some(Item {
            short_description: item.short_description,
            price,
        }),
        _ => None,
    }
}
