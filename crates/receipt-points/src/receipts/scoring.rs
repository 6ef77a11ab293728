use chrono::{Datelike, NaiveTime, Timelike};
use serde::Serialize;

use super::domain::{Amount, Points, Receipt};

const ODD_DAY_POINTS: Points = 6;
const AFTERNOON_POINTS: Points = 10;
const ROUND_DOLLAR_POINTS: Points = 50;
const QUARTER_MULTIPLE_POINTS: Points = 25;
const ITEM_PAIR_POINTS: Points = 5;
/// Description bonus is `ceil(price * 0.2)`, i.e. one point per started 500 cents.
const DESCRIPTION_BONUS_CENTS_PER_POINT: u64 = 500;

/// Rule that contributed to a receipt's point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum ScoreRule {
    RetailerName,
    OddPurchaseDay,
    AfternoonPurchase,
    RoundDollarTotal,
    QuarterMultipleTotal,
    ItemPairs,
    ItemDescription { index: usize },
}

impl ScoreRule {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreRule::RetailerName => "Retailer name",
            ScoreRule::OddPurchaseDay => "Odd purchase day",
            ScoreRule::AfternoonPurchase => "Afternoon purchase",
            ScoreRule::RoundDollarTotal => "Round dollar total",
            ScoreRule::QuarterMultipleTotal => "Quarter multiple total",
            ScoreRule::ItemPairs => "Item pairs",
            ScoreRule::ItemDescription { .. } => "Item description",
        }
    }
}

/// Discrete contribution to a receipt score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    #[serde(flatten)]
    pub rule: ScoreRule,
    pub points: Points,
    pub notes: String,
}

/// Score output describing the total and the rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub total: Points,
    pub components: Vec<ScoreComponent>,
}

/// Stateless engine applying the points rubric to validated receipts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Point total without the per-rule notes; used on the award path.
    pub fn score(&self, receipt: &Receipt) -> Points {
        let description_points = receipt
            .items
            .iter()
            .filter_map(|item| description_points(&item.short_description, item.price))
            .fold(0, |sum: Points, points| sum.saturating_add(points));

        [
            retailer_points(&receipt.retailer),
            odd_day_points(receipt.purchase_date.day()),
            afternoon_points(receipt.purchase_time),
            total_bonus(receipt.total).map_or(0, |(_, points)| points),
            pair_points(receipt.items.len()),
            description_points,
        ]
        .into_iter()
        .fold(0, |sum: Points, points| sum.saturating_add(points))
    }

    pub fn breakdown(&self, receipt: &Receipt) -> ScoreBreakdown {
        let mut components = Vec::new();

        let alphanumeric = retailer_points(&receipt.retailer);
        if alphanumeric > 0 {
            components.push(ScoreComponent {
                rule: ScoreRule::RetailerName,
                points: alphanumeric,
                notes: format!("{alphanumeric} alphanumeric characters in '{}'", receipt.retailer),
            });
        }

        let day = receipt.purchase_date.day();
        if odd_day_points(day) > 0 {
            components.push(ScoreComponent {
                rule: ScoreRule::OddPurchaseDay,
                points: ODD_DAY_POINTS,
                notes: format!("purchased on day {day}"),
            });
        }

        if afternoon_points(receipt.purchase_time) > 0 {
            components.push(ScoreComponent {
                rule: ScoreRule::AfternoonPurchase,
                points: AFTERNOON_POINTS,
                notes: format!(
                    "purchased at {} between 14:00 and 16:00",
                    receipt.purchase_time.format("%H:%M")
                ),
            });
        }

        if let Some((rule, points)) = total_bonus(receipt.total) {
            let notes = match rule {
                ScoreRule::RoundDollarTotal => format!("total {} has no cents", receipt.total),
                _ => format!("total {} is a multiple of 0.25", receipt.total),
            };
            components.push(ScoreComponent { rule, points, notes });
        }

        let pairs = pair_points(receipt.items.len());
        if pairs > 0 {
            components.push(ScoreComponent {
                rule: ScoreRule::ItemPairs,
                points: pairs,
                notes: format!(
                    "{} pairs across {} items",
                    receipt.items.len() / 2,
                    receipt.items.len()
                ),
            });
        }

        for (index, item) in receipt.items.iter().enumerate() {
            let Some(points) = description_points(&item.short_description, item.price) else {
                continue;
            };
            let trimmed = item.short_description.trim();
            components.push(ScoreComponent {
                rule: ScoreRule::ItemDescription { index },
                points,
                notes: format!(
                    "'{trimmed}' trims to {} characters, price {} earns {points}",
                    trimmed.chars().count(),
                    item.price
                ),
            });
        }

        let total = components
            .iter()
            .fold(0, |sum: Points, component| sum.saturating_add(component.points));

        ScoreBreakdown { total, components }
    }
}

fn retailer_points(retailer: &str) -> Points {
    retailer.chars().filter(char::is_ascii_alphanumeric).count() as Points
}

fn odd_day_points(day: u32) -> Points {
    if day % 2 == 1 {
        ODD_DAY_POINTS
    } else {
        0
    }
}

fn afternoon_points(time: NaiveTime) -> Points {
    if in_afternoon_window(time) {
        AFTERNOON_POINTS
    } else {
        0
    }
}

/// Round-dollar and quarter-multiple bonuses never stack.
fn total_bonus(total: Amount) -> Option<(ScoreRule, Points)> {
    match total.fractional_cents() {
        0 => Some((ScoreRule::RoundDollarTotal, ROUND_DOLLAR_POINTS)),
        25 | 50 | 75 => Some((ScoreRule::QuarterMultipleTotal, QUARTER_MULTIPLE_POINTS)),
        _ => None,
    }
}

fn pair_points(item_count: usize) -> Points {
    ((item_count / 2) as Points).saturating_mul(ITEM_PAIR_POINTS)
}

fn description_points(description: &str, price: Amount) -> Option<Points> {
    if description.trim().chars().count() % 3 != 0 {
        return None;
    }
    Some(price.cents().div_ceil(DESCRIPTION_BONUS_CENTS_PER_POINT))
}

/// Strictly after 14:00 and strictly before 16:00.
fn in_afternoon_window(time: NaiveTime) -> bool {
    let seconds = time.num_seconds_from_midnight();
    seconds > 14 * 3600 && seconds < 16 * 3600
}
