use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Categories the selector always offers, in display order.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Food", "Transportation", "Entertainment", "Other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub date_added: String,
    #[serde(default)]
    pub predicted_category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Expense {
    /// The stored prediction, when it disagrees with the chosen category.
    pub fn mismatched_prediction(&self) -> Option<&str> {
        self.predicted_category
            .as_deref()
            .filter(|predicted| !predicted.is_empty() && *predicted != self.category)
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Body of `POST /api/expenses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub notes: String,
}

/// Response of `POST /api/expenses`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedExpense {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub predicted_category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest<'a> {
    pub description: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Low,
}

impl ConfidenceTier {
    pub fn of(confidence: f64, high_threshold: f64) -> Self {
        if confidence > high_threshold {
            ConfidenceTier::High
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high-confidence",
            ConfidenceTier::Low => "low-confidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
}

/// One row of `GET /api/analytics/monthly`. The server emits a row per
/// month and category, so the same month may appear several times.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TotalSpending {
    #[serde(default)]
    pub total: Option<f64>,
}

impl TotalSpending {
    pub fn amount(&self) -> f64 {
        self.total.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub database_connected: bool,
}

/// Everything one analytics refresh produces. Applied as a unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsSnapshot {
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
    pub monthly: Vec<MonthlyTotal>,
}

/// Raw contents of the add-expense form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub notes: String,
}

impl ExpenseForm {
    /// Checks description, amount and category in that order.
    pub fn validate(&self) -> Result<NewExpense, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or(ValidationError::InvalidAmount)?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }

        Ok(NewExpense {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Server labels first, then any default not already present.
pub fn merge_categories(server: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(server.len() + DEFAULT_CATEGORIES.len());
    let candidates = server
        .iter()
        .map(|c| c.trim())
        .chain(DEFAULT_CATEGORIES.iter().copied());
    for category in candidates {
        if !category.is_empty() && !merged.iter().any(|c| c == category) {
            merged.push(category.to_string());
        }
    }
    merged
}
