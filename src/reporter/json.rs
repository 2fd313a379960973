//! JSON reporter for machine-readable output

use crate::bulk::{BulkReport, BulkRow, LabelCounts};
use crate::{CategoryBreakdown, Rating, Review, ScoringResult};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single scored review
    pub fn report(&self, review: &Review, result: &ScoringResult) -> String {
        let output = JsonReview {
            review: &review.text,
            rating: review.rating,
            result,
            breakdown: result.breakdown(),
        };
        self.render(&output, "{}")
    }

    /// Report a bulk run with summary
    pub fn report_bulk(&self, report: &BulkReport) -> String {
        let output = JsonBulk {
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows: &report.rows,
            summary: JsonSummary {
                reviews: report.rows.len(),
                average_score: report.average_score(),
                labels: report.label_counts(),
            },
        };
        self.render(&output, "{}")
    }

    /// Report an ML prediction
    pub fn report_prediction(&self, text: &str, label: &str, fingerprint: Option<&str>) -> String {
        let output = JsonPrediction {
            review: text,
            prediction: label,
            model_fingerprint: fingerprint,
        };
        self.render(&output, "{}")
    }

    fn render<T: Serialize>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReview<'a> {
    review: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
    #[serde(flatten)]
    result: &'a ScoringResult,
    breakdown: CategoryBreakdown,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBulk<'a> {
    generated_at: String,
    rows: &'a [BulkRow],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    reviews: usize,
    average_score: u8,
    labels: LabelCounts,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPrediction<'a> {
    review: &'a str,
    prediction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_fingerprint: Option<&'a str>,
}
