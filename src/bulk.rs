//! Bulk scoring of reviews from CSV
//!
//! Input must have a header row with a `review` column; a `rating` column is
//! used when present. Output has one row per input row, in input order.

use crate::scorer::ReviewScorer;
use crate::{Label, Rating, Review, ScoringResult};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{Read, Write};
use thiserror::Error;

pub const REVIEW_COLUMN: &str = "review";
pub const RATING_COLUMN: &str = "rating";

/// Header of the exported CSV
pub const OUTPUT_HEADER: [&str; 4] = ["Review", "Score (%)", "Label", "Reasons"];

/// Errors from bulk processing
#[derive(Debug, Error)]
pub enum BulkError {
    #[error("CSV must contain a '{column}' column (found: {})", found.join(", "))]
    MissingColumn { column: String, found: Vec<String> },
    #[error("CSV row {line} has {found} fields but the header has {expected} (quote reviews that contain commas)")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One scored input row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRow {
    pub review: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(flatten)]
    pub result: ScoringResult,
}

impl BulkRow {
    /// Reasons as a single comma-separated cell
    pub fn reasons_cell(&self) -> String {
        self.result.reasons.join(", ")
    }
}

/// Count of rows per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCounts {
    pub genuine: usize,
    pub suspicious: usize,
    pub fake: usize,
}

impl LabelCounts {
    pub fn total(&self) -> usize {
        self.genuine + self.suspicious + self.fake
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Genuine => self.genuine,
            Label::Suspicious => self.suspicious,
            Label::Fake => self.fake,
        }
    }

    /// Percentage of rows with `label` (0 when empty)
    pub fn percent(&self, label: Label) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(label) as f64 * 100.0 / total as f64
        }
    }
}

/// Result of a bulk run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub rows: Vec<BulkRow>,
}

impl BulkReport {
    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for row in &self.rows {
            match row.result.label {
                Label::Genuine => counts.genuine += 1,
                Label::Suspicious => counts.suspicious += 1,
                Label::Fake => counts.fake += 1,
            }
        }
        counts
    }

    /// Mean score over all rows (0 when empty)
    pub fn average_score(&self) -> u8 {
        if self.rows.is_empty() {
            return 0;
        }
        let sum: usize = self.rows.iter().map(|r| r.result.score as usize).sum();
        (sum / self.rows.len()) as u8
    }
}

/// Read reviews from CSV. Fails before reading any row when the review column is
/// absent, and on any row with more fields than the header.
pub fn read_reviews<R: Read>(reader: R) -> Result<Vec<Review>, BulkError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    // Tolerate a UTF-8 BOM on the first header (spreadsheet exports)
    let names: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let review_idx = names
        .iter()
        .position(|h| h == REVIEW_COLUMN)
        .ok_or_else(|| BulkError::MissingColumn {
            column: REVIEW_COLUMN.to_string(),
            found: names.clone(),
        })?;
    let rating_idx = names.iter().position(|h| h == RATING_COLUMN);

    let mut reviews = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Short rows are padded with blanks; extra fields mean a split review
        if record.len() > names.len() {
            return Err(BulkError::RaggedRow {
                line: record.position().map_or(line as u64 + 2, |p| p.line()),
                expected: names.len(),
                found: record.len(),
            });
        }
        let text = record.get(review_idx).unwrap_or_default();
        let mut review = Review::new(text);
        if let Some(cell) = rating_idx.and_then(|idx| record.get(idx)) {
            if !cell.trim().is_empty() {
                match cell.parse::<Rating>() {
                    Ok(rating) => review.rating = Some(rating),
                    Err(e) => tracing::warn!(row = line + 1, error = %e, "ignoring rating"),
                }
            }
        }
        reviews.push(review);
    }
    Ok(reviews)
}

/// Score every review in parallel, keeping input order
pub fn score_all(reviews: Vec<Review>, scorer: &ReviewScorer) -> BulkReport {
    let rows = reviews
        .into_par_iter()
        .map(|review| {
            let result = scorer.score_review(&review);
            BulkRow {
                review: review.text,
                rating: review.rating,
                result,
            }
        })
        .collect();
    BulkReport { rows }
}

/// Read and score a CSV input
pub fn process<R: Read>(reader: R, scorer: &ReviewScorer) -> Result<BulkReport, BulkError> {
    let reviews = read_reviews(reader)?;
    tracing::info!(rows = reviews.len(), "scoring reviews");
    Ok(score_all(reviews, scorer))
}

/// Write the report as CSV: Review, Score (%), Label, Reasons
pub fn write_csv<W: Write>(report: &BulkReport, writer: W) -> Result<(), BulkError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(OUTPUT_HEADER)?;
    for row in &report.rows {
        let score = row.result.score.to_string();
        let label = row.result.label.to_string();
        let reasons = row.reasons_cell();
        csv_writer.write_record([
            row.review.as_str(),
            score.as_str(),
            label.as_str(),
            reasons.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
id,review,rating
1,\"Solid kettle, boils fast and the handle stays cool.\",4
2,good good good good,
3,THIS IS THE BEST AMAZING KETTLE EVER,1
4,\"Decent, but the lid is a bit stiff at first.\",x
";

    fn process_str(input: &str) -> Result<BulkReport, BulkError> {
        process(input.as_bytes(), &ReviewScorer::new())
    }

    #[test]
    fn one_row_per_input_row_in_order() {
        let report = process_str(INPUT).unwrap();
        assert_eq!(report.rows.len(), 4);
        assert!(report.rows[0].review.starts_with("Solid kettle"));
        assert_eq!(report.rows[1].review, "good good good good");
        assert!(report.rows[3].review.starts_with("Decent"));
    }

    #[test]
    fn labels_follow_flag_count() {
        let report = process_str(INPUT).unwrap();
        for row in &report.rows {
            assert_eq!(row.result.label, Label::from_flag_count(row.result.flag_count));
        }
        assert_eq!(report.rows[0].result.label, Label::Genuine);
        // repetition + length
        assert_eq!(report.rows[1].result.flag_count, 2);
        assert_eq!(report.rows[1].result.label, Label::Suspicious);
        assert_eq!(report.rows[2].result.label, Label::Fake);
    }

    #[test]
    fn ratings_are_optional_and_validated() {
        let report = process_str(INPUT).unwrap();
        assert_eq!(report.rows[0].rating.map(Rating::value), Some(4));
        assert_eq!(report.rows[1].rating, None);
        assert_eq!(report.rows[3].rating, None);
    }

    #[test]
    fn missing_review_column_produces_no_rows() {
        let err = process_str("id,text\n1,hello there friend\n").unwrap_err();
        match err {
            BulkError::MissingColumn { column, found } => {
                assert_eq!(column, "review");
                assert_eq!(found, vec!["id", "text"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn column_name_is_case_sensitive() {
        assert!(matches!(
            process_str("Review\nhello\n"),
            Err(BulkError::MissingColumn { .. })
        ));
    }

    #[test]
    fn bom_and_short_rows_are_tolerated() {
        let report = process_str("\u{feff}review,rating\nfine product overall honestly\n").unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].rating, None);

        let report = process_str("id,review\n7\n").unwrap();
        assert_eq!(report.rows[0].review, "");
        assert_eq!(report.rows[0].result.reasons, vec!["Suspicious length: 0 characters"]);
    }

    #[test]
    fn unquoted_comma_in_review_is_rejected() {
        let err = process_str("id,review\n1,Nice kettle, boils fast\n").unwrap_err();
        match err {
            BulkError::RaggedRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn quoted_comma_in_review_is_kept() {
        let report = process_str("review\n\"Nice kettle, boils fast\"\n").unwrap();
        assert_eq!(report.rows[0].review, "Nice kettle, boils fast");
    }

    #[test]
    fn header_only_gives_empty_report() {
        let report = process_str("review\n").unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.average_score(), 0);
        assert_eq!(report.label_counts().total(), 0);
    }

    #[test]
    fn csv_output_layout() {
        let report = process_str("review\ngood good good good\n").unwrap();
        let mut out = Vec::new();
        write_csv(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Review,Score (%),Label,Reasons"));
        assert_eq!(
            lines.next(),
            Some("good good good good,60,Suspicious,\"Repeated words: good, Suspicious length: 19 characters\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn label_counts_and_percentages() {
        let report = process_str(INPUT).unwrap();
        let counts = report.label_counts();
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.genuine, 2);
        assert_eq!(counts.suspicious, 1);
        assert_eq!(counts.fake, 1);
        assert_eq!(counts.percent(Label::Fake), 25.0);
    }
}
