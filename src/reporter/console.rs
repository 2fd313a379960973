//! Console reporter with colored output

use crate::bulk::BulkReport;
use crate::{Label, Review, ScoringResult};
use colored::{ColoredString, Colorize};

/// Widest review excerpt shown in bulk tables
const EXCERPT_WIDTH: usize = 48;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single scored review
    pub fn report(&self, review: &Review, result: &ScoringResult) {
        self.print_header(review);
        self.print_verdict(result);
        self.print_score(result);

        if !result.reasons.is_empty() {
            self.print_reasons(result);
        }

        if self.verbose || result.breakdown().any() {
            self.print_breakdown(result);
        }
        println!();
    }

    /// Report in quiet mode (just score and label)
    pub fn report_quiet(&self, result: &ScoringResult) {
        println!("{}% {}", result.score, self.colorize_label(result.label, 0));
    }

    /// Report a bulk run: one line per review, then the label distribution
    pub fn report_bulk(&self, report: &BulkReport) {
        println!();
        println!("{}", format!("📂 Bulk Review Analysis: {} reviews", report.rows.len()).bold());
        println!();

        for (i, row) in report.rows.iter().enumerate() {
            println!(
                "   {:>4} {:>3}% {} {}",
                format!("#{}", i + 1).dimmed(),
                row.result.score,
                self.colorize_label(row.result.label, 10),
                excerpt(&row.review, EXCERPT_WIDTH)
            );
            if self.verbose && !row.result.reasons.is_empty() {
                println!("              {} {}", "↳".dimmed(), row.reasons_cell().dimmed());
            }
        }

        self.print_distribution(report);
    }

    /// Report an ML prediction
    pub fn report_prediction(&self, label: &str, fingerprint: Option<&str>) {
        println!(
            "{}: {}",
            self.paint("Prediction", |s| s.bold()),
            self.paint(label, |s| s.bold())
        );
        if let Some(fingerprint) = fingerprint {
            println!("   Model: sha256:{}", self.paint(fingerprint, |s| s.dimmed()));
        }
    }

    fn print_header(&self, review: &Review) {
        println!();
        println!("{}", "🕵 Review Analysis".bold());
        let rating = review
            .rating
            .map(|r| format!("{}/5", r))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "   Rating: {} | Length: {} characters",
            rating,
            review.text.chars().count()
        );
        if self.verbose {
            println!("   Text: {}", excerpt(&review.text, EXCERPT_WIDTH * 2).dimmed());
        }
        println!();
    }

    fn print_verdict(&self, result: &ScoringResult) {
        let verdict = match result.label {
            Label::Fake => "🚩 This review is likely FAKE",
            Label::Suspicious => "⚠ This review is Suspicious",
            Label::Genuine => "✅ This review looks Genuine",
        };
        let verdict = match result.label {
            Label::Fake => self.paint(verdict, |s| s.red().bold()),
            Label::Suspicious => self.paint(verdict, |s| s.yellow()),
            Label::Genuine => self.paint(verdict, |s| s.green()),
        };
        println!("   {}", verdict);
    }

    fn print_score(&self, result: &ScoringResult) {
        let bar = self.create_score_bar(result.score);
        let delta = format!("(-{}%)", result.penalty);
        println!(
            "   Genuineness Score: {} {}",
            bar,
            delta.dimmed()
        );
        println!("   Flags: {}", result.flag_count);
        println!();
    }

    fn print_reasons(&self, result: &ScoringResult) {
        println!("   {}", "Reasons:".bold());
        for (reason, rule) in result.reasons.iter().zip(&result.flags) {
            if self.verbose {
                println!("   📌 {} {}", reason, format!("[{}]", rule).dimmed());
            } else {
                println!("   📌 {}", reason);
            }
        }
        println!();
    }

    fn print_breakdown(&self, result: &ScoringResult) {
        println!("   {}", "Breakdown:".bold());
        for (name, hit) in result.breakdown().entries() {
            let mark = if hit { "■".red() } else { "□".dimmed() };
            println!("   {} {}", mark, name);
        }
    }

    fn print_distribution(&self, report: &BulkReport) {
        let counts = report.label_counts();
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Review Classification Breakdown".bold());
        println!("{}", "═".repeat(60));
        for label in [Label::Genuine, Label::Suspicious, Label::Fake] {
            let pct = counts.percent(label);
            println!(
                "   {} {:>4} {} {:>3.0}%",
                self.colorize_label(label, 10),
                counts.get(label),
                self.create_mini_bar(pct),
                pct
            );
        }
        println!("   Average score: {}%", report.average_score().to_string().bold());
        println!();
    }

    /// Label padded to `width` columns, then colored
    fn colorize_label(&self, label: Label, width: usize) -> String {
        let s = format!("{:<width$}", label.to_string(), width = width);
        match label {
            Label::Genuine => self.paint(&s, |s| s.green()),
            Label::Suspicious => self.paint(&s, |s| s.yellow()),
            Label::Fake => self.paint(&s, |s| s.red().bold()),
        }
    }

    /// Apply a style only when colors are enabled
    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let bar = score_bar(score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, percent: f64) -> String {
        let filled = ((percent / 10.0).round() as usize).min(10);
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress-style bar for a 0-100 score
pub fn score_bar(score: u8) -> String {
    let score = score.min(100);
    let filled = (score as usize * 20) / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(20 - filled),
        score
    )
}

/// First `width` characters of a single-line version of `text`
pub fn excerpt(text: &str, width: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
