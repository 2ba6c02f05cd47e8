use std::fmt::Write as _;

use chrono::NaiveDate;
use colored::Colorize;

use crate::{
    asset::{AssetStatus, LibraryAsset},
    book::Book,
    policy::LoanPolicy,
};

/// Rendering of a book's asset inventory for the console
#[derive(Debug)]
pub struct InventoryReport;

impl InventoryReport {
    /// Render the inventory listing of a book.
    ///
    /// Available assets are green, late assets red, everything else yellow.
    #[must_use]
    pub fn render_text<P: LoanPolicy>(book: &Book<P>, today: NaiveDate) -> String {
        let mut report = String::from("\n============== Library Asset Inventory ==================\n\n");
        let _ = writeln!(report, "Book Name: {}", book.name());
        let _ = writeln!(report, "Author(s): {}", book.authors().join(", "));
        let _ = writeln!(report, "ISBN: {}\n", book.isbn());
        report.push_str("Library Assets:\n");

        if book.assets().is_empty() {
            report.push_str("No library assets recorded yet.\n");
            return report;
        }

        for asset in book.assets() {
            let _ = writeln!(report, "{}", Self::format_asset(asset, today));
        }
        report
    }

    /// One inventory line for an asset
    fn format_asset(asset: &LibraryAsset, today: NaiveDate) -> String {
        if asset.status() == AssetStatus::Available {
            return format!("{}: available", asset.id()).green().to_string();
        }

        let borrowed_on = format_date(asset.borrowed_on());
        let due_date = format_date(asset.due_date());
        let loan_days = asset.loan_duration(today).num_days();
        let late_days = asset.late_period(today).num_days();
        if late_days > 0 {
            format!(
                "{}: LATE, borrowed on {borrowed_on} due on {due_date} on loan for {loan_days} day(s), late for {late_days} day(s)",
                asset.id()
            )
            .red()
            .to_string()
        } else {
            format!(
                "{}: {}, borrowed on {borrowed_on} due on {due_date} on loan for {loan_days} days",
                asset.id(),
                asset.status()
            )
            .yellow()
            .to_string()
        }
    }

    /// Render the book, its policy and every asset as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the book cannot be serialized
    pub fn render_json<P: serde::Serialize>(book: &Book<P>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(book)
    }
}

/// Date for display, or a dash when absent
fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |date| date.to_string())
}
