use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Library-issued identifier of a single asset
pub type AssetId = u32;

/// Represents the circulation status of a library asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AssetStatus {
    /// Asset is not yet part of the circulating inventory
    #[default]
    NotAvailable,
    /// Asset is on the shelf and can be borrowed
    Available,
    /// Asset is on loan to a library user
    Loaned,
    /// Asset is claimed for a future loan
    Reserved,
}

impl AssetStatus {
    /// Get a human-readable description of the status
    #[must_use]
    pub fn get_description(self) -> &'static str {
        match self {
            Self::NotAvailable => "not available",
            Self::Available => "available",
            Self::Loaned => "loaned",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get_description())
    }
}

/// A single physical or digital copy of a book, tracked individually
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibraryAsset {
    /// Catalog-wide unique id used when returning the asset
    id: AssetId,
    /// Current circulation status
    status: AssetStatus,
    /// Date the current loan started
    borrowed_on: Option<NaiveDate>,
    /// Date the current loan ended
    returned_on: Option<NaiveDate>,
    /// Date the current loan must end by
    due_date: Option<NaiveDate>,
}

impl LibraryAsset {
    /// Create an asset that is not yet circulating
    #[must_use]
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            status: AssetStatus::NotAvailable,
            borrowed_on: None,
            returned_on: None,
            due_date: None,
        }
    }

    /// The id of the asset
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// The current status of the asset
    #[must_use]
    pub fn status(&self) -> AssetStatus {
        self.status
    }

    /// Change the status. Becoming available clears every loan date.
    pub fn set_status(&mut self, status: AssetStatus) {
        self.status = status;
        if status == AssetStatus::Available {
            self.borrowed_on = None;
            self.returned_on = None;
            self.due_date = None;
        }
    }

    /// Date the asset was borrowed on, if on loan
    #[must_use]
    pub fn borrowed_on(&self) -> Option<NaiveDate> {
        self.borrowed_on
    }

    /// Record the loan start date
    pub fn set_borrowed_on(&mut self, date: Option<NaiveDate>) {
        self.borrowed_on = date;
    }

    /// Date the asset was returned on
    #[must_use]
    pub fn returned_on(&self) -> Option<NaiveDate> {
        self.returned_on
    }

    /// Record the loan end date
    pub fn set_returned_on(&mut self, date: Option<NaiveDate>) {
        self.returned_on = date;
    }

    /// Date the asset must be returned by
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Record the date the loan is due
    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.due_date = date;
    }

    /// Elapsed time between borrowing and the return date, or `today` while still out.
    /// Zero if the asset was never borrowed.
    #[must_use]
    pub fn loan_duration(&self, today: NaiveDate) -> TimeDelta {
        match self.borrowed_on {
            Some(borrowed_on) => {
                self.returned_on.unwrap_or(today).signed_duration_since(borrowed_on)
            }
            None => TimeDelta::zero(),
        }
    }

    /// Time past the due date, measured at the return date or `today` while still out.
    /// Zero when there is no due date or the asset is not late.
    #[must_use]
    pub fn late_period(&self, today: NaiveDate) -> TimeDelta {
        let compared_on = self.returned_on.unwrap_or(today);
        match self.due_date {
            Some(due_date) if compared_on >= due_date => {
                compared_on.signed_duration_since(due_date)
            }
            _ => TimeDelta::zero(),
        }
    }

    /// Whether the asset can be borrowed right away
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AssetStatus::Available
    }
}
