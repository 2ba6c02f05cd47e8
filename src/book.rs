use chrono::{Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    asset::{AssetId, AssetStatus, LibraryAsset},
    error::LibraryError,
    policy::{BookPolicy, LoanPolicy},
};

/// Result of checking whether a book can be borrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Availability {
    /// At least one asset can be borrowed right away
    Available,
    /// Every asset is loaned or reserved
    Unavailable {
        /// Due date of the asset expected back first, if known
        next_due: Option<NaiveDate>,
    },
}

impl Availability {
    /// Whether the book can be borrowed right away
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Outcome of returning an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnReceipt {
    /// The asset that came back
    pub asset_id: AssetId,
    /// How long the asset was out
    pub loan_duration: TimeDelta,
    /// Whole days past the due date
    pub days_late: i64,
    /// Fee owed for the late days
    pub late_fee: f64,
}

/// A catalog entry grouping the copies of one title under its lending policy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Book<P = BookPolicy> {
    /// Title of the book
    name: String,
    /// ISBN of the book
    isbn: String,
    /// Authors in credit order
    authors: Vec<String>,
    /// Copies owned by the library, in acquisition order
    assets: Vec<LibraryAsset>,
    /// Loan length and late-fee rules
    policy: P,
}

impl<P: LoanPolicy> Book<P> {
    /// Create a book with no authors and no assets
    pub fn new(name: impl Into<String>, isbn: impl Into<String>, policy: P) -> Self {
        Self {
            name: name.into(),
            isbn: isbn.into(),
            authors: Vec::new(),
            assets: Vec::new(),
            policy,
        }
    }

    /// Name of the book
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ISBN of the book
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// Authors of the book
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    /// Credit another author
    pub fn add_author(&mut self, author: impl Into<String>) {
        self.authors.push(author.into());
    }

    /// The copies of this book held by the library
    #[must_use]
    pub fn assets(&self) -> &[LibraryAsset] {
        &self.assets
    }

    /// Append a copy to the inventory
    pub fn add_asset(&mut self, asset: LibraryAsset) {
        self.assets.push(asset);
    }

    /// The lending rules of the book
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Check whether any copy can be borrowed now, or when the next one is due back
    #[must_use]
    pub fn check_availability(&self) -> Availability {
        match self.find_next_available_asset() {
            Some(asset) if asset.is_available() => Availability::Available,
            next => Availability::Unavailable { next_due: next.and_then(LibraryAsset::due_date) },
        }
    }

    /// Find the asset to hand out next.
    ///
    /// An available asset is returned as soon as the scan reaches it. Otherwise the
    /// first unavailable asset is the candidate, and a later asset with a strictly
    /// earlier due date takes its place unless the candidate is reserved.
    ///
    /// Only the candidate's status is checked. A reserved asset further down the
    /// list that is due back earlier still replaces a loaned candidate, so the
    /// result can be an asset that is already reserved. Borrowing then fails and
    /// reserving claims that same asset again.
    #[must_use]
    pub fn find_next_available_asset(&self) -> Option<&LibraryAsset> {
        self.next_available_index().and_then(|index| self.assets.get(index))
    }

    /// Position of the asset selected by `find_next_available_asset`
    fn next_available_index(&self) -> Option<usize> {
        let mut candidate: Option<(usize, &LibraryAsset)> = None;
        for (index, asset) in self.assets.iter().enumerate() {
            if asset.is_available() {
                return Some(index);
            }
            candidate = match candidate {
                None => Some((index, asset)),
                Some((_, current))
                    if current.status() != AssetStatus::Reserved && is_due_later(current, asset) =>
                {
                    Some((index, asset))
                }
                kept => kept,
            };
        }
        candidate.map(|(index, _)| index)
    }

    /// Find the asset with the given id
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::AssetNotFound` if no asset of this book has that id
    pub fn find_library_asset(&self, asset_id: AssetId) -> Result<&LibraryAsset, LibraryError> {
        self.assets
            .iter()
            .find(|asset| asset.id() == asset_id)
            .ok_or_else(|| asset_not_found(&self.name, asset_id))
    }

    /// Mutable access to the asset with the given id
    fn find_library_asset_mut(
        &mut self,
        asset_id: AssetId,
    ) -> Result<&mut LibraryAsset, LibraryError> {
        match self.assets.iter_mut().find(|asset| asset.id() == asset_id) {
            Some(asset) => Ok(asset),
            None => Err(asset_not_found(&self.name, asset_id)),
        }
    }

    /// Loan the next available asset, due after the policy's loan length
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidTransaction` if every asset is loaned or reserved,
    /// or if the due date would fall past the last representable date
    pub fn borrow_book(&mut self, today: NaiveDate) -> Result<&LibraryAsset, LibraryError> {
        let loan_days = self.policy.loan_duration_days();
        let Some(asset) = self.next_available_index().and_then(|index| self.assets.get_mut(index))
        else {
            warn!(book = %self.name, "borrow rejected: book has no assets");
            return Err(not_available());
        };
        if !asset.is_available() {
            warn!(
                book = %self.name,
                asset_id = asset.id(),
                status = %asset.status(),
                "borrow rejected"
            );
            return Err(not_available());
        }

        let Some(due_date) = today.checked_add_days(Days::new(u64::from(loan_days))) else {
            warn!(
                book = %self.name,
                asset_id = asset.id(),
                %today,
                "borrow rejected: due date out of range"
            );
            return Err(LibraryError::InvalidTransaction(format!(
                "A loan of {loan_days} days starting on {today} has no valid due date"
            )));
        };

        asset.set_borrowed_on(Some(today));
        asset.set_status(AssetStatus::Loaned);
        asset.set_due_date(Some(due_date));
        info!(
            book = %self.name,
            asset_id = asset.id(),
            due_date = ?asset.due_date(),
            "asset loaned"
        );
        Ok(&*asset)
    }

    /// Take an asset back, making it available again, and work out any late fee
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::AssetNotFound` if no asset of this book has that id
    pub fn return_book(
        &mut self,
        asset_id: AssetId,
        today: NaiveDate,
    ) -> Result<ReturnReceipt, LibraryError> {
        let asset = self.find_library_asset_mut(asset_id)?;
        asset.set_returned_on(Some(today));

        // Read the loan figures before the status change wipes the dates
        let loan_duration = asset.loan_duration(today);
        let days_late = asset.late_period(today).num_days();
        asset.set_status(AssetStatus::Available);

        let late_fee = self.policy.late_fee(days_late);
        info!(book = %self.name, asset_id, days_late, late_fee, "asset returned");
        Ok(ReturnReceipt { asset_id, loan_duration, days_late, late_fee })
    }

    /// Reserve the asset expected to be available first.
    ///
    /// The asset is claimed even when it is currently on loan.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NoAssets` if the book has no assets
    pub fn reserve_book(&mut self) -> Result<&LibraryAsset, LibraryError> {
        let Some(asset) = self.next_available_index().and_then(|index| self.assets.get_mut(index))
        else {
            return Err(LibraryError::NoAssets { book: self.name.clone() });
        };
        debug!(asset_id = asset.id(), previous = %asset.status(), "reserving asset");
        asset.set_status(AssetStatus::Reserved);
        info!(book = %self.name, asset_id = asset.id(), "asset reserved");
        Ok(&*asset)
    }
}

/// Whether `current` is due strictly after `other`. Assets without a due date never compare later.
fn is_due_later(current: &LibraryAsset, other: &LibraryAsset) -> bool {
    matches!(
        (current.due_date(), other.due_date()),
        (Some(current_due), Some(other_due)) if current_due > other_due
    )
}

/// Error for an id that does not belong to the named book
fn asset_not_found(book: &str, asset_id: AssetId) -> LibraryError {
    debug!(book, asset_id, "asset lookup failed");
    LibraryError::AssetNotFound { asset_id, book: book.to_string() }
}

/// Error for a borrow attempt when no copy is on the shelf
fn not_available() -> LibraryError {
    LibraryError::InvalidTransaction(
        "The requested book is not available. You can check for availability first and reserve it."
            .to_string(),
    )
}

// Include tests module
#[cfg(test)]
mod tests;
