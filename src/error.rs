use crate::asset::AssetId;

/// Errors raised by circulation operations on books and the catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LibraryError {
    /// No asset with the given id belongs to the book
    #[error("An asset with ID = {asset_id} was not found for book {book}")]
    AssetNotFound { asset_id: AssetId, book: String },

    /// The book has no assets to act on
    #[error("The book {book} has no library assets")]
    NoAssets { book: String },

    /// The requested operation violates a circulation rule
    #[error("{0}")]
    InvalidTransaction(String),
}

impl LibraryError {
    /// Whether this error reports a missing asset
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound { .. } | Self::NoAssets { .. })
    }
}
