//! Library circulation system for tracking book copies in a library.
//!
//! This crate provides a catalog of books, per-copy inventory tracking and
//! the loan, return and reservation rules with type-specific late fees.

pub mod asset;
pub mod book;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod policy;

pub use asset::{AssetId, AssetStatus, LibraryAsset};
pub use book::{Availability, Book, ReturnReceipt};
pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LibraryConfig};
pub use console::{ConsoleError, LibraryApplication};
pub use error::LibraryError;
pub use policy::{BookPolicy, BookType, DigitalPolicy, LoanPolicy, PaperPolicy, StandardPolicy};
