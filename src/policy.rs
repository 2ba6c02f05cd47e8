//! Lending policies that decide loan length and late fees per book type.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Loan length and late-fee rules applied by a book to its assets
pub trait LoanPolicy {
    /// Number of days an asset may stay out before it is late
    fn loan_duration_days(&self) -> u32;

    /// Fee charged for each day an asset is returned late
    fn daily_late_penalty(&self) -> f64;

    /// Late fee owed for the given number of late days
    #[allow(clippy::cast_precision_loss)]
    fn late_fee(&self, days_late: i64) -> f64 {
        if days_late <= 0 {
            return 0.0;
        }
        days_late as f64 * self.daily_late_penalty()
    }
}

/// Default lending rules: two weeks, no late fee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StandardPolicy;

impl StandardPolicy {
    /// Loan length in days
    pub const LOAN_DAYS: u32 = 14;
}

impl LoanPolicy for StandardPolicy {
    fn loan_duration_days(&self) -> u32 {
        Self::LOAN_DAYS
    }

    fn daily_late_penalty(&self) -> f64 {
        0.0
    }
}

/// Lending rules for paper copies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaperPolicy;

impl PaperPolicy {
    /// Maximum number of days a paper book can be borrowed
    pub const MAX_BORROW_DAYS: u32 = 30;
    /// Late penalty charged per day
    pub const LATE_PENALTY_PER_DAY: f64 = 0.25;
}

impl LoanPolicy for PaperPolicy {
    fn loan_duration_days(&self) -> u32 {
        Self::MAX_BORROW_DAYS
    }

    fn daily_late_penalty(&self) -> f64 {
        Self::LATE_PENALTY_PER_DAY
    }
}

/// Lending rules for digital copies, set by the book's license agreement.
///
/// The values are drawn once when the book is created and stay fixed for
/// the lifetime of that book.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DigitalPolicy {
    /// Loan length granted by the license
    max_borrow_days: u32,
    /// Late penalty charged per day
    late_penalty_per_day: f64,
}

impl DigitalPolicy {
    /// Shortest license loan length (two weeks)
    pub const MIN_BORROW_DAYS: u32 = 14;
    /// Longest license loan length (eight weeks)
    pub const MAX_BORROW_DAYS: u32 = 56;
    /// Lowest daily penalty, inclusive
    pub const MIN_LATE_PENALTY: f64 = 0.1;
    /// Highest daily penalty, exclusive
    pub const MAX_LATE_PENALTY: f64 = 0.5;

    /// Create a policy with explicit license terms
    #[must_use]
    pub fn new(max_borrow_days: u32, late_penalty_per_day: f64) -> Self {
        Self { max_borrow_days, late_penalty_per_day }
    }

    /// Draw license terms uniformly from the allowed ranges
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let max_borrow_days = rng.random_range(Self::MIN_BORROW_DAYS..=Self::MAX_BORROW_DAYS);
        let late_penalty_per_day =
            rng.random_range(Self::MIN_LATE_PENALTY..Self::MAX_LATE_PENALTY);
        Self { max_borrow_days, late_penalty_per_day }
    }
}

impl LoanPolicy for DigitalPolicy {
    fn loan_duration_days(&self) -> u32 {
        self.max_borrow_days
    }

    fn daily_late_penalty(&self) -> f64 {
        self.late_penalty_per_day
    }
}

/// Kind of book a catalog entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookType {
    /// Physical copies on the shelf
    Paper,
    /// Licensed digital copies
    Digital,
}

impl BookType {
    /// Build the lending policy for a new book of this type
    pub fn policy<R: Rng + ?Sized>(self, rng: &mut R) -> BookPolicy {
        match self {
            Self::Paper => BookPolicy::Paper(PaperPolicy),
            Self::Digital => BookPolicy::Digital(DigitalPolicy::generate(rng)),
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paper => f.write_str("paper"),
            Self::Digital => f.write_str("digital"),
        }
    }
}

/// Any of the lending policies, so books of different types share one catalog
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookPolicy {
    /// Default two-week rules
    Standard(StandardPolicy),
    /// Paper copy rules
    Paper(PaperPolicy),
    /// Digital license rules
    Digital(DigitalPolicy),
}

impl BookPolicy {
    /// The book type this policy belongs to, if it is not the default policy
    #[must_use]
    pub fn book_type(&self) -> Option<BookType> {
        match self {
            Self::Standard(_) => None,
            Self::Paper(_) => Some(BookType::Paper),
            Self::Digital(_) => Some(BookType::Digital),
        }
    }
}

impl Default for BookPolicy {
    fn default() -> Self {
        Self::Standard(StandardPolicy)
    }
}

impl LoanPolicy for BookPolicy {
    fn loan_duration_days(&self) -> u32 {
        match self {
            Self::Standard(policy) => policy.loan_duration_days(),
            Self::Paper(policy) => policy.loan_duration_days(),
            Self::Digital(policy) => policy.loan_duration_days(),
        }
    }

    fn daily_late_penalty(&self) -> f64 {
        match self {
            Self::Standard(policy) => policy.daily_late_penalty(),
            Self::Paper(policy) => policy.daily_late_penalty(),
            Self::Digital(policy) => policy.daily_late_penalty(),
        }
    }
}

impl From<PaperPolicy> for BookPolicy {
    fn from(policy: PaperPolicy) -> Self {
        Self::Paper(policy)
    }
}

impl From<DigitalPolicy> for BookPolicy {
    fn from(policy: DigitalPolicy) -> Self {
        Self::Digital(policy)
    }
}

impl From<StandardPolicy> for BookPolicy {
    fn from(policy: StandardPolicy) -> Self {
        Self::Standard(policy)
    }
}
