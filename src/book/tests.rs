#![allow(clippy::expect_used, clippy::float_cmp)]

use chrono::{Days, NaiveDate};

use crate::{
    asset::{AssetId, AssetStatus, LibraryAsset},
    book::{Availability, Book},
    error::LibraryError,
    policy::{DigitalPolicy, LoanPolicy, PaperPolicy, StandardPolicy},
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn days_after(start: NaiveDate, days: u64) -> NaiveDate {
    start.checked_add_days(Days::new(days)).expect("date in range")
}

/// Helper function to set up a book with `copies` available assets numbered from 100
fn setup_test_book<P: LoanPolicy>(policy: P, copies: u32) -> Book<P> {
    let mut book = Book::new("Test Book", "978-0000000000", policy);
    book.add_author("Test Author");
    for id in (100..).take(copies as usize) {
        let mut asset = LibraryAsset::new(id);
        asset.set_status(AssetStatus::Available);
        book.add_asset(asset);
    }
    book
}

/// An asset on loan since `borrowed_on`, due `loan_days` later
fn loaned_asset(id: AssetId, borrowed_on: NaiveDate, loan_days: u64) -> LibraryAsset {
    let mut asset = LibraryAsset::new(id);
    asset.set_borrowed_on(Some(borrowed_on));
    asset.set_status(AssetStatus::Loaned);
    asset.set_due_date(Some(days_after(borrowed_on, loan_days)));
    asset
}

#[test]
fn test_all_available_book_is_available() {
    let book = setup_test_book(StandardPolicy, 5);
    assert_eq!(book.check_availability(), Availability::Available);
    assert!(book.check_availability().is_available());
}

#[test]
fn test_partially_loaned_book_is_available() {
    let mut book = setup_test_book(PaperPolicy, 2);
    book.borrow_book(date(2024, 1, 1)).expect("borrow should succeed");
    assert_eq!(book.check_availability(), Availability::Available);
}

#[test]
fn test_fully_loaned_book_reports_next_due_date() {
    let mut book = setup_test_book(StandardPolicy, 3);
    let start = date(2024, 3, 1);

    // Borrow in reverse so the last asset in the list is due first
    book.borrow_book(days_after(start, 4)).expect("borrow should succeed");
    book.borrow_book(days_after(start, 2)).expect("borrow should succeed");
    book.borrow_book(start).expect("borrow should succeed");

    let next = book.find_next_available_asset().expect("book has assets");
    assert_eq!(next.id(), 102);
    assert_eq!(next.due_date(), Some(days_after(start, 14)));
    assert_eq!(book.check_availability(), Availability::Unavailable { next_due: next.due_date() });
}

#[test]
fn test_first_available_asset_wins() {
    let mut book = Book::new("Mixed", "1", StandardPolicy);
    book.add_asset(loaned_asset(100, date(2024, 1, 1), 14));
    let mut shelf = LibraryAsset::new(101);
    shelf.set_status(AssetStatus::Available);
    book.add_asset(shelf);
    let mut other_shelf = LibraryAsset::new(102);
    other_shelf.set_status(AssetStatus::Available);
    book.add_asset(other_shelf);

    let next = book.find_next_available_asset().expect("book has assets");
    assert_eq!(next.id(), 101);
}

#[test]
fn test_equal_due_dates_keep_first_asset() {
    let mut book = Book::new("Ties", "1", StandardPolicy);
    book.add_asset(loaned_asset(100, date(2024, 1, 1), 14));
    book.add_asset(loaned_asset(101, date(2024, 1, 1), 14));

    assert_eq!(book.find_next_available_asset().map(LibraryAsset::id), Some(100));
}

#[test]
fn test_reserved_candidate_is_not_displaced() {
    let mut book = Book::new("Reserved first", "1", StandardPolicy);
    let mut reserved = loaned_asset(100, date(2024, 1, 10), 14);
    reserved.set_status(AssetStatus::Reserved);
    book.add_asset(reserved);
    book.add_asset(loaned_asset(101, date(2024, 1, 1), 14));

    assert_eq!(book.find_next_available_asset().map(LibraryAsset::id), Some(100));
}

#[test]
fn test_reserved_asset_due_earlier_displaces_loaned_candidate() {
    let mut book = Book::new("Reserved later", "1", StandardPolicy);
    book.add_asset(loaned_asset(100, date(2024, 1, 10), 14));
    let mut reserved = loaned_asset(101, date(2024, 1, 1), 14);
    reserved.set_status(AssetStatus::Reserved);
    book.add_asset(reserved);

    let next = book.find_next_available_asset().expect("book has assets");
    assert_eq!((next.id(), next.status()), (101, AssetStatus::Reserved));
    assert_eq!(
        book.check_availability(),
        Availability::Unavailable { next_due: Some(date(2024, 1, 15)) }
    );

    let result = book.borrow_book(date(2024, 1, 12));
    assert!(matches!(result, Err(LibraryError::InvalidTransaction(_))));
    assert_eq!(book.reserve_book().map(LibraryAsset::id), Ok(101));
    assert_eq!(
        book.find_library_asset(100).map(LibraryAsset::status),
        Ok(AssetStatus::Loaned)
    );
}

#[test]
fn test_assets_without_due_date_do_not_displace_candidate() {
    let mut book = Book::new("Fresh reservation", "1", StandardPolicy);
    book.add_asset(loaned_asset(100, date(2024, 1, 1), 14));
    let mut reserved = LibraryAsset::new(101);
    reserved.set_status(AssetStatus::Reserved);
    book.add_asset(reserved);

    assert_eq!(book.find_next_available_asset().map(LibraryAsset::id), Some(100));
}

#[test]
fn test_empty_book_has_no_next_asset() {
    let book = Book::new("Empty", "0", StandardPolicy);
    assert!(book.find_next_available_asset().is_none());
    assert_eq!(book.check_availability(), Availability::Unavailable { next_due: None });
}

#[test]
fn test_borrow_sets_loan_dates() {
    let today = date(2024, 6, 1);

    let mut standard = setup_test_book(StandardPolicy, 1);
    let asset = standard.borrow_book(today).expect("borrow should succeed");
    assert_eq!(asset.status(), AssetStatus::Loaned);
    assert_eq!(asset.borrowed_on(), Some(today));
    assert_eq!(asset.due_date(), Some(days_after(today, 14)));

    let mut paper = setup_test_book(PaperPolicy, 1);
    let asset = paper.borrow_book(today).expect("borrow should succeed");
    assert_eq!(asset.due_date(), Some(days_after(today, 30)));

    let mut digital = setup_test_book(DigitalPolicy::new(42, 0.2), 1);
    let asset = digital.borrow_book(today).expect("borrow should succeed");
    assert_eq!(asset.due_date(), Some(days_after(today, 42)));
}

#[test]
fn test_borrow_fails_when_nothing_available() {
    let today = date(2024, 6, 1);
    let mut book = setup_test_book(PaperPolicy, 2);
    book.borrow_book(today).expect("first copy");
    book.borrow_book(today).expect("second copy");

    let result = book.borrow_book(today);
    assert!(matches!(result, Err(LibraryError::InvalidTransaction(_))));

    let mut empty = Book::new("Empty", "0", PaperPolicy);
    assert!(matches!(empty.borrow_book(today), Err(LibraryError::InvalidTransaction(_))));
}

#[test]
fn test_borrow_without_representable_due_date_is_rejected() {
    let mut book = setup_test_book(PaperPolicy, 1);
    let today = NaiveDate::MAX.checked_sub_days(Days::new(10)).expect("date in range");

    let result = book.borrow_book(today);
    assert!(matches!(result, Err(LibraryError::InvalidTransaction(_))));

    let asset = book.find_library_asset(100).expect("asset exists");
    assert_eq!(asset.status(), AssetStatus::Available);
    assert_eq!(asset.borrowed_on(), None);
    assert_eq!(asset.due_date(), None);
}

#[test]
fn test_borrow_then_immediate_return() {
    let today = date(2024, 6, 1);
    let mut book = setup_test_book(PaperPolicy, 1);
    let asset_id = book.borrow_book(today).expect("borrow should succeed").id();

    let receipt = book.return_book(asset_id, today).expect("return should succeed");
    assert_eq!(receipt.asset_id, asset_id);
    assert_eq!(receipt.loan_duration.num_days(), 0);
    assert_eq!(receipt.days_late, 0);
    assert_eq!(receipt.late_fee, 0.0);

    let asset = book.find_library_asset(asset_id).expect("asset exists");
    assert_eq!(asset.status(), AssetStatus::Available);
    assert_eq!(asset.borrowed_on(), None);
    assert_eq!(asset.returned_on(), None);
    assert_eq!(asset.due_date(), None);
}

#[test]
fn test_paper_book_returned_late() {
    let borrowed_on = date(2024, 1, 1);
    let mut book = setup_test_book(PaperPolicy, 1);
    let asset_id = book.borrow_book(borrowed_on).expect("borrow should succeed").id();

    let receipt =
        book.return_book(asset_id, days_after(borrowed_on, 35)).expect("return should succeed");
    assert_eq!(receipt.loan_duration.num_days(), 35);
    assert_eq!(receipt.days_late, 5);
    assert_eq!(receipt.late_fee, 1.25);
}

#[test]
fn test_standard_book_never_charges() {
    let borrowed_on = date(2024, 1, 1);
    let mut book = setup_test_book(StandardPolicy, 1);
    let asset_id = book.borrow_book(borrowed_on).expect("borrow should succeed").id();

    let receipt =
        book.return_book(asset_id, days_after(borrowed_on, 20)).expect("return should succeed");
    assert_eq!(receipt.days_late, 6);
    assert_eq!(receipt.late_fee, 0.0);
}

#[test]
fn test_digital_penalty_constant_across_returns() {
    let policy = DigitalPolicy::new(14, 0.3);
    let mut book = setup_test_book(policy, 2);
    let start = date(2024, 2, 1);

    let first = book.borrow_book(start).expect("borrow should succeed").id();
    let receipt = book.return_book(first, days_after(start, 16)).expect("return should succeed");
    assert_eq!(receipt.days_late, 2);
    assert_eq!(receipt.late_fee, 2.0 * 0.3);

    let second = book.borrow_book(start).expect("borrow should succeed").id();
    let receipt = book.return_book(second, days_after(start, 24)).expect("return should succeed");
    assert_eq!(receipt.days_late, 10);
    assert_eq!(receipt.late_fee, 10.0 * 0.3);

    assert_eq!(book.policy().daily_late_penalty(), 0.3);
}

#[test]
fn test_unknown_asset_is_not_found() {
    let populated = setup_test_book(PaperPolicy, 3);
    let empty = Book::new("Empty", "0", PaperPolicy);

    for book in [&populated, &empty] {
        let err = book.find_library_asset(999).expect_err("id 999 is unknown");
        assert!(err.is_not_found());
        assert!(matches!(err, LibraryError::AssetNotFound { asset_id: 999, .. }));
    }
}

#[test]
fn test_return_unknown_asset_changes_nothing() {
    let today = date(2024, 6, 1);
    let mut book = setup_test_book(PaperPolicy, 1);
    book.borrow_book(today).expect("borrow should succeed");

    let result = book.return_book(555, today);
    assert!(matches!(result, Err(LibraryError::AssetNotFound { asset_id: 555, .. })));
    assert_eq!(book.assets().first().map(LibraryAsset::status), Some(AssetStatus::Loaned));
}

#[test]
fn test_reserve_available_asset_then_borrow_skips_it() {
    let today = date(2024, 6, 1);
    let mut book = setup_test_book(PaperPolicy, 2);

    let reserved = book.reserve_book().expect("reserve should succeed");
    assert_eq!(reserved.id(), 100);
    assert_eq!(reserved.status(), AssetStatus::Reserved);

    let loaned = book.borrow_book(today).expect("second copy is on the shelf");
    assert_eq!(loaned.id(), 101);

    // Only the reserved copy is left
    assert!(book.borrow_book(today).is_err());
}

#[test]
fn test_reserve_claims_earliest_due_loan() {
    let start = date(2024, 3, 1);
    let mut book = setup_test_book(StandardPolicy, 3);
    book.borrow_book(days_after(start, 5)).expect("borrow should succeed");
    book.borrow_book(start).expect("borrow should succeed");
    book.borrow_book(days_after(start, 3)).expect("borrow should succeed");

    let reserved = book.reserve_book().expect("reserve should succeed");
    assert_eq!(reserved.id(), 101);
    assert_eq!(reserved.status(), AssetStatus::Reserved);
    // A reservation keeps the loan dates
    assert_eq!(reserved.due_date(), Some(days_after(start, 14)));

    // Reserving again lands on the same claimed copy
    assert_eq!(book.reserve_book().map(LibraryAsset::id), Ok(101));
    assert_eq!(
        book.check_availability(),
        Availability::Unavailable { next_due: Some(days_after(start, 14)) }
    );
}

#[test]
fn test_reserve_empty_book_fails() {
    let mut book = Book::new("Empty", "0", StandardPolicy);
    let err = book.reserve_book().expect_err("no assets to reserve");
    assert!(err.is_not_found());
}

#[test]
fn test_return_reserved_asset_makes_it_available() {
    let today = date(2024, 6, 1);
    let mut book = setup_test_book(PaperPolicy, 1);
    let asset_id = book.reserve_book().expect("reserve should succeed").id();

    let receipt = book.return_book(asset_id, today).expect("return should succeed");
    assert_eq!(receipt.loan_duration.num_days(), 0);
    assert_eq!(book.check_availability(), Availability::Available);
}

#[test]
fn test_loan_cycle_repeats() {
    let start = date(2024, 1, 1);
    let mut book = setup_test_book(PaperPolicy, 1);
    for round in 0..3 {
        let borrowed_on = days_after(start, round * 40);
        let asset_id = book.borrow_book(borrowed_on).expect("borrow should succeed").id();
        let receipt =
            book.return_book(asset_id, days_after(borrowed_on, 31)).expect("return should succeed");
        assert_eq!(receipt.days_late, 1);
        assert_eq!(receipt.late_fee, PaperPolicy::LATE_PENALTY_PER_DAY);
    }
}
