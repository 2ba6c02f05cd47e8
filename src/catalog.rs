//! The library's collection of books and the issuing of asset ids.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    asset::{AssetId, AssetStatus, LibraryAsset},
    book::Book,
    config::LibraryConfig,
    error::LibraryError,
    policy::BookType,
};

/// A book the catalog is seeded with
#[derive(Debug, Clone, Copy)]
struct DemoBook {
    /// Title of the book
    name: &'static str,
    /// ISBN of the book
    isbn: &'static str,
    /// Sole author of the book
    author: &'static str,
    /// Kind of copies stocked
    book_type: BookType,
}

/// Books available in every fresh session unless seeding is disabled
const DEMO_BOOKS: [DemoBook; 2] = [
    DemoBook {
        name: "Lord of the Rings",
        isbn: "978-0261102385",
        author: "J.R.R. Tolkien",
        book_type: BookType::Paper,
    },
    DemoBook {
        name: "Harry Potter",
        isbn: "978-1408898659",
        author: "J.K. Rowling",
        book_type: BookType::Digital,
    },
];

/// Library collection: books in registration order plus the asset id counter
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    /// Books managed by the library
    books: Vec<Book>,
    /// Id the next asset will receive, `None` once every id was issued
    next_asset_id: Option<AssetId>,
}

impl Catalog {
    /// Create an empty catalog whose asset ids start at `first_asset_id`
    #[must_use]
    pub fn empty(first_asset_id: AssetId) -> Self {
        Self { books: Vec::new(), next_asset_id: Some(first_asset_id) }
    }

    /// Create the catalog for a session, seeding the demo books if configured.
    /// Zero demo copies leaves the catalog empty.
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError` if the demo books cannot be registered
    pub fn new<R: Rng + ?Sized>(config: &LibraryConfig, rng: &mut R) -> Result<Self, LibraryError> {
        let mut catalog = Self::empty(config.first_asset_id);
        if config.seed_demo_books && config.demo_copies > 0 {
            catalog.create_default_books(config.demo_copies, rng)?;
        }
        Ok(catalog)
    }

    /// Register the demo books with `copies` available assets each
    fn create_default_books<R: Rng + ?Sized>(
        &mut self,
        copies: u32,
        rng: &mut R,
    ) -> Result<(), LibraryError> {
        for demo in DEMO_BOOKS {
            self.register_book(
                demo.name,
                demo.isbn,
                vec![demo.author.to_string()],
                demo.book_type,
                copies,
                rng,
            )?;
        }
        debug!(books = self.books.len(), "demo books seeded");
        Ok(())
    }

    /// Books in the catalog, in registration order
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Id the next issued asset will receive, `None` once the id space is used up
    #[must_use]
    pub fn next_asset_id(&self) -> Option<AssetId> {
        self.next_asset_id
    }

    /// Find a book by its exact name
    #[must_use]
    pub fn find_book_by_name(&self, name: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.name() == name)
    }

    /// Mutable access to the book with the exact name
    pub fn find_book_by_name_mut(&mut self, name: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.name() == name)
    }

    /// Find a book by its exact ISBN
    #[must_use]
    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    /// Mutable access to the book with the exact ISBN
    pub fn find_book_by_isbn_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.isbn() == isbn)
    }

    /// Hand out the next asset id. Ids are never reused.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidTransaction` once the id space is exhausted
    pub fn issue_asset_id(&mut self) -> Result<AssetId, LibraryError> {
        let asset_id = self.next_asset_id.ok_or_else(ids_exhausted)?;
        self.next_asset_id = asset_id.checked_add(1);
        Ok(asset_id)
    }

    /// Whether `count` more ids can be issued, `count` being at least one
    fn can_issue(&self, count: u32) -> bool {
        self.next_asset_id.is_some_and(|next| next.checked_add(count.saturating_sub(1)).is_some())
    }

    /// Create a book of the given type with `copies` available assets and add it to the catalog.
    ///
    /// Digital books draw their license terms from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidTransaction` if `copies` is zero, a book
    /// with the same ISBN is already in the catalog or too few asset ids are
    /// left. A rejected registration issues no ids.
    pub fn register_book<R: Rng + ?Sized>(
        &mut self,
        name: impl Into<String>,
        isbn: impl Into<String>,
        authors: Vec<String>,
        book_type: BookType,
        copies: u32,
        rng: &mut R,
    ) -> Result<&Book, LibraryError> {
        let isbn = isbn.into();
        if copies == 0 {
            warn!(isbn = %isbn, "registration rejected: no copies");
            return Err(LibraryError::InvalidTransaction(
                "A book must be registered with at least one copy".to_string(),
            ));
        }
        if self.find_book_by_isbn(&isbn).is_some() {
            warn!(isbn = %isbn, "registration rejected: duplicate ISBN");
            return Err(LibraryError::InvalidTransaction(format!(
                "A book with ISBN {isbn} is already registered"
            )));
        }

        if !self.can_issue(copies) {
            warn!(
                isbn = %isbn,
                copies,
                next_asset_id = ?self.next_asset_id,
                "registration rejected: asset ids exhausted"
            );
            return Err(ids_exhausted());
        }

        let mut book = Book::new(name, isbn, book_type.policy(rng));
        for author in authors {
            book.add_author(author);
        }
        for _ in 0..copies {
            let mut asset = LibraryAsset::new(self.issue_asset_id()?);
            asset.set_status(AssetStatus::Available);
            book.add_asset(asset);
        }

        info!(
            book = book.name(),
            isbn = book.isbn(),
            %book_type,
            copies,
            "book registered"
        );
        self.books.push(book);
        self.books
            .last()
            .ok_or_else(|| LibraryError::InvalidTransaction("Book registration failed".to_string()))
    }
}

/// Error for a request that needs more asset ids than are left
fn ids_exhausted() -> LibraryError {
    LibraryError::InvalidTransaction("No library asset ids are left to issue".to_string())
}
