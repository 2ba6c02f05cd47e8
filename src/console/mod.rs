//! Menu-driven console front end for librarians.
//!
//! The application reads choices from any `BufRead` and writes prompts and
//! results to any `Write`, so sessions can be scripted in tests.

mod inventory;

use std::{
    fmt,
    io::{BufRead, Write},
};

use rand::rngs::StdRng;
use tracing::debug;

pub use inventory::InventoryReport;

use crate::{
    book::Availability, catalog::Catalog, clock::Clock, error::LibraryError, policy::BookType,
};

/// Errors raised while interacting with the librarian
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The user pressed ENTER on a required prompt
    #[error("The user has selected to cancel the current operation")]
    OperationCancel,

    /// Input ended before the session was exited
    #[error("The console input was closed")]
    EndOfInput,

    /// A circulation rule rejected the request
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Reading or writing the console failed
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The inventory could not be rendered
    #[error("Failed to render inventory: {0}")]
    Render(#[from] serde_json::Error),
}

/// Options of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    /// Pick a book to manage
    SelectBook,
    /// Add a new book to the catalog
    RegisterBook,
    /// Leave the application
    Exit,
}

impl MainMenuOption {
    /// Map a menu number to its option
    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::SelectBook),
            2 => Some(Self::RegisterBook),
            3 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Options of the book menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookMenuOption {
    /// Show whether the book can be borrowed
    CheckStatus,
    /// Loan a copy
    Borrow,
    /// Take a copy back
    Return,
    /// List every copy and its loan details
    DisplayAssets,
    /// Back to the main menu
    Exit,
}

impl BookMenuOption {
    /// Map a menu number to its option
    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::CheckStatus),
            2 => Some(Self::Borrow),
            3 => Some(Self::Return),
            4 => Some(Self::DisplayAssets),
            5 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Text of the main menu
const MAIN_MENU: &str = "\nMain Menu\n\n1: Select Book\n2: Register Book\n3: Exit\n\nEnter a choice: ";

/// Text of the book menu
const BOOK_MENU: &str = "\nBook Menu\n\n1: Check Status\n2: Borrow Book\n3: Return Book\n4: Display Book Assets\n5: Exit\n\nEnter a choice: ";

/// Console session that lets librarians select, register, loan and return books
pub struct LibraryApplication<R, W, C> {
    /// The books and assets managed in this session
    catalog: Catalog,
    /// Where the librarian's answers come from
    input: R,
    /// Where prompts and results go
    output: W,
    /// Source of today's date for loans and returns
    clock: C,
    /// Randomness for digital license terms of registered books
    rng: StdRng,
    /// Show inventories as JSON instead of the coloured listing
    json_inventory: bool,
}

// Manual implementation of Debug for LibraryApplication
impl<R, W, C> fmt::Debug for LibraryApplication<R, W, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryApplication")
            .field("catalog", &self.catalog)
            .field("json_inventory", &self.json_inventory)
            .finish_non_exhaustive()
    }
}

impl<R: BufRead, W: Write, C: Clock> LibraryApplication<R, W, C> {
    /// Create a session over the given catalog and console streams
    #[must_use]
    pub fn new(catalog: Catalog, input: R, output: W, clock: C, rng: StdRng) -> Self {
        Self { catalog, input, output, clock, rng, json_inventory: false }
    }

    /// Show inventories as JSON
    #[must_use]
    pub fn with_json_inventory(mut self, json_inventory: bool) -> Self {
        self.json_inventory = json_inventory;
        self
    }

    /// The catalog managed by this session
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consume the session, handing back the catalog and the output stream
    pub fn into_parts(self) -> (Catalog, W) {
        (self.catalog, self.output)
    }

    /// Keep showing the main menu until the user exits or input ends
    ///
    /// # Errors
    ///
    /// Returns a `ConsoleError` if the console cannot be read or written
    pub fn run(&mut self) -> Result<(), ConsoleError> {
        match self.open() {
            Err(ConsoleError::EndOfInput) => {
                debug!("console input closed, leaving the application");
                Ok(())
            }
            result => result,
        }
    }

    /// Main menu loop
    fn open(&mut self) -> Result<(), ConsoleError> {
        loop {
            let choice = self.show_menu(MAIN_MENU)?;
            match MainMenuOption::from_choice(choice) {
                Some(MainMenuOption::SelectBook) => {
                    if let Some(isbn) = self.on_select_book()? {
                        self.manage_book(&isbn)?;
                    }
                }
                Some(MainMenuOption::RegisterBook) => self.on_register_book()?,
                Some(MainMenuOption::Exit) => return Ok(()),
                None => writeln!(self.output, "Please enter a valid menu option\n")?,
            }
        }
    }

    /// Book menu loop for the book with the given ISBN
    fn manage_book(&mut self, isbn: &str) -> Result<(), ConsoleError> {
        loop {
            let choice = self.show_menu(BOOK_MENU)?;
            match BookMenuOption::from_choice(choice) {
                Some(BookMenuOption::CheckStatus) => self.on_check_book_status(isbn)?,
                Some(BookMenuOption::Borrow) => self.on_borrow_book(isbn)?,
                Some(BookMenuOption::Return) => self.on_return_book(isbn)?,
                Some(BookMenuOption::DisplayAssets) => self.on_display_book_assets(isbn)?,
                Some(BookMenuOption::Exit) => return Ok(()),
                None => writeln!(self.output, "Please enter a valid menu option")?,
            }
        }
    }

    /// Show a menu until the user enters a number
    fn show_menu(&mut self, menu: &str) -> Result<u32, ConsoleError> {
        loop {
            let answer = self.prompt(menu)?;
            match answer.parse() {
                Ok(choice) => return Ok(choice),
                Err(_) => writeln!(self.output, "Please enter a valid menu option.\n")?,
            }
        }
    }

    /// Ask for a book by name or ISBN. Returns the ISBN of the selected book,
    /// or `None` when the user leaves both answers empty.
    fn on_select_book(&mut self) -> Result<Option<String>, ConsoleError> {
        loop {
            let name = self.prompt("Please enter the book name or press [ENTER] to cancel: ")?;
            let isbn = self.prompt("Please enter the book ISBN or press [ENTER] to cancel: ")?;
            if name.is_empty() && isbn.is_empty() {
                return Ok(None);
            }

            if !name.is_empty() {
                if let Some(book) = self.catalog.find_book_by_name(&name) {
                    return Ok(Some(book.isbn().to_string()));
                }
                writeln!(self.output, "The book was not found. Please select another book.")?;
            }
            if !isbn.is_empty() {
                if let Some(book) = self.catalog.find_book_by_isbn(&isbn) {
                    return Ok(Some(book.isbn().to_string()));
                }
                writeln!(self.output, "The book was not found. Please select another book.")?;
            }
        }
    }

    /// Collect the details of a new book and add it to the catalog
    fn on_register_book(&mut self) -> Result<(), ConsoleError> {
        match self.register_book_interactively() {
            Ok(()) => Ok(()),
            Err(ConsoleError::OperationCancel) => {
                writeln!(self.output, "The registration was cancelled.")?;
                Ok(())
            }
            Err(ConsoleError::Library(err)) => {
                writeln!(self.output, "{err}\n")?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Prompts for registration; cancelling any required prompt aborts it
    fn register_book_interactively(&mut self) -> Result<(), ConsoleError> {
        let name = self.prompt_required("Please enter the book name or press [ENTER] to cancel: ")?;
        let isbn = self.prompt_required("Please enter the book ISBN or press [ENTER] to cancel: ")?;
        let authors = self.prompt_for_book_authors()?;
        let book_type = self.prompt_for_book_type()?;
        let copies = self.prompt_for_book_copies()?;

        let book =
            self.catalog.register_book(name, isbn, authors, book_type, copies, &mut self.rng)?;
        let first_id = book.assets().first().map(|asset| asset.id());
        let last_id = book.assets().last().map(|asset| asset.id());
        writeln!(
            self.output,
            "The {book_type} book '{}' was registered with {copies} copies (IDs {} to {}).",
            book.name(),
            first_id.unwrap_or_default(),
            last_id.unwrap_or_default()
        )?;
        Ok(())
    }

    /// Ask for a comma separated list of authors
    fn prompt_for_book_authors(&mut self) -> Result<Vec<String>, ConsoleError> {
        let answer = self.prompt_required(
            "Please enter the book authors separated by commas or press [ENTER] to cancel: ",
        )?;
        Ok(answer
            .split(',')
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Ask whether the book is paper or digital
    fn prompt_for_book_type(&mut self) -> Result<BookType, ConsoleError> {
        loop {
            let answer = self.prompt_required(
                "Please enter the book type (1: Paper, 2: Digital) or press [ENTER] to cancel: ",
            )?;
            match answer.as_str() {
                "1" => return Ok(BookType::Paper),
                "2" => return Ok(BookType::Digital),
                _ => writeln!(
                    self.output,
                    "Please enter 1 for a paper book or 2 for a digital book."
                )?,
            }
        }
    }

    /// Ask for the number of copies to stock
    fn prompt_for_book_copies(&mut self) -> Result<u32, ConsoleError> {
        loop {
            let answer = self
                .prompt_required("Please enter the number of copies or press [ENTER] to cancel: ")?;
            match answer.parse::<u32>() {
                Ok(copies) if copies > 0 => return Ok(copies),
                _ => writeln!(
                    self.output,
                    "Please enter a whole number of copies greater than zero."
                )?,
            }
        }
    }

    /// Print the availability of the book and offer a reservation when it is out
    fn on_check_book_status(&mut self, isbn: &str) -> Result<(), ConsoleError> {
        let Some(book) = self.catalog.find_book_by_isbn(isbn) else {
            return Ok(());
        };
        let name = book.name().to_string();
        match book.check_availability() {
            Availability::Available => {
                writeln!(self.output, "{name} is available.")?;
                Ok(())
            }
            Availability::Unavailable { next_due } => {
                let when =
                    next_due.map_or_else(|| "an unknown date".to_string(), |date| date.to_string());
                let answer = self.prompt(&format!(
                    "{name} is not currently available. The book will be available on {when}. Would you like to reserve it?\n"
                ))?;
                if !answer.eq_ignore_ascii_case("yes") {
                    return Ok(());
                }
                let Some(book) = self.catalog.find_book_by_isbn_mut(isbn) else {
                    return Ok(());
                };
                match book.reserve_book() {
                    Ok(asset) => {
                        writeln!(self.output, "Asset {} of '{name}' is now reserved.", asset.id())?;
                    }
                    Err(err) => writeln!(self.output, "{err}\n")?,
                }
                Ok(())
            }
        }
    }

    /// Loan a copy of the book and tell the user when it is due
    fn on_borrow_book(&mut self, isbn: &str) -> Result<(), ConsoleError> {
        let today = self.clock.today();
        let Some(book) = self.catalog.find_book_by_isbn_mut(isbn) else {
            return Ok(());
        };
        let name = book.name().to_string();
        match book.borrow_book(today) {
            Ok(asset) => {
                let due = asset.due_date().map_or_else(String::new, |date| date.to_string());
                writeln!(
                    self.output,
                    "The loan for '{name}' is confirmed.\nThe book is due on {due}. Please use ID {} when returning the book.",
                    asset.id()
                )?;
            }
            Err(err) => writeln!(self.output, "{err}\n")?,
        }
        Ok(())
    }

    /// Take a copy back by its id and report any late fee
    fn on_return_book(&mut self, isbn: &str) -> Result<(), ConsoleError> {
        loop {
            let answer = self.prompt(
                "Please enter the library ID of the book you are returning or type [ENTER] to exit: ",
            )?;
            if answer.is_empty() {
                return Ok(());
            }
            let Ok(asset_id) = answer.parse() else {
                writeln!(
                    self.output,
                    "Invalid entry. Please enter the library ID for the book you are returning.\n"
                )?;
                continue;
            };

            let today = self.clock.today();
            let Some(book) = self.catalog.find_book_by_isbn_mut(isbn) else {
                return Ok(());
            };
            match book.return_book(asset_id, today) {
                Ok(receipt) => {
                    writeln!(
                        self.output,
                        "The book '{}' was loaned for {} days and was returned successfully.",
                        book.name(),
                        receipt.loan_duration.num_days()
                    )?;
                    if receipt.days_late > 0 {
                        writeln!(
                            self.output,
                            "The book was late by {} day(s). Please pay ${:.2} at the cashier.",
                            receipt.days_late, receipt.late_fee
                        )?;
                    }
                    return Ok(());
                }
                Err(err) => writeln!(self.output, "{err}\n")?,
            }
        }
    }

    /// Show every copy of the book with its loan details
    fn on_display_book_assets(&mut self, isbn: &str) -> Result<(), ConsoleError> {
        let Some(book) = self.catalog.find_book_by_isbn(isbn) else {
            return Ok(());
        };
        let report = if self.json_inventory {
            InventoryReport::render_json(book)?
        } else {
            InventoryReport::render_text(book, self.clock.today())
        };
        writeln!(self.output, "{report}")?;
        Ok(())
    }

    /// Show a prompt and read one trimmed line
    fn prompt(&mut self, message: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    /// Like `prompt`, but an empty answer cancels the operation
    fn prompt_required(&mut self, message: &str) -> Result<String, ConsoleError> {
        let answer = self.prompt(message)?;
        if answer.is_empty() {
            return Err(ConsoleError::OperationCancel);
        }
        Ok(answer)
    }
}
