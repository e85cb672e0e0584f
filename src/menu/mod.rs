//! Numbered menu front-end. The loop reads a selection, prompts for the fields
//! the action needs, calls into the [`Catalog`] and prints the outcome. Store
//! errors are shown and the menu carries on; only terminal I/O failures end
//! the loop early.

mod console;

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::error::CatalogError;
use crate::models::Book;
use crate::store::Catalog;

use console::Console;

const MENU_LINES: &[&str] = &[
    "1. Add Book",
    "2. Remove Book",
    "3. Update Book",
    "4. Search Books",
    "5. Sort Books by Author",
    "6. Get Book by Position",
    "0. Exit",
];

/// Actions reachable from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Update,
    Search,
    SortByAuthor,
    GetByPosition,
    Exit,
}

impl MenuChoice {
    /// Map a typed selection to an action. Unknown numbers yield `None`.
    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(MenuChoice::Add),
            2 => Some(MenuChoice::Remove),
            3 => Some(MenuChoice::Update),
            4 => Some(MenuChoice::Search),
            5 => Some(MenuChoice::SortByAuthor),
            6 => Some(MenuChoice::GetByPosition),
            0 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Whether the loop keeps going after an action.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Unwrap a prompt answer, or end the menu when the input ran out.
macro_rules! answer {
    ($prompt:expr) => {
        match $prompt? {
            Some(value) => value,
            None => return Ok(Flow::Exit),
        }
    };
}

/// Interactive menu bound to one catalog and one input/output pair.
pub struct Menu<'a, R, W> {
    catalog: &'a mut Catalog,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            console: Console::new(input, output),
        }
    }

    /// Enable ANSI colors. Off by default so captured output stays plain.
    pub fn with_color(mut self, color: bool) -> Self {
        self.console.set_color(color);
        self
    }

    /// Hand back the output sink, mainly so tests can inspect what was shown.
    pub fn into_output(self) -> W {
        self.console.into_output()
    }

    /// Run until the user picks exit or the input is exhausted.
    pub fn run(&mut self) -> Result<()> {
        self.show_menu()?;
        loop {
            let flow = self.step()?;
            if flow == Flow::Exit {
                return Ok(());
            }
            self.show_menu()?;
        }
    }

    fn step(&mut self) -> Result<Flow> {
        let number: i64 = answer!(self.console.ask_number("Enter your choice: "));
        let Some(choice) = MenuChoice::from_number(number) else {
            self.console.error("Invalid choice. Please try again.")?;
            return Ok(Flow::Continue);
        };

        match choice {
            MenuChoice::Add => self.add_book(),
            MenuChoice::Remove => self.remove_book(),
            MenuChoice::Update => self.update_book(),
            MenuChoice::Search => self.search_books(),
            MenuChoice::SortByAuthor => self.sort_books(),
            MenuChoice::GetByPosition => self.get_book(),
            MenuChoice::Exit => {
                self.console.say("Exiting the program.")?;
                Ok(Flow::Exit)
            }
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        self.console.heading("===== Library Management System =====")?;
        for line in MENU_LINES {
            self.console.say(line)?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> Result<Flow> {
        self.console.say("Enter book details:")?;
        let id_label = format!("ID (next is {}): ", self.catalog.next_id());
        let id: i64 = answer!(self.console.ask_number(&id_label));
        let title = answer!(self.console.ask_text("Title: "));
        let author = answer!(self.console.ask_text("Author: "));
        let year: i32 = answer!(self.console.ask_number("Year: "));

        match self.catalog.add(Book::new(id, title, author, year)) {
            Ok(()) => self.console.success("Book added.")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self
            .console
            .ask_number("Enter the ID of the book to remove: "));

        match self.catalog.remove(id) {
            Ok(removed) => {
                for book in removed {
                    self.console.success(&format!("Removed: {book}"))?;
                }
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn update_book(&mut self) -> Result<Flow> {
        let id: i64 = answer!(self
            .console
            .ask_number("Enter the ID of the book to update: "));
        self.console.say("Enter updated book details:")?;
        let title = answer!(self.console.ask_text("Title: "));
        let author = answer!(self.console.ask_text("Author: "));
        let year: i32 = answer!(self.console.ask_number("Year: "));

        match self.catalog.update(id, &title, &author, year) {
            Ok(0) => self
                .console
                .notice(&format!("No book with ID {id}; nothing changed."))?,
            Ok(_) => self.console.success("Book updated.")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> Result<Flow> {
        let keyword = answer!(self.console.ask_token("Enter search keyword: "));

        let lines: Vec<String> = self
            .catalog
            .search(&keyword)
            .into_iter()
            .map(Book::to_string)
            .collect();

        self.console.heading("Search Results:")?;
        if lines.is_empty() {
            self.console.notice("No matches.")?;
        }
        for line in lines {
            self.console.say(line)?;
        }
        Ok(Flow::Continue)
    }

    fn sort_books(&mut self) -> Result<Flow> {
        let lines: Vec<String> = match self.catalog.sort_by_author() {
            Ok(books) => books.iter().map(Book::to_string).collect(),
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };

        self.console.heading("Books by author:")?;
        if lines.is_empty() {
            self.console.notice("The catalog is empty.")?;
        }
        for line in lines {
            self.console.say(line)?;
        }
        Ok(Flow::Continue)
    }

    fn get_book(&mut self) -> Result<Flow> {
        let index: i64 = answer!(self.console.ask_number("Position: "));

        let line = match self.catalog.get_by_position(index) {
            Ok(book) => book.to_string(),
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };
        self.console.heading("Search Results:")?;
        self.console.say(line)?;
        Ok(Flow::Continue)
    }

    fn report(&mut self, err: &CatalogError) -> Result<()> {
        tracing::debug!(error = %err, "menu action failed");
        self.console.error(&err.to_string())
    }
}
