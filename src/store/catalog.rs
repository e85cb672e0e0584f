use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::file::{read_books, write_books};
use crate::error::{CatalogError, Result};
use crate::models::Book;

/// The book catalog: an ordered list of records mirrored to a single file.
///
/// Ids form the dense set `0..len`. `add` and `remove` keep it that way; the
/// physical order is independent of the ids, so lookups by id scan the list
/// and `get_by_position` is a plain offset.
///
/// Every mutation is saved before it returns. If the save fails the records
/// are put back as they were, so memory and disk never disagree and a failed
/// action can simply be retried.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    books: Vec<Book>,
}

impl Catalog {
    /// Load the catalog stored at `path`. A missing file yields an empty
    /// catalog that will be created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut catalog = Self {
            path: path.into(),
            books: Vec::new(),
        };
        catalog.load()?;
        Ok(catalog)
    }

    /// Replace the in-memory records with the contents of the catalog file.
    pub fn load(&mut self) -> Result<()> {
        self.books = read_books(&self.path)?;
        Ok(())
    }

    /// Rewrite the catalog file from the in-memory records.
    pub fn save(&self) -> Result<()> {
        write_books(&self.path, &self.books)
    }

    /// File backing this catalog, as resolved at startup.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in their current physical order. After a sort this order no
    /// longer follows the ids.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// The only id `add` will accept.
    pub fn next_id(&self) -> i64 {
        self.books.len() as i64
    }

    /// Append `book` and persist. Its id must equal the current length.
    pub fn add(&mut self, book: Book) -> Result<()> {
        let expected = self.next_id();
        if book.id != expected {
            return Err(CatalogError::InvalidId {
                expected,
                got: book.id,
            });
        }
        debug!(id = book.id, title = %book.title, "adding book");
        self.books.push(book);
        if let Err(err) = self.save() {
            self.books.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Delete every record with `id`, shift greater ids down by one and
    /// persist. Nothing is written when no record matches.
    pub fn remove(&mut self, id: i64) -> Result<Vec<Book>> {
        let snapshot = self.books.clone();
        let (removed, kept): (Vec<Book>, Vec<Book>) =
            self.books.drain(..).partition(|book| book.id == id);
        self.books = kept;

        if removed.is_empty() {
            return Err(CatalogError::NotFound(id));
        }

        for book in self.books.iter_mut().filter(|book| book.id > id) {
            book.id -= 1;
        }
        debug!(id, removed = removed.len(), "removed book");
        self.commit(snapshot)?;
        Ok(removed)
    }

    /// Overwrite title, author and year of the record(s) with `id`. Returns how
    /// many records changed; the catalog is saved either way.
    pub fn update(&mut self, id: i64, title: &str, author: &str, year: i32) -> Result<usize> {
        let snapshot = self.books.clone();
        let mut updated = 0;
        for book in self.books.iter_mut().filter(|book| book.id == id) {
            book.title = title.to_string();
            book.author = author.to_string();
            book.year = year;
            updated += 1;
        }
        debug!(id, updated, "updated book");
        self.commit(snapshot)?;
        Ok(updated)
    }

    /// Records whose title or author contains `keyword`, in catalog order.
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        self.books.iter().filter(|book| book.matches(keyword)).collect()
    }

    /// The record at `index` in the current physical order.
    pub fn get_by_position(&self, index: i64) -> Result<&Book> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.books.get(i))
            .ok_or(CatalogError::InvalidIndex {
                index,
                len: self.books.len(),
            })
    }

    /// Stable sort by author, persist the new order and return it. Ids are
    /// left as they are.
    pub fn sort_by_author(&mut self) -> Result<&[Book]> {
        let snapshot = self.books.clone();
        self.books.sort_by(|a, b| a.author.cmp(&b.author));
        self.commit(snapshot)?;
        Ok(&self.books)
    }

    /// Save the current records, restoring `snapshot` if the write fails.
    fn commit(&mut self, snapshot: Vec<Book>) -> Result<()> {
        if let Err(err) = self.save() {
            warn!(path = %self.path.display(), error = %err, "save failed, change rolled back");
            self.books = snapshot;
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> Catalog {
        let mut catalog = Catalog::open(dir.path().join("books.jsonl")).unwrap();
        catalog.add(Book::new(0, "Dune", "Herbert", 1965)).unwrap();
        catalog
            .add(Book::new(1, "Foundation", "Asimov", 1951))
            .unwrap();
        catalog
    }

    fn ids(catalog: &Catalog) -> Vec<i64> {
        catalog.books().iter().map(|b| b.id).collect()
    }

    #[test]
    fn add_with_next_id_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let catalog = seeded(&dir);

        assert_eq!(catalog.len(), 2);
        let reopened = Catalog::open(catalog.path()).unwrap();
        assert_eq!(reopened.books(), catalog.books());
    }

    #[test]
    fn add_with_wrong_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);

        for id in [0, 1, 3, -1] {
            let err = catalog
                .add(Book::new(id, "Emma", "Austen", 1815))
                .unwrap_err();
            assert!(matches!(
                err,
                CatalogError::InvalidId { expected: 2, got } if got == id
            ));
        }
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn remove_shifts_later_ids_down() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);

        let removed = catalog.remove(0).unwrap();

        assert_eq!(removed, vec![Book::new(0, "Dune", "Herbert", 1965)]);
        assert_eq!(
            catalog.books(),
            &[Book::new(0, "Foundation", "Asimov", 1951)]
        );
        let reopened = Catalog::open(catalog.path()).unwrap();
        assert_eq!(reopened.books(), catalog.books());
    }

    #[test]
    fn remove_from_the_middle_keeps_ids_dense() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);
        catalog.add(Book::new(2, "Emma", "Austen", 1815)).unwrap();

        catalog.remove(1).unwrap();

        assert_eq!(ids(&catalog), vec![0, 1]);
        assert_eq!(catalog.books()[1].title, "Emma");
        assert_eq!(catalog.next_id(), 2);
    }

    #[test]
    fn remove_missing_id_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);
        let before = fs::read_to_string(catalog.path()).unwrap();

        let err = catalog.remove(7).unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(7)));
        assert_eq!(ids(&catalog), vec![0, 1]);
        assert_eq!(fs::read_to_string(catalog.path()).unwrap(), before);
    }

    #[test]
    fn update_touches_only_the_matching_record() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);

        let updated = catalog
            .update(1, "Foundation and Empire", "Isaac Asimov", 1952)
            .unwrap();

        assert_eq!(updated, 1);
        assert_eq!(
            catalog.books(),
            &[
                Book::new(0, "Dune", "Herbert", 1965),
                Book::new(1, "Foundation and Empire", "Isaac Asimov", 1952),
            ]
        );
        let reopened = Catalog::open(catalog.path()).unwrap();
        assert_eq!(reopened.books(), catalog.books());
    }

    #[test]
    fn update_missing_id_is_a_no_op_but_still_saves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.jsonl");
        let mut catalog = Catalog::open(&path).unwrap();

        let updated = catalog.update(3, "Emma", "Austen", 1815).unwrap();

        assert_eq!(updated, 0);
        assert!(catalog.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn search_is_case_sensitive_substring() {
        let dir = TempDir::new().unwrap();
        let catalog = seeded(&dir);

        let found = catalog.search("Fou");
        assert_eq!(found, vec![&Book::new(1, "Foundation", "Asimov", 1951)]);

        assert!(catalog.search("as").is_empty());
        assert_eq!(catalog.search("As").len(), 1);
        assert_eq!(catalog.search("er").len(), 1);
        assert_eq!(catalog.search("n").len(), 2);
    }

    #[test]
    fn get_by_position_is_bounds_checked() {
        let dir = TempDir::new().unwrap();
        let catalog = seeded(&dir);

        assert_eq!(catalog.get_by_position(1).unwrap().title, "Foundation");
        for index in [-1, 2, 99] {
            assert!(matches!(
                catalog.get_by_position(index),
                Err(CatalogError::InvalidIndex { len: 2, .. })
            ));
        }
    }

    #[test]
    fn sort_by_author_reorders_and_persists_without_renumbering() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);
        catalog.add(Book::new(2, "I, Robot", "Asimov", 1950)).unwrap();

        let sorted: Vec<i64> = catalog.sort_by_author().unwrap().iter().map(|b| b.id).collect();

        assert_eq!(sorted, vec![1, 2, 0]);
        let reopened = Catalog::open(catalog.path()).unwrap();
        assert_eq!(ids(&reopened), vec![1, 2, 0]);
    }

    /// Opens a catalog whose parent directory is then replaced by a plain
    /// file, so every save fails.
    fn unwritable(dir: &TempDir) -> Catalog {
        let parent = dir.path().join("shelf");
        fs::create_dir(&parent).unwrap();
        let mut catalog = Catalog::open(parent.join("books.jsonl")).unwrap();
        catalog.add(Book::new(0, "Dune", "Herbert", 1965)).unwrap();
        catalog
            .add(Book::new(1, "Foundation", "Asimov", 1951))
            .unwrap();
        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "not a directory").unwrap();
        catalog
    }

    #[test]
    fn failed_save_rolls_back_every_mutation() {
        let dir = TempDir::new().unwrap();
        let mut catalog = unwritable(&dir);
        let before = catalog.books().to_vec();

        assert!(matches!(
            catalog.add(Book::new(2, "Emma", "Austen", 1815)),
            Err(CatalogError::Io(_))
        ));
        assert_eq!(catalog.books(), before.as_slice());

        assert!(catalog.remove(0).is_err());
        assert_eq!(catalog.books(), before.as_slice());

        assert!(catalog.update(1, "Changed", "Someone", 2000).is_err());
        assert_eq!(catalog.books(), before.as_slice());

        assert!(catalog.sort_by_author().is_err());
        assert_eq!(catalog.books(), before.as_slice());
    }

    #[test]
    fn add_can_be_retried_after_a_failed_save() {
        let dir = TempDir::new().unwrap();
        let mut catalog = unwritable(&dir);

        assert!(catalog.add(Book::new(2, "Emma", "Austen", 1815)).is_err());
        assert_eq!(catalog.next_id(), 2);

        let parent = dir.path().join("shelf");
        fs::remove_file(&parent).unwrap();
        fs::create_dir(&parent).unwrap();

        catalog.add(Book::new(2, "Emma", "Austen", 1815)).unwrap();
        let reopened = Catalog::open(catalog.path()).unwrap();
        assert_eq!(reopened.len(), 3);
    }

    fn with_duplicate_ids(dir: &TempDir) -> Catalog {
        let path = dir.path().join("books.txt");
        fs::write(
            &path,
            "0 Dune Herbert 1965\n1 Foundation Asimov 1951\n1 Emma Austen 1815\n2 Beloved Morrison 1987\n",
        )
        .unwrap();
        Catalog::open(&path).unwrap()
    }

    #[test]
    fn remove_takes_every_record_sharing_the_id() {
        let dir = TempDir::new().unwrap();
        let mut catalog = with_duplicate_ids(&dir);

        let removed = catalog.remove(1).unwrap();

        assert_eq!(
            removed,
            vec![
                Book::new(1, "Foundation", "Asimov", 1951),
                Book::new(1, "Emma", "Austen", 1815),
            ]
        );
        assert_eq!(
            catalog.books(),
            &[
                Book::new(0, "Dune", "Herbert", 1965),
                Book::new(1, "Beloved", "Morrison", 1987),
            ]
        );
    }

    #[test]
    fn update_changes_every_record_sharing_the_id() {
        let dir = TempDir::new().unwrap();
        let mut catalog = with_duplicate_ids(&dir);

        let updated = catalog.update(1, "Persuasion", "Austen", 1817).unwrap();

        assert_eq!(updated, 2);
        let titles: Vec<&str> = catalog.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Persuasion", "Persuasion", "Beloved"]);
    }

    #[test]
    fn ids_stay_consistent_after_sort() {
        let dir = TempDir::new().unwrap();
        let mut catalog = seeded(&dir);
        catalog.sort_by_author().unwrap();

        catalog.add(Book::new(2, "Emma", "Austen", 1815)).unwrap();
        catalog.remove(0).unwrap();
        catalog.update(0, "Foundation", "Isaac Asimov", 1951).unwrap();

        let mut remaining: Vec<(i64, &str)> = catalog
            .books()
            .iter()
            .map(|b| (b.id, b.author.as_str()))
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec![(0, "Isaac Asimov"), (1, "Austen")]);
    }
}
