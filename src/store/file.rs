//! On-disk form of the catalog. Each record is one line of JSON so titles and
//! authors can hold any text; lines in the older whitespace layout are still
//! understood when reading. Writes go through a temp file so a failed save
//! leaves the previous catalog in place.

use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::models::Book;

/// Read every record from `path` in file order. A missing file is an empty
/// catalog. Loading stops at the first line that is not a complete record,
/// including a line that is not valid UTF-8; the records before it are kept.
pub(crate) fn read_books(path: &Path) -> Result<Vec<Book>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "catalog file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(CatalogError::Io(err)),
    };

    let mut books = Vec::new();
    for (line_no, raw) in content.split(|byte| *byte == b'\n').enumerate() {
        let parsed = std::str::from_utf8(raw)
            .map_err(|err| CatalogError::MalformedInput(format!("line is not UTF-8: {err}")))
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    parse_line(line).map(Some)
                }
            });
        match parsed {
            Ok(Some(book)) => books.push(book),
            Ok(None) => continue,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    error = %err,
                    "stopped loading catalog at unreadable record"
                );
                break;
            }
        }
    }

    info!(path = %path.display(), count = books.len(), "loaded catalog");
    Ok(books)
}

/// Replace the catalog file with `books`, one JSON object per line. The data
/// goes to a sibling temp file, is flushed to disk, and is renamed into place.
/// The temp file is removed if any step fails.
pub(crate) fn write_books(path: &Path, books: &[Book]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut content = String::new();
    for book in books {
        content.push_str(&serde_json::to_string(book)?);
        content.push('\n');
    }

    let tmp_path = temp_path_for(path);
    if let Err(err) =
        write_synced(&tmp_path, content.as_bytes()).and_then(|()| fs::rename(&tmp_path, path))
    {
        // The temp file may not exist if creating it was what failed.
        let _ = fs::remove_file(&tmp_path);
        return Err(CatalogError::Io(err));
    }

    debug!(path = %path.display(), count = books.len(), "saved catalog");
    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Decode one persisted record. JSON objects are the current format; anything
/// else is read as the older `id title author year` whitespace layout.
pub(crate) fn parse_line(line: &str) -> Result<Book> {
    let trimmed = line.trim();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let [id, title, author, year] = fields.as_slice() else {
        return Err(CatalogError::MalformedInput(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };

    let id = id
        .parse::<i64>()
        .map_err(|_| CatalogError::MalformedInput(format!("id '{id}' is not a number")))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| CatalogError::MalformedInput(format!("year '{year}' is not a number")))?;
    Ok(Book::new(id, *title, *author, year))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("catalog")));
    name.push(".tmp");
    path.with_file_name(name)
}
