//! Load and save the achievements JSON file.
//!
//! Output is pretty-printed with two-space indentation, keeps non-ASCII text
//! unescaped, and ends with a newline so regenerated files diff cleanly.

use std::fs;
use std::path::Path;

use crate::{AchievementBook, LabsiteError, Result};

/// Read the whole achievements file.
pub fn load_book(path: &Path) -> Result<AchievementBook> {
    let raw = fs::read_to_string(path).map_err(|source| LabsiteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LabsiteError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a book exactly as it is written to disk.
pub fn render_book(book: &AchievementBook) -> Result<String> {
    let mut out = serde_json::to_string_pretty(book)?;
    out.push('\n');
    Ok(out)
}

/// Overwrite `path` with the rendered book.
pub fn save_book(path: &Path, book: &AchievementBook) -> Result<()> {
    let rendered = render_book(book)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| LabsiteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, rendered).map_err(|source| LabsiteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), records = book.len(), "store.saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AchievementRecord, DEFAULT_CO_AUTHOR};

    fn sample_book() -> AchievementBook {
        let mut book = AchievementBook::new();
        book.insert(
            "achievement-001",
            AchievementRecord::synthesized("狭間", DEFAULT_CO_AUTHOR, "2024", "情報処理学会", ""),
        );
        book
    }

    #[test]
    fn renders_two_space_indent_and_trailing_newline() {
        let rendered = render_book(&sample_book()).unwrap();
        assert!(rendered.ends_with("}\n"));
        assert!(rendered.contains("\n  \"achievement-001\": {\n    \"title\": \"\","));
        assert!(rendered.contains("\"狭間\""), "non-ASCII must stay unescaped");
    }

    #[test]
    fn save_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("achievements").join("temp.json");
        let book = sample_book();
        save_book(&path, &book).unwrap();
        assert_eq!(load_book(&path).unwrap(), book);
    }

    #[test]
    fn malformed_file_reports_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_book(&path), Err(LabsiteError::Json { .. })));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_book(&path), Err(LabsiteError::Io { .. })));
    }
}
