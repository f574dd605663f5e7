//! Loads text documents from a directory tree.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A document read from disk.
///
/// The title is the path relative to the loaded root without its extension,
/// joined with `/` (`notes` at the top level, `b/notes` below `b`), so files
/// sharing a stem in different directories get distinct titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub title: String,
    pub content: String,
}

/// Reads every `.txt` / `.md` file below `root`, walking each directory in
/// file-name order.
///
/// Blank files are skipped; unreadable entries are logged and skipped.
pub fn load_documents(root: &Path) -> io::Result<Vec<SourceDocument>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        ));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !has_document_extension(path) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping unreadable file");
                continue;
            }
        };
        if content.trim().is_empty() {
            debug!(path = %path.display(), "Skipping blank file");
            continue;
        }

        let title = relative_title(root, path);
        documents.push(SourceDocument {
            path: path.to_path_buf(),
            title,
            content,
        });
    }
    Ok(documents)
}

fn relative_title(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn loads_text_and_markdown_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_notes.md"), "# heading\nbody").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("a_bill.TXT"), "electricity").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(dir.path().join("empty.txt"), "   \n").unwrap();

        let docs = load_documents(dir.path()).unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["b_notes", "nested/a_bill"]);
        assert_eq!(docs[1].content, "electricity");
    }

    #[test]
    fn same_stem_in_different_directories_gets_distinct_titles() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("a").join("notes.txt"), "first notes").unwrap();
        fs::write(dir.path().join("b").join("notes.md"), "second notes").unwrap();

        let docs = load_documents(dir.path()).unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["a/notes", "b/notes"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_documents(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
