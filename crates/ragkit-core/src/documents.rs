use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Document;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load a single file, or every `.txt`/`.md` file under a directory (sorted by path).
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    if path.is_file() {
        return Ok(vec![read_document(path)?]);
    }
    if !path.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file or directory: {}", path.display()),
        )));
    }
    let files = list_text_files(path);
    if files.is_empty() {
        info!(dir = %path.display(), "no text files found");
        return Ok(Vec::new());
    }
    let mut docs = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        debug!(file = %file.display(), "loading {}/{}", i + 1, files.len());
        docs.push(read_document(file)?);
    }
    info!(dir = %path.display(), documents = docs.len(), "loaded documents");
    Ok(docs)
}

/// Read a file as UTF-8, falling back to lossy decoding.
pub fn read_document(path: &Path) -> Result<Document> {
    let text = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => String::from_utf8_lossy(&fs::read(path)?).into_owned(),
    };
    Ok(Document::new(path.to_string_lossy(), text))
}

fn list_text_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}
