//! Document loading and directory-level chunk production.

use crate::chunker::{chunk_document, ChunkingConfig};
use crate::error::Result;
use crate::types::{Chunk, Document};
use std::fs;
use std::path::{Path, PathBuf};

/// Load a single plain-text file. The file stem becomes the document id.
pub fn load_file(path: &Path) -> Result<Document> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => String::from_utf8_lossy(&fs::read(path)?).to_string(),
    };
    let doc_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    Ok(Document { doc_id, source: path.to_string_lossy().to_string(), content })
}

/// Turns files into chunk sequences ready for embedding.
#[derive(Default)]
pub struct DocumentProcessor {
    chunking: ChunkingConfig,
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunking(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    pub fn process_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let doc = load_file(path)?;
        chunk_document(&doc, self.chunking)
    }

    /// Chunk every `.txt` file under `data_dir`, in sorted path order.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let files = list_txt_files(data_dir);
        if files.is_empty() {
            println!("No .txt files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!(
                "Processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            all_chunks.extend(self.process_file(file_path)?);
        }
        println!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}
