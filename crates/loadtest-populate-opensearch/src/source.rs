//! Loading prepared documents from CSV or JSON files.

use crate::error::SourceError;
use loadtest_generator::Document;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// File formats accepted as a document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Header row plus records; every value becomes a string.
    Csv,
    /// A JSON array of objects.
    Json,
}

impl SourceFormat {
    /// `.csv` files are read as CSV, anything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Load every document from `path`.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, SourceError> {
    let path = path.as_ref();
    let documents = match SourceFormat::from_path(path) {
        SourceFormat::Csv => read_csv(path)?,
        SourceFormat::Json => read_json(path)?,
    };
    info!(
        "Loaded {} documents from {}",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

fn read_csv(path: &Path) -> Result<Vec<Document>, SourceError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut doc = Document::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            doc.insert(header, value);
        }
        documents.push(doc);
    }
    Ok(documents)
}

fn read_json(path: &Path) -> Result<Vec<Document>, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    let entries: Vec<Value> = serde_json::from_reader(reader)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(map) => Ok(Document::from(map)),
            _ => Err(SourceError::NotAnObject(i)),
        })
        .collect()
}
