//! Document assembly from a compiled schema.

use crate::document::{Document, ID_FIELD};
use crate::generators::timestamp::TimeWindow;
use crate::generators::uuid::random_uuid_v4;
use crate::generators::{generate_value, GenerationContext};
use crate::schema::{Schema, SchemaError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::str::FromStr;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Schema error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Unrecognised identifier policy name
    #[error("Unknown id type '{0}', expected 'int' or 'uuid4'")]
    UnknownIdPolicy(String),

    /// Error reading the dictionary file
    #[error("Failed to read dictionary file: {0}")]
    Dictionary(#[from] std::io::Error),
}

/// How `_id` is attached to generated documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// No `_id`; the store assigns one.
    #[default]
    None,
    /// Consecutive integers from the generator's id counter.
    Sequential,
    /// A fresh v4 UUID per document.
    Uuid,
}

impl FromStr for IdPolicy {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Sequential),
            "uuid4" | "uuid" => Ok(Self::Uuid),
            other => Err(GeneratorError::UnknownIdPolicy(other.to_string())),
        }
    }
}

/// Read a dictionary file: one entry per line, surrounding whitespace trimmed.
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Vec<String>, GeneratorError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(|line| line.trim().to_string()).collect())
}

/// Produces documents from a schema.
///
/// Owns the RNG, the sequential id counter and the dictionary pool, so two
/// generators never share mutable state. The id counter is only advanced
/// here, one step per document that receives an integer `_id`.
pub struct DocumentGenerator {
    schema: Schema,
    rng: StdRng,
    id_policy: IdPolicy,
    next_id: u64,
    dictionary: Vec<String>,
    time_window: TimeWindow,
}

impl DocumentGenerator {
    /// Create a generator. Without a seed the RNG is seeded from the OS.
    pub fn new(schema: Schema, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            schema,
            rng,
            id_policy: IdPolicy::None,
            next_id: 0,
            dictionary: Vec::new(),
            time_window: TimeWindow::Rolling,
        }
    }

    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    /// Set the first value handed out by the sequential id policy.
    pub fn with_start_id(mut self, start_id: u64) -> Self {
        self.next_id = start_id;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Vec<String>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    /// Next value the sequential id policy will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    /// Assemble the next document.
    pub fn next_document(&mut self) -> Document {
        let ctx = GenerationContext {
            time_window: self.time_window,
            dictionary: &self.dictionary,
        };

        let mut doc = Document::new();
        for field in self.schema.fields() {
            let value = generate_value(&field.kind, &mut self.rng, &ctx);
            doc.insert(field.name.clone(), value);
        }

        match self.id_policy {
            IdPolicy::None => {}
            IdPolicy::Sequential => {
                doc.insert(ID_FIELD, self.next_id);
                self.next_id += 1;
            }
            IdPolicy::Uuid => {
                doc.insert(ID_FIELD, random_uuid_v4(&mut self.rng).to_string());
            }
        }

        doc
    }

    /// Lazily generate `count` documents.
    pub fn documents(&mut self, count: u64) -> DocumentIterator<'_> {
        DocumentIterator {
            generator: self,
            remaining: count,
        }
    }
}

/// Iterator that lazily generates documents.
pub struct DocumentIterator<'a> {
    generator: &'a mut DocumentGenerator,
    remaining: u64,
}

impl Iterator for DocumentIterator<'_> {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_document())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DocumentIterator<'_> {}
