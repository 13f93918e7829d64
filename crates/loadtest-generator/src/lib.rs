//! Document generator for search-loadtest.
//!
//! Turns a compact format string such as
//! `name:str:3:10,age:int:18:99,seen:ts,tags:arr:1-3:words` into a stream of
//! documents. Generation is driven by a seeded RNG, so the same format and
//! seed reproduce the same documents.
//!
//! # Architecture
//!
//! ```text
//! format string
//!        │  Schema::parse
//!        ▼
//! ┌──────────────────────┐
//! │  DocumentGenerator   │
//! │                      │
//! │  - schema            │
//! │  - rng (StdRng)      │
//! │  - id policy/counter │
//! │  - dictionary        │
//! │  - time window       │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    Document { field -> value, [_id] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{DocumentGenerator, IdPolicy, Schema};
//!
//! let schema = Schema::parse("name:str:3:10,age:int:18:99,seen:ts").unwrap();
//! let mut generator = DocumentGenerator::new(schema, Some(42))
//!     .with_id_policy(IdPolicy::Sequential);
//!
//! let doc = generator.next_document();
//! assert_eq!(doc.id(), Some(&serde_json::json!(0)));
//! ```
//!
//! # Field types
//!
//! - `bool` - true/false
//! - `int[:min[:max]]` - integer, default `0..=100000`
//! - `str[:min[:max]]` - letters/digits, default length `3..=10`
//! - `ipv4` - dotted-quad address
//! - `ts` / `tstxt` - timestamp as epoch millis / ISO-8601 text
//! - `words[:min[:max]]` - random alphanumeric words, default `2..=10`
//! - `dict[:min[:max]]` - words from the dictionary file, default `2..=10`
//! - `text[:a-b-c[:min[:max]]]` - words from a vocabulary, default `1..=2`
//! - `log_version` - `vX.Y.Z`
//! - `sha` - 40 hex characters
//! - `file_name[:ext]` - `word.ext`, default `py`
//! - `uuid` - v4 UUID
//! - `systemd` - `word-word-word.<unit type>`
//! - `arr:N:<type...>` / `arr:MIN-MAX:<type...>` - array of any of the above

pub mod document;
pub mod generator;
pub mod generators;
pub mod schema;

// Re-exports for convenience
pub use document::{Document, GeneratedValue, ID_FIELD};
pub use generator::{load_dictionary, DocumentGenerator, DocumentIterator, GeneratorError, IdPolicy};
pub use generators::timestamp::{format_iso, TimeWindow, TimeWindowError};
pub use schema::{ArrayLen, FieldDescriptor, FieldKind, Schema, SchemaError};
