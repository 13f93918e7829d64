//! search-loadtest
//!
//! Load testing tool for OpenSearch-compatible stores. Generates documents
//! from a compact format string, uploads them through the bulk API and reads
//! them back with a scroll query.
//!
//! # Crates
//!
//! - `loadtest_generator` - format parsing and document generation
//! - `loadtest_populate_opensearch` - bulk upload, index management, scroll
//!   and custom queries
//!
//! This crate holds the command-line settings, logging setup and the action
//! dispatch that ties the two together.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate 1M documents in batches of 5000, then query them back and drop the index
//! search-loadtest --count 1000000 --batch-size 5000 \
//!   --format "name:str:3:10,age:int:18:99,@timestamp:tstxt,tags:arr:1-3:words"
//!
//! # Only upload a prepared file
//! search-loadtest --action generate_data --data-file docs.csv
//!
//! # Run a query from a file against an existing index
//! search-loadtest --action custom_query --json-path query.json --index-name logs
//! ```

pub mod config;
pub mod logging;
pub mod run;

pub use config::{Action, Phase, Settings, SettingsArgs};
pub use run::{run_actions, RunReport};
