//! OpenSearch populator for load testing.
//!
//! Streams documents from [`loadtest_generator`] (or from a CSV/JSON file)
//! into an OpenSearch-compatible store through the `_bulk` API, and reads
//! them back with a scroll query.
//!
//! ```text
//! DocumentGenerator ──▶ BulkBatch ──(every batch_size docs)──▶ SearchBackend::bulk
//!
//! ScrollQuery: open_scroll ──▶ next_scroll × ceil(hits / page_size) ──▶ clear_scroll
//! ```
//!
//! Transport failures inside a populate run are logged and counted in
//! [`PopulateMetrics`]; they never abort the run.
//!
//! # Example
//!
//! ```ignore
//! use loadtest_generator::{DocumentGenerator, Schema};
//! use loadtest_populate_opensearch::{
//!     ClientConfig, HttpSearchClient, OpenSearchPopulator, PopulateOptions, ScrollQuery,
//! };
//!
//! let client = HttpSearchClient::new(ClientConfig::default())?;
//! let populator = OpenSearchPopulator::new(client, PopulateOptions::default());
//!
//! let mut generator = DocumentGenerator::new(Schema::parse("name:str,age:int,last_updated:ts")?, Some(42));
//! let metrics = populator.populate(&mut generator, 100_000).await?;
//!
//! let summary = ScrollQuery::default().run(populator.backend()).await?;
//! ```

pub mod bulk;
pub mod client;
mod error;
mod populator;
pub mod query;
pub mod scroll;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use bulk::{BulkBatch, BulkPayload};
pub use client::{
    BulkResponse, ClientConfig, HttpSearchClient, IndexSettings, SearchBackend, SearchPage,
};
pub use error::{PopulatorError, SourceError, TransportError};
pub use populator::{OpenSearchPopulator, PopulateMetrics, PopulateOptions, DEFAULT_BATCH_SIZE};
pub use query::{run_custom_query, CustomQueryError};
pub use scroll::{ScrollQuery, ScrollSummary, DEFAULT_PAGE_SIZE};
pub use source::load_documents;
