//! Populate driver: generation or file loading, batching and upload.

use crate::bulk::{BulkBatch, BulkPayload};
use crate::client::{IndexSettings, SearchBackend};
use crate::error::PopulatorError;
use crate::source::load_documents;
use loadtest_generator::{Document, DocumentGenerator};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Refresh interval applied before a bulk load when `set_refresh` is on.
pub const REFRESH_DISABLED: &str = "-1";

/// Refresh interval restored afterwards.
pub const REFRESH_RESTORED: &str = "1s";

/// Options for a populate run.
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    /// Documents per bulk request. Zero is treated as one.
    pub batch_size: usize,
    /// Delete the index before creating it.
    pub force_init_index: bool,
    /// Disable refresh during the load and restore it afterwards.
    pub set_refresh: bool,
    pub index_settings: IndexSettings,
    /// Also write each generated document as a JSON line here.
    pub out_file: Option<PathBuf>,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            force_init_index: false,
            set_refresh: false,
            index_settings: IndexSettings::default(),
            out_file: None,
        }
    }
}

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Documents added to batches, including those in failed batches.
    pub documents_emitted: u64,
    /// Bulk requests sent.
    pub batch_count: u64,
    /// Bulk requests that failed in transport.
    pub failed_batches: u64,
    /// Bulk requests the store answered with `errors: true`.
    pub rejected_batches: u64,
    /// Documents in failed batches.
    pub failed_documents: u64,
    /// Sum of `took` reported by the store.
    pub store_took: Duration,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating documents.
    pub generation_duration: Duration,
    /// Time spent waiting on bulk requests.
    pub upload_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate documents per second.
    pub fn docs_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.documents_emitted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// True when every batch was sent and accepted.
    pub fn is_clean(&self) -> bool {
        self.failed_batches == 0 && self.rejected_batches == 0
    }
}

/// Loads documents into one index through a [`SearchBackend`].
pub struct OpenSearchPopulator<B> {
    backend: B,
    options: PopulateOptions,
}

impl<B: SearchBackend> OpenSearchPopulator<B> {
    pub fn new(backend: B, options: PopulateOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &PopulateOptions {
        &self.options
    }

    /// Create the index, optionally deleting it first and disabling refresh.
    ///
    /// A failed create is taken to mean the index already exists.
    pub async fn prepare_index(&self) {
        if self.options.force_init_index {
            self.delete_index().await;
        }

        let index = self.backend.index_name();
        info!("Trying to create index {}", index);
        match self.backend.create_index(&self.options.index_settings).await {
            Ok(result) => info!("Creating index {} done {}", index, result),
            Err(e) => {
                info!("Looks like the index exists already");
                debug!("Create index {} failed: {}", index, e);
            }
        }

        if self.options.set_refresh {
            self.set_refresh(REFRESH_DISABLED).await;
        }
    }

    /// Restore the refresh interval if it was disabled.
    pub async fn finish_index(&self) {
        if self.options.set_refresh {
            self.set_refresh(REFRESH_RESTORED).await;
        }
    }

    /// Delete the index, logging the outcome.
    pub async fn delete_index(&self) -> bool {
        let index = self.backend.index_name();
        match self.backend.delete_index().await {
            Ok(result) => {
                info!("Deleting index '{}' done {}", index, result);
                true
            }
            Err(e) => {
                info!("Error while deleting index {}: {}", index, e);
                false
            }
        }
    }

    async fn set_refresh(&self, interval: &str) {
        match self.backend.set_refresh_interval(interval).await {
            Ok(()) => info!("Set index refresh to {}", interval),
            Err(e) => error!("Error while setting index refresh to {}: {}", interval, e),
        }
    }

    /// Generate `count` documents and upload them in batches.
    pub async fn populate(
        &self,
        generator: &mut DocumentGenerator,
        count: u64,
    ) -> Result<PopulateMetrics, PopulatorError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        if generator.schema().uses_dictionary() && generator.dictionary_len() == 0 {
            warn!("Format uses dict fields but no dictionary is loaded; they will be empty");
        }

        let mut out = match &self.options.out_file {
            Some(path) => Some(open_out_file(path)?),
            None => None,
        };

        self.prepare_index().await;

        info!(
            "Generating {} docs, upload batch size is {}",
            count, self.options.batch_size
        );

        let mut batch = BulkBatch::new(self.backend.index_name(), self.options.batch_size);
        let result = self
            .upload_generated(generator, count, &mut batch, out.as_mut(), &mut metrics)
            .await;
        self.flush(&mut batch, &mut metrics).await;
        self.finish_index().await;
        result?;

        if let Some(mut writer) = out {
            writer.flush()?;
        }

        Ok(self.finish(start_time, metrics))
    }

    async fn upload_generated(
        &self,
        generator: &mut DocumentGenerator,
        count: u64,
        batch: &mut BulkBatch,
        mut out: Option<&mut BufWriter<File>>,
        metrics: &mut PopulateMetrics,
    ) -> Result<(), PopulatorError> {
        for _ in 0..count {
            let gen_start = Instant::now();
            let doc = generator.next_document();
            metrics.generation_duration += gen_start.elapsed();

            if let Some(writer) = out.as_deref_mut() {
                serde_json::to_writer(&mut *writer, &doc)?;
                writer.write_all(b"\n")?;
            }

            self.add(batch, &doc, metrics).await?;
        }
        Ok(())
    }

    /// Upload prepared documents in batches.
    ///
    /// The refresh interval is restored even when a document fails to
    /// serialize.
    pub async fn populate_documents<I>(&self, documents: I) -> Result<PopulateMetrics, PopulatorError>
    where
        I: IntoIterator<Item = Document>,
    {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        self.prepare_index().await;

        let mut batch = BulkBatch::new(self.backend.index_name(), self.options.batch_size);
        let mut result = Ok(());
        for doc in documents {
            result = self.add(&mut batch, &doc, &mut metrics).await;
            if result.is_err() {
                break;
            }
        }
        self.flush(&mut batch, &mut metrics).await;
        self.finish_index().await;
        result?;

        Ok(self.finish(start_time, metrics))
    }

    /// Load a CSV or JSON file and upload its documents.
    pub async fn populate_from_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<PopulateMetrics, PopulatorError> {
        let documents = load_documents(path)?;
        self.populate_documents(documents).await
    }

    async fn add(
        &self,
        batch: &mut BulkBatch,
        doc: &Document,
        metrics: &mut PopulateMetrics,
    ) -> Result<(), PopulatorError> {
        let payload = batch.add(doc)?;
        metrics.documents_emitted = batch.emitted();
        if let Some(payload) = payload {
            self.send_batch(payload, batch.emitted(), metrics).await;
        }
        Ok(())
    }

    async fn flush(&self, batch: &mut BulkBatch, metrics: &mut PopulateMetrics) {
        if let Some(payload) = batch.finish() {
            self.send_batch(payload, batch.emitted(), metrics).await;
        }
    }

    /// Send one batch. Failures are logged and counted, never returned.
    async fn send_batch(&self, payload: BulkPayload, uploaded: u64, metrics: &mut PopulateMetrics) {
        let upload_start = Instant::now();
        let result = self.backend.bulk(payload.body).await;
        metrics.upload_duration += upload_start.elapsed();
        metrics.batch_count += 1;

        match result {
            Ok(response) => {
                if response.errors {
                    metrics.rejected_batches += 1;
                }
                metrics.store_took += Duration::from_millis(response.took);
                info!(
                    "Upload: {} - upload took: {:>5}ms, total docs uploaded: {:>7}",
                    if response.errors { "FAILED" } else { "OK" },
                    response.took,
                    uploaded
                );
            }
            Err(e) => {
                metrics.failed_batches += 1;
                metrics.failed_documents += payload.documents as u64;
                error!("Upload failed ({} docs): {}", payload.documents, e);
            }
        }
    }

    fn finish(&self, start_time: Instant, mut metrics: PopulateMetrics) -> PopulateMetrics {
        metrics.total_duration = start_time.elapsed();
        info!(
            "Done - total docs uploaded: {}, took {} seconds ({:.2} docs/sec)",
            metrics.documents_emitted,
            metrics.total_duration.as_secs(),
            metrics.docs_per_second()
        );
        if !metrics.is_clean() {
            warn!(
                "{} of {} batches failed ({} docs lost), {} batches had item errors",
                metrics.failed_batches,
                metrics.batch_count,
                metrics.failed_documents,
                metrics.rejected_batches
            );
        }
        metrics
    }
}

fn open_out_file(path: &Path) -> Result<BufWriter<File>, PopulatorError> {
    info!("Writing generated documents to {}", path.display());
    Ok(BufWriter::new(File::create(path)?))
}
