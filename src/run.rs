//! Action dispatch.

use crate::config::{Phase, Settings};
use anyhow::Context;
use loadtest_generator::{load_dictionary, DocumentGenerator};
use loadtest_populate_opensearch::{
    run_custom_query, OpenSearchPopulator, PopulateMetrics, ScrollQuery, ScrollSummary,
    SearchBackend,
};
use tracing::{error, info, warn};

/// What each phase of a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub populate: Option<PopulateMetrics>,
    pub scroll: Option<ScrollSummary>,
    /// Server-side time of the custom query.
    pub custom_query_took: Option<u64>,
    pub index_deleted: Option<bool>,
    /// Phases that could not run, with the reason.
    pub failed_phases: Vec<(Phase, String)>,
}

impl RunReport {
    pub fn log_summary(&self) {
        if let Some(metrics) = &self.populate {
            info!(
                "Populate: {} docs in {} batches ({} failed, {} with item errors), store time {}ms, {:.2} docs/sec",
                metrics.documents_emitted,
                metrics.batch_count,
                metrics.failed_batches,
                metrics.rejected_batches,
                metrics.store_took.as_millis(),
                metrics.docs_per_second()
            );
        }
        if let Some(summary) = &self.scroll {
            info!(
                "Query all: {} hits, {} of {} pages, {}ms",
                summary.total_hits, summary.pages_retrieved, summary.total_pages, summary.took_ms
            );
        }
        for (phase, reason) in &self.failed_phases {
            warn!("Phase {:?} did not complete: {}", phase, reason);
        }
    }
}

/// Run every phase of the configured action in order.
///
/// A phase that fails is logged and recorded; later phases still run.
pub async fn run_actions<B: SearchBackend>(settings: &Settings, backend: B) -> RunReport {
    let populator = OpenSearchPopulator::new(backend, settings.populate_options());
    let mut report = RunReport::default();

    for &phase in settings.action.phases() {
        info!("***Start {}***", phase_title(phase, settings));
        tokio::time::sleep(settings.phase_delay).await;

        let outcome = match phase {
            Phase::Generate => generate(settings, &populator).await.map(|metrics| {
                report.populate = Some(metrics);
            }),
            Phase::QueryAll => query_all(settings, populator.backend()).await.map(|summary| {
                report.scroll = Some(summary);
            }),
            Phase::CustomQuery => custom_query(settings, populator.backend()).await.map(|took| {
                report.custom_query_took = Some(took);
            }),
            Phase::DeleteIndex => {
                report.index_deleted = Some(populator.delete_index().await);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            error!("{:?} failed: {:#}", phase, e);
            report.failed_phases.push((phase, format!("{e:#}")));
        }
    }

    report
}

fn phase_title(phase: Phase, settings: &Settings) -> String {
    match phase {
        Phase::Generate => "Data Generate Test".to_string(),
        Phase::QueryAll => "Query All Test".to_string(),
        Phase::CustomQuery => match &settings.json_path {
            Some(path) => format!("Query test by using '{}'", path.display()),
            None => "Query test".to_string(),
        },
        Phase::DeleteIndex => "Delete Index".to_string(),
    }
}

async fn generate<B: SearchBackend>(
    settings: &Settings,
    populator: &OpenSearchPopulator<B>,
) -> anyhow::Result<PopulateMetrics> {
    if let Some(path) = &settings.data_file {
        info!("Uploading documents from {}", path.display());
        return populator
            .populate_from_file(path)
            .await
            .with_context(|| format!("Failed to upload {}", path.display()));
    }

    let dictionary = match &settings.dict_file {
        Some(path) => {
            let words = load_dictionary(path)
                .with_context(|| format!("Failed to load dictionary {}", path.display()))?;
            info!("Loaded {} words from the {}", words.len(), path.display());
            words
        }
        None => Vec::new(),
    };

    let mut generator = DocumentGenerator::new(settings.schema()?, settings.random_seed)
        .with_id_policy(settings.id_policy()?)
        .with_dictionary(dictionary)
        .with_time_window(settings.time_window()?);

    Ok(populator.populate(&mut generator, settings.count).await?)
}

async fn query_all<B: SearchBackend>(
    settings: &Settings,
    backend: &B,
) -> anyhow::Result<ScrollSummary> {
    let summary = ScrollQuery::new(settings.time_window()?)
        .run(backend)
        .await
        .context("Initial search failed")?;
    if let Some(e) = &summary.page_error {
        warn!(
            "Scroll stopped after {} of {} pages: {}",
            summary.pages_retrieved, summary.total_pages, e
        );
    }
    Ok(summary)
}

async fn custom_query<B: SearchBackend>(settings: &Settings, backend: &B) -> anyhow::Result<u64> {
    let path = settings
        .json_path
        .as_ref()
        .context("custom_query requires json_path")?;
    let page = run_custom_query(backend, path).await?;
    Ok(page.took)
}
