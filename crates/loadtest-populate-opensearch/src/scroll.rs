//! Scroll query driver.
//!
//! Retrieves every document in a time window by opening a scroll cursor and
//! advancing it a fixed number of times:
//!
//! ```text
//! Init ──open_scroll──▶ Paging(page 1..=n) ──clear_scroll──▶ Done
//!   │                        │
//!   └──────── error ─────────┴──────────────▶ Done (cursor released if any)
//! ```
//!
//! The page count is fixed from the initial hit total, so a page that comes
//! back short does not end the loop early.

use crate::client::SearchBackend;
use crate::error::TransportError;
use loadtest_generator::{format_iso, TimeWindow};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Hits requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10_000;

/// Range query on `@timestamp` covering the window.
pub fn range_query(window: &TimeWindow, page_size: u64) -> Value {
    let (start, finish) = window.bounds();
    json!({
        "size": page_size,
        "query": {
            "range": {
                "@timestamp": {
                    "gte": format_iso(&start),
                    "lte": format_iso(&finish),
                }
            }
        },
        "track_total_hits": true,
    })
}

/// Number of page-advance calls needed for `total_hits`.
pub fn page_count(total_hits: u64, page_size: u64) -> u64 {
    total_hits.div_ceil(page_size.max(1))
}

/// Result of a scroll run.
#[derive(Debug, Default)]
pub struct ScrollSummary {
    pub total_hits: u64,
    pub total_pages: u64,
    pub pages_retrieved: u64,
    /// Sum of server-side `took` over every call.
    pub took_ms: u64,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// Whether the final release call succeeded.
    pub cursor_released: bool,
    /// Error that stopped paging early.
    pub page_error: Option<TransportError>,
}

impl ScrollSummary {
    /// True when every page was retrieved.
    pub fn is_complete(&self) -> bool {
        self.page_error.is_none() && self.pages_retrieved == self.total_pages
    }
}

enum ScrollState {
    Init,
    Paging {
        scroll_id: Option<String>,
        page: u64,
    },
    Done {
        scroll_id: Option<String>,
    },
}

/// Drives one scroll over a time window.
#[derive(Debug, Clone)]
pub struct ScrollQuery {
    page_size: u64,
    time_window: TimeWindow,
}

impl Default for ScrollQuery {
    fn default() -> Self {
        Self::new(TimeWindow::Rolling)
    }
}

impl ScrollQuery {
    pub fn new(time_window: TimeWindow) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            time_window,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Run the scroll to completion.
    ///
    /// Fails only when the initial search fails. A failed page advance stops
    /// paging, is recorded in the summary and the cursor is still released.
    pub async fn run<B: SearchBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<ScrollSummary, TransportError> {
        let started = Instant::now();
        let mut summary = ScrollSummary::default();
        let mut state = ScrollState::Init;

        loop {
            state = match state {
                ScrollState::Init => {
                    let query = range_query(&self.time_window, self.page_size);
                    let page = backend.open_scroll(&query).await?;

                    summary.total_hits = page.total_hits.unwrap_or(0);
                    summary.total_pages = page_count(summary.total_hits, self.page_size);
                    summary.took_ms += page.took;
                    info!(
                        "Total hits: {}, Total pages: {}",
                        summary.total_hits, summary.total_pages
                    );

                    ScrollState::Paging {
                        scroll_id: page.scroll_id,
                        page: 0,
                    }
                }

                ScrollState::Paging { scroll_id, page } if page >= summary.total_pages => {
                    ScrollState::Done { scroll_id }
                }

                ScrollState::Paging {
                    scroll_id: None, ..
                } => {
                    error!("Scroll search failed: response carried no scroll id");
                    summary.page_error = Some(TransportError::MissingField("_scroll_id"));
                    ScrollState::Done { scroll_id: None }
                }

                ScrollState::Paging {
                    scroll_id: Some(current),
                    page,
                } => {
                    match backend.next_scroll(&current).await {
                        Ok(next) => {
                            summary.took_ms += next.took;
                            summary.pages_retrieved += 1;
                            info!("Retrieved page {} of {}", page + 1, summary.total_pages);
                            ScrollState::Paging {
                                scroll_id: next.scroll_id.or(Some(current)),
                                page: page + 1,
                            }
                        }
                        Err(e) => {
                            error!("Scroll search failed on page {}: {}", page + 1, e);
                            summary.page_error = Some(e);
                            ScrollState::Done {
                                scroll_id: Some(current),
                            }
                        }
                    }
                }

                ScrollState::Done { scroll_id } => {
                    if let Some(id) = scroll_id {
                        match backend.clear_scroll(&id).await {
                            Ok(()) => {
                                summary.cursor_released = true;
                                info!("Scroll context cleared successfully");
                            }
                            Err(e) => warn!("Failed to clear scroll context: {}", e),
                        }
                    }
                    break;
                }
            };
        }

        summary.elapsed = started.elapsed();
        info!("Total Querying time taken: {}ms", summary.took_ms);
        Ok(summary)
    }
}
