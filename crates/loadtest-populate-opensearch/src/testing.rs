//! In-memory [`SearchBackend`] that records every call.

use crate::client::{BulkResponse, IndexSettings, SearchBackend, SearchPage};
use crate::error::TransportError;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bulk { documents: usize, body: String },
    CreateIndex(IndexSettings),
    DeleteIndex,
    SetRefresh(String),
    OpenScroll(Value),
    NextScroll(String),
    ClearScroll(String),
    Search(Value),
}

pub struct RecordingBackend {
    index_name: String,
    calls: Mutex<Vec<Call>>,
    total_hits: u64,
    took: u64,
    scroll_counter: AtomicU64,
    scroll_failure_after: Option<u64>,
    fail_open: bool,
    fail_create: bool,
    failing_bulks: HashSet<usize>,
    rejecting_bulks: HashSet<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            index_name: "test".to_string(),
            calls: Mutex::new(Vec::new()),
            total_hits: 0,
            took: 1,
            scroll_counter: AtomicU64::new(0),
            scroll_failure_after: None,
            fail_open: false,
            fail_create: false,
            failing_bulks: HashSet::new(),
            rejecting_bulks: HashSet::new(),
        }
    }

    pub fn with_total_hits(mut self, total_hits: u64) -> Self {
        self.total_hits = total_hits;
        self
    }

    pub fn with_took(mut self, took: u64) -> Self {
        self.took = took;
        self
    }

    /// Let `pages` scroll advances succeed, then fail the next one.
    pub fn fail_scroll_after(mut self, pages: u64) -> Self {
        self.scroll_failure_after = Some(pages);
        self
    }

    pub fn fail_open_scroll(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn fail_create_index(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Fail the bulk request with this zero-based position.
    pub fn fail_bulk(mut self, position: usize) -> Self {
        self.failing_bulks.insert(position);
        self
    }

    /// Answer the bulk request at this position with `errors: true`.
    pub fn reject_bulk(mut self, position: usize) -> Self {
        self.rejecting_bulks.insert(position);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Document counts of every bulk request, in order.
    pub fn bulk_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Bulk { documents, .. } => Some(*documents),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    fn status_error() -> TransportError {
        TransportError::Status {
            status: 500,
            body: "internal error".to_string(),
        }
    }

    fn next_scroll_id(&self) -> String {
        format!("scroll-{}", self.scroll_counter.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait::async_trait]
impl SearchBackend for RecordingBackend {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn bulk(&self, body: String) -> Result<BulkResponse, TransportError> {
        let position = self.bulk_sizes().len();
        let documents = body.lines().count() / 2;
        self.record(Call::Bulk { documents, body });

        if self.failing_bulks.contains(&position) {
            return Err(Self::status_error());
        }
        Ok(BulkResponse {
            took: self.took,
            errors: self.rejecting_bulks.contains(&position),
        })
    }

    async fn create_index(&self, settings: &IndexSettings) -> Result<Value, TransportError> {
        self.record(Call::CreateIndex(*settings));
        if self.fail_create {
            return Err(TransportError::Status {
                status: 400,
                body: "resource_already_exists_exception".to_string(),
            });
        }
        Ok(json!({ "acknowledged": true }))
    }

    async fn delete_index(&self) -> Result<Value, TransportError> {
        self.record(Call::DeleteIndex);
        Ok(json!({ "acknowledged": true }))
    }

    async fn set_refresh_interval(&self, interval: &str) -> Result<(), TransportError> {
        self.record(Call::SetRefresh(interval.to_string()));
        Ok(())
    }

    async fn open_scroll(&self, query: &Value) -> Result<SearchPage, TransportError> {
        self.record(Call::OpenScroll(query.clone()));
        if self.fail_open {
            return Err(Self::status_error());
        }
        Ok(SearchPage {
            scroll_id: Some(self.next_scroll_id()),
            took: self.took,
            total_hits: Some(self.total_hits),
            hit_count: 0,
        })
    }

    async fn next_scroll(&self, scroll_id: &str) -> Result<SearchPage, TransportError> {
        self.record(Call::NextScroll(scroll_id.to_string()));
        let advanced = self.count(|c| matches!(c, Call::NextScroll(_))) as u64;
        if self
            .scroll_failure_after
            .is_some_and(|pages| advanced > pages)
        {
            return Err(Self::status_error());
        }
        Ok(SearchPage {
            scroll_id: Some(self.next_scroll_id()),
            took: self.took,
            total_hits: Some(self.total_hits),
            hit_count: 0,
        })
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError> {
        self.record(Call::ClearScroll(scroll_id.to_string()));
        Ok(())
    }

    async fn search(&self, query: &Value) -> Result<SearchPage, TransportError> {
        self.record(Call::Search(query.clone()));
        Ok(SearchPage {
            scroll_id: None,
            took: self.took,
            total_hits: Some(self.total_hits),
            hit_count: 0,
        })
    }
}
