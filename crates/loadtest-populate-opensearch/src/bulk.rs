//! Bulk request accumulation.
//!
//! Documents are serialized into newline-delimited JSON pairs, an action line
//! followed by the document itself:
//!
//! ```text
//! {"index":{"_index":"test","_id":7}}
//! {"name":"x1Yz","age":42,"_id":7}
//! ```
//!
//! [`BulkBatch`] hands back a [`BulkPayload`] every time the number of
//! documents added is a multiple of the batch size, and once more from
//! [`BulkBatch::finish`] for any partial batch.

use loadtest_generator::Document;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct BulkAction<'a> {
    index: IndexAction<'a>,
}

#[derive(Serialize)]
struct IndexAction<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a Value>,
}

/// Serialize the action line for a document (without trailing newline).
///
/// A document carrying `_id` is indexed under that id; otherwise the store
/// assigns one.
pub fn action_line(index_name: &str, doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string(&BulkAction {
        index: IndexAction {
            index: index_name,
            id: doc.id(),
        },
    })
}

/// One flushed batch, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPayload {
    /// NDJSON request body.
    pub body: String,
    /// Number of documents in the body.
    pub documents: usize,
}

/// Accumulates documents into bulk request bodies.
#[derive(Debug)]
pub struct BulkBatch {
    index_name: String,
    batch_size: u64,
    buffer: String,
    pending: usize,
    emitted: u64,
}

impl BulkBatch {
    /// Create an empty batch. A batch size of zero is treated as one.
    pub fn new(index_name: impl Into<String>, batch_size: usize) -> Self {
        Self {
            index_name: index_name.into(),
            batch_size: batch_size.max(1) as u64,
            buffer: String::new(),
            pending: 0,
            emitted: 0,
        }
    }

    /// Append a document, returning a payload when the batch is full.
    pub fn add(&mut self, doc: &Document) -> Result<Option<BulkPayload>, serde_json::Error> {
        let action = action_line(&self.index_name, doc)?;
        let body = serde_json::to_string(doc)?;

        self.buffer.push_str(&action);
        self.buffer.push('\n');
        self.buffer.push_str(&body);
        self.buffer.push('\n');
        self.pending += 1;
        self.emitted += 1;

        if self.emitted % self.batch_size == 0 {
            Ok(Some(self.take()))
        } else {
            Ok(None)
        }
    }

    /// Flush whatever is left, if anything.
    pub fn finish(&mut self) -> Option<BulkPayload> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    /// Total documents added since creation.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Documents buffered since the last flush.
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn take(&mut self) -> BulkPayload {
        let documents = std::mem::take(&mut self.pending);
        BulkPayload {
            body: std::mem::take(&mut self.buffer),
            documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_generator::{DocumentGenerator, IdPolicy, Schema};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => Document::from(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_action_line_without_id() {
        let line = action_line("test", &doc(json!({"a": 1}))).unwrap();
        assert_eq!(line, r#"{"index":{"_index":"test"}}"#);
    }

    #[test]
    fn test_action_line_with_id() {
        let line = action_line("logs", &doc(json!({"a": 1, "_id": 17}))).unwrap();
        assert_eq!(line, r#"{"index":{"_index":"logs","_id":17}}"#);
    }

    #[test]
    fn test_payload_format() {
        let mut batch = BulkBatch::new("test", 10);
        assert!(batch.add(&doc(json!({"a": 1}))).unwrap().is_none());
        assert!(batch.add(&doc(json!({"b": "x", "_id": "k"}))).unwrap().is_none());

        let payload = batch.finish().unwrap();
        assert_eq!(payload.documents, 2);
        assert_eq!(
            payload.body,
            "{\"index\":{\"_index\":\"test\"}}\n{\"a\":1}\n\
             {\"index\":{\"_index\":\"test\",\"_id\":\"k\"}}\n{\"b\":\"x\",\"_id\":\"k\"}\n"
        );
        assert!(batch.finish().is_none());
    }

    #[test]
    fn test_flush_sizes() {
        let mut generator = DocumentGenerator::new(Schema::parse("a:int").unwrap(), Some(42));
        let mut batch = BulkBatch::new("test", 1000);
        let mut flushed = Vec::new();

        for doc in generator.documents(2500) {
            if let Some(payload) = batch.add(&doc).unwrap() {
                flushed.push(payload.documents);
            }
        }
        if let Some(payload) = batch.finish() {
            flushed.push(payload.documents);
        }

        assert_eq!(flushed, vec![1000, 1000, 500]);
        assert_eq!(batch.emitted(), 2500);
        assert_eq!(batch.pending(), 0);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_flush() {
        let mut batch = BulkBatch::new("test", 3);
        let mut flushes = 0;
        for i in 0..9 {
            if batch.add(&doc(json!({ "i": i }))).unwrap().is_some() {
                flushes += 1;
            }
        }
        assert_eq!(flushes, 3);
        assert!(batch.finish().is_none());
    }

    #[test]
    fn test_payload_lines_count() {
        let mut batch = BulkBatch::new("test", 4);
        let mut payload = None;
        for i in 0..4 {
            payload = batch.add(&doc(json!({ "i": i }))).unwrap();
        }
        let payload = payload.unwrap();
        assert_eq!(payload.body.lines().count(), 8);
        assert!(payload.body.ends_with('\n'));
    }

    #[test]
    fn test_id_round_trip() {
        let mut generator = DocumentGenerator::new(Schema::parse("a:str").unwrap(), Some(42))
            .with_id_policy(IdPolicy::Sequential)
            .with_start_id(100);
        let mut batch = BulkBatch::new("test", 100);

        let docs: Vec<Document> = generator.documents(5).collect();
        for doc in &docs {
            batch.add(doc).unwrap();
        }
        let payload = batch.finish().unwrap();
        let lines: Vec<&str> = payload.body.lines().collect();

        for (pair, doc) in lines.chunks(2).zip(&docs) {
            let action: Value = serde_json::from_str(pair[0]).unwrap();
            let body: Value = serde_json::from_str(pair[1]).unwrap();
            assert_eq!(action["index"]["_id"], *doc.id().unwrap());
            assert_eq!(action["index"]["_id"], body["_id"]);
        }
    }

    #[test]
    fn test_zero_batch_size_flushes_every_document() {
        let mut batch = BulkBatch::new("test", 0);
        assert!(batch.add(&doc(json!({"a": 1}))).unwrap().is_some());
        assert!(batch.add(&doc(json!({"a": 2}))).unwrap().is_some());
    }
}
