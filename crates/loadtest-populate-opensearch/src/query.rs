//! One-shot search with a user-supplied query file.

use crate::client::{SearchBackend, SearchPage};
use crate::error::{SourceError, TransportError};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Errors from a custom query run.
#[derive(Debug, thiserror::Error)]
pub enum CustomQueryError {
    /// The query file could not be read or parsed.
    #[error("Failed to load query: {0}")]
    Source(#[from] SourceError),

    /// The search request failed.
    #[error("Search failed: {0}")]
    Transport(#[from] TransportError),
}

/// Read a JSON query document.
pub fn load_query<P: AsRef<Path>>(path: P) -> Result<Value, SourceError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Forward the query in `path` to the search endpoint unchanged.
pub async fn run_custom_query<B, P>(backend: &B, path: P) -> Result<SearchPage, CustomQueryError>
where
    B: SearchBackend + ?Sized,
    P: AsRef<Path>,
{
    let query = load_query(path)?;
    let page = backend.search(&query).await?;
    info!("Total Querying time taken: {}ms", page.took);
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingBackend};
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn test_query_forwarded_verbatim() {
        let query = json!({"query": {"match": {"name": "abc"}}, "size": 5});
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{query}").unwrap();

        let backend = RecordingBackend::new().with_took(9);
        let page = run_custom_query(&backend, file.path()).await.unwrap();

        assert_eq!(page.took, 9);
        assert_eq!(backend.calls(), vec![Call::Search(query)]);
    }

    #[tokio::test]
    async fn test_missing_query_file() {
        let backend = RecordingBackend::new();
        let err = run_custom_query(&backend, "/nonexistent/query.json")
            .await
            .unwrap_err();

        assert!(matches!(err, CustomQueryError::Source(SourceError::Io(_))));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_query_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let backend = RecordingBackend::new();
        let err = run_custom_query(&backend, file.path()).await.unwrap_err();
        assert!(matches!(err, CustomQueryError::Source(SourceError::Json(_))));
    }
}
