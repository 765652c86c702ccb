use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::affiliate::client::QueryExecutor;
use crate::affiliate::{DocType, OutcomeRecord};
use crate::config::Category;
use crate::doctype::DocTypeRegistry;
use crate::input;

/// Walks one category's input file and queries every identifier in order,
/// pausing between consecutive requests so the backend is not hammered.
pub struct BatchRunner<'a> {
    executor: &'a QueryExecutor,
    doctypes: &'a DocTypeRegistry,
    delay: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(executor: &'a QueryExecutor, doctypes: &'a DocTypeRegistry, delay: Duration) -> Self {
        Self {
            executor,
            doctypes,
            delay,
        }
    }

    /// Returns `None` when the category's input file does not exist, so a
    /// run covering all categories silently skips the absent ones.
    pub async fn run_category(
        &self,
        dir: &Path,
        category: &Category,
    ) -> anyhow::Result<Option<Vec<OutcomeRecord>>> {
        let path = dir.join(category.input_file);
        if !path.exists() {
            tracing::debug!("Skipping {}: no {} present", category.id, category.input_file);
            return Ok(None);
        }

        let identifiers = input::load_identifiers(&path)?;
        let code = self.doctypes.resolve(category.doc_type_name);
        let doc = DocType {
            name: self
                .doctypes
                .name_for(&code)
                .unwrap_or(category.doc_type_name)
                .to_string(),
            code,
        };

        let total = identifiers.len();
        println!(
            "Loaded {} identifiers from {} (document type {})",
            total, category.input_file, doc.code
        );

        let mut records = Vec::with_capacity(total);
        for (i, identifier) in identifiers.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }
            print!("[{}/{}] {} ... ", i + 1, total, identifier);
            let _ = std::io::stdout().flush();

            let record = self.executor.query(identifier, &doc).await;
            println!("{} - {}", record.status, record.message);
            records.push(record);
        }

        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::affiliate::{LookupTransport, OutcomeStatus, RawResponse, TokenSource};
    use crate::config::CATEGORIES;

    /// Answers every lookup with a 404 and counts the calls.
    struct NotFoundTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LookupTransport for NotFoundTransport {
        async fn lookup(
            &self,
            _identifier: &str,
            _doc_type_code: &str,
            _token: Option<&str>,
        ) -> anyhow::Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse {
                status: 404,
                body: Some(json!({})),
            })
        }
    }

    struct NoTokens;

    #[async_trait]
    impl TokenSource for NoTokens {
        async fn current(&self) -> Option<String> {
            None
        }

        async fn refresh(&self, _stale: Option<&str>) -> Option<String> {
            None
        }
    }

    fn runner_parts() -> (Arc<NotFoundTransport>, QueryExecutor) {
        let transport = Arc::new(NotFoundTransport {
            calls: AtomicUsize::new(0),
        });
        let executor = QueryExecutor::new(transport.clone(), Arc::new(NoTokens));
        (transport, executor)
    }

    #[tokio::test]
    async fn test_missing_input_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let (transport, executor) = runner_parts();
        let doctypes = DocTypeRegistry::default();
        let runner = BatchRunner::new(&executor, &doctypes, Duration::ZERO);

        let result = runner
            .run_category(dir.path(), &CATEGORIES[0])
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_each_identifier_is_queried_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES[0].input_file), "111\n222\n").unwrap();
        let (transport, executor) = runner_parts();
        let doctypes = DocTypeRegistry::default();
        let runner = BatchRunner::new(&executor, &doctypes, Duration::ZERO);

        let records = runner
            .run_category(dir.path(), &CATEGORIES[0])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "111");
        assert_eq!(records[1].identifier, "222");
        assert!(records.iter().all(|r| r.status == OutcomeStatus::NoRegistrado));
    }

    #[tokio::test]
    async fn test_empty_input_file_yields_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES[1].input_file), "\n  \n").unwrap();
        let (transport, executor) = runner_parts();
        let doctypes = DocTypeRegistry::default();
        let runner = BatchRunner::new(&executor, &doctypes, Duration::ZERO);

        let records = runner
            .run_category(dir.path(), &CATEGORIES[1])
            .await
            .unwrap()
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_document_type_comes_from_registry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES[0].input_file), "111\n").unwrap();
        let (_transport, executor) = runner_parts();
        let doctypes = DocTypeRegistry::parse("Cedula: 4\n");
        let runner = BatchRunner::new(&executor, &doctypes, Duration::ZERO);

        let records = runner
            .run_category(dir.path(), &CATEGORIES[0])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(records[0].document_type_code, "4");
        assert_eq!(records[0].document_type_name, "Cedula");
    }

    #[tokio::test]
    async fn test_unmapped_category_falls_back_to_default_code() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES[2].input_file), "900\n").unwrap();
        let (_transport, executor) = runner_parts();
        let doctypes = DocTypeRegistry::default();
        let runner = BatchRunner::new(&executor, &doctypes, Duration::ZERO);

        let records = runner
            .run_category(dir.path(), &CATEGORIES[2])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(records[0].document_type_code, crate::config::DEFAULT_DOC_TYPE);
        assert_eq!(records[0].document_type_name, CATEGORIES[2].doc_type_name);
    }
}
