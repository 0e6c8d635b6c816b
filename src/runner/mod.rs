pub mod report;

pub use report::{DiagnosticReport, Step};

use crate::config::SearchConfig;
use crate::search::{DocumentBody, DocumentRef, SearchBackend, Tweet};
use tracing::{debug, info, warn};

/// Pre-serialized body of the second sample document
const RAW_TWEET: &str = r#"{"user" : "olivere", "message" : "It's a Raggy Waltz"}"#;

/// Run the fixed diagnostic sequence against `backend`.
///
/// Every step runs even when an earlier one failed; failures are recorded in
/// the report and never abort the run.
pub async fn run(backend: &dyn SearchBackend, settings: &SearchConfig) -> DiagnosticReport {
    let index = settings.index.as_str();
    let doc_type = settings.doc_type.as_str();
    let mut report = DiagnosticReport::new();

    report.succeeded(Step::Endpoint, backend.url());

    if settings.probe {
        match backend.probe().await {
            Ok(probe) => report.succeeded(
                Step::Probe,
                format!("status = {}, body = {}", probe.status, probe.body.trim_end()),
            ),
            Err(e) => report.failed(Step::Probe, e),
        }
    }

    let exists = match backend.index_exists(index).await {
        Ok(exists) => {
            let verb = if exists { "exists" } else { "does not exist" };
            report.succeeded(Step::IndexExists, format!("index {index} {verb}"));
            Some(exists)
        }
        Err(e) => {
            report.failed(Step::IndexExists, e);
            None
        }
    };

    // Unknown existence still attempts creation
    if exists == Some(true) {
        report.skipped(Step::CreateIndex, format!("index {index} already exists"));
    } else {
        match backend.create_index(index).await {
            Ok(created) => {
                if created.acknowledged {
                    info!(
                        index,
                        shards_acknowledged = created.shards_acknowledged,
                        "Index created"
                    );
                } else {
                    warn!(index, "Index creation was not acknowledged");
                }
                report.succeeded(
                    Step::CreateIndex,
                    format!("created index {index} (acknowledged={})", created.acknowledged),
                );
            }
            Err(e) => report.failed(Step::CreateIndex, e),
        }
    }

    match DocumentBody::from_serialize(&Tweet::new("olivere", "Take Five", 0)) {
        Ok(body) => {
            let target = DocumentRef::new(index, doc_type, "1");
            index_document(backend, &mut report, target, body).await
        }
        Err(e) => report.failed(Step::IndexDocument("1".to_string()), e),
    }

    index_document(
        backend,
        &mut report,
        DocumentRef::new(index, doc_type, "2"),
        DocumentBody::Raw(RAW_TWEET.to_string()),
    )
    .await;

    let target = DocumentRef::new(index, doc_type, "1");
    let step = Step::FetchDocument(target.id.clone());
    match backend.get_document(&target).await {
        Ok(doc) if doc.found => {
            debug!(id = %doc.id, source = ?doc.source, "Fetched document");
            report.succeeded(
                step,
                format!(
                    "Got document {} in version {} from index {}, type {}",
                    doc.id,
                    doc.version.unwrap_or_default(),
                    doc.index,
                    doc.doc_type
                ),
            )
        }
        Ok(doc) => report.succeeded(
            step,
            format!("document {} not found in index {}", doc.id, doc.index),
        ),
        Err(e) => report.failed(step, e),
    }

    info!(
        steps = report.steps.len(),
        failures = report.failure_count(),
        "Diagnostic run finished"
    );
    report
}

async fn index_document(
    backend: &dyn SearchBackend,
    report: &mut DiagnosticReport,
    target: DocumentRef,
    body: DocumentBody,
) {
    let step = Step::IndexDocument(target.id.clone());
    match backend.index_document(&target, body).await {
        Ok(put) => {
            let result = put.result.map(|r| format!(", {r}")).unwrap_or_default();
            report.succeeded(
                step,
                format!(
                    "Indexed tweet {} to index {}, type {} (version {}{result})",
                    put.id, put.index, put.doc_type, put.version
                ),
            )
        }
        Err(e) => report.failed(step, e),
    }
}
