//! Paginated bulk import from the commerce platform.
//!
//! Pages are fetched sequentially, newest first. Each record is normalized,
//! filtered and upserted on its own: a record that fails to map or store is
//! recorded in the summary and the run moves on. A failed page fetch aborts
//! the run, since the platform connection itself is presumed broken.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::coercion::parse_external_id;
use super::normalizer::normalize_record;
use super::ports::{
    BulkImportCommand, BulkImportError, BulkImportRequest, CommerceSource, CommerceSourceError,
    ImportFailure, ImportSummary, RecordReconciler,
};
use super::{CanonicalRecord, TraceId};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PER_PAGE: u32 = 50;
/// Largest page size the platform accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Import filters applied after normalization, before reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportFilters {
    statuses: Vec<String>,
    since: Option<DateTime<Utc>>,
}

impl ImportFilters {
    /// Build filters from a status allow-list and an optional cutoff.
    ///
    /// Blank statuses are dropped; the rest compare case-insensitively.
    pub fn new(statuses: &[String], since: Option<DateTime<Utc>>) -> Self {
        let statuses = statuses
            .iter()
            .map(|status| status.trim().to_lowercase())
            .filter(|status| !status.is_empty())
            .collect();
        Self { statuses, since }
    }

    /// Whether a normalized record should be skipped.
    pub fn excludes(&self, record: &CanonicalRecord) -> bool {
        if !self.statuses.is_empty() {
            let status = record.status().map(str::to_lowercase);
            if !status.is_some_and(|status| self.statuses.contains(&status)) {
                return true;
            }
        }
        match (self.since, record.latest_activity()) {
            (Some(cutoff), Some(latest)) => latest < cutoff,
            _ => false,
        }
    }
}

/// Clamp a requested page size into `1..=MAX_PER_PAGE`.
pub fn clamp_per_page(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE)
}

/// Flatten status arguments, splitting comma-separated values.
pub fn split_statuses<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Domain service implementing [`BulkImportCommand`].
#[derive(Clone)]
pub struct BulkImportService {
    source: Arc<dyn CommerceSource>,
    reconciler: Arc<dyn RecordReconciler>,
    default_per_page: u32,
}

impl BulkImportService {
    /// Create an importer using [`DEFAULT_PER_PAGE`] when requests omit a page size.
    pub fn new(source: Arc<dyn CommerceSource>, reconciler: Arc<dyn RecordReconciler>) -> Self {
        Self {
            source,
            reconciler,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Override the page size used when requests omit one.
    #[must_use]
    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = clamp_per_page(Some(per_page));
        self
    }

    async fn import_record(
        &self,
        request: &BulkImportRequest,
        filters: &ImportFilters,
        raw: &Value,
        summary: &mut ImportSummary,
    ) {
        let record = match normalize_record(request.entity, raw) {
            Ok(record) => record,
            Err(err) => {
                record_failure(summary, raw, err.to_string());
                return;
            }
        };
        if filters.excludes(&record) {
            summary.skipped += 1;
            return;
        }
        match self.reconciler.upsert(&record).await {
            Ok(_) => summary.upserted += 1,
            Err(err) => record_failure(summary, raw, err.to_string()),
        }
    }
}

fn record_failure(summary: &mut ImportSummary, raw: &Value, error: String) {
    let id = raw.get("id").and_then(|id| parse_external_id(Some(id)));
    warn!(external_id = ?id, %error, "import record failed");
    summary.failures.push(ImportFailure { id, error });
}

fn map_source_error(error: CommerceSourceError) -> BulkImportError {
    BulkImportError::source(error.to_string())
}

#[async_trait]
impl BulkImportCommand for BulkImportService {
    async fn import(&self, request: BulkImportRequest) -> Result<ImportSummary, BulkImportError> {
        let per_page = clamp_per_page(request.per_page.or(Some(self.default_per_page)));
        let max_pages = request.max_pages.map(|pages| pages.max(1));
        let filters = ImportFilters::new(&request.statuses, request.since);
        let mut summary = ImportSummary::default();

        let mut page = 1_u32;
        loop {
            let records = self
                .source
                .fetch_page(request.entity, page, per_page)
                .await
                .map_err(|err| {
                    warn!(entity = %request.entity, page, error = %err, "import page fetch failed");
                    map_source_error(err)
                })?;
            summary.pages = page;
            info!(
                entity = %request.entity,
                page,
                received = records.len(),
                "import page fetched"
            );
            if records.is_empty() {
                break;
            }

            for raw in &records {
                summary.total += 1;
                self.import_record(&request, &filters, raw, &mut summary).await;
            }

            let short_page = u32::try_from(records.len()).is_ok_and(|len| len < per_page);
            let ceiling_reached = max_pages.is_some_and(|ceiling| page >= ceiling);
            if short_page || ceiling_reached {
                break;
            }
            page += 1;
        }

        info!(
            trace_id = %TraceId::current_or_generate(),
            entity = %request.entity,
            total = summary.total,
            upserted = summary.upserted,
            skipped = summary.skipped,
            failed = summary.failures.len(),
            pages = summary.pages,
            "import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "bulk_import_tests.rs"]
mod tests;
