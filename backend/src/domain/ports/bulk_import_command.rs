//! Driving port for paginated bulk imports from the commerce platform.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::define_port_error;
use crate::domain::CommerceEntity;

/// Parameters for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkImportRequest {
    pub entity: CommerceEntity,
    /// Records per page; clamped to `1..=100` by the importer.
    pub per_page: Option<u32>,
    /// Page-count ceiling; unbounded when absent.
    pub max_pages: Option<u32>,
    /// Status allow-list, compared case-insensitively. Empty means no filter.
    pub statuses: Vec<String>,
    /// Skip records whose latest activity is strictly before this instant.
    pub since: Option<DateTime<Utc>>,
}

impl BulkImportRequest {
    /// Import every record of `entity` with default paging and no filters.
    pub fn all(entity: CommerceEntity) -> Self {
        Self {
            entity,
            per_page: None,
            max_pages: None,
            statuses: Vec::new(),
            since: None,
        }
    }
}

/// One record that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    /// Upstream id when one could be read from the raw record.
    pub id: Option<i64>,
    pub error: String,
}

/// Audit trail of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records received from the platform.
    pub total: u64,
    pub upserted: u64,
    /// Records excluded by the status or since filters.
    pub skipped: u64,
    /// Pages fetched, including a trailing empty page.
    pub pages: u32,
    pub failures: Vec<ImportFailure>,
}

define_port_error! {
    /// Errors that abort an import run.
    pub enum BulkImportError {
        /// A page fetch failed; the platform connection is presumed broken.
        Source { message: String } =>
            "bulk import aborted: {message}",
    }
}

/// Driving port used by the import endpoints and CLI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BulkImportCommand: Send + Sync {
    /// Walk the platform's list endpoint and reconcile each record.
    async fn import(&self, request: BulkImportRequest) -> Result<ImportSummary, BulkImportError>;
}

/// Fixture command reporting an empty platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBulkImportCommand;

#[async_trait]
impl BulkImportCommand for FixtureBulkImportCommand {
    async fn import(&self, _request: BulkImportRequest) -> Result<ImportSummary, BulkImportError> {
        Ok(ImportSummary {
            pages: 1,
            ..ImportSummary::default()
        })
    }
}
