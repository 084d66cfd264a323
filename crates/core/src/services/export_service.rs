use crate::repositories::Store;
use std::sync::Arc;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::export_dto::PendingExportDto;
use tracing::info;

/// Hands unsettled transactions to the downstream sheet exporter and records
/// which ones it has already taken.
pub struct ExportService {
    store: Arc<dyn Store>,
}

impl ExportService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn pending_exports(&self) -> Result<Vec<PendingExportDto>, ApiError> {
        self.store.pending_exports()
    }

    pub fn mark_pushed(&self, transaction_ids: &[String]) -> Result<usize, ApiError> {
        let ids: Vec<String> = transaction_ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let marked = self.store.mark_pushed(&ids)?;
        info!(requested = ids.len(), marked, "export markers written");
        Ok(marked)
    }
}
