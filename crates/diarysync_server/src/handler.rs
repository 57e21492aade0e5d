//! Request handlers for the service operations.

use crate::bulk_save::BulkSaver;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::reconciler::Reconciler;
use diarysync_protocol::{
    ListRequest, ListResponse, Record, SaveRequest, SaveResponse, ServiceInfo, SyncRequest,
    SyncResponse,
};
use diarysync_storage::RecordStore;
use std::sync::Arc;

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Record store (shared across all handlers).
    pub store: Arc<dyn RecordStore>,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }
}

/// Handler for service requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
    reconciler: Reconciler,
    saver: BulkSaver,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&context.store));
        let saver = BulkSaver::new(Arc::clone(&context.store), context.config.clone());
        Self {
            context,
            reconciler,
            saver,
        }
    }

    /// Describes the service.
    pub fn handle_info(&self) -> ServiceInfo {
        ServiceInfo::running(&self.context.config.default_app_id)
    }

    /// Lists a partition, newest first.
    pub fn handle_list(&self, request: ListRequest) -> ServerResult<ListResponse> {
        let app_id = self
            .context
            .config
            .resolve_app_id(request.app_id.as_deref());
        let entries = self
            .context
            .store
            .list_by_partition(app_id)?
            .into_iter()
            .map(Record::from_row)
            .collect();
        Ok(ListResponse { entries })
    }

    /// Handles a bulk save request.
    pub fn handle_save(&self, request: SaveRequest) -> ServerResult<SaveResponse> {
        let count = self.saver.save_entries(&request.entries)?;
        Ok(SaveResponse::success(count))
    }

    /// Handles a sync request.
    pub fn handle_sync(&self, request: SyncRequest) -> ServerResult<SyncResponse> {
        let app_id = request
            .app_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServerError::invalid_request("appId is required for sync"))?;

        let outcome = self.reconciler.reconcile(app_id, &request.local_entries)?;
        Ok(SyncResponse {
            downloaded: outcome.to_download,
            uploaded: outcome.uploaded_count,
        })
    }
}
