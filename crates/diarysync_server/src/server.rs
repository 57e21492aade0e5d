//! Main sync server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use diarysync_protocol::{
    ErrorResponse, ListRequest, ListResponse, Operation, SaveRequest, SaveResponse, ServiceInfo,
    SyncMessage, SyncRequest, SyncResponse, WireMessage,
};
use diarysync_storage::{InMemoryStore, RecordStore};
use std::sync::Arc;
use tracing::warn;

/// The sync server.
///
/// This server handles the four service operations over a shared record
/// store. It has no transport of its own: an HTTP layer maps routes to
/// [`Operation`]s and passes request bodies to [`SyncServer::handle_json`].
///
/// # Example
///
/// ```
/// use diarysync_protocol::{Record, SyncRequest};
/// use diarysync_server::{ServerConfig, SyncServer};
///
/// let server = SyncServer::in_memory(ServerConfig::default());
/// let response = server
///     .handle_sync(SyncRequest::new("daily", vec![Record::new("1")]))
///     .unwrap();
/// assert_eq!(response.uploaded, 1);
/// ```
pub struct SyncServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Creates a sync server over an existing store.
    pub fn new(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = RequestHandler::new(Arc::clone(&context));

        Self { handler, context }
    }

    /// Creates a sync server with a fresh in-memory store.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(InMemoryStore::new()))
    }

    /// Describes the service.
    pub fn handle_info(&self) -> ServiceInfo {
        self.handler.handle_info()
    }

    /// Handles a listing request.
    pub fn handle_list(&self, request: ListRequest) -> ServerResult<ListResponse> {
        self.handler.handle_list(request)
    }

    /// Handles a bulk save request.
    pub fn handle_save(&self, request: SaveRequest) -> ServerResult<SaveResponse> {
        self.handler.handle_save(request)
    }

    /// Handles a sync request.
    pub fn handle_sync(&self, request: SyncRequest) -> ServerResult<SyncResponse> {
        self.handler.handle_sync(request)
    }

    /// Handles a message (dispatches to the appropriate handler).
    ///
    /// Failures come back as [`SyncMessage::Error`].
    pub fn handle_message(&self, message: SyncMessage) -> SyncMessage {
        let result = match message {
            SyncMessage::InfoRequest => Ok(SyncMessage::InfoResponse(self.handle_info())),
            SyncMessage::ListRequest(req) => self.handle_list(req).map(SyncMessage::ListResponse),
            SyncMessage::SaveRequest(req) => self.handle_save(req).map(SyncMessage::SaveResponse),
            SyncMessage::SyncRequest(req) => self.handle_sync(req).map(SyncMessage::SyncResponse),
            _ => Err(ServerError::invalid_request("unexpected message type")),
        };
        result.unwrap_or_else(|e| SyncMessage::Error(ErrorResponse::new(e.to_string())))
    }

    /// Decodes a JSON request body, handles it and encodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the failure so the caller can pick a status; the body to
    /// send for it comes from [`SyncServer::error_body`].
    pub fn handle_json(&self, operation: Operation, body: &[u8]) -> ServerResult<Vec<u8>> {
        let request = SyncMessage::decode_request(operation, body)?;
        let response = match request {
            SyncMessage::InfoRequest => SyncMessage::InfoResponse(self.handle_info()),
            SyncMessage::ListRequest(req) => SyncMessage::ListResponse(self.handle_list(req)?),
            SyncMessage::SaveRequest(req) => SyncMessage::SaveResponse(self.handle_save(req)?),
            SyncMessage::SyncRequest(req) => SyncMessage::SyncResponse(self.handle_sync(req)?),
            _ => return Err(ServerError::Internal("decoded a non-request message".into())),
        };
        Ok(response.encode_response()?)
    }

    /// Encodes the JSON error body for a failure.
    pub fn error_body(error: &ServerError) -> Vec<u8> {
        if error.is_server_error() {
            warn!(error = %error, "request failed");
        }
        ErrorResponse::new(error.to_string())
            .encode()
            .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec())
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.context.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diarysync_protocol::Record;

    #[test]
    fn server_lifecycle() {
        let server = SyncServer::in_memory(ServerConfig::default());
        assert_eq!(server.config().default_app_id, "daily");
        assert!(server.store().is_empty().unwrap());
    }

    #[test]
    fn message_dispatch() {
        let server = SyncServer::in_memory(ServerConfig::default());

        let response = server.handle_message(SyncMessage::InfoRequest);
        assert!(matches!(response, SyncMessage::InfoResponse(_)));

        let response = server.handle_message(SyncMessage::SyncRequest(SyncRequest::new(
            "daily",
            vec![Record::new("1")],
        )));
        assert!(matches!(response, SyncMessage::SyncResponse(ref r) if r.uploaded == 1));
    }

    #[test]
    fn message_dispatch_reports_errors() {
        let server = SyncServer::in_memory(ServerConfig::default());
        let response = server.handle_message(SyncMessage::SyncRequest(SyncRequest::default()));
        match response {
            SyncMessage::Error(e) => assert!(e.error.contains("appId")),
            other => panic!("unexpected response: {other:?}"),
        }

        let response = server.handle_message(SyncMessage::Error(ErrorResponse::new("x")));
        assert!(matches!(response, SyncMessage::Error(_)));
    }

    #[test]
    fn json_save_and_list() {
        let server = SyncServer::in_memory(ServerConfig::default());

        let body = server
            .handle_json(
                Operation::Save,
                br#"{"id":"1","content":"hello","tags":["x","y"]}"#,
            )
            .unwrap();
        assert_eq!(body, br#"{"success":true,"count":1}"#);

        let body = server
            .handle_json(Operation::List, br#"{"appId":"daily"}"#)
            .unwrap();
        let listed = ListResponse::decode(&body).unwrap();
        assert_eq!(listed.entries.len(), 1);
        assert_eq!(listed.entries[0].tags, vec!["x", "y"]);
    }

    #[test]
    fn json_bad_body_is_client_error() {
        let server = SyncServer::in_memory(ServerConfig::default());
        let err = server.handle_json(Operation::Sync, b"{").unwrap_err();
        assert!(err.is_client_error());

        let body = SyncServer::error_body(&err);
        let decoded = ErrorResponse::decode(&body).unwrap();
        assert!(decoded.error.contains("protocol error"));
    }
}
