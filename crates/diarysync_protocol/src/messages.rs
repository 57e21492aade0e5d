//! Protocol messages for listing, saving and syncing records.

use crate::error::{ProtocolError, ProtocolResult};
use crate::lenient;
use crate::record::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// JSON encoding shared by every message.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Encodes to JSON bytes.
    fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes from JSON bytes.
    fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A logical operation offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Describe the service.
    Info,
    /// List one partition.
    List,
    /// Create or overwrite records.
    Save,
    /// Reconcile a client's records with a partition.
    Sync,
}

impl Operation {
    /// Operations listed in [`ServiceInfo`].
    pub const PUBLIC: [Operation; 3] = [Operation::List, Operation::Save, Operation::Sync];

    /// Human-readable endpoint description.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Info => "GET  /",
            Operation::List => "GET  /api/entries?appId=xxx",
            Operation::Save => "POST /api/entries",
            Operation::Sync => "POST /api/sync",
        }
    }
}

/// A sync protocol message.
#[derive(Debug, Clone)]
pub enum SyncMessage {
    /// Service description request.
    InfoRequest,
    /// Service description.
    InfoResponse(ServiceInfo),
    /// Partition listing request.
    ListRequest(ListRequest),
    /// Partition listing.
    ListResponse(ListResponse),
    /// Bulk save request.
    SaveRequest(SaveRequest),
    /// Bulk save result.
    SaveResponse(SaveResponse),
    /// Reconciliation request.
    SyncRequest(SyncRequest),
    /// Reconciliation result.
    SyncResponse(SyncResponse),
    /// Failure of any request.
    Error(ErrorResponse),
}

impl SyncMessage {
    /// Decodes the request body for an operation.
    pub fn decode_request(operation: Operation, body: &[u8]) -> ProtocolResult<Self> {
        Ok(match operation {
            Operation::Info => SyncMessage::InfoRequest,
            Operation::List if body.is_empty() => SyncMessage::ListRequest(ListRequest::default()),
            Operation::List => SyncMessage::ListRequest(ListRequest::decode(body)?),
            Operation::Save => SyncMessage::SaveRequest(SaveRequest::decode(body)?),
            Operation::Sync => SyncMessage::SyncRequest(SyncRequest::decode(body)?),
        })
    }

    /// Encodes a response body. Requests have no response encoding.
    pub fn encode_response(&self) -> ProtocolResult<Vec<u8>> {
        match self {
            SyncMessage::InfoResponse(m) => m.encode(),
            SyncMessage::ListResponse(m) => m.encode(),
            SyncMessage::SaveResponse(m) => m.encode(),
            SyncMessage::SyncResponse(m) => m.encode(),
            SyncMessage::Error(m) => m.encode(),
            _ => Err(ProtocolError::invalid_structure(
                "request messages have no response encoding",
            )),
        }
    }
}

/// Request to list a partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Partition to list; the server default when absent.
    #[serde(
        default,
        deserialize_with = "lenient::deserialize_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_id: Option<String>,
}

impl ListRequest {
    /// Creates a listing request for a partition.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
        }
    }
}

impl WireMessage for ListRequest {}

/// Records of a partition, newest first. Encodes as a bare array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListResponse {
    /// The listed records.
    pub entries: Vec<Record>,
}

impl WireMessage for ListResponse {}

/// Records to create or overwrite.
///
/// Accepts either a single record object or an array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "OneOrMany", into = "Vec<Record>")]
pub struct SaveRequest {
    /// Records in submission order.
    pub entries: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Record>),
    One(Box<Record>),
}

impl From<OneOrMany> for SaveRequest {
    fn from(value: OneOrMany) -> Self {
        let entries = match value {
            OneOrMany::Many(entries) => entries,
            OneOrMany::One(entry) => vec![*entry],
        };
        Self { entries }
    }
}

impl From<SaveRequest> for Vec<Record> {
    fn from(request: SaveRequest) -> Self {
        request.entries
    }
}

impl SaveRequest {
    /// Creates a save request.
    pub fn new(entries: Vec<Record>) -> Self {
        Self { entries }
    }
}

impl WireMessage for SaveRequest {}

/// Result of a bulk save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Always true; failures are reported as [`ErrorResponse`].
    pub success: bool,
    /// Number of records processed.
    pub count: usize,
}

impl SaveResponse {
    /// Creates a successful save response.
    pub fn success(count: usize) -> Self {
        Self {
            success: true,
            count,
        }
    }
}

impl WireMessage for SaveResponse {}

/// Request to reconcile a client's records with a partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Partition to synchronize. Required by the server.
    #[serde(
        default,
        deserialize_with = "lenient::deserialize_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_id: Option<String>,
    /// Every record the client currently holds.
    #[serde(default)]
    pub local_entries: Vec<Record>,
}

impl SyncRequest {
    /// Creates a sync request.
    pub fn new(app_id: impl Into<String>, local_entries: Vec<Record>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            local_entries,
        }
    }
}

impl WireMessage for SyncRequest {}

/// Result of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Stored records the client did not have.
    pub downloaded: Vec<Record>,
    /// Number of records the client submitted.
    pub uploaded: usize,
}

impl WireMessage for SyncResponse {}

/// Service description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Liveness marker, `"ok"`.
    pub status: String,
    /// Human-readable description.
    pub message: String,
    /// Available endpoints.
    pub endpoints: Vec<String>,
    /// Usage hint.
    pub docs: String,
}

impl ServiceInfo {
    /// Describes a running service whose default partition is `default_app_id`.
    pub fn running(default_app_id: &str) -> Self {
        Self {
            status: "ok".to_string(),
            message: "diary sync service is running".to_string(),
            endpoints: Operation::PUBLIC
                .iter()
                .map(|op| op.endpoint().to_string())
                .collect(),
            docs: format!("list records with /api/entries?appId={default_app_id}"),
        }
    }
}

impl WireMessage for ServiceInfo {}

/// Failure body carrying the error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl WireMessage for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_accepts_single_object() {
        let request = SaveRequest::decode(br#"{"id":"1","content":"hi"}"#).unwrap();
        assert_eq!(request.entries.len(), 1);
        assert_eq!(request.entries[0].key(), Some("1"));
    }

    #[test]
    fn save_request_accepts_array() {
        let request = SaveRequest::decode(br#"[{"id":"1"},{"uuid":"2"}]"#).unwrap();
        let ids: Vec<_> = request.entries.iter().filter_map(|r| r.key()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn save_request_rejects_array_with_non_objects() {
        assert!(matches!(
            SaveRequest::decode(br#"[{"id":"1"}, 5]"#),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn save_request_rejects_array_of_strings() {
        assert!(matches!(
            SaveRequest::decode(br#"["a","b","work"]"#),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn sync_request_rejects_nested_arrays() {
        assert!(SyncRequest::decode(br#"{"appId":"daily","localEntries":[["x"]]}"#).is_err());
    }

    #[test]
    fn numeric_app_id_is_read_as_text() {
        let request = SyncRequest::decode(br#"{"appId":7,"localEntries":[]}"#).unwrap();
        assert_eq!(request.app_id.as_deref(), Some("7"));

        let request = ListRequest::decode(br#"{"appId":7}"#).unwrap();
        assert_eq!(request.app_id.as_deref(), Some("7"));
    }

    #[test]
    fn empty_or_null_app_id_is_absent() {
        let request = SyncRequest::decode(br#"{"appId":""}"#).unwrap();
        assert!(request.app_id.is_none());
        let request = ListRequest::decode(br#"{"appId":null}"#).unwrap();
        assert!(request.app_id.is_none());
    }

    #[test]
    fn save_request_rejects_non_json() {
        assert!(matches!(
            SaveRequest::decode(b"not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn save_request_encodes_as_array() {
        let bytes = SaveRequest::new(vec![Record::new("1")]).encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn sync_request_wire_names() {
        let request =
            SyncRequest::decode(br#"{"appId":"daily","localEntries":[{"id":"1"}]}"#).unwrap();
        assert_eq!(request.app_id.as_deref(), Some("daily"));
        assert_eq!(request.local_entries.len(), 1);
    }

    #[test]
    fn sync_request_without_entries_is_empty() {
        let request = SyncRequest::decode(br#"{"appId":"daily"}"#).unwrap();
        assert!(request.local_entries.is_empty());
    }

    #[test]
    fn sync_response_wire_names() {
        let response = SyncResponse {
            downloaded: vec![Record::new("1")],
            uploaded: 3,
        };
        let value: serde_json::Value = serde_json::from_slice(&response.encode().unwrap()).unwrap();
        assert_eq!(value["uploaded"], 3);
        assert_eq!(value["downloaded"][0]["id"], "1");
    }

    #[test]
    fn list_response_is_bare_array() {
        let response = ListResponse {
            entries: vec![Record::new("1"), Record::new("2")],
        };
        let value: serde_json::Value = serde_json::from_slice(&response.encode().unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_list_body_means_default_partition() {
        let message = SyncMessage::decode_request(Operation::List, b"").unwrap();
        match message {
            SyncMessage::ListRequest(request) => assert!(request.app_id.is_none()),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn service_info_lists_public_endpoints() {
        let info = ServiceInfo::running("daily");
        assert_eq!(info.status, "ok");
        assert_eq!(info.endpoints.len(), 3);
        assert!(info.docs.contains("daily"));
    }

    #[test]
    fn requests_have_no_response_encoding() {
        assert!(SyncMessage::InfoRequest.encode_response().is_err());
        assert!(SyncMessage::SyncRequest(SyncRequest::default())
            .encode_response()
            .is_err());
    }
}
