//! Integration tests for the sync server over durable and in-memory stores.

use diarysync_protocol::{
    ListRequest, Operation, Record, SaveRequest, SyncRequest, SyncResponse, WireMessage,
};
use diarysync_server::{Reconciler, ServerConfig, SyncServer};
use diarysync_storage::{InMemoryStore, RecordStore};
use diarysync_testkit::{partition_ids, sample_record, stored_row, TempFileStore};
use std::sync::Arc;
use std::thread;

#[test]
fn two_clients_converge_through_the_server() {
    let temp = TempFileStore::new();
    let server = SyncServer::new(ServerConfig::default(), temp.shared());

    // Phone writes two entries, laptop one
    let phone = vec![sample_record("p1", 100), sample_record("p2", 200)];
    let laptop = vec![sample_record("l1", 150)];

    let response = server
        .handle_sync(SyncRequest::new("daily", phone.clone()))
        .unwrap();
    assert!(response.downloaded.is_empty());
    assert_eq!(response.uploaded, 2);

    let response = server
        .handle_sync(SyncRequest::new("daily", laptop.clone()))
        .unwrap();
    let got: Vec<_> = response.downloaded.iter().filter_map(Record::key).collect();
    assert_eq!(got, vec!["p2", "p1"]);

    // Phone syncs again and receives the laptop entry only
    let response = server.handle_sync(SyncRequest::new("daily", phone)).unwrap();
    let got: Vec<_> = response.downloaded.iter().filter_map(Record::key).collect();
    assert_eq!(got, vec!["l1"]);

    assert_eq!(
        partition_ids(temp.store.as_ref(), "daily"),
        vec!["p2", "l1", "p1"]
    );
}

#[test]
fn stored_state_survives_restart() {
    let temp = TempFileStore::new();
    {
        let server = SyncServer::new(ServerConfig::default(), temp.shared());
        server
            .handle_save(SaveRequest::new(vec![
                sample_record("1", 1).with_tags(["x", "y"])
            ]))
            .unwrap();
    }

    let temp = temp.reopen();
    let server = SyncServer::new(ServerConfig::default(), temp.shared());
    let listed = server.handle_list(ListRequest::new("daily")).unwrap();

    assert_eq!(listed.entries.len(), 1);
    assert_eq!(listed.entries[0].tags, vec!["x", "y"]);
    assert_eq!(listed.entries[0].date_iso.as_deref(), Some("2024-01-01"));
}

#[test]
fn save_overwrites_but_sync_does_not() {
    let server = SyncServer::in_memory(ServerConfig::default());

    server
        .handle_save(SaveRequest::new(vec![Record::new("x").with_content("v1")]))
        .unwrap();
    server
        .handle_save(SaveRequest::new(vec![Record::new("x").with_content("v2")]))
        .unwrap();
    server
        .handle_sync(SyncRequest::new(
            "daily",
            vec![Record::new("x").with_content("stale")],
        ))
        .unwrap();

    let row = server.store().get("daily", "x").unwrap().unwrap();
    assert_eq!(row.content.as_deref(), Some("v2"));
}

#[test]
fn partitions_stay_isolated() {
    let server = SyncServer::in_memory(ServerConfig::default());
    server
        .handle_sync(SyncRequest::new("a", vec![Record::new("1")]))
        .unwrap();

    let response = server.handle_sync(SyncRequest::new("b", vec![])).unwrap();
    assert!(response.downloaded.is_empty());
    assert!(server
        .handle_list(ListRequest::new("b"))
        .unwrap()
        .entries
        .is_empty());
}

#[test]
fn json_sync_with_loose_payload() {
    let server = SyncServer::in_memory(ServerConfig::default());
    server
        .store()
        .upsert_replace(stored_row("daily", "srv", "from server").with_tags("garbage"))
        .unwrap();

    let body = br#"{
        "appId": "daily",
        "localEntries": [
            {"id": "1", "content": "hello", "date": "2024-01-01", "tags": "oops"},
            {"id": 2, "category": null}
        ]
    }"#;
    let reply = server.handle_json(Operation::Sync, body).unwrap();
    let response = SyncResponse::decode(&reply).unwrap();

    assert_eq!(response.uploaded, 2);
    assert_eq!(response.downloaded.len(), 1);
    assert!(response.downloaded[0].tags.is_empty());
    assert!(server.store().get("daily", "2").unwrap().is_some());
}

#[test]
fn json_sync_missing_id_writes_nothing() {
    let server = SyncServer::in_memory(ServerConfig::default());
    let body = br#"{"appId":"daily","localEntries":[{"id":"1"},{"content":"no id"}]}"#;

    let err = server.handle_json(Operation::Sync, body).unwrap_err();
    assert!(err.is_client_error());
    assert!(server.store().is_empty().unwrap());
}

#[test]
fn json_save_of_malformed_array_writes_nothing() {
    let server = SyncServer::in_memory(ServerConfig::default());

    for body in [
        &br#"[{"id":"1"}, 5]"#[..],
        &br#"["a","b","work"]"#[..],
    ] {
        let err = server.handle_json(Operation::Save, body).unwrap_err();
        assert!(err.is_client_error());
    }
    let body = br#"{"appId":"daily","localEntries":[["x"]]}"#;
    assert!(server.handle_json(Operation::Sync, body).unwrap_err().is_client_error());

    assert!(server.store().is_empty().unwrap());
}

#[test]
fn json_sync_accepts_numeric_app_id_and_uuid_alias() {
    let server = SyncServer::in_memory(ServerConfig::default());
    let body = br#"{"appId":2024,"localEntries":[{"uuid":"legacy","content":"old"}]}"#;

    let reply = server.handle_json(Operation::Sync, body).unwrap();
    let response = SyncResponse::decode(&reply).unwrap();

    assert_eq!(response.uploaded, 1);
    let row = server.store().get("2024", "legacy").unwrap().unwrap();
    assert_eq!(row.content.as_deref(), Some("old"));
}

#[test]
fn concurrent_syncs_of_same_new_id_write_once() {
    let store = Arc::new(InMemoryStore::new());
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&store) as Arc<dyn RecordStore>
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let reconciler = Arc::clone(&reconciler);
            thread::spawn(move || {
                let local = vec![Record::new("shared").with_content(format!("client {i}"))];
                reconciler.reconcile("daily", &local).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().uploaded_count, 1);
    }
    assert_eq!(store.len().unwrap(), 1);
}
