//! Integration tests for the dictionary cache store.
//!
//! A `tiny_http` mock serves the bulk dict payload; the store is backed by a
//! temp file so persistence is exercised end-to-end.

use std::fs;
use std::path::PathBuf;
use std::thread;

use admin_client::config::ClientConfig;
use admin_client::dict::{DictOption, DictStore};
use admin_client::http::Client;
use tiny_http::{Header, Response, Server};

/// Serve one canned dict payload and return the base URL.
fn mock_dict_backend(body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let addr = server.server_addr().to_ip().expect("ip listener");

    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            assert_eq!(request.url(), "/api/v1/config/dict");
            let response = Response::from_string(body).with_header(
                Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    format!("http://{addr}")
}

fn temp_cache_path(tag: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("adminctl-dict-it-{}-{tag}", std::process::id()))
        .join("dict-cache.json")
}

fn option(label: &str, value: &str) -> DictOption {
    DictOption {
        label: label.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn load_then_get_returns_exactly_the_fetched_lists() {
    let base_url = mock_dict_backend(
        r#"{"code": 0, "data": {
            "status": [{"label": "Enabled", "value": 1}, {"label": "Disabled", "value": 0}],
            "gender": [{"label": "Male", "value": "M"}]
        }, "msg": "ok"}"#,
    );
    let client = Client::new(&ClientConfig {
        base_url,
        timeout_ms: 5_000,
    });
    client.set_token("tok");

    let path = temp_cache_path("load");
    let _ = fs::remove_file(&path);
    let store = DictStore::open_at(path.clone());

    store.load_dict_items(&client).unwrap();

    assert_eq!(
        store.get_dict_items("status"),
        vec![option("Enabled", "1"), option("Disabled", "0")],
        "order and content must match the bulk fetch"
    );
    assert_eq!(store.get_dict_items("gender"), vec![option("Male", "M")]);
    assert!(store.get_dict_items("no_such_code").is_empty());

    // A fresh store warms itself from the persisted file.
    let reopened = DictStore::open_at(path.clone());
    assert_eq!(reopened.get_dict_items("gender"), vec![option("Male", "M")]);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn reload_overwrites_prior_entries() {
    let store = DictStore::in_memory();

    let first = mock_dict_backend(
        r#"{"code": 0, "data": {"status": [{"label": "Enabled", "value": "1"}, {"label": "Disabled", "value": "0"}]}, "msg": "ok"}"#,
    );
    let client = Client::new(&ClientConfig {
        base_url: first,
        timeout_ms: 5_000,
    });
    client.set_token("tok");
    store.load_dict_items(&client).unwrap();
    assert_eq!(store.get_dict_items("status").len(), 2);

    // A later load replaces the list for the code wholesale.
    let second = mock_dict_backend(
        r#"{"code": 0, "data": {"status": [{"label": "Active", "value": "1"}]}, "msg": "ok"}"#,
    );
    let client = Client::new(&ClientConfig {
        base_url: second,
        timeout_ms: 5_000,
    });
    client.set_token("tok");
    store.load_dict_items(&client).unwrap();
    assert_eq!(store.get_dict_items("status"), vec![option("Active", "1")]);
}

#[test]
fn fetch_failure_leaves_cache_untouched() {
    let base_url = mock_dict_backend(r#"{"code": 500, "data": null, "msg": "boom"}"#);
    let client = Client::new(&ClientConfig {
        base_url,
        timeout_ms: 5_000,
    });
    client.set_token("tok");

    let path = temp_cache_path("fail");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(
        &path,
        r#"{"status": [{"label": "Enabled", "value": "1"}]}"#,
    )
    .unwrap();

    let store = DictStore::open_at(path.clone());
    assert!(store.load_dict_items(&client).is_err());
    assert_eq!(store.get_dict_items("status"), vec![option("Enabled", "1")]);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn clear_persists_the_empty_map() {
    let path = temp_cache_path("clear");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(
        &path,
        r#"{"status": [{"label": "Enabled", "value": "1"}]}"#,
    )
    .unwrap();

    let store = DictStore::open_at(path.clone());
    assert!(!store.get_dict_items("status").is_empty());
    store.clear_dict_cache();

    let reopened = DictStore::open_at(path.clone());
    assert!(reopened.get_dict_items("status").is_empty());

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
