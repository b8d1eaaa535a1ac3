// ═══════════════════════════════════════════════════════════════════
// Store Tests — MemoryHoldingStore, FileHoldingStore, RestHoldingStore
// endpoints, demo seed, open_store factory
// ═══════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use portfolio_dashboard_core::errors::CoreError;
use portfolio_dashboard_core::models::holding::{HoldingDraft, TradeCurrency};
use portfolio_dashboard_core::models::settings::{StoreBackend, StoreSettings};
use portfolio_dashboard_core::store::file::FileHoldingStore;
use portfolio_dashboard_core::store::memory::{MemoryHoldingStore, StoreContents};
use portfolio_dashboard_core::store::open_store;
use portfolio_dashboard_core::store::rest::RestHoldingStore;
use portfolio_dashboard_core::store::seed::{demo_contents, demo_holdings};
use portfolio_dashboard_core::store::traits::HoldingStore;

fn draft(ticker: &str, invested: f64, current: f64) -> HoldingDraft {
    HoldingDraft::new(format!("{ticker} Inc"), ticker, "USA", TradeCurrency::Usd, invested, current)
}

// ═══════════════════════════════════════════════════════════════════
// Memory store
// ═══════════════════════════════════════════════════════════════════

mod memory {
    use super::*;

    #[tokio::test]
    async fn starts_empty_with_id_one() {
        let store = MemoryHoldingStore::new();
        assert!(store.list().await.unwrap().is_empty());
        let h = store.insert(draft("AAPL", 1.0, 2.0)).await.unwrap();
        assert_eq!(h.id, 1);
        assert_eq!(h.ticker, "AAPL");
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryHoldingStore::new();
        let a = store.insert(draft("A", 1.0, 1.0)).await.unwrap();
        let b = store.insert(draft("B", 1.0, 1.0)).await.unwrap();
        store.delete(b.id).await.unwrap();
        let c = store.insert(draft("C", 1.0, 1.0)).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let mut rows = demo_holdings();
        rows.reverse();
        let store = MemoryHoldingStore::with_holdings(rows);
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|h| h.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<i64>>());
        assert_eq!(store.insert(draft("NEW", 0.0, 0.0)).await.unwrap().id, 13);
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let store = MemoryHoldingStore::with_holdings(demo_holdings());
        store.update(4, draft("GOOGL", 758.0, 1700.0)).await.unwrap();
        let rows = store.list().await.unwrap();
        let updated = rows.iter().find(|h| h.id == 4).unwrap();
        assert_eq!(updated.ticker, "GOOGL");
        assert_eq!(updated.current_value, 1700.0);
        assert_eq!(rows.len(), 12);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = MemoryHoldingStore::new();
        assert!(matches!(
            store.update(42, draft("X", 1.0, 1.0)).await,
            Err(CoreError::HoldingNotFound(42))
        ));
        assert!(matches!(store.delete(7).await, Err(CoreError::HoldingNotFound(7))));
    }

    #[test]
    fn normalized_repairs_next_id() {
        let contents = StoreContents {
            next_id: 2,
            holdings: demo_holdings(),
        }
        .normalized();
        assert_eq!(contents.next_id, 13);
    }

    #[test]
    fn demo_seed_shape() {
        let contents = demo_contents();
        assert_eq!(contents.next_id, 13);
        assert_eq!(contents.holdings.len(), 12);
        assert_eq!(contents.holdings.iter().filter(|h| h.is_cash()).count(), 1);
        assert_eq!(contents.holdings[2].ticker, "BRK.B");
        assert_eq!(contents.holdings[2].trade_currency, TradeCurrency::Usd);
        assert_eq!(contents.holdings[11].country, "—");
    }
}

// ═══════════════════════════════════════════════════════════════════
// File store
// ═══════════════════════════════════════════════════════════════════

mod file {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        let store = FileHoldingStore::open(&path).unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn mutations_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("holdings.json");

        {
            let store = FileHoldingStore::open(&path).unwrap();
            store.insert(draft("AAPL", 100.0, 150.0)).await.unwrap();
            let b = store.insert(draft("MSFT", 50.0, 40.0)).await.unwrap();
            store.update(1, draft("AAPL", 100.0, 175.0)).await.unwrap();
            store.delete(b.id).await.unwrap();
        }

        let reopened = FileHoldingStore::open(&path).unwrap();
        let rows = reopened.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current_value, 175.0);
        // The deleted id 2 stays retired.
        assert_eq!(reopened.insert(draft("NVDA", 1.0, 1.0)).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn file_format_is_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        let store = FileHoldingStore::open(&path).unwrap();
        store.insert(draft("AAPL", 1.0, 2.0)).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["next_id"], 2);
        assert_eq!(json["holdings"][0]["ticker"], "AAPL");
        assert_eq!(json["holdings"][0]["trade_currency"], "USD");
    }

    #[tokio::test]
    async fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        let store = FileHoldingStore::open(&path).unwrap();
        store.insert(draft("AAPL", 100.0, 150.0)).await.unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.insert(draft("MSFT", 50.0, 40.0)).await,
            Err(CoreError::FileIO(_))
        ));
        assert!(store.update(1, draft("AAPL", 100.0, 10.0)).await.is_err());
        assert!(store.delete(1).await.is_err());

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "AAPL");
        assert_eq!(rows[0].current_value, 150.0);

        // Writable again: the failed insert did not consume an id.
        std::fs::remove_dir(&path).unwrap();
        assert_eq!(store.insert(draft("MSFT", 50.0, 40.0)).await.unwrap().id, 2);
        assert_eq!(FileHoldingStore::open(&path).unwrap().list().await.unwrap().len(), 2);
    }

    #[test]
    fn corrupt_file_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FileHoldingStore::open(&path),
            Err(CoreError::Deserialization(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// REST store (no network: endpoint construction only)
// ═══════════════════════════════════════════════════════════════════

mod rest {
    use super::*;

    #[test]
    fn endpoints() {
        let store = RestHoldingStore::new("https://xyz.supabase.co/", "holdings", None, 5);
        assert_eq!(store.table_url(), "https://xyz.supabase.co/rest/v1/holdings");
        assert_eq!(store.row_url(7), "https://xyz.supabase.co/rest/v1/holdings?id=eq.7");
        assert_eq!(store.name(), "rest");
    }

    #[test]
    fn from_settings_requires_url() {
        let settings = StoreSettings {
            backend: StoreBackend::Rest,
            ..StoreSettings::default()
        };
        assert!(matches!(
            RestHoldingStore::from_settings(&settings),
            Err(CoreError::Config(_))
        ));

        let settings = StoreSettings {
            backend: StoreBackend::Rest,
            url: Some("http://localhost:54321".into()),
            table: "portfolio".into(),
            ..StoreSettings::default()
        };
        let store = RestHoldingStore::from_settings(&settings).unwrap();
        assert_eq!(store.table_url(), "http://localhost:54321/rest/v1/portfolio");
    }
}

// ═══════════════════════════════════════════════════════════════════
// REST store over HTTP (local canned-response server)
// ═══════════════════════════════════════════════════════════════════

mod rest_http {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const ROWS: &str = r#"[
        {"id":2,"name":"Apple Inc","ticker":"AAPL","country":"USA","trade_currency":"USD","invested_amount":1979.04,"current_value":2602.34},
        {"id":1,"name":"Gold","ticker":"XAU","country":"Global","trade_currency":"EUR","invested_amount":185.22,"current_value":293.43}
    ]"#;

    const ONE_ROW: &str = r#"[{"id":13,"name":"Microsoft","ticker":"MSFT","country":"USA","trade_currency":"USD","invested_amount":50.0,"current_value":40.0}]"#;

    /// Answers every request with the same status and JSON body, and records
    /// each raw request (lowercased) for inspection.
    struct CannedServer {
        url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl CannedServer {
        async fn start(status: u16, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::clone(&requests);

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let request = read_request(&mut socket).await;
                    seen.lock().unwrap().push(request.to_lowercase());
                    let response = format!(
                        "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            Self { url, requests }
        }

        fn store(&self, api_key: Option<&str>) -> RestHoldingStore {
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            RestHoldingStore::with_client(client, format!("{}/", self.url), "holdings", api_key.map(String::from))
        }

        fn last_request(&self) -> String {
            self.requests.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    /// Read one request: headers up to the blank line, then `content-length` bytes of body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let line = line.to_ascii_lowercase();
                        line.strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    #[tokio::test]
    async fn list_queries_ordered_rows_with_credentials() {
        let server = CannedServer::start(200, ROWS).await;
        let rows = server.store(Some("anon-key")).list().await.unwrap();

        assert_eq!(rows.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(rows[1].trade_currency, TradeCurrency::Usd);

        let request = server.last_request();
        assert!(request.starts_with("get /rest/v1/holdings?select=*&order=id.asc "));
        assert!(request.contains("apikey: anon-key"));
        assert!(request.contains("authorization: bearer anon-key"));
    }

    #[tokio::test]
    async fn no_api_key_sends_no_credentials() {
        let server = CannedServer::start(200, "[]").await;
        assert!(server.store(None).list().await.unwrap().is_empty());

        let request = server.last_request();
        assert!(!request.contains("apikey:"));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn non_success_status_is_store_error() {
        let server = CannedServer::start(401, r#"{"message":"JWT expired"}"#).await;
        match server.store(Some("stale")).list().await {
            Err(CoreError::Store { backend, message }) => {
                assert_eq!(backend, "rest");
                assert!(message.contains("401"));
                assert!(message.contains("JWT expired"));
            }
            other => panic!("expected store error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn insert_posts_draft_and_returns_created_row() {
        let server = CannedServer::start(201, ONE_ROW).await;
        let created = server.store(None).insert(draft("MSFT", 50.0, 40.0)).await.unwrap();
        assert_eq!(created.id, 13);
        assert_eq!(created.ticker, "MSFT");

        let request = server.last_request();
        assert!(request.starts_with("post /rest/v1/holdings "));
        assert!(request.contains("prefer: return=representation"));
        assert!(request.contains(r#""ticker":"msft""#));
        assert!(!request.contains(r#""id":"#));
    }

    #[tokio::test]
    async fn insert_without_representation_is_store_error() {
        let server = CannedServer::start(201, "[]").await;
        assert!(matches!(
            server.store(None).insert(draft("MSFT", 1.0, 1.0)).await,
            Err(CoreError::Store { .. })
        ));
    }

    #[tokio::test]
    async fn update_patches_row_by_id() {
        let server = CannedServer::start(200, ONE_ROW).await;
        server.store(None).update(13, draft("MSFT", 50.0, 45.0)).await.unwrap();

        let request = server.last_request();
        assert!(request.starts_with("patch /rest/v1/holdings?id=eq.13 "));
        assert!(request.contains(r#""current_value":45.0"#));
    }

    #[tokio::test]
    async fn update_matching_no_row_is_not_found() {
        let server = CannedServer::start(200, "[]").await;
        assert!(matches!(
            server.store(None).update(99, draft("X", 1.0, 1.0)).await,
            Err(CoreError::HoldingNotFound(99))
        ));
    }

    #[tokio::test]
    async fn delete_by_id() {
        let server = CannedServer::start(200, ONE_ROW).await;
        server.store(None).delete(13).await.unwrap();
        assert!(server.last_request().starts_with("delete /rest/v1/holdings?id=eq.13 "));

        let empty = CannedServer::start(200, "[]").await;
        assert!(matches!(
            empty.store(None).delete(13).await,
            Err(CoreError::HoldingNotFound(13))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let store = RestHoldingStore::with_client(client, url, "holdings", None);
        assert!(matches!(store.list().await, Err(CoreError::Network(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// open_store factory
// ═══════════════════════════════════════════════════════════════════

mod factory {
    use super::*;

    #[tokio::test]
    async fn memory_backend_starts_with_demo_portfolio() {
        let store = open_store(&StoreSettings::default()).unwrap();
        assert_eq!(store.name(), "memory");
        assert_eq!(store.list().await.unwrap().len(), 12);
    }

    #[test]
    fn file_backend_needs_path() {
        let settings = StoreSettings {
            backend: StoreBackend::File,
            ..StoreSettings::default()
        };
        assert!(matches!(open_store(&settings), Err(CoreError::Config(_))));
    }

    #[test]
    fn file_and_rest_backends() {
        let dir = tempfile::tempdir().unwrap();
        let settings = StoreSettings {
            backend: StoreBackend::File,
            path: Some(PathBuf::from(dir.path().join("h.json"))),
            ..StoreSettings::default()
        };
        assert_eq!(open_store(&settings).unwrap().name(), "file");

        let settings = StoreSettings {
            backend: StoreBackend::Rest,
            url: Some("https://example.invalid".into()),
            ..StoreSettings::default()
        };
        assert_eq!(open_store(&settings).unwrap().name(), "rest");
    }
}
