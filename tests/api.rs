// tests/api.rs

use serde_json::{json, Value};
use tokio::net::TcpListener;

use stockfast::{
    config::{AppState, Config},
    db::catalog_repo::default_catalog,
    services::CatalogService,
};

struct TestServer {
    base_url: String,
    _dir: tempfile::TempDir,
}

async fn spawn_app() -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "STOCKFAST_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .expect("config");

    let state = AppState::with_catalog(config, CatalogService::from_products(default_catalog()))
        .expect("app state");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, stockfast::app(state)).await.expect("server");
    });

    TestServer { base_url: format!("http://{}", addr), _dir: dir }
}

struct Reply {
    status: u16,
    content_type: String,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

// ureq é bloqueante: roda fora das threads do runtime
async fn call(method: &'static str, url: String, body: Option<Value>) -> Reply {
    tokio::task::spawn_blocking(move || {
        let req = ureq::request(method, &url)
            .set("Content-Type", "application/json")
            .set("Accept-Language", "pt-BR");
        let result = match body {
            Some(b) => req.send_string(&b.to_string()),
            None => req.call(),
        };
        let resp = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(e) => panic!("falha de transporte: {}", e),
        };
        Reply {
            status: resp.status(),
            content_type: resp.header("content-type").unwrap_or_default().to_string(),
            body: resp.into_string().expect("body"),
        }
    })
    .await
    .expect("join")
}

#[tokio::test(flavor = "multi_thread")]
async fn counting_flow_end_to_end() {
    let server = spawn_app().await;
    let url = |path: &str| format!("{}{}", server.base_url, path);

    // Primeira execução: uma ficha já criada e selecionada
    let session = call("GET", url("/api/session"), None).await.json();
    let sheet_id = session["currentSheetId"].as_str().expect("sheet selected").to_string();
    assert_eq!(session["warehouse"], "A");
    assert_eq!(session["aisle"], "01");

    // Palete: 2 × 1080 × 12, e a rua avança de 07 para 08
    let reply = call(
        "POST",
        url("/api/counts"),
        Some(json!({ "aisle": "07", "productCode": "L001", "unitKind": "PALLET", "quantity": 2 })),
    )
    .await;
    assert_eq!(reply.status, 200, "{}", reply.body);
    let body = reply.json();
    assert_eq!(body["outcome"]["totalUnits"], 25_920);
    assert_eq!(body["outcome"]["added"], 1);
    assert_eq!(body["session"]["aisle"], "08");

    // Recontagem do mesmo slot: corrige no lugar e avisa
    let body = call(
        "POST",
        url("/api/counts"),
        Some(json!({ "warehouse": "A", "aisle": "07", "productCode": "L001", "unitKind": "PALLET", "quantity": 3 })),
    )
    .await
    .json();
    assert_eq!(body["outcome"]["updated"], 1);
    assert_eq!(body["outcome"]["alreadyCounted"], true);
    assert_eq!(body["advisories"].as_array().unwrap().len(), 1);

    // Intervalo de drives: 3 registros, sem avanço de rua
    let body = call(
        "POST",
        url("/api/counts"),
        Some(json!({
            "warehouse": "B", "aisle": "05", "driveStart": 1, "driveEnd": 3,
            "productCode": "L001", "unitKind": "BOX", "quantity": 1
        })),
    )
    .await
    .json();
    assert_eq!(body["outcome"]["written"], 3);
    assert_eq!(body["outcome"]["totalUnits"], 12);
    assert_eq!(body["session"]["warehouse"], "B");
    assert_eq!(body["session"]["aisle"], "05");

    // Última rua volta para a 01
    let body = call(
        "POST",
        url("/api/counts"),
        Some(json!({ "warehouse": "A", "aisle": "30", "productCode": "Q001", "unitKind": "UNIT", "quantity": 7 })),
    )
    .await
    .json();
    assert_eq!(body["outcome"]["advance"]["wrapped"], true);
    assert_eq!(body["session"]["aisle"], "01");
    assert!(body["advisories"][0].as_str().unwrap().contains("Troque o barracão"));

    // Quantidade zero: rejeitada sem gravar nada
    let reply = call(
        "POST",
        url("/api/counts"),
        Some(json!({ "productCode": "L001", "unitKind": "BOX", "quantity": 0 })),
    )
    .await;
    assert_eq!(reply.status, 400);
    assert!(reply.json()["details"]["quantity"].is_array());

    // Intervalo do tamanho de u32: rejeitado sem derrubar o servidor
    let reply = call(
        "POST",
        url("/api/counts"),
        Some(json!({
            "warehouse": "A", "aisle": "02", "driveStart": 0, "driveEnd": 4_294_967_295u64,
            "productCode": "L001", "unitKind": "BOX", "quantity": 1
        })),
    )
    .await;
    assert_eq!(reply.status, 400, "{}", reply.body);

    let records = call("GET", url(&format!("/api/sheets/{}/records", sheet_id)), None).await.json();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["quantityEntered"], 3);
    assert_eq!(records[0]["totalUnits"], 3 * 1080 * 12);

    let recent = call("GET", url(&format!("/api/sheets/{}/records?order=recent", sheet_id)), None).await.json();
    assert_eq!(recent[0]["productCode"], "Q001");

    let export = call("GET", url(&format!("/api/sheets/{}/export", sheet_id)), None).await;
    assert_eq!(export.status, 200);
    assert!(export.content_type.starts_with("text/csv"));
    assert_eq!(export.body.lines().count(), 6);
    assert!(export.body.starts_with("Barracão;Rua;Drive;"));
}

#[tokio::test(flavor = "multi_thread")]
async fn sheets_and_session_selection() {
    let server = spawn_app().await;
    let url = |path: &str| format!("{}{}", server.base_url, path);

    let reply = call("POST", url("/api/sheets"), Some(json!({ "name": "Inventário Mensal" }))).await;
    assert_eq!(reply.status, 201, "{}", reply.body);
    let created = reply.json();
    let new_id = created["sheet"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["session"]["currentSheetId"], new_id.as_str());

    let sheets = call("GET", url("/api/sheets"), None).await.json();
    assert_eq!(sheets.as_array().unwrap().len(), 2);

    let first_id = sheets[0]["id"].as_str().unwrap().to_string();
    let session = call("PUT", url("/api/session/sheet"), Some(json!({ "sheetId": first_id }))).await.json();
    assert_eq!(session["currentSheetId"], first_id.as_str());

    let missing = call("PUT", url("/api/session/sheet"), Some(json!({ "sheetId": "sheet_0" }))).await;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.json()["error"], "Ficha 'sheet_0' não encontrada.");

    let bad_location = call("PUT", url("/api/session/location"), Some(json!({ "warehouse": "Z", "aisle": "01" }))).await;
    assert_eq!(bad_location.status, 400);

    let session = call("PUT", url("/api/session/location"), Some(json!({ "warehouse": "C", "aisle": "12" }))).await.json();
    assert_eq!(session["warehouse"], "C");
    assert_eq!(session["aisle"], "12");
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_and_locations() {
    let server = spawn_app().await;
    let url = |path: &str| format!("{}{}", server.base_url, path);

    let products = call("GET", url("/api/catalog/products?brand=Vale%20Verde&category=ALL"), None).await.json();
    assert_eq!(products.as_array().unwrap().len(), 3);

    let none = call("GET", url("/api/catalog/products?brand=Nenhuma"), None).await;
    assert_eq!(none.status, 200);
    assert!(none.json().as_array().unwrap().is_empty());

    let product = call("GET", url("/api/catalog/products/Q001"), None).await.json();
    assert_eq!(product["boxesPerPallet"], 96);

    assert_eq!(call("GET", url("/api/catalog/products/XYZ"), None).await.status, 404);

    let layout = call("GET", url("/api/locations"), None).await.json();
    assert_eq!(layout["warehouses"].as_array().unwrap().len(), 5);
    assert_eq!(layout["aisles"][29], "30");
}
