use cellarman_core::app_config::Cin7Credentials;
use cellarman_core::Conventions;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::directory::SupplierDirectory;

fn test_credentials() -> Cin7Credentials {
    Cin7Credentials {
        account_id: "test-account".to_string(),
        api_key: "test-key".to_string(),
    }
}

fn test_client(server: &MockServer) -> Cin7Client {
    Cin7Client::new(&test_credentials(), &server.uri(), 30, 3, 0)
        .expect("client construction should not fail")
}

fn supplier(id: &str, name: &str) -> serde_json::Value {
    json!({ "ID": id, "Name": name, "Currency": "GBP" })
}

#[tokio::test]
async fn product_lookup_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("api-auth-accountid", "test-account"))
        .and(header("api-auth-applicationkey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let id = test_client(&server).product_id_by_sku("L-PA24").await.unwrap();
    assert!(id.is_none());
}

#[tokio::test]
async fn product_lookup_matches_sku_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(query_param("Sku", "L-PA24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Products": [
                { "ID": "prod-2", "SKU": "L-PA240", "Name": "Pale Ale 24x440" },
                { "ID": "prod-1", "SKU": "L-PA24", "Name": "Pale Ale 24x330" },
            ]
        })))
        .mount(&server)
        .await;

    let id = test_client(&server).product_id_by_sku("L-PA24").await.unwrap();
    assert_eq!(id.as_deref(), Some("prod-1"));
}

#[tokio::test]
async fn product_lookup_404_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let id = test_client(&server).product_id_by_sku("G-XX99").await.unwrap();
    assert!(id.is_none());
}

#[tokio::test]
async fn supplier_by_name_returns_first_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "Acme Brew"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Suppliers": [supplier("sup-1", "Acme Brew")] })),
        )
        .mount(&server)
        .await;

    let record = test_client(&server)
        .supplier_by_name("Acme Brew")
        .await
        .unwrap()
        .expect("supplier expected");
    assert_eq!(record.id, "sup-1");
    assert_eq!(record.currency.as_deref(), Some("GBP"));
}

#[tokio::test]
async fn directory_pages_until_short_page_and_caches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Page", "1"))
        .and(query_param("Limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Suppliers": [supplier("sup-1", "Acme Brew"), supplier("sup-2", "Burning Sky")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Suppliers": [supplier("sup-3", "Cloudwater")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = SupplierDirectory::new(test_client(&server), 2);
    let all = directory.all().await.unwrap();
    assert_eq!(all.len(), 3);

    // Second call must come from the cache; the expect(1) on each mock
    // verifies no further requests are made.
    let again = directory.all().await.unwrap();
    assert_eq!(again.len(), 3);
}

#[tokio::test]
async fn resolve_prefers_exact_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "Acme Brew"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Suppliers": [supplier("sup-1", "Acme Brew")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let directory = SupplierDirectory::new(test_client(&server), 100);
    let record = directory
        .resolve("Acme Brew", &Conventions::default())
        .await
        .unwrap()
        .expect("supplier expected");
    assert_eq!(record.id, "sup-1");
}

#[tokio::test]
async fn resolve_falls_back_to_ampersand_rewrite() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "Anspach & Hobday"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Suppliers": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "Anspach and Hobday"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Suppliers": [supplier("sup-7", "Anspach and Hobday")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let directory = SupplierDirectory::new(test_client(&server), 100);
    let record = directory
        .resolve("Anspach & Hobday", &Conventions::default())
        .await
        .unwrap()
        .expect("supplier expected");
    assert_eq!(record.id, "sup-7");
}

#[tokio::test]
async fn resolve_falls_back_to_fuzzy_directory_match() {
    let server = MockServer::start().await;

    // Exact lookup finds nothing (different casing is a different name to
    // the Name filter).
    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "deya brewing company"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Suppliers": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Suppliers": [
                supplier("sup-1", "Burning Sky"),
                supplier("sup-2", "DEYA Brewing Company"),
            ]
        })))
        .mount(&server)
        .await;

    let directory = SupplierDirectory::new(test_client(&server), 100);
    let record = directory
        .resolve("deya brewing company", &Conventions::default())
        .await
        .unwrap()
        .expect("fuzzy match expected");
    assert_eq!(record.id, "sup-2");
}

#[tokio::test]
async fn resolve_rejects_weak_fuzzy_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Name", "Totally Unknown Brewing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Suppliers": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/supplier"))
        .and(query_param("Page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Suppliers": [supplier("sup-1", "Burning Sky")]
        })))
        .mount(&server)
        .await;

    let directory = SupplierDirectory::new(test_client(&server), 100);
    let record = directory
        .resolve("Totally Unknown Brewing", &Conventions::default())
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn create_purchase_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/purchase"))
        .and(body_partial_json(json!({
            "SupplierID": "sup-1",
            "Location": "London",
            "TaxRule": "Tax on Purchases",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ID": "task-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let header = PurchaseHeader {
        supplier_id: "sup-1".to_string(),
        location: "London".to_string(),
        order_date: "2026-08-07".to_string(),
        tax_rule: "Tax on Purchases".to_string(),
        status: "DRAFT".to_string(),
    };
    let task_id = test_client(&server).create_purchase(&header).await.unwrap();
    assert_eq!(task_id, "task-42");
}

#[tokio::test]
async fn attach_order_lines_posts_task_id_and_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/purchase/order"))
        .and(body_partial_json(json!({ "TaskID": "task-42" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "TaskID": "task-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![PurchaseOrderLine {
        product_id: "prod-1".to_string(),
        quantity: "2".parse().unwrap(),
        price: "54.00".parse().unwrap(),
        total: "108.00".parse().unwrap(),
        tax_rule: "Tax on Purchases".to_string(),
    }];
    test_client(&server)
        .attach_order_lines("task-42", lines)
        .await
        .unwrap();
}

#[tokio::test]
async fn attach_failure_carries_upstream_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/purchase/order"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Product prod-9 is deprecated"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![PurchaseOrderLine {
        product_id: "prod-9".to_string(),
        quantity: "1".parse().unwrap(),
        price: "10.00".parse().unwrap(),
        total: "10.00".parse().unwrap(),
        tax_rule: "Tax on Purchases".to_string(),
    }];
    let err = test_client(&server)
        .attach_order_lines("task-42", lines)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Cin7Error::UnexpectedStatus { status: 400, ref body, .. } if body.contains("deprecated")),
        "expected UnexpectedStatus with body, got: {err:?}"
    );
}
