//! Integration tests for lazy pagination against a mock server.

use chrono::Utc;
use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use simpro_api::{
    BaseUrl, ClientId, ClientSecret, Company, Continuation, ListParams, SimproClient,
    SimproConfig, TokenResponse, TokenState,
};

fn create_client(server: &MockServer) -> SimproClient {
    let config = SimproConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .client_id(ClientId::new("test-client-id").unwrap())
        .client_secret(ClientSecret::new("test-secret").unwrap())
        .company(Company::new("0").unwrap())
        .build()
        .unwrap();
    let response = TokenResponse {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    };
    SimproClient::with_token(config, TokenState::from_response(&response, Utc::now()))
}

fn counted_page(items: serde_json::Value, total_pages: u32, total_count: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(items)
        .append_header("Result-Pages", total_pages.to_string().as_str())
        .append_header("Result-Total", total_count.to_string().as_str())
}

#[tokio::test]
async fn test_stream_walks_every_page_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/customerInvoices/"))
        .and(query_param("page", "1"))
        .respond_with(counted_page(json!([{"ID": 1}, {"ID": 2}]), 2, 3))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/customerInvoices/"))
        .and(query_param("page", "2"))
        .respond_with(counted_page(json!([{"ID": 3}]), 2, 3))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut pages = client.invoice_pages(ListParams::new().page_size(2));

    let mut ids = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page.unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_count, 3);
        for item in &page.items {
            ids.push(item["ID"].as_i64().unwrap());
        }
    }
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_abandoned_stream_fetches_nothing_further() {
    let server = MockServer::start().await;
    // Five pages exist, only the first may ever be requested.
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/customerInvoices/"))
        .respond_with(counted_page(json!([{"ID": 1}]), 5, 5))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut pages = client.invoice_pages(ListParams::new().page_size(1));

    let first = pages.next().await.unwrap().unwrap();
    assert_eq!(first.page_number, 1);
    drop(pages);

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_item_count_mode_tolerates_missing_headers() {
    let server = MockServer::start().await;
    // No Result-Pages/Result-Total headers on either response.
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/leads/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ID": 1}, {"ID": 2}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/leads/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ID": 3}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let pages: Vec<_> = client
        .pages_with(
            "leads/",
            ListParams::new().page_size(2),
            Continuation::ItemCount { page_size: 2 },
        )
        .collect()
        .await;

    assert_eq!(pages.len(), 2);
    let last = pages[1].as_ref().unwrap();
    assert_eq!(last.page_number, 2);
    assert_eq!(last.items.len(), 1);
}

#[tokio::test]
async fn test_drain_concatenates_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/catalogs/"))
        .and(query_param("page", "1"))
        .respond_with(counted_page(json!([{"ID": 10}]), 2, 2))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/catalogs/"))
        .and(query_param("page", "2"))
        .respond_with(counted_page(json!([{"ID": 20}]), 2, 2))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let items = client
        .catalog_pages(ListParams::new().page_size(1))
        .drain()
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["ID"], 10);
    assert_eq!(items[1]["ID"], 20);
}

#[tokio::test]
async fn test_empty_collection_yields_single_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/quotes/"))
        .respond_with(counted_page(json!([]), 1, 0))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let pages: Vec<_> = client
        .quote_pages(ListParams::new().page_size(50))
        .collect()
        .await;

    assert_eq!(pages.len(), 1);
    let page = pages[0].as_ref().unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_mid_stream_error_is_yielded_then_stream_ends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/customerInvoices/"))
        .and(query_param("page", "1"))
        .respond_with(counted_page(json!([{"ID": 1}]), 3, 3))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/companies/0/customerInvoices/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut pages = client.invoice_pages(ListParams::new().page_size(1));

    assert!(pages.next().await.unwrap().is_ok());
    assert!(pages.next().await.unwrap().is_err());
    assert!(pages.next().await.is_none());

    // Page 3 is never requested after the failure.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
