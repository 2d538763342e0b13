use anyhow::Result;
use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{HeaderMap, Request, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use tower::ServiceExt;

use cardscout::api::create_router;
use cardscout::api::models::{INTERNAL_ERROR, MISSING_QUERY_ERROR, MISSING_QUERY_HINT};
use cardscout::data_models::ErrorBody;
use cardscout::error::FetchError;
use cardscout::gateway::{CardSource, GatewayClient, UpstreamClient};

mod test_helpers {
    use super::*;

    pub async fn spawn_server(router: Router) -> Result<String> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok(format!("http://{addr}"))
    }

    /// Key order and spacing the gateway must not touch.
    pub const ORDERED_BODY: &str = r#"{"totalCount": 1, "page": 1, "data": [{"name": "Zapdos", "id": "base1-16"}], "pageSize": 250, "count": 1}"#;

    /// Stand-in for the card database. Echoes what it was asked so tests can
    /// check what the gateway forwarded.
    async fn fake_cards(
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        let q = params.get("q").cloned().unwrap_or_default();
        match q.as_str() {
            "boom" => (StatusCode::SERVICE_UNAVAILABLE, "upstream exploded").into_response(),
            "garbage" => (StatusCode::OK, "this is not json").into_response(),
            "zapdos" => (StatusCode::OK, ORDERED_BODY).into_response(),
            _ => {
                let page = params.get("page").cloned().unwrap_or_default();
                let api_key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({
                    "data": [{
                        "id": format!("{q}-{page}"),
                        "name": q,
                        "rarity": "Rare",
                        "tcgplayer": {"url": "https://example.test/card"}
                    }],
                    "page": page.parse::<u32>().unwrap_or(0),
                    "pageSize": params.get("pageSize").and_then(|s| s.parse::<u32>().ok()),
                    "count": 1,
                    "totalCount": 1,
                    "echo": {"apiKey": api_key}
                }))
                .into_response()
            }
        }
    }

    pub async fn spawn_fake_upstream() -> Result<String> {
        spawn_server(Router::new().route("/cards", get(fake_cards))).await
    }

    pub fn gateway(upstream_url: &str, api_key: Option<&str>) -> Router {
        create_router(
            UpstreamClient::new(upstream_url, api_key.map(str::to_string)),
            std::env::temp_dir().join("cardscout-no-static"),
        )
    }

    pub async fn get_json(router: Router, uri: &str) -> Result<(StatusCode, Value)> {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }
}

use test_helpers::*;

mod cards_route {
    use super::*;

    #[tokio::test]
    async fn test_missing_query_is_bad_request() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(gateway(&upstream, None), "/api/cards").await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_value(body)?;
        assert_eq!(body.error, MISSING_QUERY_ERROR);
        assert_eq!(body.hint.as_deref(), Some(MISSING_QUERY_HINT));
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_query_is_bad_request() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(gateway(&upstream, None), "/api/cards?q=%20%20").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_QUERY_ERROR);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_page_is_bad_request() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        for uri in ["/api/cards?q=pikachu&page=abc", "/api/cards?q=pikachu&page=0"] {
            let (status, body) = get_json(gateway(&upstream, None), uri).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("page"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_success_is_relayed_verbatim() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(
            gateway(&upstream, None),
            "/api/cards?q=name%3A%22charizard%20ex%22",
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], "name:\"charizard ex\"-1");
        assert_eq!(body["data"][0]["tcgplayer"]["url"], "https://example.test/card");
        assert_eq!(body["page"], 1);
        assert_eq!(body["pageSize"], 250);
        // fields the gateway knows nothing about survive
        assert!(body["echo"].is_object());
        assert!(body["echo"]["apiKey"].is_null());
        Ok(())
    }

    #[tokio::test]
    async fn test_success_body_bytes_are_untouched() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let response = gateway(&upstream, None)
            .oneshot(Request::builder().uri("/api/cards?q=zapdos").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(std::str::from_utf8(&bytes)?, ORDERED_BODY);
        Ok(())
    }

    #[tokio::test]
    async fn test_page_and_api_key_are_forwarded() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(
            gateway(&upstream, Some("secret-key")),
            "/api/cards?q=pikachu&page=3",
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 3);
        assert_eq!(body["data"][0]["id"], "pikachu-3");
        assert_eq!(body["echo"]["apiKey"], "secret-key");
        Ok(())
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_passed_through() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(gateway(&upstream, None), "/api/cards?q=boom").await?;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "API request failed: 503 Service Unavailable");
        assert_eq!(body["details"], "upstream exploded");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_upstream_body_is_internal_error() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let (status, body) = get_json(gateway(&upstream, None), "/api/cards?q=garbage").await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR);
        assert!(
            body["details"]
                .as_str()
                .unwrap()
                .starts_with("Malformed response")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() -> Result<()> {
        // nothing listens on port 1
        let (status, body) =
            get_json(gateway("http://127.0.0.1:1", None), "/api/cards?q=pikachu").await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR);
        assert!(body["details"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_static_files_served_as_fallback() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("cardscout-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("index.html"), "<h1>cardscout</h1>")?;

        let router = create_router(UpstreamClient::new("http://127.0.0.1:1", None), &dir);
        let response = router
            .oneshot(Request::builder().uri("/index.html").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&bytes[..], b"<h1>cardscout</h1>");

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}

mod clients {
    use super::*;

    #[tokio::test]
    async fn test_gateway_client_fetches_page() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let base = spawn_server(gateway(&upstream, None)).await?;

        let page = GatewayClient::new(base).fetch_page("pikachu", 2).await?;
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 250);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "pikachu-2");
        assert_eq!(page.data[0].rarity.as_deref(), Some("Rare"));
        assert!(page.data[0].extra.contains_key("tcgplayer"));
        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_client_uses_error_body_message() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let base = spawn_server(gateway(&upstream, None)).await?;

        let err = GatewayClient::new(base)
            .fetch_page("boom", 1)
            .await
            .unwrap_err();
        match &err {
            FetchError::UpstreamHttp { status, .. } => {
                assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.to_string(), "API request failed: 503 Service Unavailable");
        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_client_network_error() {
        let err = GatewayClient::new("http://127.0.0.1:1")
            .fetch_page("pikachu", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_never_leaves_the_client() {
        let err = GatewayClient::new("http://127.0.0.1:1")
            .fetch_page("   ", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptyQuery));

        let err = UpstreamClient::new("http://127.0.0.1:1", None)
            .fetch_page("", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_direct_upstream_client() -> Result<()> {
        let upstream = spawn_fake_upstream().await?;
        let client = UpstreamClient::new(format!("{upstream}/"), Some("k".to_string()));

        let page = client.fetch_page("raichu", 1).await?;
        assert_eq!(page.data[0].id, "raichu-1");
        assert_eq!(page.page_size, 250);

        let err = client.fetch_page("boom", 1).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");

        let err = client.fetch_page("garbage", 1).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        Ok(())
    }
}
