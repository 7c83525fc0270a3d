mod app_tests {
    use auth::{AuthConfig, LogMailer, MemoryUserRepository};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Method, Request, StatusCode, header};
    use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tours::MemoryDocumentStore;
    use tower::ServiceExt;

    use crate::app::{AppParts, BODY_LIMIT_BYTES, build_router};

    fn app(max_requests: u32) -> Router {
        build_router(AppParts {
            users: Arc::new(MemoryUserRepository::new()),
            mailer: Arc::new(LogMailer),
            documents: Arc::new(MemoryDocumentStore::new()),
            limiter: Arc::new(MemoryRateLimitStore::new()),
            auth_config: Arc::new(AuthConfig::development()),
            rate_limit: Arc::new(RateLimitConfig::new(max_requests, 3600)),
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        client: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", client);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw)
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, json)
    }

    fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app(100);
        let (status, _, body) =
            send(&app, Method::GET, "/no/such/page?x=1", "10.0.0.1", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Can't find /no/such/page?x=1 on this server!");
    }

    #[tokio::test]
    async fn test_unknown_api_route() {
        let app = app(100);
        let (status, _, body) =
            send(&app, Method::GET, "/api/v1/planets", "10.0.0.1", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Can't find /api/v1/planets on this server!");
    }

    #[tokio::test]
    async fn test_rate_limit_per_client() {
        let app = app(2);

        let (status, headers, _) =
            send(&app, Method::GET, "/api/v1/tours", "10.0.0.1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header_value(&headers, "x-ratelimit-limit").as_deref(), Some("2"));
        assert_eq!(header_value(&headers, "x-ratelimit-remaining").as_deref(), Some("1"));

        let (status, headers, _) =
            send(&app, Method::GET, "/api/v1/tours", "10.0.0.1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header_value(&headers, "x-ratelimit-remaining").as_deref(), Some("0"));

        let (status, headers, body) =
            send(&app, Method::GET, "/api/v1/tours", "10.0.0.1", None, None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header_value(&headers, "x-ratelimit-remaining").as_deref(), Some("0"));
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "Too many requests from this IP! Please try again in an hour!"
        );

        // Another address has its own window
        let (status, _, _) =
            send(&app, Method::GET, "/api/v1/tours", "10.0.0.2", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_covers_only_api() {
        let app = app(1);
        send(&app, Method::GET, "/api/v1/tours", "10.0.0.1", None, None).await;

        let (status, headers, _) =
            send(&app, Method::GET, "/favicon.ico", "10.0.0.1", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(headers.get("x-ratelimit-limit").is_none());
    }

    #[tokio::test]
    async fn test_body_limit() {
        let app = app(100);
        let body = json!({
            "name": "Big Body",
            "email": "big@example.io",
            "password": "x".repeat(BODY_LIMIT_BYTES),
            "passwordConfirm": "pass1234"
        });

        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/users/signup",
            "10.0.0.1",
            None,
            Some(body.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn test_routers_share_users() {
        let app = app(100);
        let signup = json!({
            "name": "Laura Wilson",
            "email": "laura@example.io",
            "password": "pass1234",
            "passwordConfirm": "pass1234"
        });

        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/users/signup",
            "10.0.0.1",
            None,
            Some(signup.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _, body) =
            send(&app, Method::GET, "/api/v1/users/me", "10.0.0.1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");

        // A token from the users router is accepted by the reviews router
        let (status, _, body) =
            send(&app, Method::GET, "/api/v1/reviews", "10.0.0.1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["results"], 0);

        let (status, _, _) =
            send(&app, Method::GET, "/api/v1/reviews", "10.0.0.1", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Plain users cannot manage bookings
        let (status, _, _) =
            send(&app, Method::GET, "/api/v1/bookings", "10.0.0.1", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
