#[cfg(test)]
mod tests {
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::helpers::app::STAT;
    use crate::helpers::{make_test_app, stat_file};

    async fn preflight(uri: &str) {
        let stat = stat_file(STAT);
        let app = make_test_app(&stat, Duration::from_secs(1));

        let req = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .body(AxumBody::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_ascii_uppercase();
        assert!(methods.contains("GET"), "{methods}");
        assert!(methods.contains("OPTIONS"), "{methods}");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn options_on_events_is_bare_success() {
        preflight("/events").await;
    }

    #[tokio::test]
    async fn options_on_unknown_route_is_bare_success() {
        preflight("/nowhere").await;
    }

    #[tokio::test]
    async fn preflight_does_not_open_a_stream() {
        let stat = stat_file(STAT);
        let app = make_test_app(&stat, Duration::from_millis(10));

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/events")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(AxumBody::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/event-stream"[..])
        );
    }

    #[tokio::test]
    async fn simple_requests_carry_allow_origin() {
        let stat = stat_file(STAT);
        let app = make_test_app(&stat, Duration::from_secs(1));

        let req = Request::builder()
            .method("GET")
            .uri("/health")
            .header(header::ORIGIN, "http://example.com")
            .body(AxumBody::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
