use super::EchoPayload;
use crate::http::{Request, RequestHandler, Response, cors};
use async_trait::async_trait;
use http::{Method, StatusCode};
use tracing::{debug, error};

/// Methods the echo handler answers; anything else gets a 501 from the server
pub const SUPPORTED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Reflects requests back as JSON with permissive CORS headers
///
/// `OPTIONS` is answered as a CORS preflight: 204 with no body. Every other
/// supported method gets a 200 carrying an [`EchoPayload`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn preflight(&self, request: &Request) -> Response {
        cors::apply(Response::new(StatusCode::NO_CONTENT), request)
    }

    /// Echoes `request` as seen at `ts` (epoch milliseconds)
    pub fn echo_at(&self, request: &Request, ts: i64) -> Response {
        let payload = EchoPayload::from_request(request, ts);
        let response = match Response::json(StatusCode::OK, &payload) {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Failed to serialize echo payload");
                Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };
        cors::apply(response, request)
    }

    pub fn echo(&self, request: &Request) -> Response {
        self.echo_at(request, chrono::Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl RequestHandler for EchoHandler {
    fn supports(&self, method: &Method) -> bool {
        SUPPORTED_METHODS.contains(method)
    }

    async fn handle(&self, request: Request) -> Response {
        if request.method == Method::OPTIONS {
            debug!(path = %request.path, "Answering preflight");
            self.preflight(&request)
        } else {
            self.echo(&request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::JSON_CONTENT_TYPE;
    use serde_json::{Value, json};

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[tokio::test]
    async fn echoes_every_supported_verb() {
        let handler = EchoHandler::new();
        for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let response = handler.handle(Request::new(method.clone(), "/any/path")).await;

            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.header("content-type"), Some(JSON_CONTENT_TYPE));
            let value = body_json(&response);
            assert_eq!(value["ok"], true);
            assert_eq!(value["method"], method.as_str());
            assert_eq!(value["path"], "/any/path");
        }
    }

    #[tokio::test]
    async fn preflight_is_empty_204_with_cors() {
        let handler = EchoHandler::new();
        let request = Request::new(Method::OPTIONS, "/x")
            .with_header("Access-Control-Request-Headers", "X-Custom");
        let response = handler.handle(request).await;

        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("Access-Control-Allow-Methods"),
            Some("GET,POST,PUT,PATCH,DELETE,OPTIONS")
        );
        assert_eq!(response.header("Access-Control-Allow-Headers"), Some("X-Custom"));
        assert_eq!(response.header("Access-Control-Max-Age"), Some("86400"));
    }

    #[test]
    fn json_body_is_parsed() {
        let request = Request::new(Method::POST, "/")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"a":1}"#);
        let value = body_json(&EchoHandler::new().echo_at(&request, 7));

        assert_eq!(value["bodyText"], r#"{"a":1}"#);
        assert_eq!(value["bodyJson"], json!({"a": 1}));
        assert_eq!(value["ts"], 7);
    }

    #[test]
    fn invalid_json_downgrades_to_null() {
        let request = Request::new(Method::POST, "/").with_body("[1, 2,");
        let value = body_json(&EchoHandler::new().echo(&request));

        assert_eq!(value["bodyText"], "[1, 2,");
        assert_eq!(value.get("bodyJson"), Some(&Value::Null));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let request = Request::new(Method::PUT, "/").with_body(&b"ok \xff\xfe end"[..]);
        let response = EchoHandler::new().echo(&request);

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(body_json(&response)["bodyText"], "ok \u{fffd}\u{fffd} end");
    }

    #[test]
    fn echo_carries_cors_headers() {
        let response = EchoHandler::new().echo(&Request::new(Method::DELETE, "/"));
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
        assert_eq!(response.header("access-control-allow-headers"), Some("*"));
    }

    #[test]
    fn supported_methods() {
        let handler = EchoHandler::new();
        assert!(handler.supports(&Method::PATCH));
        assert!(handler.supports(&Method::OPTIONS));
        assert!(!handler.supports(&Method::HEAD));
        assert!(!handler.supports(&Method::TRACE));
    }
}
