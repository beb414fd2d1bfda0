//! API Gateway
//!
//! Single path for every outbound call: credential attachment, 401/403
//! interception and envelope decoding.

use std::rc::Rc;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::{ApiError, TransportError};
use crate::models::Envelope;
use crate::session::SessionGuard;

/// Request before credential attachment.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    /// Public requests carry no credential and are not intercepted.
    pub public: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), body: None, public: false }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

pub struct ApiGateway {
    transport: Rc<dyn Transport>,
    guard: Rc<SessionGuard>,
}

impl ApiGateway {
    pub fn new(transport: Rc<dyn Transport>, guard: Rc<SessionGuard>) -> Self {
        Self { transport, guard }
    }

    pub fn guard(&self) -> &Rc<SessionGuard> {
        &self.guard
    }

    /// `Ok(None)` means the session was invalidated and the page is leaving.
    /// Callers stop without reading anything.
    pub async fn request(&self, request: ApiRequest) -> Result<Option<HttpResponse>, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if !request.public {
            let Some(session) = self.guard.store().load() else {
                debug!("{} {} skipped, no stored credential", request.method, request.url);
                self.guard.invalidate();
                return Ok(None);
            };
            let value = HeaderValue::from_str(&format!("Bearer {}", session.credential))
                .map_err(|e| TransportError::Build(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let public = request.public;
        let http_request = HttpRequest {
            method: request.method,
            url: request.url,
            headers,
            body: request.body,
        };
        let method = http_request.method.clone();
        let url = http_request.url.clone();

        let response = self.transport.send(http_request).await.map_err(|e| {
            warn!("{method} {url} failed: {e}");
            e
        })?;

        if !public && is_auth_failure(response.status) {
            debug!("{method} {url} answered {}, invalidating session", response.status);
            self.guard.invalidate();
            return Ok(None);
        }

        Ok(Some(response))
    }

    /// Envelope call whose `data` may be absent.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>, ApiError> {
        match self.request(request).await? {
            Some(response) => decode_envelope(&response),
            None => Err(ApiError::SessionInvalidated),
        }
    }

    /// Envelope call that must carry `data`.
    pub async fn call_data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.call(request)
            .await?
            .ok_or_else(|| ApiError::Decode("response carried no data".into()))
    }

    /// Envelope call whose `data` is ignored.
    pub async fn call_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.call::<serde_json::Value>(request).await.map(|_| ())
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Map `{success, data, error}` onto the error taxonomy.
pub fn decode_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    let status = response.status;
    let envelope: Envelope<serde_json::Value> = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
        Err(_) => return Err(status_error(status, None)),
    };

    if !envelope.success || !status.is_success() {
        return Err(status_error(status, envelope.error));
    }

    match envelope.data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string())),
    }
}

/// Message used when an error response does not carry one.
pub fn status_message(status: u16) -> String {
    format!("request failed with status {status}")
}

fn status_error(status: StatusCode, message: Option<String>) -> ApiError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status_message(status.as_u16()));
    ApiError::Domain { status: status.as_u16(), message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::session::{MemoryTokenStore, Session, TokenStore};
    use crate::testing::{RecordingNavigator, ScriptedTransport};
    use crate::view::Surface;

    struct Fixture {
        gateway: ApiGateway,
        transport: Rc<ScriptedTransport>,
        store: Rc<MemoryTokenStore>,
        navigator: Rc<RecordingNavigator>,
    }

    fn fixture(with_session: bool) -> Fixture {
        let store = Rc::new(if with_session {
            MemoryTokenStore::with_session(&Session::from_credential("abc"))
        } else {
            MemoryTokenStore::new()
        });
        let navigator = Rc::new(RecordingNavigator::default());
        let transport = Rc::new(ScriptedTransport::default());
        let guard = Rc::new(SessionGuard::new(store.clone(), navigator.clone()));
        Fixture {
            gateway: ApiGateway::new(transport.clone(), guard),
            transport,
            store,
            navigator,
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_credential() {
        let f = fixture(true);
        f.transport.push_json(200, r#"{"success":true,"data":[]}"#);

        let items: Option<Vec<Item>> = f.gateway.call(ApiRequest::get("/api/items")).await.unwrap();
        assert_eq!(items, Some(vec![]));

        let sent = f.transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_session() {
        let f = fixture(true);
        f.transport.push_json(401, r#"{"success":false,"error":"token expired"}"#);

        let result = f.gateway.request(ApiRequest::get("/api/items")).await.unwrap();
        assert!(result.is_none());
        assert_eq!(f.store.load(), None);
        assert_eq!(f.navigator.redirects(), vec![Surface::Login]);

        let f = fixture(true);
        f.transport.push_json(403, "{}");
        let result = f.gateway.call_unit(ApiRequest::delete("/api/items/1")).await;
        assert_eq!(result, Err(ApiError::SessionInvalidated));
    }

    #[tokio::test]
    async fn test_public_request_is_not_intercepted() {
        let f = fixture(false);
        f.transport.push_json(401, r#"{"success":false,"error":"invalid credentials"}"#);

        let result = f.gateway.call_unit(ApiRequest::post("/api/auth/login").public()).await;
        assert_eq!(
            result,
            Err(ApiError::Domain { status: 401, message: "invalid credentials".into() })
        );
        assert!(f.navigator.redirects().is_empty());
        assert!(f.transport.requests()[0].headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_is_not_sent() {
        let f = fixture(false);
        let result = f.gateway.request(ApiRequest::get("/api/items")).await.unwrap();
        assert!(result.is_none());
        assert!(f.transport.requests().is_empty());
        assert_eq!(f.navigator.redirects(), vec![Surface::Login]);
    }

    #[tokio::test]
    async fn test_transport_error_is_distinct() {
        let f = fixture(true);
        f.transport.push_error(TransportError::Network("offline".into()));

        let result = f.gateway.call_unit(ApiRequest::get("/api/items")).await;
        assert!(matches!(result, Err(ApiError::Transport(TransportError::Network(_)))));
        assert!(result.unwrap_err().is_connectivity());
        assert!(f.navigator.redirects().is_empty());
        assert!(f.store.load().is_some());
    }

    #[test]
    fn test_envelope_decoding() {
        let ok = HttpResponse::new(StatusCode::OK, r#"{"success":false,"error":"name taken"}"#);
        assert_eq!(
            decode_envelope::<Item>(&ok),
            Err(ApiError::Domain { status: 200, message: "name taken".into() })
        );

        let html = HttpResponse::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(
            decode_envelope::<Item>(&html),
            Err(ApiError::Domain { status: 502, message: "request failed with status 502".into() })
        );

        let garbled = HttpResponse::new(StatusCode::OK, "not json");
        assert!(matches!(decode_envelope::<Item>(&garbled), Err(ApiError::Decode(_))));

        let null_data = HttpResponse::new(StatusCode::OK, r#"{"success":true,"data":null}"#);
        assert_eq!(decode_envelope::<Vec<Item>>(&null_data), Ok(None));
    }
}
