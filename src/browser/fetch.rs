//! Fetch Transport
//!
//! `gloo-net` implementation of the client transport. Requests go out with
//! `credentials: same-origin`; the bearer header is added by the gateway.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use http::StatusCode;
use warehouse_client::{HttpRequest, HttpResponse, Transport, TransportError};
use web_sys::RequestCredentials;

#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

fn builder_for(request: &HttpRequest) -> RequestBuilder {
    let url = request.url.as_str();
    match request.method.as_str() {
        "POST" => Request::post(url),
        "PUT" => Request::put(url),
        "DELETE" => Request::delete(url),
        "PATCH" => Request::patch(url),
        _ => Request::get(url),
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = builder_for(&request).credentials(RequestCredentials::SameOrigin);
        for (name, value) in request.headers.iter() {
            let value = value
                .to_str()
                .map_err(|e| TransportError::Build(e.to_string()))?;
            builder = builder.header(name.as_str(), value);
        }

        let sent = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError::Build(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| TransportError::Network(e.to_string()))?;

        let status = StatusCode::from_u16(response.status()).map_err(|e| TransportError::Read(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Read(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}
