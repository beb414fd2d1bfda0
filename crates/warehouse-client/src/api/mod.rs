//! API Module
//!
//! HTTP plumbing between the page and the warehouse server.

mod endpoints;
mod gateway;
mod transport;

pub use endpoints::WarehouseApi;
pub use gateway::{decode_envelope, status_message, ApiGateway, ApiRequest};
pub use transport::{HttpRequest, HttpResponse, Transport};
