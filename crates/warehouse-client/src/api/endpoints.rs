//! Typed Warehouse Endpoints

use std::rc::Rc;

use super::gateway::{ApiGateway, ApiRequest};
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::filter::HistoryQuery;
use crate::models::{HistoryEntry, Item, ItemDraft, LoginData, LoginRequest, RegisterRequest, Subject};

pub struct WarehouseApi {
    gateway: ApiGateway,
    config: Rc<ClientConfig>,
}

impl WarehouseApi {
    pub fn new(gateway: ApiGateway, config: Rc<ClientConfig>) -> Self {
        Self { gateway, config }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<LoginData, ApiError> {
        let request = ApiRequest::post(self.config.api_path("auth/login")).json(body)?.public();
        self.gateway.call_data(request).await
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.config.api_path("auth/register")).json(body)?.public();
        self.gateway.call_unit(request).await
    }

    pub async fn me(&self) -> Result<Subject, ApiError> {
        self.gateway.call_data(ApiRequest::get(self.config.api_path("me"))).await
    }

    /// A `null` list is an empty list.
    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        let items = self.gateway.call(ApiRequest::get(self.config.api_path("items"))).await?;
        Ok(items.unwrap_or_default())
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, ApiError> {
        self.gateway
            .call_data(ApiRequest::get(self.config.api_path(&format!("items/{id}"))))
            .await
    }

    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Option<Item>, ApiError> {
        let request = ApiRequest::post(self.config.api_path("items")).json(draft)?;
        self.gateway.call(request).await
    }

    /// Re-sending the same draft for the same id leaves the item unchanged.
    pub async fn update_item(&self, id: i64, draft: &ItemDraft) -> Result<Option<Item>, ApiError> {
        let request = ApiRequest::put(self.config.api_path(&format!("items/{id}"))).json(draft)?;
        self.gateway.call(request).await
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::delete(self.config.api_path(&format!("items/{id}"))))
            .await
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, ApiError> {
        let mut url = self.config.api_path("history");
        let query = query.to_query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        let entries = self.gateway.call(ApiRequest::get(url)).await?;
        Ok(entries.unwrap_or_default())
    }

    pub async fn item_history(&self, item_id: i64) -> Result<Vec<HistoryEntry>, ApiError> {
        let url = self.config.api_path(&format!("history/items/{item_id}"));
        let entries = self.gateway.call(ApiRequest::get(url)).await?;
        Ok(entries.unwrap_or_default())
    }

    /// Server-side teardown of the cookie session. The answer is a redirect
    /// page, so only transport failures are reported.
    pub async fn logout(&self) -> Result<(), TransportError> {
        let request = ApiRequest::get(self.config.logout_path.clone()).public();
        self.gateway.request(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryAction, Role};
    use crate::session::{MemoryTokenStore, Session, SessionGuard};
    use crate::testing::{RecordingNavigator, ScriptedTransport};
    use http::Method;

    fn api() -> (WarehouseApi, Rc<ScriptedTransport>) {
        let store = Rc::new(MemoryTokenStore::with_session(&Session::from_credential("abc")));
        let guard = Rc::new(SessionGuard::new(store, Rc::new(RecordingNavigator::default())));
        let transport = Rc::new(ScriptedTransport::default());
        let gateway = ApiGateway::new(transport.clone(), guard);
        (WarehouseApi::new(gateway, Rc::new(ClientConfig::default())), transport)
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (api, transport) = api();
        transport.push_json(
            200,
            r#"{"success":true,"data":{"token":"t","username":"alice","role":"admin"}}"#,
        );

        let data = api
            .login(&LoginRequest { username: "alice".into(), password: "pw".into() })
            .await
            .unwrap();
        assert_eq!(data.role, Role::Admin);

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, "/api/auth/login");
        assert_eq!(sent.body.as_deref(), Some(r#"{"username":"alice","password":"pw"}"#));
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let (api, transport) = api();
        transport.push_json(200, r#"{"success":true,"data":null}"#);
        assert_eq!(api.list_items().await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_history_query_in_url() {
        let (api, transport) = api();
        transport.push_json(200, r#"{"success":true,"data":[]}"#);
        transport.push_json(200, r#"{"success":true,"data":[]}"#);

        let query = HistoryQuery {
            action: Some(HistoryAction::Delete),
            ..HistoryQuery::default()
        };
        api.history(&query).await.unwrap();
        api.history(&HistoryQuery::default()).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "/api/history?action=DELETE");
        assert_eq!(sent[1].url, "/api/history");
    }

    #[tokio::test]
    async fn test_logout_ignores_status() {
        let (api, transport) = api();
        transport.push_json(302, "");
        assert_eq!(api.logout().await, Ok(()));
        assert_eq!(transport.requests()[0].url, "/logout");
    }
}
