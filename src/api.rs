use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

use crate::config::Config;
use crate::model::{
    Ack, ApiResponse, ConfigEntry, ConfigUpdate, ListQuery, NewNotification, NotificationRecord,
    Page,
};

const NOTIFICATION_PATH: &str = "admin/notification";
const CONFIG_PATH: &str = "admin/config";

/// Admin endpoints the notification page talks to.
///
/// `Err` is reserved for transport and decoding failures. A decoded envelope
/// with a non-zero `code` comes back as `Ok` and the caller decides what it
/// means.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_notifications(
        &self,
        query: ListQuery,
    ) -> Result<ApiResponse<Page<NotificationRecord>>>;

    async fn create_notification(&self, body: &NewNotification) -> Result<Ack>;

    async fn update_notification(&self, record: &NotificationRecord) -> Result<Ack>;

    async fn delete_notification(&self, id: i64) -> Result<Ack>;

    async fn get_configs(&self) -> Result<ApiResponse<Vec<ConfigEntry>>>;

    async fn put_configs(&self, configs: &[ConfigEntry]) -> Result<Ack>;
}

#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    pub fn new(base_url: Url, token: String) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("notice-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        // `Url::join` drops the last segment unless the base ends with '/'.
        let base_url = if base_url.path().ends_with('/') {
            base_url
        } else {
            let mut url = base_url;
            let path = format!("{}/", url.path());
            url.set_path(&path);
            url
        };
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base_url = Url::parse(&cfg.api.base_url).context("invalid api.base_url")?;
        Self::new(base_url, cfg.api.token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .with_context(|| format!("invalid endpoint {}", path))?;
        Ok(self
            .http
            .request(method, endpoint)
            .header("Authorization", format!("Bearer {}", self.token)))
    }

    pub fn build_list_request(&self, query: ListQuery) -> Result<reqwest::Request> {
        self.request(Method::GET, NOTIFICATION_PATH)?
            .query(&query)
            .build()
            .context("failed to build list request")
    }

    pub fn build_create_request(&self, body: &NewNotification) -> Result<reqwest::Request> {
        self.request(Method::POST, NOTIFICATION_PATH)?
            .json(body)
            .build()
            .context("failed to build create request")
    }

    pub fn build_update_request(&self, record: &NotificationRecord) -> Result<reqwest::Request> {
        self.request(Method::PUT, NOTIFICATION_PATH)?
            .json(record)
            .build()
            .context("failed to build update request")
    }

    pub fn build_delete_request(&self, id: i64) -> Result<reqwest::Request> {
        self.request(Method::DELETE, NOTIFICATION_PATH)?
            .query(&[("id", id)])
            .build()
            .context("failed to build delete request")
    }

    pub fn build_get_configs_request(&self) -> Result<reqwest::Request> {
        self.request(Method::GET, CONFIG_PATH)?
            .build()
            .context("failed to build config request")
    }

    pub fn build_put_configs_request(&self, configs: &[ConfigEntry]) -> Result<reqwest::Request> {
        let body = ConfigUpdate {
            configs: configs.to_vec(),
        };
        self.request(Method::PUT, CONFIG_PATH)?
            .json(&body)
            .build()
            .context("failed to build config update request")
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending admin request");
        let res = self
            .http
            .execute(request)
            .await
            .with_context(|| format!("failed to reach {}", url))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("admin api error {} on {} {}: {}", status, method, url, body));
        }

        let body = res.text().await.context("failed to read admin response")?;
        debug!(%method, %url, %status, body_len = body.len(), "admin response");
        serde_json::from_str(&body)
            .with_context(|| format!("invalid admin response from {} {}", method, url))
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn list_notifications(
        &self,
        query: ListQuery,
    ) -> Result<ApiResponse<Page<NotificationRecord>>> {
        let request = self.build_list_request(query)?;
        self.execute(request).await
    }

    async fn create_notification(&self, body: &NewNotification) -> Result<Ack> {
        let request = self.build_create_request(body)?;
        self.execute(request).await
    }

    async fn update_notification(&self, record: &NotificationRecord) -> Result<Ack> {
        let request = self.build_update_request(record)?;
        self.execute(request).await
    }

    async fn delete_notification(&self, id: i64) -> Result<Ack> {
        let request = self.build_delete_request(id)?;
        self.execute(request).await
    }

    async fn get_configs(&self) -> Result<ApiResponse<Vec<ConfigEntry>>> {
        let request = self.build_get_configs_request()?;
        self.execute(request).await
    }

    async fn put_configs(&self, configs: &[ConfigEntry]) -> Result<Ack> {
        let request = self.build_put_configs_request(configs)?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationStatus;
    use serde_json::{json, Value};

    fn client() -> AdminClient {
        AdminClient::new(
            Url::parse("https://shop.example.com/api").unwrap(),
            "secret".into(),
        )
        .unwrap()
    }

    fn request_json<T: DeserializeOwned>(request: &reqwest::Request) -> T {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> &'a str {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(client().base_url().as_str(), "https://shop.example.com/api/");
    }

    #[test]
    fn list_request_carries_paging_and_auth() {
        let request = client()
            .build_list_request(ListQuery { page: 2, page_size: 10 })
            .unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/api/admin/notification");
        assert_eq!(request.url().query(), Some("page=2&page_size=10"));
        assert_eq!(header(&request, "Authorization"), "Bearer secret");
    }

    #[test]
    fn create_request_has_no_id() {
        let body = NewNotification {
            title: "标题".into(),
            content: "<p>x</p>".into(),
            status: NotificationStatus::Offline,
            sort: 5,
        };
        let request = client().build_create_request(&body).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(header(&request, "Content-Type"), "application/json");
        let sent: Value = request_json(&request);
        assert_eq!(
            sent,
            json!({ "title": "标题", "content": "<p>x</p>", "status": 2, "sort": 5 })
        );
    }

    #[test]
    fn update_request_sends_full_record() {
        let mut record = NotificationRecord::blank();
        record.id = Some(12);
        record.title = "t".into();
        record.content = "c".into();
        let request = client().build_update_request(&record).unwrap();
        assert_eq!(request.method(), Method::PUT);
        let sent: NotificationRecord = request_json(&request);
        assert_eq!(sent, record);
    }

    #[test]
    fn delete_request_passes_id_as_query() {
        let request = client().build_delete_request(42).unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.url().query(), Some("id=42"));
    }

    #[test]
    fn put_configs_wraps_entries() {
        let entries = vec![ConfigEntry::new("shop_introduce", Some("<p>hi</p>".into()))];
        let request = client().build_put_configs_request(&entries).unwrap();
        assert_eq!(request.url().path(), "/api/admin/config");
        let sent: Value = request_json(&request);
        assert_eq!(
            sent,
            json!({ "configs": [{ "name": "shop_introduce", "value": "<p>hi</p>" }] })
        );
    }

    #[test]
    fn debug_hides_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("secret"));
    }
}
