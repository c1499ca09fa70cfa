use crate::config::ClientConfig;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::models::{
    require, EmailRequest, EmailResponse, GroupMessageRequest, GroupMessageResponse,
    MessageRecord, MessageRequest, MessageResponse, ThreadResponse,
};
use crate::normalize::{self, unwrap_envelope, FromJson};
use crate::routes::Route;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

fn build_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for &(k, v) in DEFAULT_HEADERS {
        headers.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
    }

    let credentials = [
        (API_KEY_HEADER, config.api_key()),
        (API_SECRET_HEADER, config.api_secret()),
    ];
    for (k, v) in credentials {
        let mut val = HeaderValue::from_str(v)
            .map_err(|_| Error::Config(format!("{k} contains characters not allowed in a header")))?;
        val.set_sensitive(true);
        headers.insert(HeaderName::from_static(k), val);
    }
    Ok(headers)
}

/// Turn a raw response into the parsed body or a classified error.
fn classify(resp: HttpResponse) -> Result<Value> {
    let HttpResponse { status, body } = resp;
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body)?);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(Error::Authentication),
        StatusCode::UNPROCESSABLE_ENTITY => Err(Error::Validation {
            detail: serde_json::from_str(&body).unwrap_or(Value::String(body)),
        }),
        StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimit),
        _ => Err(Error::Status { status, body }),
    }
}

/// Client for the A1Base messaging and email API.
///
/// Cheap to clone; clones share the underlying transport and its connection
/// pool. Nothing is mutated while a call runs, so one client can serve many
/// concurrent tasks.
#[derive(Clone)]
pub struct A1BaseClient {
    config: Arc<ClientConfig>,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl A1BaseClient {
    /// Client for the public API with default settings.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key, api_secret))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build from `A1BASE_*` environment variables, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let headers = build_headers(&config)?;
        Ok(Self {
            config: Arc::new(config),
            headers,
            transport,
        })
    }

    pub fn builder() -> A1BaseClientBuilder {
        A1BaseClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and classify the outcome.
    ///
    /// `path` is appended to the base URL. A 2xx body is returned parsed but
    /// otherwise untouched (an empty body is `null`); 401, 422 and 429 map to
    /// their own error variants and every other failure to the generic ones.
    pub async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.config.base_url(), path)
        } else {
            format!("{}/{}", self.config.base_url(), path)
        };
        debug!("{} {}", method, url);

        let request = HttpRequest {
            method: method.clone(),
            url: url.clone(),
            headers: self.headers.clone(),
            body: body.cloned(),
            timeout: self.config.timeout(),
        };
        let resp = match self.transport.send(request).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("{} {} failed: {}", method, url, err);
                return Err(err);
            }
        };

        debug!("{} {} -> {}", method, url, resp.status);
        if !resp.status.is_success() {
            warn!("{} {} returned {}", method, url, resp.status);
        }
        classify(resp)
    }

    async fn call(&self, route: Route<'_>, body: Option<&Value>) -> Result<Value> {
        let raw = self.execute(route.method(), &route.path(), body).await?;
        Ok(unwrap_envelope(raw))
    }

    /// Send a WhatsApp or Telegram message to one recipient.
    ///
    /// A response that does not describe the message comes back as a
    /// `failed` [`MessageResponse`] echoing the request rather than an error.
    pub async fn send_individual_message(
        &self,
        account_id: &str,
        message: &MessageRequest,
    ) -> Result<MessageResponse> {
        require("account_id", account_id)?;
        message.validate()?;

        let body = serde_json::to_value(message)?;
        let route = Route::SendIndividual { account: account_id };
        let raw = self.execute(route.method(), &route.path(), Some(&body)).await?;
        Ok(normalize::message_response(&raw, message))
    }

    /// Post a message into an existing group thread.
    pub async fn send_group_message(
        &self,
        account_id: &str,
        message: &GroupMessageRequest,
    ) -> Result<GroupMessageResponse> {
        require("account_id", account_id)?;
        message.validate()?;

        let body = serde_json::to_value(message)?;
        let payload = self
            .call(Route::SendGroup { account: account_id }, Some(&body))
            .await?;
        Ok(normalize::group_message_response(&payload, message))
    }

    /// Send an email right away.
    pub async fn send_email(&self, account_id: &str, email: &EmailRequest) -> Result<EmailResponse> {
        self.post_email(Route::SendEmail { account: account_id }, account_id, email)
            .await
    }

    /// Store an email as a draft without dispatching it.
    pub async fn create_email(
        &self,
        account_id: &str,
        email: &EmailRequest,
    ) -> Result<EmailResponse> {
        self.post_email(Route::CreateEmail { account: account_id }, account_id, email)
            .await
    }

    async fn post_email(
        &self,
        route: Route<'_>,
        account_id: &str,
        email: &EmailRequest,
    ) -> Result<EmailResponse> {
        require("account_id", account_id)?;
        email.validate()?;

        let body = serde_json::to_value(email)?;
        let payload = self.call(route, Some(&body)).await?;
        Ok(normalize::email_response(&payload, email))
    }

    /// Relay an inbound WhatsApp webhook body to the API unchanged: no key is
    /// renamed, added or dropped.
    ///
    /// The payload's secret key is forwarded as-is; checking it is up to the
    /// server. Typed payloads can be relayed through
    /// [`WhatsAppIncoming::to_json`](crate::models::WhatsAppIncoming::to_json).
    pub async fn handle_whatsapp_incoming(&self, payload: &Value) -> Result<Value> {
        self.call(Route::WhatsAppIncoming, Some(payload)).await
    }

    /// Every thread of the account, in server order.
    pub async fn get_all_threads(&self, account_id: &str) -> Result<Vec<ThreadResponse>> {
        require("account_id", account_id)?;
        let payload = self.call(Route::AllThreads { account: account_id }, None).await?;
        Ok(normalize::list(&payload))
    }

    /// Threads the given phone number takes part in.
    pub async fn get_all_threads_by_phone(
        &self,
        account_id: &str,
        phone: &str,
    ) -> Result<Vec<ThreadResponse>> {
        require("account_id", account_id)?;
        require("phone", phone)?;
        let payload = self
            .call(Route::ThreadsByPhone { account: account_id, phone }, None)
            .await?;
        Ok(normalize::list(&payload))
    }

    pub async fn get_message_details(
        &self,
        account_id: &str,
        message_id: &str,
    ) -> Result<MessageRecord> {
        require("account_id", account_id)?;
        require("message_id", message_id)?;
        let payload = self
            .call(Route::MessageDetails { account: account_id, message_id }, None)
            .await?;
        Ok(MessageRecord::from_json(&payload))
    }

    /// Latest messages of a thread, in server order.
    pub async fn get_recent_messages(
        &self,
        account_id: &str,
        thread_id: &str,
    ) -> Result<Vec<MessageRecord>> {
        require("account_id", account_id)?;
        require("thread_id", thread_id)?;
        let payload = self
            .call(Route::RecentMessages { account: account_id, thread_id }, None)
            .await?;
        Ok(normalize::list(&payload))
    }

    /// One thread including its message list.
    pub async fn get_thread_details(
        &self,
        account_id: &str,
        thread_id: &str,
    ) -> Result<ThreadResponse> {
        require("account_id", account_id)?;
        require("thread_id", thread_id)?;
        let payload = self
            .call(Route::ThreadDetails { account: account_id, thread_id }, None)
            .await?;
        Ok(ThreadResponse::from_json(&payload))
    }
}

impl fmt::Debug for A1BaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("A1BaseClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Step-by-step construction of an [`A1BaseClient`].
#[derive(Default)]
pub struct A1BaseClientBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl A1BaseClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Must be an `https://` URL; checked in [`build`](Self::build).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the default reqwest transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<A1BaseClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("api key is required".into()))?;
        let api_secret = self
            .api_secret
            .ok_or_else(|| Error::Config("api secret is required".into()))?;

        let mut config = ClientConfig::new(api_key, api_secret);
        if let Some(url) = self.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        match self.transport {
            Some(transport) => A1BaseClient::with_transport(config, transport),
            None => A1BaseClient::with_config(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_body_is_returned_untouched() {
        let value = classify(response(200, r#"{"data":{"id":"t1"},"extra":1}"#)).unwrap();
        assert_eq!(value, serde_json::json!({"data": {"id": "t1"}, "extra": 1}));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(classify(response(204, "")).unwrap(), Value::Null);
    }

    #[test]
    fn unreadable_success_body_is_a_json_error() {
        let err = classify(response(200, "<html>")).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_api_error());
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        assert!(matches!(classify(response(401, "")), Err(Error::Authentication)));
        assert!(matches!(classify(response(429, "slow down")), Err(Error::RateLimit)));
        match classify(response(503, "down")) {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_keeps_text_body_when_not_json() {
        match classify(response(422, "to is invalid")) {
            Err(Error::Validation { detail }) => assert_eq!(detail, "to is invalid"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn credential_headers_are_attached() {
        let headers = build_headers(&ClientConfig::new("fake_key", "fake_secret")).unwrap();
        assert_eq!(headers["x-api-key"], "fake_key");
        assert_eq!(headers["x-api-secret"], "fake_secret");
        assert_eq!(headers["content-type"], "application/json");
        assert!(headers["x-api-key"].is_sensitive());
    }

    #[test]
    fn newline_in_credentials_is_rejected() {
        let err = build_headers(&ClientConfig::new("bad\nkey", "s")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builder_requires_credentials() {
        let err = A1BaseClient::builder().api_key("k").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builder_rejects_plain_http() {
        let err = A1BaseClient::builder()
            .api_key("k")
            .api_secret("s")
            .base_url("http://api.a1base.com/v1")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InsecureBaseUrl(_)));
    }

    #[test]
    fn default_client_targets_public_api() {
        let client = A1BaseClient::new("fake_key", "fake_secret").unwrap();
        assert_eq!(client.config().base_url(), "https://api.a1base.com/v1");
        assert!(!format!("{client:?}").contains("fake_secret"));
    }
}
