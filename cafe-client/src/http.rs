//! HTTP client for network-based API calls

use crate::api::{CatalogApi, CheckoutApi, GeocodingApi};
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use shared::models::{
    ApiErrorBody, AutocompleteResponse, AutocompleteSuggestion, CatalogResponse, CheckoutRequest,
    CheckoutResponse, Coordinates, OrderStatusResponse, ReverseGeocodeResult,
};

/// 网络 HTTP 客户端
///
/// Talks to the backend (catalog, checkout, order status) and to the
/// location API (place search, reverse geocode).
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: Option<String>,
    location_base_url: String,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config
                .base_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string()),
            location_base_url: config.location_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn backend_url(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.as_deref().ok_or(ClientError::NotConfigured)?;
        Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    fn location_url(&self, path: &str) -> ClientResult<Url> {
        Url::parse(&format!(
            "{}/{}",
            self.location_base_url,
            path.trim_start_matches('/')
        ))
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        tracing::debug!(%url, "GET");
        let base = origin(&url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_send_error(e, base))?;
        handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(%url, "POST");
        let base = origin(&url);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| classify_send_error(e, base))?;
        handle_response(response).await
    }
}

fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Connect failures and timeouts mean the backend is unreachable
fn classify_send_error(e: reqwest::Error, base_url: String) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::Unreachable {
            base_url,
            source: e,
        }
    } else {
        ClientError::Http(e)
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "Response received");

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        // 尝试解析为 API 错误响应
        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => body.message_text(),
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => format!("Request failed ({})", status.as_u16()),
        };
        tracing::warn!(status = status.as_u16(), %message, "Request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl CatalogApi for NetworkHttpClient {
    async fn fetch_catalog(&self) -> ClientResult<CatalogResponse> {
        let url = self.backend_url("catalog")?;
        self.get(url).await
    }
}

#[async_trait]
impl CheckoutApi for NetworkHttpClient {
    async fn submit_checkout(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
        let url = self.backend_url("orders/checkout")?;
        tracing::info!(items = request.items.len(), "Submitting checkout");
        self.post(url, request).await
    }

    async fn order_status(&self, client_reference: &str) -> ClientResult<OrderStatusResponse> {
        let mut url = self.backend_url("orders/status")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl("backend URL cannot be a base".into()))?
            .push(client_reference);
        self.get(url).await
    }
}

#[async_trait]
impl GeocodingApi for NetworkHttpClient {
    async fn search(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> ClientResult<Vec<AutocompleteSuggestion>> {
        let mut url = self.location_url("api/location/autocomplete")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(at) = bias {
                pairs.append_pair("lat", &at.lat.to_string());
                pairs.append_pair("lng", &at.lng.to_string());
            }
        }
        let resp: AutocompleteResponse = self.get(url).await?;
        Ok(resp.results)
    }

    async fn reverse(&self, at: Coordinates) -> ClientResult<ReverseGeocodeResult> {
        let mut url = self.location_url("api/location/reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &at.lat.to_string())
            .append_pair("lng", &at.lng.to_string());
        self.get(url).await
    }
}
