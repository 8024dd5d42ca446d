//! HTTP implementation of the remote gateway on top of reqwest

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::RemoteGateway;
use crate::{
    config::ApiConfig,
    error::{ErrorResponse, PortalError, PortalResult},
    models::{ItemId, ReadingRequest, SubmissionReceipt},
    session::Credentials,
};

#[derive(Debug, Deserialize)]
struct WishlistResponse {
    items: Vec<ItemId>,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpGateway {
    /// Create a gateway for the given API, reading the bearer token from `credentials`
    pub fn new(config: &ApiConfig, credentials: Credentials) -> PortalResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortalError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, %method, path, "API request");

        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Request-Id", request_id.to_string());

        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and turn non-success statuses into portal errors
    async fn send(&self, builder: RequestBuilder) -> PortalResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "API refused credentials");
            return Err(PortalError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => err.message,
            Err(_) => body,
        };
        tracing::warn!(status = status.as_u16(), %message, "API rejected request");

        Err(PortalError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn add_item(&self, id: ItemId) -> PortalResult<()> {
        self.send(self.request(Method::POST, &format!("/wishlist/{}", id)))
            .await?;
        Ok(())
    }

    async fn remove_item(&self, id: ItemId) -> PortalResult<()> {
        self.send(self.request(Method::DELETE, &format!("/wishlist/{}", id)))
            .await?;
        Ok(())
    }

    async fn submit_selection(&self, request: ReadingRequest) -> PortalResult<SubmissionReceipt> {
        let response = self
            .send(self.request(Method::POST, "/reading-requests").json(&request))
            .await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(SubmissionReceipt::default());
        }

        serde_json::from_slice(&body)
            .map_err(|e| PortalError::Network(format!("Invalid reading request response: {}", e)))
    }

    async fn fetch_saved_items(&self) -> PortalResult<Vec<ItemId>> {
        let response = self.send(self.request(Method::GET, "/wishlist")).await?;
        let wishlist: WishlistResponse = response.json().await?;
        Ok(wishlist.items)
    }
}
