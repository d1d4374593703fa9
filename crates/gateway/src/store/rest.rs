use std::sync::RwLock;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use tiervault_access::{Asset, User};
use tiervault_core::UserId;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::records::{NewAsset, NewUser, UserPatch};

use super::r#trait::{VaultGateway, object_path};

/// REST gateway for the delegated-auth deployment variant.
///
/// Speaks a PostgREST-style record API (`/rest/v1`, filter query parameters,
/// `Prefer: return=representation`) and a storage object API (`/storage/v1`).
/// Requests authenticate with the session's bearer token when one is set and
/// fall back to the anon key.
#[derive(Debug)]
pub struct RestGateway {
    config: GatewayConfig,
    http: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl RestGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            bearer: RwLock::new(None),
        }
    }

    /// Set (or clear) the bearer credential used for subsequent calls.
    /// Called by the session layer on refresh/logout.
    pub fn set_bearer(&self, token: Option<String>) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = token;
        }
    }

    fn auth_headers(&self) -> GatewayResult<HeaderMap> {
        let token = self
            .bearer
            .read()
            .ok()
            .and_then(|b| b.clone())
            .unwrap_or_else(|| self.config.anon_key().to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(self.config.anon_key())
                .map_err(|_| GatewayError::configuration("anon key is not a valid header value"))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GatewayError::configuration("bearer token is not a valid header value"))?,
        );
        Ok(headers)
    }

    async fn check(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            StatusCode::CONFLICT => Err(GatewayError::conflict(body)),
            _ => Err(GatewayError::unavailable(format!("{status}: {body}"))),
        }
    }

    async fn rest_select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<Vec<T>> {
        let url = format!("{}/{table}", self.config.rest_base());
        debug!(table, "gateway select");
        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("decode response: {e}")))
    }

    /// POST/PATCH with `Prefer: return=representation`, returning the first
    /// row of the representation.
    async fn rest_write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> GatewayResult<Vec<T>> {
        let url = format!("{}/{table}", self.config.rest_base());
        debug!(table, %method, "gateway write");
        let response = self
            .http
            .request(method, &url)
            .headers(self.auth_headers()?)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("decode response: {e}")))
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/{bucket}/{}",
            self.config.storage_base(),
            encode_path(path)
        )
    }
}

/// Percent-encode a blob path segment by segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait::async_trait]
impl VaultGateway for RestGateway {
    async fn find_user_by_key(&self, key: &str) -> GatewayResult<Option<User>> {
        let rows: Vec<User> = self
            .rest_select(
                "users",
                &[
                    ("select", "*".to_string()),
                    ("identity_key", format!("eq.{key}")),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_user(&self, user: NewUser) -> GatewayResult<User> {
        let rows: Vec<User> = self
            .rest_write(reqwest::Method::POST, "users", &[], &user)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::unavailable("insert returned no representation"))
    }

    async fn patch_user(&self, id: UserId, patch: UserPatch) -> GatewayResult<User> {
        let rows: Vec<User> = self
            .rest_write(
                reqwest::Method::PATCH,
                "users",
                &[("id", format!("eq.{id}"))],
                &patch,
            )
            .await?;
        rows.into_iter().next().ok_or(GatewayError::NotFound)
    }

    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        self.rest_select(
            "users",
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn list_assets(&self) -> GatewayResult<Vec<Asset>> {
        self.rest_select(
            "assets",
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn insert_asset(&self, asset: NewAsset) -> GatewayResult<Asset> {
        let rows: Vec<Asset> = self
            .rest_write(reqwest::Method::POST, "assets", &[], &asset)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::unavailable("insert returned no representation"))
    }

    async fn put_blob(
        &self,
        bucket: &str,
        path_hint: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> GatewayResult<String> {
        let path = object_path(path_hint);
        let content_type = if content_type.is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };
        debug!(bucket, path, "blob upload");
        let response = self
            .http
            .post(self.object_url(bucket, &path))
            .headers(self.auth_headers()?)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;
        Self::check(response).await?;
        Ok(path)
    }

    async fn get_blob(&self, bucket: &str, path: &str) -> GatewayResult<Vec<u8>> {
        debug!(bucket, path, "blob download");
        let response = self
            .http
            .get(self.object_url(bucket, path))
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;
        let bytes = Self::check(response)
            .await?
            .bytes()
            .await
            .map_err(|e| GatewayError::unavailable(format!("read body: {e}")))?;
        Ok(bytes.to_vec())
    }
}
