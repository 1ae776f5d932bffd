//! HTTP implementation of [`CredentialStore`]
//!
//! Talks to the appliance REST API. The access token is obtained lazily on
//! the first authenticated request and reused for the rest of the process.

use crate::encoding::encode_id;
use crate::{
    ApiError, BatchOutcome, CredentialStore, HostFactoryToken, HostRecord, Result, TokenRequest,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use conjur_config::ClientConfig;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use tokio::sync::OnceCell;

/// Credential store reached over the appliance REST API
pub struct HttpCredentialStore {
    client: reqwest::Client,
    config: ClientConfig,
    token: OnceCell<SecretString>,
}

impl HttpCredentialStore {
    /// Create a store client. Performs no network I/O.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("conjur/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> Result<String> {
        Ok(format!("{}{}", self.config.appliance_url()?, path))
    }

    /// `Authorization` header value for the configured identity
    async fn authorization(&self) -> Result<String> {
        let token = self
            .token
            .get_or_try_init(|| self.authenticate())
            .await?;
        Ok(format!(
            "Token token=\"{}\"",
            STANDARD.encode(token.expose_secret().as_bytes())
        ))
    }

    async fn authenticate(&self) -> Result<SecretString> {
        let login = self.config.authn_login()?;
        let api_key = self.config.api_key()?;
        let url = self.url(&format!("/authn/users/{}/authenticate", encode_id(login)))?;

        tracing::debug!("Authenticating as {}", login);
        let resp = self
            .client
            .post(&url)
            .body(api_key.expose_secret().to_string())
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;
        let resp = check_status(resp, login).await?;

        let token = resp.text().await.map_err(|e| ApiError::Decode {
            target: login.to_string(),
            message: e.to_string(),
        })?;
        Ok(SecretString::from(token))
    }

    async fn get_authorized(&self, url: &str) -> Result<Response> {
        let auth = self.authorization().await?;
        self.client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| connection_error(url, e))
    }

    async fn fetch_batch(&self, paths: &[String]) -> Result<HashMap<String, String>> {
        let vars = paths
            .iter()
            .map(|p| encode_id(p))
            .collect::<Vec<_>>()
            .join(",");
        let url = self.url(&format!("/variables/values?vars={}", vars))?;

        let resp = check_status(self.get_authorized(&url).await?, "variables/values").await?;
        resp.json::<HashMap<String, String>>()
            .await
            .map_err(|e| ApiError::Decode {
                target: "variables/values".to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl CredentialStore for HttpCredentialStore {
    async fn check_permission(&self, path: &str) -> Result<bool> {
        let url = self.url(&format!(
            "/authz/{}/resources/variable/{}?check=true&privilege=execute",
            encode_id(self.config.account()?),
            encode_id(path)
        ))?;

        let resp = self.get_authorized(&url).await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(false),
            _ => check_status(resp, path).await.map(|_| false),
        }
    }

    async fn fetch_many(&self, paths: &[String]) -> BatchOutcome {
        if paths.is_empty() {
            return BatchOutcome::Resolved(HashMap::new());
        }
        match self.fetch_batch(paths).await {
            Ok(values) => BatchOutcome::Resolved(values),
            Err(e) => BatchOutcome::Unsupported(e),
        }
    }

    async fn fetch_one(&self, path: &str) -> Result<String> {
        let url = self.url(&format!("/variables/{}/value", encode_id(path)))?;
        let resp = check_status(self.get_authorized(&url).await?, path).await?;
        resp.text().await.map_err(|e| ApiError::Decode {
            target: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn create_host_factory_tokens(
        &self,
        host_factory: &str,
        request: &TokenRequest,
    ) -> Result<Vec<HostFactoryToken>> {
        let url = self.url(&format!("/host_factories/{}/tokens", encode_id(host_factory)))?;

        let mut form = vec![
            ("expiration", request.expiration.to_rfc3339()),
            ("count", request.count.to_string()),
        ];
        match &request.cidr {
            Some(cidr) if cidr.is_empty() => form.push(("cidr", String::new())),
            Some(cidr) => form.extend(cidr.iter().map(|c| ("cidr[]", c.clone()))),
            None => {}
        }

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization().await?)
            .form(&form)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;
        let resp = check_status(resp, host_factory).await?;

        resp.json().await.map_err(|e| ApiError::Decode {
            target: host_factory.to_string(),
            message: e.to_string(),
        })
    }

    async fn revoke_host_factory_token(&self, token: &str) -> Result<()> {
        let url = self.url(&format!("/host_factories/tokens/{}", encode_id(token)))?;
        let resp = self
            .client
            .delete(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization().await?)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;
        check_status(resp, "host factory token").await?;
        Ok(())
    }

    async fn create_host(&self, token: &str, host_id: &str) -> Result<HostRecord> {
        // Enrollment authenticates with the host factory token itself
        let url = self.url("/host_factories/hosts")?;
        let resp = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token token=\"{}\"", token),
            )
            .form(&[("id", host_id)])
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;
        let resp = check_status(resp, host_id).await?;

        resp.json().await.map_err(|e| ApiError::Decode {
            target: host_id.to_string(),
            message: e.to_string(),
        })
    }
}

fn connection_error(url: &str, e: reqwest::Error) -> ApiError {
    ApiError::ConnectionError(format!("{}: {}", url, e))
}

/// Map non-success statuses onto error kinds, keeping the response otherwise
async fn check_status(resp: Response, target: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    tracing::debug!("{} -> HTTP {}", target, status.as_u16());
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(target.to_string()),
        StatusCode::FORBIDDEN => ApiError::Forbidden(target.to_string()),
        StatusCode::NOT_FOUND => ApiError::NotFound(target.to_string()),
        _ => ApiError::Http {
            target: target.to_string(),
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        },
    })
}
