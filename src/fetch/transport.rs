use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Read-only access to ledger state.
///
/// Implementations talk to a fullnode REST API or stand in for one in
/// tests; the reader layer never touches HTTP directly.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Reads one resource of `resource_type` under `address`. `None` means
    /// the ledger answered 404 for the account or the resource; every
    /// other failure is an error.
    async fn account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<Value>, FetchError>;

    /// Reads every resource under `address`. A missing account is
    /// `NotFound` here: callers only enumerate accounts they expect to
    /// exist.
    async fn account_resources(&self, address: &str) -> Result<Vec<Value>, FetchError>;

    /// Calls a read-only Move view function and returns its values.
    async fn view(
        &self,
        function: &str,
        type_args: &[String],
        args: &[Value],
    ) -> Result<Value, FetchError>;
}

/// [`LedgerTransport`] over an Aptos-style fullnode REST API.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLedger {
    /// `base_url` is the fullnode root, e.g. `https://fullnode.mainnet.aptoslabs.com`;
    /// the `/v1` API prefix is appended per request.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "ledger GET");

        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Option<Value>, FetchError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[async_trait]
impl LedgerTransport for HttpLedger {
    async fn account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<Value>, FetchError> {
        self.get(&format!("/v1/accounts/{address}/resource/{resource_type}"))
            .await
    }

    async fn account_resources(&self, address: &str) -> Result<Vec<Value>, FetchError> {
        let value = self
            .get(&format!("/v1/accounts/{address}/resources"))
            .await?
            .ok_or_else(|| FetchError::NotFound(format!("account {address}")))?;

        Ok(serde_json::from_value(value)?)
    }

    async fn view(
        &self,
        function: &str,
        type_args: &[String],
        args: &[Value],
    ) -> Result<Value, FetchError> {
        let url = format!("{}/v1/view", self.base_url);
        debug!(%url, function, "ledger view");

        let body = serde_json::json!({
            "function": function,
            "type_arguments": type_args,
            "arguments": args,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        Self::decode(response)
            .await?
            .ok_or_else(|| FetchError::NotFound(format!("view {function}")))
    }
}
