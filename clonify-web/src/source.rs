use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use clonify_common::{ClonifyError, Result};
use clonify_http::{HttpClient, RequestOpts};
use serde_json::Value;
use url::Url;

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, target: &Url) -> Result<String>;
}

/// Fetches pages through a CORS proxy: `GET <endpoint>?url=<target>`, with the
/// markup returned under `content_field` of a JSON object.
#[derive(Clone, Debug)]
pub struct ProxySource {
    client: HttpClient,
    content_field: String,
}

impl ProxySource {
    pub fn new(endpoint: &str, content_field: impl Into<String>) -> Result<Self> {
        let client =
            HttpClient::new(endpoint).map_err(|e| ClonifyError::Config(e.to_string()))?;
        Ok(Self {
            client,
            content_field: content_field.into(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.client = self.client.with_retries(retries);
        self
    }

    pub fn endpoint(&self) -> &Url {
        self.client.base()
    }
}

#[async_trait]
impl PageSource for ProxySource {
    async fn fetch(&self, target: &Url) -> Result<String> {
        let opts = RequestOpts {
            query: Some(vec![("url", Cow::Borrowed(target.as_str()))]),
            ..Default::default()
        };
        let payload: Value = self
            .client
            .get_json("", opts)
            .await
            .map_err(|e| ClonifyError::Network(e.to_string()))?;

        if let Some(code) = payload.pointer("/status/http_code") {
            tracing::debug!(target_url = %target, upstream_status = %code, "proxy.upstream_status");
        }

        match payload.get(&self.content_field) {
            Some(Value::String(body)) if !body.is_empty() => Ok(body.clone()),
            _ => Err(ClonifyError::Network(format!(
                "proxy response has no `{}` content",
                self.content_field
            ))),
        }
    }
}
