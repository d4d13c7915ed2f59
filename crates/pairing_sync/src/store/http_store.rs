use std::{future::Future, pin::Pin};

use anyhow::{Context, Result};
use pairing_core::RoomsInfo;

use super::RoomsStore;

/// Hosted JSON storage client. Records live at `{base_url}/{key}`.
#[derive(Clone)]
pub struct HttpRoomsStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpRoomsStore {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url.trim_end_matches('/'))
    }
}

impl RoomsStore for HttpRoomsStore {
    fn fetch<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoomsInfo>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .http_client
                .get(self.endpoint(key))
                .send()
                .await
                .context("failed to reach the rooms storage API")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow::anyhow!("rooms fetch failed with {status}: {body}"));
            }

            response
                .json::<RoomsInfo>()
                .await
                .context("failed to parse the stored rooms snapshot")
        })
    }

    fn store<'a>(
        &'a self,
        key: &'a str,
        info: &'a RoomsInfo,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .http_client
                .put(self.endpoint(key))
                .header("content-type", "application/json")
                .json(info)
                .send()
                .await
                .context("failed to reach the rooms storage API")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow::anyhow!("rooms store failed with {status}: {body}"));
            }

            Ok(())
        })
    }
}
