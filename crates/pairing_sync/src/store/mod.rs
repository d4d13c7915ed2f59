use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Result;
use pairing_core::RoomsInfo;

pub mod file_store;
pub mod http_store;

/// Contract with the remote store: fetch and store one `RoomsInfo` record
/// under an opaque access key. Transport and encoding live behind this trait.
pub trait RoomsStore: Send + Sync {
    fn fetch<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoomsInfo>> + Send + 'a>>;

    fn store<'a>(
        &'a self,
        key: &'a str,
        info: &'a RoomsInfo,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

#[derive(Clone)]
pub struct StoreService {
    store: Arc<dyn RoomsStore>,
}

impl StoreService {
    pub fn new(store: Arc<dyn RoomsStore>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, key: &str) -> Result<RoomsInfo> {
        self.store.fetch(key).await
    }

    pub async fn store(&self, key: &str, info: &RoomsInfo) -> Result<()> {
        self.store.store(key, info).await
    }
}
