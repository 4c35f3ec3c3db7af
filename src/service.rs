//! Shared, async access to a single catalog store.
//!
//! The store and its diagnostic log sit behind one `futures` mutex, so any
//! number of tasks may hold a [`CatalogService`] clone while statements still
//! run one at a time on the single connection.

use std::sync::Arc;

use async_trait::async_trait;
use futures::lock::Mutex;
use tracing::info;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::model::{NewProduct, ProductRow, ProductUpdate, ShopRow};
use crate::sort::ProductSort;
use crate::store::CatalogStore;

/// Catalog operations as seen by presentation code.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn initialize(&self, path: &str) -> Result<()>;
    async fn add_shop(&self, name: &str) -> Result<i64>;
    async fn list_shops(&self) -> Result<Vec<ShopRow>>;
    async fn delete_shop(&self, id: i64) -> Result<usize>;
    async fn delete_all_data(&self) -> Result<()>;
    async fn execute_raw(&self, sql: &str) -> Result<()>;
    async fn add_product(&self, product: NewProduct) -> Result<i64>;
    async fn list_products(
        &self,
        shop_id: i64,
        sort: ProductSort,
        search: &str,
    ) -> Result<Vec<ProductRow>>;
    async fn update_product(&self, update: ProductUpdate) -> Result<usize>;
    async fn delete_product(&self, id: i64) -> Result<usize>;
    async fn diagnostic_log(&self) -> Vec<String>;
    async fn clear_diagnostic_log(&self);
}

/// Catalog service wrapping a mutex-guarded [`CatalogStore`].
#[derive(Clone)]
pub struct CatalogService {
    config: CatalogConfig,
    store: Arc<Mutex<CatalogStore>>,
}

impl CatalogService {
    /// Create a new catalog service with the given config
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            store: Arc::new(Mutex::new(CatalogStore::new())),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Opens the configured database and applies the schema.
    pub async fn start(&self) -> Result<()> {
        info!(path = %self.config.db_path, "starting catalog service");
        self.store.lock().await.initialize_with(&self.config)
    }

    pub async fn stop(&self) {
        self.store.lock().await.close();
        info!("catalog service stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.store.lock().await.is_initialized()
    }
}

#[async_trait]
impl CatalogApi for CatalogService {
    async fn initialize(&self, path: &str) -> Result<()> {
        self.store.lock().await.initialize(path)
    }

    async fn add_shop(&self, name: &str) -> Result<i64> {
        self.store.lock().await.add_shop(name)
    }

    async fn list_shops(&self) -> Result<Vec<ShopRow>> {
        self.store.lock().await.list_shops()
    }

    async fn delete_shop(&self, id: i64) -> Result<usize> {
        self.store.lock().await.delete_shop(id)
    }

    async fn delete_all_data(&self) -> Result<()> {
        self.store.lock().await.delete_all_data()
    }

    async fn execute_raw(&self, sql: &str) -> Result<()> {
        self.store.lock().await.execute_raw(sql)
    }

    async fn add_product(&self, product: NewProduct) -> Result<i64> {
        self.store.lock().await.add_product(&product)
    }

    async fn list_products(
        &self,
        shop_id: i64,
        sort: ProductSort,
        search: &str,
    ) -> Result<Vec<ProductRow>> {
        self.store.lock().await.list_products(shop_id, sort, search)
    }

    async fn update_product(&self, update: ProductUpdate) -> Result<usize> {
        self.store.lock().await.update_product(&update)
    }

    async fn delete_product(&self, id: i64) -> Result<usize> {
        self.store.lock().await.delete_product(id)
    }

    async fn diagnostic_log(&self) -> Vec<String> {
        self.store.lock().await.diagnostic_log().to_vec()
    }

    async fn clear_diagnostic_log(&self) {
        self.store.lock().await.clear_diagnostic_log();
    }
}
