//! String-only boundary for presentation layers that cannot take structured
//! results.
//!
//! Errors come back as messages instead of `Result`s: `None`/empty string
//! means success. Listings return `None` on error and otherwise rows joined
//! with `:` (lossy when a name contains `:`; prefer [`CatalogStore`]).

use tracing::warn;

use crate::error::CatalogError;
use crate::model::{NewProduct, ProductUpdate};
use crate::sort::ProductSort;
use crate::store::CatalogStore;

#[derive(Debug, Default)]
pub struct CatalogBridge {
    store: CatalogStore,
}

impl CatalogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CatalogStore {
        &mut self.store
    }

    pub fn initialize(&mut self, path: &str) -> Option<String> {
        error_message(self.store.initialize(path))
    }

    pub fn add_shop(&mut self, name: &str) -> Option<String> {
        error_message(self.store.add_shop(name))
    }

    /// `"id:name"` per shop.
    pub fn list_shops(&mut self) -> Option<Vec<String>> {
        let shops = self.store.list_shops().ok()?;
        Some(shops.iter().map(|s| s.to_legacy_string()).collect())
    }

    pub fn delete_shop(&mut self, id: i64) -> Option<String> {
        error_message(self.store.delete_shop(id))
    }

    /// Empty string on success.
    pub fn delete_all_data(&mut self) -> String {
        error_message(self.store.delete_all_data()).unwrap_or_default()
    }

    /// Empty string on success.
    pub fn execute_raw(&mut self, sql: &str) -> String {
        error_message(self.store.execute_raw(sql)).unwrap_or_default()
    }

    pub fn add_product(
        &mut self,
        shop_id: i64,
        name: &str,
        price: f64,
        description: &str,
    ) -> Option<String> {
        let product = NewProduct::new(shop_id, name, price).with_description(description);
        error_message(self.store.add_product(&product))
    }

    /// `"id:name:price:bought:description"` per product. `sort` must be one
    /// of the [`ProductSort`] forms such as `"price DESC"`.
    pub fn list_products(
        &mut self,
        shop_id: i64,
        sort: &str,
        search: &str,
    ) -> Option<Vec<String>> {
        let sort = match sort.parse::<ProductSort>() {
            Ok(sort) => sort,
            Err(e) => {
                warn!(error = %e, "rejected product sort");
                return None;
            }
        };
        let products = self.store.list_products(shop_id, sort, search).ok()?;
        Some(products.iter().map(|p| p.to_legacy_string()).collect())
    }

    /// `bought` is a flag: any non-zero value marks the product bought.
    pub fn update_product(
        &mut self,
        id: i64,
        name: &str,
        price: f64,
        bought: i32,
        description: &str,
    ) -> Option<String> {
        let update = ProductUpdate {
            id,
            name: name.to_string(),
            price,
            bought: bought != 0,
            description: Some(description.to_string()),
        };
        error_message(self.store.update_product(&update))
    }

    pub fn delete_product(&mut self, id: i64) -> Option<String> {
        error_message(self.store.delete_product(id))
    }

    pub fn diagnostic_log(&self) -> Vec<String> {
        self.store.diagnostic_log().to_vec()
    }

    pub fn clear_diagnostic_log(&mut self) {
        self.store.clear_diagnostic_log();
    }
}

fn error_message<T>(result: Result<T, CatalogError>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_bridge_reports_messages() {
        let mut bridge = CatalogBridge::new();
        assert_eq!(bridge.add_shop("Market").as_deref(), Some("Database not initialized"));
        assert_eq!(bridge.delete_all_data(), "Database not initialized");
        assert_eq!(bridge.list_shops(), None);
        assert_eq!(bridge.list_products(1, "name ASC", ""), None);
    }

    #[test]
    fn invalid_sort_yields_null() {
        let mut bridge = CatalogBridge::new();
        assert_eq!(bridge.initialize(":memory:"), None);
        assert_eq!(bridge.add_shop("Market"), None);
        assert_eq!(bridge.list_products(1, "name; DROP TABLE shops", ""), None);
        assert!(bridge.list_shops().is_some());
    }
}
