// Tests for the async catalog service
//
// The service shares one store between tasks; these tests drive it through
// the CatalogApi trait the way presentation code would.

use anyhow::Result;
use catalog_store::{
    CatalogApi, CatalogConfig, CatalogError, CatalogService, NewProduct, ProductSort,
    ProductUpdate, SortKey,
};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_lifecycle() -> Result<()> {
        let service = CatalogService::new(CatalogConfig::default().with_busy_timeout(500));
        assert!(!service.is_running().await);
        assert_eq!(
            service.list_shops().await,
            Err(CatalogError::NotInitialized)
        );

        service.start().await?;
        assert!(service.is_running().await);

        let shop = service.add_shop("Market").await?;
        let milk = service
            .add_product(NewProduct::new(shop, "Milk", 2.5).with_description("whole"))
            .await?;
        service
            .add_product(NewProduct::new(shop, "Bread", 1.75))
            .await?;

        service
            .update_product(ProductUpdate {
                id: milk,
                name: "Milk".to_string(),
                price: 2.25,
                bought: true,
                description: None,
            })
            .await?;

        let products = service
            .list_products(shop, ProductSort::desc(SortKey::Price), "")
            .await?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Milk");
        assert_eq!(products[0].price, Some(2.25));
        assert!(products[0].bought);
        assert_eq!(products[0].description, None);

        assert_eq!(service.delete_product(milk).await?, 1);
        assert_eq!(
            service
                .list_products(shop, ProductSort::default(), "Mil")
                .await?
                .len(),
            0
        );

        service.execute_raw("UPDATE shops SET name = 'Bazaar'").await?;
        assert_eq!(service.list_shops().await?[0].name, "Bazaar");

        service.delete_all_data().await?;
        assert!(service.list_shops().await?.is_empty());

        assert!(!service.diagnostic_log().await.is_empty());
        service.clear_diagnostic_log().await;
        assert!(service.diagnostic_log().await.is_empty());

        service.stop().await;
        assert!(!service.is_running().await);
        assert_eq!(
            service.add_shop("Late").await,
            Err(CatalogError::NotInitialized)
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_connection() -> Result<()> {
        let service = CatalogService::new(CatalogConfig::default());
        service.start().await?;

        let mut handles = Vec::new();
        for i in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let name = format!("shop-{i}");
                let shop = service.add_shop(&name).await?;
                service
                    .add_product(NewProduct::new(shop, format!("item-{i}"), f64::from(i)))
                    .await?;
                Ok::<_, CatalogError>(shop)
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await??);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<i64>>());

        let shops = service.list_shops().await?;
        assert_eq!(shops.len(), 10);
        for shop in shops {
            let products = service
                .list_products(shop.id, ProductSort::default(), "item")
                .await?;
            assert_eq!(products.len(), 1);
        }

        // Two statements per task, plus schema setup.
        let log = service.diagnostic_log().await;
        let inserts = log
            .iter()
            .filter(|entry| entry.starts_with("INSERT INTO"))
            .count();
        assert_eq!(inserts, 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() -> Result<()> {
        let service = CatalogService::new(CatalogConfig::default());
        let api: Arc<dyn CatalogApi> = Arc::new(service.clone());

        api.initialize(":memory:").await?;
        let shop = api.add_shop("Kiosk").await?;
        assert_eq!(api.delete_shop(shop).await?, 1);
        assert!(api.list_shops().await?.is_empty());
        assert!(service.is_running().await);
        Ok(())
    }
}
