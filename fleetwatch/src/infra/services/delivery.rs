use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use fleetwatch_model::{Driver, DriverForm, DriverId};
use log::info;

use crate::infra::api_client::{ApiClient, ApiResult};

pub const DELIVERY_PATH: &str = "/delivery";

/// Driver collection endpoints.
#[async_trait]
pub trait DeliveryApi: Send + Sync + Debug {
    /// Fetch the full driver collection.
    async fn list_drivers(&self) -> ApiResult<Vec<Driver>>;

    async fn create_driver(&self, form: &DriverForm) -> ApiResult<Driver>;

    async fn update_driver(
        &self,
        id: &DriverId,
        form: &DriverForm,
    ) -> ApiResult<Driver>;

    async fn delete_driver(&self, id: &DriverId) -> ApiResult<()>;
}

/// HTTP implementation of [`DeliveryApi`].
#[derive(Debug, Clone)]
pub struct DeliveryApiAdapter {
    client: Arc<ApiClient>,
}

impl DeliveryApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

fn driver_path(id: &DriverId) -> String {
    format!("{}/{}", DELIVERY_PATH, id)
}

#[async_trait]
impl DeliveryApi for DeliveryApiAdapter {
    async fn list_drivers(&self) -> ApiResult<Vec<Driver>> {
        let drivers: Vec<Driver> = self.client.get(DELIVERY_PATH).await?;
        info!("Fetched {} drivers", drivers.len());
        Ok(drivers)
    }

    async fn create_driver(&self, form: &DriverForm) -> ApiResult<Driver> {
        let driver: Driver = self.client.post(DELIVERY_PATH, form).await?;
        info!("Created driver {} ({})", driver.name, driver.id);
        Ok(driver)
    }

    async fn update_driver(
        &self,
        id: &DriverId,
        form: &DriverForm,
    ) -> ApiResult<Driver> {
        let driver: Driver = self.client.put(&driver_path(id), form).await?;
        info!("Updated driver {}", id);
        Ok(driver)
    }

    async fn delete_driver(&self, id: &DriverId) -> ApiResult<()> {
        self.client.delete(&driver_path(id)).await?;
        info!("Deleted driver {}", id);
        Ok(())
    }
}
