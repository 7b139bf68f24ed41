use std::sync::Arc;

use uuid::Uuid;

use super::ServiceResult;
use crate::db::CarStore;
use crate::models::{Car, CarPatch, CarRequest};

/// Car operations
#[derive(Clone)]
pub struct CarService {
    store: Arc<dyn CarStore>,
}

impl CarService {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    pub async fn get_car(&self, id: Uuid) -> ServiceResult<Car> {
        Ok(self.store.get_by_id(id).await?)
    }

    pub async fn list_by_brand(&self, brand: &str, include_engine: bool) -> ServiceResult<Vec<Car>> {
        Ok(self.store.list_by_brand(brand, include_engine).await?)
    }

    pub async fn create_car(&self, req: &CarRequest) -> ServiceResult<Car> {
        Ok(self.store.create(req).await?)
    }

    pub async fn update_car(&self, id: Uuid, patch: &CarPatch) -> ServiceResult<Car> {
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete_car(&self, id: Uuid) -> ServiceResult<Car> {
        Ok(self.store.delete(id).await?)
    }
}
