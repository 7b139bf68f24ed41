use std::sync::Arc;

use uuid::Uuid;

use super::ServiceResult;
use crate::db::EngineStore;
use crate::models::{Engine, EnginePatch, EngineRequest};

/// Engine operations
#[derive(Clone)]
pub struct EngineService {
    store: Arc<dyn EngineStore>,
}

impl EngineService {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    pub async fn get_engine(&self, id: Uuid) -> ServiceResult<Engine> {
        Ok(self.store.get_by_id(id).await?)
    }

    pub async fn create_engine(&self, req: &EngineRequest) -> ServiceResult<Engine> {
        req.validate()?;
        Ok(self.store.create(req).await?)
    }

    pub async fn update_engine(&self, id: Uuid, patch: &EnginePatch) -> ServiceResult<Engine> {
        patch.validate()?;
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete_engine(&self, id: Uuid) -> ServiceResult<Engine> {
        Ok(self.store.delete(id).await?)
    }
}
