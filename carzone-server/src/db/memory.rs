//! In-memory store for tests and database-free runs
//!
//! Implements both store traits over one mutex-guarded state so the
//! car → engine reference can be enforced the way the schema does.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{CarStore, EngineStore};
use super::DbError;
use crate::models::{Car, CarPatch, CarRequest, Engine, EnginePatch, EngineRequest};

#[derive(Default)]
struct Tables {
    cars: HashMap<Uuid, Car>,
    engines: HashMap<Uuid, Engine>,
}

/// In-memory car and engine tables
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every mutation is a single insert or remove, so a poisoned
        // lock still guards consistent maps.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of stored cars
    pub fn car_count(&self) -> usize {
        self.lock().cars.len()
    }

    /// Number of stored engines
    pub fn engine_count(&self) -> usize {
        self.lock().engines.len()
    }
}

#[async_trait]
impl CarStore for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Car, DbError> {
        let tables = self.lock();
        let mut car = tables
            .cars
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("car", id))?;
        car.engine = tables.engines.get(&car.engine_id).cloned();
        Ok(car)
    }

    async fn list_by_brand(
        &self,
        brand: &str,
        include_engine: bool,
    ) -> Result<Vec<Car>, DbError> {
        let tables = self.lock();
        let mut cars: Vec<Car> = tables
            .cars
            .values()
            .filter(|c| c.brand == brand)
            .cloned()
            .map(|mut c| {
                if include_engine {
                    c.engine = tables.engines.get(&c.engine_id).cloned();
                }
                c
            })
            .collect();
        cars.sort_by_key(|c| c.created_at);
        Ok(cars)
    }

    async fn create(&self, req: &CarRequest) -> Result<Car, DbError> {
        let mut tables = self.lock();
        if !tables.engines.contains_key(&req.engine_id) {
            return Err(DbError::missing_engine(req.engine_id));
        }

        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            year: req.year.clone(),
            brand: req.brand.clone(),
            fuel_type: req.fuel_type.clone(),
            engine_id: req.engine_id,
            engine: None,
            price: req.price,
            created_at: now,
            updated_at: now,
        };
        tables.cars.insert(car.id, car.clone());
        Ok(car)
    }

    async fn update(&self, id: Uuid, patch: &CarPatch) -> Result<Car, DbError> {
        let mut guard = self.lock();
        let tables = &mut *guard;
        let car = tables
            .cars
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("car", id))?;

        if let Some(engine_id) = patch.engine_id {
            if !tables.engines.contains_key(&engine_id) {
                return Err(DbError::missing_engine(engine_id));
            }
        }

        patch.apply(car, Utc::now());
        Ok(car.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Car, DbError> {
        self.lock()
            .cars
            .remove(&id)
            .ok_or_else(|| DbError::not_found("car", id))
    }
}

#[async_trait]
impl EngineStore for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, DbError> {
        self.lock()
            .engines
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("engine", id))
    }

    async fn create(&self, req: &EngineRequest) -> Result<Engine, DbError> {
        let engine = Engine {
            engine_id: Uuid::new_v4(),
            displacement: req.displacement,
            no_of_cylinders: req.no_of_cylinders,
            car_range: req.car_range,
        };
        self.lock().engines.insert(engine.engine_id, engine.clone());
        Ok(engine)
    }

    async fn update(&self, id: Uuid, patch: &EnginePatch) -> Result<Engine, DbError> {
        let mut tables = self.lock();
        let engine = tables
            .engines
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("engine", id))?;
        patch.apply(engine);
        Ok(engine.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Engine, DbError> {
        let mut tables = self.lock();
        if tables.cars.values().any(|c| c.engine_id == id) {
            return Err(DbError::Conflict {
                message: format!("engine '{}' is still referenced by a car", id),
            });
        }
        tables
            .engines
            .remove(&id)
            .ok_or_else(|| DbError::not_found("engine", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_request() -> EngineRequest {
        EngineRequest {
            displacement: 2400,
            no_of_cylinders: 6,
            car_range: 500,
        }
    }

    fn car_request(engine_id: Uuid, brand: &str) -> CarRequest {
        CarRequest {
            name: "Roadster".into(),
            year: "2019".into(),
            brand: brand.into(),
            fuel_type: "Petrol".into(),
            engine_id,
            price: 55000.0,
        }
    }

    #[tokio::test]
    async fn car_requires_existing_engine() {
        let store = InMemoryStore::new();
        let missing = Uuid::new_v4();

        let err = CarStore::create(&store, &car_request(missing, "Mazda"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::MissingReference { .. }));
        assert!(err.to_string().contains(&missing.to_string()));
        assert_eq!(store.car_count(), 0);
    }

    #[tokio::test]
    async fn list_by_brand_toggles_engine() {
        let store = InMemoryStore::new();
        let engine = EngineStore::create(&store, &engine_request()).await.unwrap();
        CarStore::create(&store, &car_request(engine.engine_id, "Mazda"))
            .await
            .unwrap();
        CarStore::create(&store, &car_request(engine.engine_id, "Kia"))
            .await
            .unwrap();

        let bare = store.list_by_brand("Mazda", false).await.unwrap();
        assert_eq!(bare.len(), 1);
        assert!(bare[0].engine.is_none());

        let joined = store.list_by_brand("Mazda", true).await.unwrap();
        assert_eq!(joined[0].engine.as_ref(), Some(&engine));

        assert!(store.list_by_brand("Fiat", true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn referenced_engine_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let engine = EngineStore::create(&store, &engine_request()).await.unwrap();
        let car = CarStore::create(&store, &car_request(engine.engine_id, "Mazda"))
            .await
            .unwrap();

        let err = EngineStore::delete(&store, engine.engine_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        CarStore::delete(&store, car.id).await.unwrap();
        let deleted = EngineStore::delete(&store, engine.engine_id).await.unwrap();
        assert_eq!(deleted, engine);
        assert_eq!(store.engine_count(), 0);
    }

    #[tokio::test]
    async fn update_to_missing_engine_is_rejected() {
        let store = InMemoryStore::new();
        let engine = EngineStore::create(&store, &engine_request()).await.unwrap();
        let car = CarStore::create(&store, &car_request(engine.engine_id, "Mazda"))
            .await
            .unwrap();

        let patch = CarPatch {
            engine_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = CarStore::update(&store, car.id, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::MissingReference { .. }));

        let unchanged = CarStore::get_by_id(&store, car.id).await.unwrap();
        assert_eq!(unchanged.engine_id, engine.engine_id);
    }

    #[tokio::test]
    async fn missing_car_wins_over_missing_engine_on_update() {
        let store = InMemoryStore::new();
        let car_id = Uuid::new_v4();

        let patch = CarPatch {
            engine_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = CarStore::update(&store, car_id, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "car", .. }));
    }
}
