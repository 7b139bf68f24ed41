//! Engine repository over PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::is_foreign_key_violation;
use super::store::EngineStore;
use super::update::UpdateBuilder;
use super::DbError;
use crate::models::{Engine, EnginePatch, EngineRequest};

const ENGINE_COLUMNS: &str = "id AS engine_id, displacement, no_of_cylinders, car_range";

/// Engine repository
#[derive(Clone)]
pub struct PgEngineStore {
    pool: PgPool,
}

impl PgEngineStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngineStore for PgEngineStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, DbError> {
        sqlx::query_as::<_, Engine>(&format!(
            "SELECT {} FROM engine WHERE id = $1",
            ENGINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("engine", id))
    }

    async fn create(&self, req: &EngineRequest) -> Result<Engine, DbError> {
        let mut tx = self.pool.begin().await?;

        let engine: Engine = sqlx::query_as(&format!(
            r#"
            INSERT INTO engine (id, displacement, no_of_cylinders, car_range)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ENGINE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(req.displacement)
        .bind(req.no_of_cylinders)
        .bind(req.car_range)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(engine_id = %engine.engine_id, "engine created");
        Ok(engine)
    }

    async fn update(&self, id: Uuid, patch: &EnginePatch) -> Result<Engine, DbError> {
        let mut update = UpdateBuilder::new("engine");
        update
            .set_opt("displacement", patch.displacement)
            .set_opt("no_of_cylinders", patch.no_of_cylinders)
            .set_opt("car_range", patch.car_range);

        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut tx = self.pool.begin().await?;
        let mut query = update.finish("id", id, ENGINE_COLUMNS);
        let engine = query
            .build_query_as::<Engine>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("engine", id))?;

        tx.commit().await?;
        Ok(engine)
    }

    async fn delete(&self, id: Uuid) -> Result<Engine, DbError> {
        let mut tx = self.pool.begin().await?;

        let engine = sqlx::query_as::<_, Engine>(&format!(
            "DELETE FROM engine WHERE id = $1 RETURNING {}",
            ENGINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::Conflict {
                    message: format!("engine '{}' is still referenced by a car", id),
                }
            } else {
                DbError::Sqlx(e)
            }
        })?
        .ok_or_else(|| DbError::not_found("engine", id))?;

        tx.commit().await?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    // Integration tests - run with DATABASE_URL set against a database
    // that has schema.sql applied:
    // cargo test -p carzone-server -- --ignored

    async fn store() -> PgEngineStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        PgEngineStore::new(create_pool(&url).await.expect("pool creation failed"))
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_fetch() {
        let store = store().await;
        let req = EngineRequest {
            displacement: 1998,
            no_of_cylinders: 4,
            car_range: 620,
        };

        let created = store.create(&req).await.unwrap();
        assert_eq!(created.displacement, 1998);

        let fetched = store.get_by_id(created.engine_id).await.unwrap();
        assert_eq!(fetched, created);

        store.delete(created.engine_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_engine_errors_carry_id() {
        let store = store().await;
        let id = Uuid::new_v4();

        let err = store.get_by_id(id).await.unwrap_err();
        assert!(err.to_string().contains(&id.to_string()));

        let err = store.delete(id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let patch = EnginePatch {
            car_range: Some(10),
            ..Default::default()
        };
        let err = store.update(id, &patch).await.unwrap_err();
        assert!(err.to_string().contains(&id.to_string()));
    }
}
