//! Car repository over PostgreSQL
//!
//! - get/list: JOIN engine in a single query (no N+1)
//! - create: engine existence check and insert share one transaction
//! - update: SET list built from present patch fields only

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::error::is_foreign_key_violation;
use super::store::CarStore;
use super::update::UpdateBuilder;
use super::DbError;
use crate::models::{Car, CarPatch, CarRequest, Engine};

const CAR_COLUMNS: &str =
    "id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at";

const CAR_WITH_ENGINE_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.year, c.brand, c.fuel_type, c.engine_id, c.price,
        c.created_at, c.updated_at,
        e.id AS e_engine_id, e.displacement AS e_displacement,
        e.no_of_cylinders AS e_no_of_cylinders, e.car_range AS e_car_range
    FROM car c
    LEFT JOIN engine e ON c.engine_id = e.id
"#;

/// Car row without the joined engine
#[derive(Debug, FromRow)]
struct CarRow {
    id: Uuid,
    name: String,
    year: String,
    brand: String,
    fuel_type: String,
    engine_id: Uuid,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(r: CarRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            year: r.year,
            brand: r.brand,
            fuel_type: r.fuel_type,
            engine_id: r.engine_id,
            engine: None,
            price: r.price,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Map a row from [`CAR_WITH_ENGINE_SELECT`].
fn car_with_engine(row: &PgRow) -> Result<Car, sqlx::Error> {
    let mut car = Car::from(CarRow::from_row(row)?);
    let engine_id: Option<Uuid> = row.try_get("e_engine_id")?;
    if let Some(engine_id) = engine_id {
        car.engine = Some(Engine {
            engine_id,
            displacement: row.try_get("e_displacement")?,
            no_of_cylinders: row.try_get("e_no_of_cylinders")?,
            car_range: row.try_get("e_car_range")?,
        });
    }
    Ok(car)
}

/// Car repository
#[derive(Clone)]
pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Car, DbError> {
        let row = sqlx::query(&format!("{} WHERE c.id = $1", CAR_WITH_ENGINE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("car", id))?;

        Ok(car_with_engine(&row)?)
    }

    async fn list_by_brand(
        &self,
        brand: &str,
        include_engine: bool,
    ) -> Result<Vec<Car>, DbError> {
        if include_engine {
            let rows = sqlx::query(&format!(
                "{} WHERE c.brand = $1 ORDER BY c.created_at",
                CAR_WITH_ENGINE_SELECT
            ))
            .bind(brand)
            .fetch_all(&self.pool)
            .await?;

            let cars = rows
                .iter()
                .map(car_with_engine)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(cars);
        }

        let rows: Vec<CarRow> = sqlx::query_as(&format!(
            "SELECT {} FROM car WHERE brand = $1 ORDER BY created_at",
            CAR_COLUMNS
        ))
        .bind(brand)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn create(&self, req: &CarRequest) -> Result<Car, DbError> {
        let mut tx = self.pool.begin().await?;

        let engine_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM engine WHERE id = $1)")
                .bind(req.engine_id)
                .fetch_one(&mut *tx)
                .await?;

        if !engine_exists.0 {
            return Err(DbError::missing_engine(req.engine_id));
        }

        let now = Utc::now();
        let row: CarRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO car (id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.year)
        .bind(&req.brand)
        .bind(&req.fuel_type)
        .bind(req.engine_id)
        .bind(req.price)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Engine deleted between the check and the insert
            if is_foreign_key_violation(&e) {
                DbError::missing_engine(req.engine_id)
            } else {
                DbError::Sqlx(e)
            }
        })?;

        tx.commit().await?;
        tracing::debug!(car_id = %row.id, engine_id = %row.engine_id, "car created");
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, patch: &CarPatch) -> Result<Car, DbError> {
        let mut update = UpdateBuilder::new("car");
        update
            .set_opt("name", patch.name.as_deref())
            .set_opt("year", patch.year.as_deref())
            .set_opt("brand", patch.brand.as_deref())
            .set_opt("fuel_type", patch.fuel_type.as_deref())
            .set_opt("engine_id", patch.engine_id)
            .set_opt("price", patch.price)
            .set("updated_at", Utc::now());

        let mut tx = self.pool.begin().await?;
        let mut query = update.finish("id", id, CAR_COLUMNS);
        let row = query
            .build_query_as::<CarRow>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| match patch.engine_id {
                Some(engine_id) if is_foreign_key_violation(&e) => {
                    DbError::missing_engine(engine_id)
                }
                _ => DbError::Sqlx(e),
            })?
            .ok_or_else(|| DbError::not_found("car", id))?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<Car, DbError> {
        let mut tx = self.pool.begin().await?;

        let row: CarRow = sqlx::query_as(&format!(
            "DELETE FROM car WHERE id = $1 RETURNING {}",
            CAR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("car", id))?;

        tx.commit().await?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::engines::PgEngineStore;
    use crate::db::store::EngineStore;
    use crate::db::create_pool;
    use crate::models::EngineRequest;

    // Integration tests - run with DATABASE_URL set against a database
    // that has schema.sql applied:
    // cargo test -p carzone-server -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        create_pool(&url).await.expect("pool creation failed")
    }

    fn request(engine_id: Uuid) -> CarRequest {
        CarRequest {
            name: "Corolla".into(),
            year: "2020".into(),
            brand: "Toyota".into(),
            fuel_type: "Hybrid".into(),
            engine_id,
            price: 24000.0,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_with_missing_engine_writes_nothing() {
        let pool = pool().await;
        let cars = PgCarStore::new(pool.clone());
        let engine_id = Uuid::new_v4();

        let err = cars.create(&request(engine_id)).await.unwrap_err();
        assert!(matches!(err, DbError::MissingReference { .. }));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM car WHERE engine_id = $1")
            .bind(engine_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_keeps_other_fields() {
        let pool = pool().await;
        let engines = PgEngineStore::new(pool.clone());
        let cars = PgCarStore::new(pool);

        let engine = engines
            .create(&EngineRequest {
                displacement: 1800,
                no_of_cylinders: 4,
                car_range: 900,
            })
            .await
            .unwrap();
        let car = cars.create(&request(engine.engine_id)).await.unwrap();

        let patch = CarPatch {
            price: Some(22500.0),
            ..Default::default()
        };
        let updated = cars.update(car.id, &patch).await.unwrap();

        assert_eq!(updated.price, 22500.0);
        assert_eq!(updated.name, car.name);
        assert_eq!(updated.engine_id, car.engine_id);
        assert_eq!(updated.created_at, car.created_at);
        assert!(updated.updated_at > car.updated_at);

        let fetched = cars.get_by_id(car.id).await.unwrap();
        assert_eq!(fetched.engine, Some(engine.clone()));

        cars.delete(car.id).await.unwrap();
        engines.delete(engine.engine_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_car_is_not_found() {
        let cars = PgCarStore::new(pool().await);
        let err = cars.get_by_id(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "car", .. }));
    }
}
