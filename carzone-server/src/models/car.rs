//! Car records and request bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Engine;

/// Car record.
///
/// `engine` is only filled when the engine row was joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub year: String,
    pub brand: String,
    pub fuel_type: String,
    pub engine_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Engine>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /car`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRequest {
    pub name: String,
    pub year: String,
    pub brand: String,
    pub fuel_type: String,
    pub engine_id: Uuid,
    pub price: f64,
}

/// Body of `PUT /car/{id}`.
///
/// Absent fields are left untouched; `updated_at` always moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl CarPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.brand.is_none()
            && self.fuel_type.is_none()
            && self.engine_id.is_none()
            && self.price.is_none()
    }

    /// Apply present fields onto an existing record and stamp `updated_at`.
    ///
    /// Changing the engine drops any joined engine data.
    pub fn apply(&self, car: &mut Car, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            car.name = name.clone();
        }
        if let Some(year) = &self.year {
            car.year = year.clone();
        }
        if let Some(brand) = &self.brand {
            car.brand = brand.clone();
        }
        if let Some(fuel_type) = &self.fuel_type {
            car.fuel_type = fuel_type.clone();
        }
        if let Some(engine_id) = self.engine_id {
            car.engine_id = engine_id;
            car.engine = None;
        }
        if let Some(price) = self.price {
            car.price = price;
        }
        car.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_car() -> Car {
        let created = Utc::now() - Duration::hours(1);
        Car {
            id: Uuid::new_v4(),
            name: "Civic".into(),
            year: "2021".into(),
            brand: "Honda".into(),
            fuel_type: "Petrol".into(),
            engine_id: Uuid::new_v4(),
            engine: None,
            price: 21500.0,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn patch_changes_only_present_fields() {
        let mut car = sample_car();
        let before = car.clone();
        let now = Utc::now();

        CarPatch {
            price: Some(19999.0),
            ..Default::default()
        }
        .apply(&mut car, now);

        assert_eq!(car.price, 19999.0);
        assert_eq!(car.name, before.name);
        assert_eq!(car.brand, before.brand);
        assert_eq!(car.engine_id, before.engine_id);
        assert_eq!(car.created_at, before.created_at);
        assert_eq!(car.updated_at, now);
    }

    #[test]
    fn empty_patch_still_stamps_update_time() {
        let mut car = sample_car();
        let now = Utc::now();
        let patch = CarPatch::default();

        assert!(patch.is_empty());
        patch.apply(&mut car, now);
        assert_eq!(car.updated_at, now);
    }

    #[test]
    fn patch_distinguishes_absent_from_empty_string() {
        let patch: CarPatch = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some(""));
        assert!(patch.brand.is_none());
    }

    #[test]
    fn car_without_engine_omits_engine_key() {
        let value = serde_json::to_value(sample_car()).unwrap();
        assert!(value.get("engine").is_none());
        assert!(value.get("engine_id").is_some());
    }
}
