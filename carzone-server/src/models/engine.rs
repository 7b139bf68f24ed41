//! Engine records and request bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{positive, ValidationError};

/// Engine record as stored in the `engine` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Engine {
    pub engine_id: Uuid,
    pub displacement: i64,
    #[serde(rename = "noOfCylinders")]
    pub no_of_cylinders: i64,
    #[serde(rename = "carRange")]
    pub car_range: i64,
}

/// Body of `POST /engine`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub displacement: i64,
    #[serde(rename = "noOfCylinders")]
    pub no_of_cylinders: i64,
    #[serde(rename = "carRange")]
    pub car_range: i64,
}

impl EngineRequest {
    /// Check that every numeric field is positive.
    ///
    /// Stops at the first violation, in the order displacement,
    /// cylinder count, range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("displacement", self.displacement)?;
        positive("noOfCylinders", self.no_of_cylinders)?;
        positive("carRange", self.car_range)?;
        Ok(())
    }
}

/// Body of `PUT /engine/{id}`.
///
/// Absent fields are left untouched by the update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement: Option<i64>,
    #[serde(
        default,
        rename = "noOfCylinders",
        skip_serializing_if = "Option::is_none"
    )]
    pub no_of_cylinders: Option<i64>,
    #[serde(default, rename = "carRange", skip_serializing_if = "Option::is_none")]
    pub car_range: Option<i64>,
}

impl EnginePatch {
    /// Check that every present field is positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = self.displacement {
            positive("displacement", v)?;
        }
        if let Some(v) = self.no_of_cylinders {
            positive("noOfCylinders", v)?;
        }
        if let Some(v) = self.car_range {
            positive("carRange", v)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.displacement.is_none() && self.no_of_cylinders.is_none() && self.car_range.is_none()
    }

    /// Apply present fields onto an existing record.
    pub fn apply(&self, engine: &mut Engine) {
        if let Some(v) = self.displacement {
            engine.displacement = v;
        }
        if let Some(v) = self.no_of_cylinders {
            engine.no_of_cylinders = v;
        }
        if let Some(v) = self.car_range {
            engine.car_range = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(displacement: i64, cylinders: i64, range: i64) -> EngineRequest {
        EngineRequest {
            displacement,
            no_of_cylinders: cylinders,
            car_range: range,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request(2000, 4, 600).validate().is_ok());
    }

    #[test]
    fn first_violation_wins() {
        let err = request(0, 0, 0).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPositive {
                field: "displacement"
            }
        );

        let err = request(1500, -2, 0).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPositive {
                field: "noOfCylinders"
            }
        );

        let err = request(1500, 4, -1).validate().unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "carRange" });
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = EnginePatch {
            car_range: Some(450),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = EnginePatch {
            no_of_cylinders: Some(0),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err(),
            ValidationError::NotPositive {
                field: "noOfCylinders"
            }
        );
    }

    #[test]
    fn patch_deserializes_missing_fields_as_absent() {
        let patch: EnginePatch = serde_json::from_str(r#"{"carRange": 300}"#).unwrap();
        assert_eq!(patch.car_range, Some(300));
        assert!(patch.displacement.is_none());
        assert!(!patch.is_empty());

        let empty: EnginePatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn patch_apply_leaves_absent_fields() {
        let mut engine = Engine {
            engine_id: Uuid::new_v4(),
            displacement: 1998,
            no_of_cylinders: 4,
            car_range: 550,
        };
        EnginePatch {
            displacement: Some(2500),
            ..Default::default()
        }
        .apply(&mut engine);

        assert_eq!(engine.displacement, 2500);
        assert_eq!(engine.no_of_cylinders, 4);
        assert_eq!(engine.car_range, 550);
    }

    #[test]
    fn engine_serializes_with_wire_names() {
        let engine = Engine {
            engine_id: Uuid::nil(),
            displacement: 1600,
            no_of_cylinders: 4,
            car_range: 700,
        };
        let value = serde_json::to_value(&engine).unwrap();
        assert_eq!(value["noOfCylinders"], 4);
        assert_eq!(value["carRange"], 700);
        assert_eq!(value["engine_id"], "00000000-0000-0000-0000-000000000000");
    }
}
