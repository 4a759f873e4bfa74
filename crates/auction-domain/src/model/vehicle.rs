//! Vehicle description attached to an auction listing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest model year accepted by validation
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Latest model year accepted by validation
pub const MAX_VEHICLE_YEAR: i32 = 2030;

/// Validation failures raised at construction time
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("year must be between 1900 and 2030, got {0}")]
    YearOutOfRange(i32),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Vehicle category as reported by the auction feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Automobile,
    Truck,
    Suv,
    Motorcycle,
    #[default]
    Other,
}

impl VehicleType {
    const ALL: [VehicleType; 5] = [
        VehicleType::Automobile,
        VehicleType::Truck,
        VehicleType::Suv,
        VehicleType::Motorcycle,
        VehicleType::Other,
    ];

    /// Parse a feed string into a `VehicleType`. Matching is a
    /// case-insensitive comparison against the canonical labels; anything
    /// unrecognized (including the empty string) maps to `Other`. Never fails.
    pub fn from_string(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(value))
            .unwrap_or(VehicleType::Other)
    }

    /// Canonical display label. "Automobiles" is plural in the feed.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Automobile => "Automobiles",
            VehicleType::Truck => "Truck",
            VehicleType::Suv => "SUV",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Other => "Other",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Immutable vehicle value. Construction validates every field; an invalid
/// combination of values can never be observed by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    year: i32,
    make: String,
    model: String,
    vehicle_type: VehicleType,
    mileage: Option<u32>,
}

impl Vehicle {
    /// Build a vehicle. Make and model are trimmed and must be non-empty;
    /// the year must fall in the accepted range. A mileage of `None` means
    /// the odometer reading is unknown, which is distinct from zero.
    pub fn new(
        year: i32,
        make: impl Into<String>,
        model: impl Into<String>,
        vehicle_type: VehicleType,
        mileage: Option<u32>,
    ) -> Result<Self, ValidationError> {
        if !(MIN_VEHICLE_YEAR..=MAX_VEHICLE_YEAR).contains(&year) {
            return Err(ValidationError::YearOutOfRange(year));
        }

        Ok(Self {
            year,
            make: non_empty(make.into(), "make")?,
            model: non_empty(model.into(), "model")?,
            vehicle_type,
            mileage,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Odometer reading in miles; `None` when unknown
    pub fn mileage(&self) -> Option<u32> {
        self.mileage
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_known_labels() {
        assert_eq!(VehicleType::from_string("Automobiles"), VehicleType::Automobile);
        assert_eq!(VehicleType::from_string("automobiles"), VehicleType::Automobile);
        assert_eq!(VehicleType::from_string("SUV"), VehicleType::Suv);
        assert_eq!(VehicleType::from_string("suv"), VehicleType::Suv);
        assert_eq!(VehicleType::from_string("Truck"), VehicleType::Truck);
        assert_eq!(VehicleType::from_string("MOTORCYCLE"), VehicleType::Motorcycle);
    }

    #[test]
    fn test_from_string_is_total() {
        assert_eq!(VehicleType::from_string(""), VehicleType::Other);
        assert_eq!(VehicleType::from_string("Hovercraft"), VehicleType::Other);
        assert_eq!(VehicleType::from_string("Automobile"), VehicleType::Other); // singular is not the label
    }

    #[test]
    fn test_year_range_is_inclusive() {
        assert!(Vehicle::new(1900, "Ford", "Model T", VehicleType::Other, None).is_ok());
        assert!(Vehicle::new(2030, "Ford", "F-150", VehicleType::Truck, None).is_ok());
        assert_eq!(
            Vehicle::new(1899, "Ford", "Model T", VehicleType::Other, None),
            Err(ValidationError::YearOutOfRange(1899))
        );
        assert_eq!(
            Vehicle::new(2031, "Ford", "F-150", VehicleType::Truck, None),
            Err(ValidationError::YearOutOfRange(2031))
        );
    }

    #[test]
    fn test_make_and_model_are_trimmed() {
        let vehicle =
            Vehicle::new(2015, " Toyota ", "  Corolla", VehicleType::Automobile, None).unwrap();
        assert_eq!(vehicle.make(), "Toyota");
        assert_eq!(vehicle.model(), "Corolla");
    }

    #[test]
    fn test_whitespace_only_fields_fail() {
        assert_eq!(
            Vehicle::new(2015, "   ", "Corolla", VehicleType::Automobile, None),
            Err(ValidationError::EmptyField("make"))
        );
        assert_eq!(
            Vehicle::new(2015, "Toyota", "", VehicleType::Automobile, None),
            Err(ValidationError::EmptyField("model"))
        );
    }

    #[test]
    fn test_unknown_mileage_is_distinct_from_zero() {
        let unknown = Vehicle::new(2015, "Toyota", "Corolla", VehicleType::Automobile, None).unwrap();
        let zero = Vehicle::new(2015, "Toyota", "Corolla", VehicleType::Automobile, Some(0)).unwrap();
        assert_eq!(unknown.mileage(), None);
        assert_eq!(zero.mileage(), Some(0));
        assert_ne!(unknown, zero);
    }
}
