//! Meal-type vocabulary and validation helpers.
//!
//! Defines the valid meal slot values for cancellation records and provides
//! validation helpers used by both the DB and API layers.

/// Morning meal slot.
pub const MEAL_BREAKFAST: &str = "breakfast";

/// Midday meal slot.
pub const MEAL_LUNCH: &str = "lunch";

/// Afternoon meal slot.
pub const MEAL_SNACK: &str = "snack";

/// All valid meal-type values.
pub const VALID_MEAL_TYPES: &[&str] = &[MEAL_BREAKFAST, MEAL_LUNCH, MEAL_SNACK];

/// Validate that a meal-type string is one of the accepted values.
pub fn validate_meal_type(meal_type: &str) -> Result<(), String> {
    if VALID_MEAL_TYPES.contains(&meal_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid meal type '{meal_type}'. Must be one of: {}",
            VALID_MEAL_TYPES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_known_meal_types() {
        for meal in VALID_MEAL_TYPES {
            assert!(validate_meal_type(meal).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_meal_type() {
        let err = validate_meal_type("supper").unwrap_err();
        assert!(err.contains("supper"));
        assert!(err.contains(MEAL_LUNCH));
    }

    #[test]
    fn rejects_wrong_case() {
        assert!(validate_meal_type("Lunch").is_err());
    }
}
