use crate::error::{Result, StoreError};
use crate::utils::constants::{
    MAX_LATITUDE, MAX_LONGITUDE, MAX_VALID_TEMP, MIN_LATITUDE, MIN_LONGITUDE, MIN_VALID_TEMP,
};

/// Validate a latitude in decimal degrees.
///
/// The bounds are inclusive; NaN never satisfies the range and is rejected.
pub fn validate_latitude(latitude: f64) -> Result<()> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(StoreError::RangeViolation {
            field: "latitude",
            value: latitude,
            min: MIN_LATITUDE,
            max: MAX_LATITUDE,
        });
    }

    Ok(())
}

/// Validate a longitude in decimal degrees.
pub fn validate_longitude(longitude: f64) -> Result<()> {
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return Err(StoreError::RangeViolation {
            field: "longitude",
            value: longitude,
            min: MIN_LONGITUDE,
            max: MAX_LONGITUDE,
        });
    }

    Ok(())
}

/// Validate a temperature in degrees Celsius.
pub fn validate_temperature(temperature: f64) -> Result<()> {
    if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&temperature) {
        return Err(StoreError::RangeViolation {
            field: "temperature",
            value: temperature,
            min: MIN_VALID_TEMP,
            max: MAX_VALID_TEMP,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(51.5074).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0001).is_err());
        assert!(validate_latitude(-95.0).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(-0.1278).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(validate_temperature(21.5).is_ok());
        assert!(validate_temperature(70.0).is_ok());
        assert!(validate_temperature(-100.0).is_ok());
        assert!(validate_temperature(70.1).is_err());
        assert!(validate_temperature(-273.15).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(validate_latitude(f64::NAN).is_err());
        assert!(validate_longitude(f64::NAN).is_err());
        assert!(validate_temperature(f64::NAN).is_err());
    }

    #[test]
    fn test_range_violation_reports_bounds() {
        let err = validate_latitude(95.0).unwrap_err();
        match err {
            StoreError::RangeViolation { field, value, min, max } => {
                assert_eq!(field, "latitude");
                assert_eq!(value, 95.0);
                assert_eq!(min, -90.0);
                assert_eq!(max, 90.0);
            }
            other => panic!("expected RangeViolation, got {other:?}"),
        }
    }
}
