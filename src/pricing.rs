use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Tunable fare parameters, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    pub base_price: f64,
    pub price_per_km: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_price: 5.0,
            price_per_km: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub distance_meters: f64,
    pub amount: f64,
}

/// Linear base-plus-per-kilometer pricing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FareCalculator {
    config: FareConfig,
}

impl FareCalculator {
    pub fn new(config: FareConfig) -> Self {
        Self { config }
    }

    /// `base_price + km * price_per_km`, unrounded.
    pub fn compute_fare(&self, distance_meters: f64) -> Result<f64, RoutingError> {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(RoutingError::InvalidDistance(distance_meters));
        }

        let distance_km = distance_meters / 1000.0;
        Ok(self.config.base_price + distance_km * self.config.price_per_km)
    }

    pub fn quote(&self, distance_meters: f64) -> Result<FareQuote, RoutingError> {
        Ok(FareQuote {
            distance_meters,
            amount: self.compute_fare(distance_meters)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fares() {
        let calculator = FareCalculator::default();

        assert_eq!(calculator.compute_fare(0.0).unwrap(), 5.0);
        assert_eq!(calculator.compute_fare(1000.0).unwrap(), 6.0);
        assert_eq!(calculator.compute_fare(2500.0).unwrap(), 7.5);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let calculator = FareCalculator::default();

        assert_eq!(
            calculator.compute_fare(-1.0),
            Err(RoutingError::InvalidDistance(-1.0))
        );
        assert!(matches!(
            calculator.compute_fare(f64::NAN),
            Err(RoutingError::InvalidDistance(_))
        ));
        assert!(matches!(
            calculator.compute_fare(f64::INFINITY),
            Err(RoutingError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_custom_config() {
        let calculator = FareCalculator::new(FareConfig {
            base_price: 3.5,
            price_per_km: 2.0,
        });

        assert_eq!(calculator.compute_fare(0.0).unwrap(), 3.5);
        assert_eq!(calculator.compute_fare(12_000.0).unwrap(), 27.5);
    }

    #[test]
    fn test_quote_keeps_distance() {
        let quote = FareCalculator::default().quote(2500.0).unwrap();
        assert_eq!(
            quote,
            FareQuote {
                distance_meters: 2500.0,
                amount: 7.5,
            }
        );
    }
}
