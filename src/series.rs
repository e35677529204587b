use std::f64::consts::PI;

use crate::config::Configuration;

/// Time-indexed inputs derived from a [`Configuration`].
///
/// `horizon` runs over the compressed step index `0..K`, while the ambient temperature and
/// price curves are evaluated at the raw time `index * step_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub horizon: Vec<usize>,
    pub raw_time: Vec<u32>,
    pub temperature_ambient: Vec<f64>,
    pub cost_electricity: Vec<f64>,
    pub heat_cool_ratio: f64,
}

impl DerivedSeries {
    pub fn derive(config: &Configuration) -> Self {
        let raw_time: Vec<u32> = (0..config.cardinality_horizon())
            .step_by(config.step_size() as usize)
            .collect();

        let series = Self {
            horizon: (0..raw_time.len()).collect(),
            temperature_ambient: raw_time.iter().map(|&t| ambient_temperature(t)).collect(),
            cost_electricity: raw_time.iter().map(|&t| electricity_cost(t)).collect(),
            heat_cool_ratio: config.heating_coefficient() / config.cooling_coefficient(),
            raw_time,
        };
        series.assert_aligned();
        series
    }

    pub fn len(&self) -> usize {
        self.horizon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizon.is_empty()
    }

    /// Panics if any series disagrees with the horizon length.
    pub fn assert_aligned(&self) {
        let len = self.horizon.len();
        assert_eq!(self.raw_time.len(), len, "raw_time length differs from horizon");
        assert_eq!(
            self.temperature_ambient.len(),
            len,
            "temperature_ambient length differs from horizon"
        );
        assert_eq!(
            self.cost_electricity.len(),
            len,
            "cost_electricity length differs from horizon"
        );
    }
}

/// Ambient temperature (°C) at raw time `t` (hours)
pub fn ambient_temperature(t: u32) -> f64 {
    15.0 - (PI * (f64::from(t) + 4.0) / 12.0).sin()
}

/// Electricity price at raw time `t` (hours)
pub fn electricity_cost(t: u32) -> f64 {
    40.0 + 25.0 * (PI * f64::from(t) / 12.0).sin().powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use proptest::prelude::*;

    fn config(horizon: u32, step: u32, heating: f64, cooling: f64) -> Configuration {
        Configuration::from_toml_str(&format!(
            r#"
            initial_temperature = 18
            temperature_bounds = [15, 22]
            power_bounds = [0, 10]
            cooling_coefficient = {cooling}
            heating_coefficient = {heating}
            cardinality_horizon = {horizon}
            step_size = {step}
            conversion_factor = 1
            variables = ["temperature_house", "power_heater"]
            "#
        ))
        .unwrap()
    }

    #[test]
    fn test_hourly_day() {
        let series = DerivedSeries::derive(&config(24, 1, 3.0, 1.0));
        assert_eq!(series.len(), 24);
        assert_eq!(series.horizon, (0..24).collect::<Vec<_>>());
        assert_eq!(series.heat_cool_ratio, 3.0);
        // sin(pi * 4 / 12) = sin(pi / 3)
        assert!((series.temperature_ambient[0] - (15.0 - (PI / 3.0).sin())).abs() < 1e-12);
        assert!((series.cost_electricity[0] - 40.0).abs() < 1e-12);
        assert!((series.cost_electricity[6] - 65.0).abs() < 1e-12);
    }

    #[test]
    fn test_raw_time_drives_curves() {
        let series = DerivedSeries::derive(&config(24, 5, 3.0, 1.0));
        assert_eq!(series.horizon, vec![0, 1, 2, 3, 4]);
        assert_eq!(series.raw_time, vec![0, 5, 10, 15, 20]);
        assert_eq!(series.temperature_ambient[1], ambient_temperature(5));
        assert_eq!(series.cost_electricity[2], electricity_cost(10));
    }

    #[test]
    fn test_step_equal_to_horizon_has_single_step() {
        let series = DerivedSeries::derive(&config(24, 24, 3.0, 1.0));
        assert_eq!(series.horizon, vec![0]);
    }

    #[test]
    #[should_panic(expected = "cost_electricity")]
    fn test_misaligned_series_panics() {
        let mut series = DerivedSeries::derive(&config(24, 1, 3.0, 1.0));
        series.cost_electricity.pop();
        series.assert_aligned();
    }

    proptest! {
        #[test]
        fn prop_lengths_match_ceiling(horizon in 1u32..500, step in 1u32..50) {
            prop_assume!(step <= horizon);
            let series = DerivedSeries::derive(&config(horizon, step, 3.0, 1.0));
            let expected = horizon.div_ceil(step) as usize;
            prop_assert_eq!(series.horizon.len(), expected);
            prop_assert_eq!(series.temperature_ambient.len(), expected);
            prop_assert_eq!(series.cost_electricity.len(), expected);
        }

        #[test]
        fn prop_derivation_is_deterministic(
            horizon in 1u32..200,
            step in 1u32..24,
            heating in 0.1f64..10.0,
            cooling in 0.1f64..10.0,
        ) {
            prop_assume!(step <= horizon);
            let config = config(horizon, step, heating, cooling);
            let first = DerivedSeries::derive(&config);
            let second = DerivedSeries::derive(&config);
            prop_assert_eq!(first.temperature_ambient.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
                second.temperature_ambient.iter().map(|v| v.to_bits()).collect::<Vec<_>>());
            prop_assert_eq!(first.cost_electricity.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
                second.cost_electricity.iter().map(|v| v.to_bits()).collect::<Vec<_>>());
            prop_assert_eq!(first.heat_cool_ratio.to_bits(), second.heat_cool_ratio.to_bits());
        }

        #[test]
        fn prop_curves_stay_in_range(t in 0u32..10_000) {
            let ambient = ambient_temperature(t);
            let cost = electricity_cost(t);
            prop_assert!((14.0..=16.0).contains(&ambient));
            prop_assert!((40.0..=65.0).contains(&cost));
        }
    }
}
