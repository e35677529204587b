use std::borrow::Cow;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::optimizer::DECISION_VARIABLES;

const ENV_PREFIX: &str = "HEAT_SCHEDULER__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read inputs: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid inputs: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unknown variable '{0}', the model declares temperature_house and power_heater")]
    UnknownVariable(String),
}

/// Closed interval used for variable bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)")]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Raw input file as written on disk.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_step_size"))]
pub struct ConfigurationFile {
    #[validate(custom(function = "validate_finite"))]
    pub initial_temperature: f64,
    #[validate(custom(function = "validate_bounds"))]
    pub temperature_bounds: Bounds,
    #[validate(custom(function = "validate_bounds"))]
    pub power_bounds: Bounds,
    #[validate(range(exclusive_min = 0.0), custom(function = "validate_finite"))]
    pub cooling_coefficient: f64,
    #[validate(range(exclusive_min = 0.0), custom(function = "validate_finite"))]
    pub heating_coefficient: f64,
    #[validate(range(min = 1))]
    pub cardinality_horizon: u32,
    #[validate(range(min = 1))]
    pub step_size: u32,
    #[validate(range(exclusive_min = 0.0), custom(function = "validate_finite"))]
    pub conversion_factor: f64,
    #[validate(length(min = 1))]
    pub variables: Vec<String>,
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut error = ValidationError::new("not_finite");
        error.message = Some(Cow::from(format!("{value} is not a finite number")));
        return Err(error);
    }
    Ok(())
}

fn validate_bounds(bounds: &Bounds) -> Result<(), ValidationError> {
    if !(bounds.min.is_finite() && bounds.max.is_finite()) {
        let mut error = ValidationError::new("bounds_not_finite");
        error.message = Some(Cow::from("bounds must be finite numbers"));
        return Err(error);
    }
    if bounds.min > bounds.max {
        let mut error = ValidationError::new("bounds_order");
        error.message = Some(Cow::from(format!(
            "lower bound {} exceeds upper bound {}",
            bounds.min, bounds.max
        )));
        return Err(error);
    }
    Ok(())
}

fn validate_step_size(file: &ConfigurationFile) -> Result<(), ValidationError> {
    if file.step_size > file.cardinality_horizon {
        let mut error = ValidationError::new("step_size");
        error.message = Some(Cow::from(format!(
            "step_size {} is larger than cardinality_horizon {}",
            file.step_size, file.cardinality_horizon
        )));
        return Err(error);
    }
    Ok(())
}

/// Validated, immutable simulation inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    initial_temperature: f64,
    temperature_bounds: Bounds,
    power_bounds: Bounds,
    cooling_coefficient: f64,
    heating_coefficient: f64,
    cardinality_horizon: u32,
    step_size: u32,
    conversion_factor: f64,
    variables: Vec<String>,
}

impl TryFrom<ConfigurationFile> for Configuration {
    type Error = ConfigError;

    fn try_from(file: ConfigurationFile) -> Result<Self, Self::Error> {
        file.validate()?;

        if let Some(unknown) = file
            .variables
            .iter()
            .find(|name| !DECISION_VARIABLES.contains(&name.as_str()))
        {
            return Err(ConfigError::UnknownVariable(unknown.clone()));
        }

        Ok(Self {
            initial_temperature: file.initial_temperature,
            temperature_bounds: file.temperature_bounds,
            power_bounds: file.power_bounds,
            cooling_coefficient: file.cooling_coefficient,
            heating_coefficient: file.heating_coefficient,
            cardinality_horizon: file.cardinality_horizon,
            step_size: file.step_size,
            conversion_factor: file.conversion_factor,
            variables: file.variables,
        })
    }
}

impl Configuration {
    /// Load inputs from a TOML file, overlaid by `HEAT_SCHEDULER__*` environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::new().merge(Toml::string(contents)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let file: ConfigurationFile = figment.extract().map_err(Box::new)?;
        Self::try_from(file)
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    pub fn temperature_bounds(&self) -> Bounds {
        self.temperature_bounds
    }

    pub fn power_bounds(&self) -> Bounds {
        self.power_bounds
    }

    pub fn cooling_coefficient(&self) -> f64 {
        self.cooling_coefficient
    }

    pub fn heating_coefficient(&self) -> f64 {
        self.heating_coefficient
    }

    pub fn cardinality_horizon(&self) -> u32 {
        self.cardinality_horizon
    }

    pub fn step_size(&self) -> u32 {
        self.step_size
    }

    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    /// Variable names to extract, in output order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SCENARIO: &str = r#"
        initial_temperature = 18
        temperature_bounds = [15, 22]
        power_bounds = [0, 10]
        cooling_coefficient = 1
        heating_coefficient = 3
        cardinality_horizon = 24
        step_size = 1
        conversion_factor = 1
        variables = ["temperature_house", "power_heater"]
    "#;

    #[test]
    fn test_parse_scenario() {
        let config = Configuration::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.initial_temperature(), 18.0);
        assert_eq!(config.temperature_bounds(), Bounds { min: 15.0, max: 22.0 });
        assert_eq!(config.power_bounds(), Bounds { min: 0.0, max: 10.0 });
        assert_eq!(config.cardinality_horizon(), 24);
        assert_eq!(config.step_size(), 1);
        assert_eq!(config.variables(), ["temperature_house", "power_heater"]);
    }

    #[rstest]
    #[case("temperature_bounds = [15, 22]", "temperature_bounds = [22, 15]")]
    #[case("power_bounds = [0, 10]", "power_bounds = [10, 0]")]
    #[case("step_size = 1", "step_size = 0")]
    #[case("step_size = 1", "step_size = 25")]
    #[case("cardinality_horizon = 24", "cardinality_horizon = 0")]
    #[case("cooling_coefficient = 1", "cooling_coefficient = 0")]
    #[case("heating_coefficient = 3", "heating_coefficient = -3")]
    #[case("conversion_factor = 1", "conversion_factor = 0")]
    #[case(
        r#"variables = ["temperature_house", "power_heater"]"#,
        "variables = []"
    )]
    #[case("initial_temperature = 18", "initial_temperature = nan")]
    #[case("initial_temperature = 18", "initial_temperature = -inf")]
    #[case("heating_coefficient = 3", "heating_coefficient = inf")]
    #[case("cooling_coefficient = 1", "cooling_coefficient = inf")]
    #[case("conversion_factor = 1", "conversion_factor = nan")]
    #[case("temperature_bounds = [15, 22]", "temperature_bounds = [15, inf]")]
    fn test_invalid_inputs_are_rejected(#[case] from: &str, #[case] to: &str) {
        let contents = SCENARIO.replace(from, to);
        let error = Configuration::from_toml_str(&contents).unwrap_err();
        assert!(
            matches!(error, ConfigError::Validation(_)),
            "expected validation error, got {error}"
        );
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        let contents = SCENARIO.replace(
            r#"variables = ["temperature_house", "power_heater"]"#,
            r#"variables = ["temperature_house", "heat_pump"]"#,
        );
        let error = Configuration::from_toml_str(&contents).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownVariable(ref name) if name == "heat_pump"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let contents = format!("{SCENARIO}\nsolver = \"cbc\"\n");
        let error = Configuration::from_toml_str(&contents).unwrap_err();
        assert!(matches!(error, ConfigError::Extract(_)));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let contents = SCENARIO.replace("conversion_factor = 1", "");
        let error = Configuration::from_toml_str(&contents).unwrap_err();
        assert!(matches!(error, ConfigError::Extract(_)));
    }

    #[test]
    fn test_missing_file() {
        let error = Configuration::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_environment_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("inputs.toml", SCENARIO)?;
            jail.set_env("HEAT_SCHEDULER__STEP_SIZE", "2");
            jail.set_env("HEAT_SCHEDULER__TEMPERATURE_BOUNDS", "[16, 21]");

            let config = Configuration::load(Path::new("inputs.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.step_size(), 2);
            assert_eq!(config.temperature_bounds(), Bounds { min: 16.0, max: 21.0 });
            assert_eq!(config.initial_temperature(), 18.0);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_are_validated() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("inputs.toml", SCENARIO)?;
            jail.set_env("HEAT_SCHEDULER__STEP_SIZE", "48");

            let error = Configuration::load(Path::new("inputs.toml")).unwrap_err();
            assert!(matches!(error, ConfigError::Validation(_)));
            Ok(())
        });
    }

    #[test]
    fn test_unknown_environment_key_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("inputs.toml", SCENARIO)?;
            jail.set_env("HEAT_SCHEDULER__SOLVER", "cbc");

            let error = Configuration::load(Path::new("inputs.toml")).unwrap_err();
            assert!(matches!(error, ConfigError::Extract(_)));
            Ok(())
        });
    }

    #[test]
    fn test_step_size_equal_to_horizon_is_valid() {
        let contents = SCENARIO.replace("step_size = 1", "step_size = 24");
        let config = Configuration::from_toml_str(&contents).unwrap();
        assert_eq!(config.step_size(), 24);
    }
}
