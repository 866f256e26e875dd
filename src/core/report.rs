//! Exportable record of one calculation.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationReport {
    pub calculator: String,
    pub generated_at: DateTime<Utc>,
    pub inputs: Value,
    pub results: Value,
}

impl CalculationReport {
    /// `inputs` and `results` must serialize to JSON objects.
    pub fn new(
        calculator: &str,
        inputs: &impl Serialize,
        results: &impl Serialize,
    ) -> Result<Self> {
        let inputs = serde_json::to_value(inputs)?;
        let results = serde_json::to_value(results)?;
        if !inputs.is_object() || !results.is_object() {
            bail!("Report sections for {} must be objects", calculator);
        }
        Ok(Self {
            calculator: calculator.to_string(),
            generated_at: Utc::now(),
            inputs,
            results,
        })
    }

    /// Adds an extra named value to the results, e.g. a schedule.
    pub fn with_result(mut self, name: &str, value: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        if let Value::Object(map) = &mut self.results {
            map.insert(name.to_string(), value);
        }
        Ok(self)
    }

    /// Flattened `(section, name, value)` rows; nested values stay JSON encoded.
    pub fn rows(&self) -> Vec<(&'static str, String, String)> {
        let mut rows = vec![
            ("report", "calculator".to_string(), self.calculator.clone()),
            ("report", "generated_at".to_string(), self.generated_at.to_rfc3339()),
        ];
        for (section, value) in [("inputs", &self.inputs), ("results", &self.results)] {
            if let Value::Object(map) = value {
                for (name, v) in map {
                    rows.push((section, name.clone(), cell_text(v)));
                }
            }
        }
        rows
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
