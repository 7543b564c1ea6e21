//! Suite: the unit loaded from a file and handed to the runner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RunContext;
use crate::scenario::Scenario;

/// An ordered list of scenarios plus the seed values they start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name, used in reports.
    pub name: String,
    /// Base URL declared by the suite; configuration may override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Externally supplied fixture values bound before the first scenario.
    #[serde(default)]
    pub seeds: BTreeMap<String, Value>,
    /// Scenarios, executed in order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: None,
            seeds: BTreeMap::new(),
            scenarios: Vec::new(),
        }
    }

    /// Adds a scenario (builder pattern).
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Adds a seed value (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, name: impl Into<String>, value: Value) -> Self {
        self.seeds.insert(name.into(), value);
        self
    }

    /// Overrides seeds key by key with externally supplied values.
    pub fn merge_seeds(&mut self, seeds: BTreeMap<String, Value>) {
        self.seeds.extend(seeds);
    }

    /// Builds the initial run context from the seeds.
    #[must_use]
    pub fn initial_context(&self) -> RunContext {
        RunContext::with_seeds(self.seeds.clone())
    }
}
