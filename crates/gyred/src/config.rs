//! TOML configuration for the Gyre CLI.

use std::path::Path;

use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring parameters.
    pub cluster: ClusterSection,
    /// Simulation defaults.
    pub simulation: SimulationSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[cluster]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClusterSection {
    /// Virtual nodes per physical node. Defaults to 128.
    pub vnodes_per_node: Option<u32>,
}

/// `[simulation]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Number of records to seed. Defaults to 10,000.
    pub keys: Option<usize>,
    /// Number of initial nodes. Defaults to 3.
    pub nodes: Option<usize>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective vnodes per node.
    pub fn vnodes_per_node(&self) -> u32 {
        self.cluster.vnodes_per_node.unwrap_or(128)
    }

    /// Effective seeded key count.
    pub fn keys(&self) -> usize {
        self.simulation.keys.unwrap_or(10_000)
    }

    /// Effective initial node count.
    pub fn nodes(&self) -> usize {
        self.simulation.nodes.unwrap_or(3)
    }
}
