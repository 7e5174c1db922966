//! Layered CLI configuration.
//!
//! Built-in defaults, then an optional TOML file, then `TSMOM__`-prefixed
//! environment variables (`TSMOM__VOLATILITY__DECAY=0.97`). Command-line
//! flags are applied on top by each subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tsmom_data::{LoaderConfig, UniverseConfig};
use tsmom_signals::{MomentumConfig, VolatilityConfig};

/// Every tunable of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) loader: LoaderConfig,
    pub(crate) universe: UniverseConfig,
    pub(crate) momentum: MomentumConfig,
    pub(crate) volatility: VolatilityConfig,
}

impl Settings {
    /// Resolve settings from defaults, `file` and the environment.
    pub(crate) fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("failed to encode default settings")?,
        );
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("TSMOM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        settings.volatility.validate()?;
        Ok(settings)
    }
}
