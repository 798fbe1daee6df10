use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::providers::{ConfigSource, FileFormat};
use crate::validation::ConfigValidator;

/// Ordered set of configuration sources
#[derive(Debug, Clone, Default)]
pub struct ConfigEngine {
    sources: Vec<ConfigSource>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; later sources override earlier ones
    #[must_use]
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Merge all sources over `T::default()` and validate the result.
    ///
    /// # Errors
    ///
    /// Fails when a required file is missing, a file has an unknown
    /// extension, the merged data does not deserialize into `T`, or
    /// validation rejects it.
    pub fn load<T>(&self) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default + ConfigValidator,
    {
        let mut figment = Figment::from(Serialized::defaults(T::default()));

        for source in &self.sources {
            figment = match source {
                ConfigSource::File(path) => {
                    if !path.exists() {
                        return Err(ConfigError::SourceNotFound(path.clone()));
                    }
                    merge_file(figment, path)?
                }
                ConfigSource::OptionalFile(path) => {
                    if path.exists() {
                        merge_file(figment, path)?
                    } else {
                        tracing::debug!(
                            path = %path.display(),
                            "Optional config file absent, skipping"
                        );
                        figment
                    }
                }
                ConfigSource::Env { prefix } => figment.merge(Env::prefixed(prefix).split("__")),
            };
        }

        let config: T = figment.extract()?;
        config.validate()?;

        tracing::info!(sources = self.sources.len(), "Configuration loaded");
        Ok(config)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Yaml) => Ok(figment.merge(Yaml::file(path))),
        Some(FileFormat::Toml) => Ok(figment.merge(Toml::file(path))),
        None => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
