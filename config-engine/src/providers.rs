// Configuration sources (files and environment)
use std::path::{Path, PathBuf};

/// File formats understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A file that must exist
    File(PathBuf),
    /// A file that is skipped when absent
    OptionalFile(PathBuf),
    /// Environment variables starting with `prefix`
    Env { prefix: String },
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn optional_file(path: impl Into<PathBuf>) -> Self {
        Self::OptionalFile(path.into())
    }

    pub fn env(prefix: impl Into<String>) -> Self {
        Self::Env {
            prefix: prefix.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.yaml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("b.YML")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("b.toml")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("b.ini")), None);
        assert_eq!(FileFormat::from_path(Path::new("settings")), None);
    }
}
