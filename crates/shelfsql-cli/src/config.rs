use serde::Deserialize;
use shelfsql::{Dialect, GeneratorConfig};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "shelfsql.toml";

/// Contents of `shelfsql.toml`.
///
/// ```toml
/// [generator]
/// dialect = "ansi"
/// count_alias = "total"
/// max_depth = 32
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Generator settings for a run: the config file (explicit, or the default
/// one when present), then the `--dialect` override.
pub fn resolve(config: Option<&Path>, dialect: Option<Dialect>) -> anyhow::Result<GeneratorConfig> {
    let file = match config {
        Some(path) => ConfigFile::load(path)?,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if default.exists() {
                ConfigFile::load(&default)?
            } else {
                ConfigFile::default()
            }
        }
    };

    let mut generator = file.generator;
    if let Some(dialect) = dialect {
        generator.dialect = dialect;
    }
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generator_table() {
        let file = ConfigFile::parse(
            r#"
[generator]
dialect = "ansi"
count_alias = "total"
"#,
        )
        .unwrap();
        assert_eq!(file.generator.dialect, Dialect::Ansi);
        assert_eq!(file.generator.count_alias, "total");
        assert_eq!(file.generator.max_depth, 64);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = ConfigFile::parse("").unwrap();
        assert_eq!(file.generator, GeneratorConfig::default());
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(ConfigFile::parse("[generator]\nquote = \"`\"\n").is_err());
        assert!(ConfigFile::parse("[database]\nurl = \"x\"\n").is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = resolve(Some(Path::new("does/not/exist.toml")), None).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
