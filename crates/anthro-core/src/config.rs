//! Run configuration loaded from a TOML file.
//!
//! Relative paths are resolved against the directory holding the config
//! file. Options are validated when loaded; source keys are checked once the
//! mapping table is known.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use anthro_model::{CurationError, CurationOptions, MappingTable, Result, UnmappedColumnPolicy};

const DEFAULT_OUTPUT_DIR: &str = "curated";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunConfig {
    mapping: PathBuf,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    options: CurationOptions,
    #[serde(default)]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSource {
    key: String,
    path: String,
    #[serde(default)]
    subject_id_column: Option<String>,
}

/// One configured source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Source key in the mapping table.
    pub key: String,
    /// File path as written in the configuration; used in warnings.
    pub file: String,
    /// File path resolved against the config directory.
    pub path: PathBuf,
    pub subject_id_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mapping_path: PathBuf,
    pub output_dir: PathBuf,
    pub options: CurationOptions,
    pub sources: Vec<SourceEntry>,
}

/// Command-line overrides applied on top of a loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub age_band_min: Option<f64>,
    pub age_band_max: Option<f64>,
    pub zscore_threshold: Option<f64>,
    pub warnings_top_n: Option<usize>,
    pub preserve_unmapped: bool,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CurationError::io(path, source))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base).map_err(|error| match error {
            CurationError::Parse { message, .. } => CurationError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration text; relative paths resolve against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let raw: RawRunConfig = toml::from_str(text).map_err(|error| CurationError::Parse {
            path: "<inline>".into(),
            message: error.to_string(),
        })?;
        raw.options.validate()?;
        if raw.sources.is_empty() {
            return Err(CurationError::config("no [[sources]] configured"));
        }
        let mut seen = BTreeSet::new();
        let mut sources = Vec::with_capacity(raw.sources.len());
        for source in raw.sources {
            if !seen.insert(source.key.clone()) {
                return Err(CurationError::config(format!(
                    "source '{}' is configured more than once",
                    source.key
                )));
            }
            sources.push(SourceEntry {
                path: resolve(base, Path::new(&source.path)),
                key: source.key,
                file: source.path,
                subject_id_column: source.subject_id_column,
            });
        }
        Ok(Self {
            mapping_path: resolve(base, &raw.mapping),
            output_dir: raw
                .output_dir
                .map_or_else(|| base.join(DEFAULT_OUTPUT_DIR), |dir| resolve(base, &dir)),
            options: raw.options,
            sources,
        })
    }

    /// Apply overrides and re-validate the resulting options.
    ///
    /// The configuration is left untouched when the overridden options are invalid.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        let mut options = self.options.clone();
        if let Some(min) = overrides.age_band_min {
            options.age_band_min = min;
        }
        if let Some(max) = overrides.age_band_max {
            options.age_band_max = max;
        }
        if let Some(threshold) = overrides.zscore_threshold {
            options.zscore_threshold = threshold;
        }
        if let Some(top_n) = overrides.warnings_top_n {
            options.warnings_top_n = top_n;
        }
        if overrides.preserve_unmapped {
            options.unmapped_column_policy = UnmappedColumnPolicy::PreservePrefixed;
        }
        options.validate()?;
        self.options = options;
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        Ok(())
    }

    /// Every configured source must exist in the mapping table.
    pub fn check_sources(&self, table: &MappingTable) -> Result<()> {
        for source in &self.sources {
            if table.source(&source.key).is_none() {
                return Err(CurationError::schema(format!(
                    "source '{}' is not defined in the mapping table",
                    source.key
                )));
            }
        }
        Ok(())
    }

    pub fn delimiter(&self) -> u8 {
        // ASCII is enforced by `CurationOptions::validate`.
        u8::try_from(self.options.delimiter).unwrap_or(b',')
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
mapping = "mapping.json"

[options]
age_band_min = 25
zscore_threshold = 2.5
unmapped_column_policy = "preserve_prefixed"
default_length_unit = "cm"

[[sources]]
key = "sizekorea_7th"
path = "raw/7th.csv"
subject_id_column = "HUMAN_ID"

[[sources]]
key = "sizekorea_8th"
path = "/data/8th.csv"
"#;

    #[test]
    fn parses_and_resolves_paths() {
        let config = RunConfig::parse(CONFIG, Path::new("/work")).unwrap();
        assert_eq!(config.mapping_path, PathBuf::from("/work/mapping.json"));
        assert_eq!(config.output_dir, PathBuf::from("/work/curated"));
        assert_eq!(config.options.age_band_min, 25.0);
        assert_eq!(config.options.age_band_max, 59.0);
        assert_eq!(
            config.options.unmapped_column_policy,
            UnmappedColumnPolicy::PreservePrefixed
        );
        assert_eq!(config.sources[0].path, PathBuf::from("/work/raw/7th.csv"));
        assert_eq!(config.sources[0].file, "raw/7th.csv");
        assert_eq!(config.sources[0].subject_id_column.as_deref(), Some("HUMAN_ID"));
        assert_eq!(config.sources[1].path, PathBuf::from("/data/8th.csv"));
        assert_eq!(config.delimiter(), b',');
    }

    #[test]
    fn invalid_options_are_rejected() {
        let text = "mapping = \"m.json\"\n[options]\nzscore_threshold = 0\n[[sources]]\nkey = \"a\"\npath = \"a.csv\"\n";
        let error = RunConfig::parse(text, Path::new(".")).unwrap_err();
        assert!(matches!(error, CurationError::InvalidConfig { .. }));
    }

    #[test]
    fn duplicate_source_keys_are_rejected() {
        let text = "mapping = \"m.json\"\n[[sources]]\nkey = \"a\"\npath = \"a.csv\"\n[[sources]]\nkey = \"a\"\npath = \"b.csv\"\n";
        assert!(RunConfig::parse(text, Path::new(".")).is_err());
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let text = "mapping = \"m.json\"\nthreshold = 3\n[[sources]]\nkey = \"a\"\npath = \"a.csv\"\n";
        let error = RunConfig::parse(text, Path::new(".")).unwrap_err();
        assert!(matches!(error, CurationError::Parse { .. }));
    }

    #[test]
    fn overrides_are_validated() {
        let mut config = RunConfig::parse(CONFIG, Path::new("/work")).unwrap();
        let overrides = ConfigOverrides {
            age_band_max: Some(40.0),
            warnings_top_n: Some(5),
            ..ConfigOverrides::default()
        };
        config.apply_overrides(&overrides).unwrap();
        assert_eq!(config.options.age_band_max, 40.0);
        assert_eq!(config.options.warnings_top_n, 5);

        let inverted = ConfigOverrides {
            age_band_min: Some(50.0),
            ..ConfigOverrides::default()
        };
        assert!(config.apply_overrides(&inverted).is_err());
    }

    #[test]
    fn rejected_overrides_leave_config_unchanged() {
        let mut config = RunConfig::parse(CONFIG, Path::new("/work")).unwrap();
        let before = config.clone();
        let overrides = ConfigOverrides {
            output_dir: Some(PathBuf::from("/elsewhere")),
            zscore_threshold: Some(-1.0),
            warnings_top_n: Some(3),
            ..ConfigOverrides::default()
        };
        let error = config.apply_overrides(&overrides).unwrap_err();
        assert!(matches!(error, CurationError::InvalidConfig { .. }));
        assert_eq!(config, before);
    }

    #[test]
    fn misspelled_options_are_parse_errors() {
        let text = "mapping = \"m.json\"\n[options]\nzscore_treshold = 2\n[[sources]]\nkey = \"a\"\npath = \"a.csv\"\n";
        let error = RunConfig::parse(text, Path::new(".")).unwrap_err();
        assert!(matches!(error, CurationError::Parse { .. }));
    }
}
