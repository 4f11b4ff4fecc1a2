// Configuration loading
// Searched as ./lithoframe.toml, $LITHOFRAME, ~/.config/lithoframe/config.toml

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use lithoframe_core::{Classifier, FieldSpec, FrameError, Palette, Table};
use lithoframe_io::{csv, IoError};

pub const CONFIG_FILENAME: &str = "lithoframe.toml";
pub const CONFIG_ENV: &str = "LITHOFRAME";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// No explicit path and nothing found in the search locations.
    NotFound,
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    /// A palette or translation table failed to load.
    Io(IoError),
    /// A palette table loaded but is not a valid mapping.
    Palette { path: PathBuf, source: FrameError },
    Pattern { field: String, message: String },
    /// The translation does not cover a palette's minerals.
    Coverage { column: &'static str, missing: Vec<String> },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound => write!(
                f,
                "no configuration found; looked for ./{CONFIG_FILENAME}, ${CONFIG_ENV} \
                 and the user config directory"
            ),
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid config {}: {}", path.display(), message)
            }
            ConfigError::Io(e) => write!(f, "{e}"),
            ConfigError::Palette { path, source } => {
                write!(f, "invalid palette {}: {}", path.display(), source)
            }
            ConfigError::Pattern { field, message } => {
                write!(f, "invalid pattern for field '{field}': {message}")
            }
            ConfigError::Coverage { column, missing } => write!(
                f,
                "translation {} column does not cover palette minerals: [{}]",
                column,
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Io(e) => Some(e),
            ConfigError::Palette { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IoError> for ConfigError {
    fn from(e: IoError) -> Self {
        ConfigError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// On-disk schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    translation: PathBuf,
    palettes: RawPalettes,
    #[serde(default)]
    fields: BTreeMap<String, RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalettes {
    detailed: RawPalette,
    reduced: RawPalette,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalette {
    file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    key: String,
    pattern: Option<String>,
}

// ---------------------------------------------------------------------------
// Loaded configuration
// ---------------------------------------------------------------------------

/// Fully loaded and cross-validated run configuration: both palettes, the
/// fine-to-reduced translation table, and the metadata field extractors
/// shared by both classifiers.
#[derive(Debug, Clone)]
pub struct Config {
    pub detailed: Palette,
    pub reduced: Palette,
    pub translation: Table,
    pub fields: Vec<FieldSpec>,
}

impl Config {
    /// Load from an explicit path, or search the standard locations.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => search_config().ok_or(ConfigError::NotFound)?,
        };
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        // Relative table paths are resolved against the config file.
        let base = path.parent().unwrap_or(Path::new("."));
        Config::from_raw(raw, base)
    }

    fn from_raw(raw: RawConfig, base: &Path) -> Result<Config, ConfigError> {
        let detailed = load_palette(&resolve(base, &raw.palettes.detailed.file))?;
        let reduced = load_palette(&resolve(base, &raw.palettes.reduced.file))?;
        let translation = csv::read_table(&resolve(base, &raw.translation))?;

        let mut fields = Vec::with_capacity(raw.fields.len());
        for (name, field) in raw.fields {
            let spec = match field.pattern {
                None => FieldSpec::new(name, field.key),
                Some(pattern) => FieldSpec::with_pattern(name.as_str(), field.key, &pattern)
                    .map_err(|e| ConfigError::Pattern {
                        field: name,
                        message: e.to_string(),
                    })?,
            };
            fields.push(spec);
        }

        let config = Config { detailed, reduced, translation, fields };
        config.check_coverage()?;
        Ok(config)
    }

    /// Every detailed mineral must appear in the translation's fine column
    /// and every reduced mineral in its reduced column, or translation
    /// would silently drop data at run time.
    fn check_coverage(&self) -> Result<(), ConfigError> {
        let reduced_col: BTreeSet<String> = self.translation_column(0);
        let fine_col: BTreeSet<String> = self.translation_column(1);

        let missing: Vec<String> = self
            .detailed
            .minerals()
            .iter()
            .filter(|m| !fine_col.contains(*m))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Coverage { column: "fine", missing });
        }

        let missing: Vec<String> = self
            .reduced
            .minerals()
            .iter()
            .filter(|m| !reduced_col.contains(*m))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Coverage { column: "reduced", missing });
        }
        Ok(())
    }

    fn translation_column(&self, col: usize) -> BTreeSet<String> {
        (0..self.translation.row_count())
            .map(|row| self.translation.value(row, col).to_string())
            .collect()
    }

    /// The frame's classifiers in palette order, detailed first. Both share
    /// the same field extractors.
    pub fn classifiers(&self) -> Vec<Classifier> {
        vec![
            Classifier::new(self.detailed.clone(), self.fields.clone()),
            Classifier::new(self.reduced.clone(), self.fields.clone()),
        ]
    }
}

fn load_palette(path: &Path) -> Result<Palette, ConfigError> {
    let table = csv::read_table(path)?;
    Palette::from_table(&table).map_err(|e| ConfigError::Palette {
        path: path.to_path_buf(),
        source: e,
    })
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn search_config() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILENAME)];
    if let Some(env_path) = env::var_os(CONFIG_ENV) {
        candidates.push(PathBuf::from(env_path));
    }
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("lithoframe").join("config.toml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}
