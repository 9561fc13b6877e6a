use std::path::{Path, PathBuf};

use schem_rs_voxel::record::Substitution;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ToolConfig {
    pub paths: PathsSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub decode: DecodeSection,
    #[serde(default)]
    pub augment: AugmentSection,
}

#[derive(Debug, Deserialize)]
pub struct PathsSection {
    /// Structure file read by `decode`.
    pub input: PathBuf,
    /// Directory holding every intermediate artifact.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Structure file written by `encode`.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_work_dir() -> PathBuf {
    "out".into()
}

fn default_output() -> PathBuf {
    "rebuilt.schem".into()
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecodeSection {
    /// Block strings rewritten when the listing is written.
    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<Substitution>,
}

fn default_substitutions() -> Vec<Substitution> {
    vec![Substitution::new(
        "minecraft:dirt",
        "minecraft:grass_block[snowy=false]",
    )]
}

impl Default for DecodeSection {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AugmentSection {
    /// Size grids by the structure extent instead of the largest occupied
    /// coordinate.
    #[serde(default)]
    pub pad_to_extent: bool,
}

impl ToolConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
