use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use toml::{Table, Value};

use volclip_model::{BspMode, BspOptions};

pub const CONFIG_FILE: &str = "volclip.toml";

/// What to do when pasted volumes reference a sub-level that is not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLevelPolicy {
    Ask,
    Always,
    Never,
}

impl MissingLevelPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ask" => Some(Self::Ask),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteOptions {
    /// Paste each volume into the level it was copied from, when loaded.
    pub to_origin_level: bool,
    /// Replace a same-named volume instead of pasting beside it.
    pub delete_original: bool,
    pub missing_levels: MissingLevelPolicy,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            to_origin_level: true,
            delete_original: true,
            missing_levels: MissingLevelPolicy::Ask,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipboardConfig {
    pub paste: PasteOptions,
    pub bsp: BspOptions,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{0}`: {1}")]
    InvalidField(&'static str, String),

    #[error("config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

pub fn default_config_toml() -> String {
    let paste = PasteOptions::default();
    let bsp = BspOptions::default();
    format!(
        r#"[paste]
to_origin_level = {to_origin}
delete_original = {delete_original}
missing_levels = "{missing}"

[bsp]
mode = "{mode}"
max_iterations = {max_iterations}
balance = {balance}
portal_bias = {portal_bias}
extra_passes = {extra_passes}
"#,
        to_origin = paste.to_origin_level,
        delete_original = paste.delete_original,
        missing = paste.missing_levels.as_str(),
        mode = mode_name(bsp.mode),
        max_iterations = bsp.max_iterations,
        balance = bsp.balance,
        portal_bias = bsp.portal_bias,
        extra_passes = bsp.extra_passes,
    )
}

fn mode_name(mode: BspMode) -> &'static str {
    match mode {
        BspMode::Lame => "lame",
        BspMode::Good => "good",
        BspMode::Optimal => "optimal",
    }
}

/// Writes the default config into `root`. Fails if one is already there.
pub fn create_config(root: &Path) -> Result<PathBuf, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path));
    }
    fs::create_dir_all(root)?;
    fs::write(&path, default_config_toml())?;
    Ok(path)
}

pub fn load_config(path: &Path) -> Result<ClipboardConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config_toml(&contents)
}

/// Loads `root/volclip.toml`, or the defaults when the file does not exist.
pub fn load_config_or_default(root: &Path) -> Result<ClipboardConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ClipboardConfig::default());
    }
    load_config(&path)
}

pub fn parse_config_toml(contents: &str) -> Result<ClipboardConfig, ConfigError> {
    let value: Value = contents.parse::<Value>()?;
    let mut config = ClipboardConfig::default();

    if let Some(paste) = section(&value, "paste")? {
        if let Some(v) = read_bool(paste, "to_origin_level", "paste.to_origin_level")? {
            config.paste.to_origin_level = v;
        }
        if let Some(v) = read_bool(paste, "delete_original", "paste.delete_original")? {
            config.paste.delete_original = v;
        }
        if let Some(raw) = read_str(paste, "missing_levels", "paste.missing_levels")? {
            config.paste.missing_levels = MissingLevelPolicy::parse(raw).ok_or_else(|| {
                ConfigError::InvalidField(
                    "paste.missing_levels",
                    format!("expected \"ask\", \"always\" or \"never\", got \"{raw}\""),
                )
            })?;
        }
    }

    if let Some(bsp) = section(&value, "bsp")? {
        if let Some(raw) = read_str(bsp, "mode", "bsp.mode")? {
            config.bsp.mode = match raw.trim().to_ascii_lowercase().as_str() {
                "lame" => BspMode::Lame,
                "good" => BspMode::Good,
                "optimal" => BspMode::Optimal,
                _ => {
                    return Err(ConfigError::InvalidField(
                        "bsp.mode",
                        format!("unknown mode \"{raw}\""),
                    ));
                }
            };
        }
        if let Some(v) = read_u32(bsp, "max_iterations", "bsp.max_iterations", u32::MAX)? {
            if v == 0 {
                return Err(ConfigError::InvalidField(
                    "bsp.max_iterations",
                    "must be at least 1".to_string(),
                ));
            }
            config.bsp.max_iterations = v;
        }
        if let Some(v) = read_u32(bsp, "balance", "bsp.balance", 100)? {
            config.bsp.balance = v;
        }
        if let Some(v) = read_u32(bsp, "portal_bias", "bsp.portal_bias", 100)? {
            config.bsp.portal_bias = v;
        }
        if let Some(v) = read_u32(bsp, "extra_passes", "bsp.extra_passes", u32::MAX)? {
            config.bsp.extra_passes = v;
        }
    }

    Ok(config)
}

fn section<'a>(value: &'a Value, name: &'static str) -> Result<Option<&'a Table>, ConfigError> {
    match value.get(name) {
        None => Ok(None),
        Some(v) => v
            .as_table()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidField(name, "must be a table".to_string())),
    }
}

fn read_bool(table: &Table, key: &str, field: &'static str) -> Result<Option<bool>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidField(field, "must be true or false".to_string())),
    }
}

fn read_str<'a>(
    table: &'a Table,
    key: &str,
    field: &'static str,
) -> Result<Option<&'a str>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidField(field, "must be a string".to_string())),
    }
}

fn read_u32(
    table: &Table,
    key: &str,
    field: &'static str,
    max: u32,
) -> Result<Option<u32>, ConfigError> {
    let Some(v) = table.get(key) else {
        return Ok(None);
    };
    let raw = v
        .as_integer()
        .ok_or_else(|| ConfigError::InvalidField(field, "must be an integer".to_string()))?;
    match u32::try_from(raw) {
        Ok(n) if n <= max => Ok(Some(n)),
        _ => Err(ConfigError::InvalidField(
            field,
            format!("must be between 0 and {max}, got {raw}"),
        )),
    }
}
