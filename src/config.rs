// slick - A modal terminal chat client
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE: &str = ".slickrc.json";
const CONFIG_DIR_NAME: &str = "slick";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub name: String,
    #[serde(default)]
    pub kind: ConnectionKind,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    #[serde(default)]
    pub echo: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    #[default]
    Loopback,
}

fn default_time_format() -> String {
    "%H:%M".to_owned()
}

fn default_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "me".to_owned())
}

fn default_channels() -> Vec<String> {
    vec!["general".to_owned(), "random".to_owned()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connections: vec![ConnectionConfig {
                name: "local".to_owned(),
                kind: ConnectionKind::Loopback,
                user: default_user(),
                channels: default_channels(),
                echo: true,
            }],
            time_format: default_time_format(),
        }
    }
}

/// Where the config comes from: the explicit path, else the nearest
/// `.slickrc.json` from `cwd` upward, else the user config dir.
pub fn discover(explicit: Option<&Path>, cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(found) = cwd.ancestors().map(|dir| dir.join(PROJECT_FILE)).find(|p| p.is_file()) {
        return Some(found);
    }
    config_dir.map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE)).filter(|p| p.is_file())
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    let config_dir = dirs::config_dir();
    let Some(path) = discover(explicit, &cwd, config_dir.as_deref()) else {
        tracing::info!("no config file found, using defaults");
        return Ok(Config::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::InvalidConfig(format!("{}: {e}", path.display())))?;
    let config = parse(&content).map_err(|e| match e {
        AppError::InvalidConfig(detail) => {
            AppError::InvalidConfig(format!("{}: {detail}", path.display()))
        }
        other => other,
    })?;
    tracing::info!(path = %path.display(), connections = config.connections.len(), "config loaded");
    Ok(config)
}

pub fn parse(content: &str) -> Result<Config, AppError> {
    let config: Config =
        serde_json::from_str(content).map_err(|e| AppError::InvalidConfig(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), AppError> {
    if config.connections.is_empty() {
        return Err(AppError::NoConnections);
    }
    let mut seen = HashSet::new();
    for conn in &config.connections {
        if conn.name.trim().is_empty() {
            return Err(AppError::InvalidConfig("connection name is empty".to_owned()));
        }
        if !seen.insert(conn.name.as_str()) {
            return Err(AppError::InvalidConfig(format!("duplicate connection `{}`", conn.name)));
        }
    }
    Ok(())
}
