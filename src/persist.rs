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

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const STATE_DIR_NAME: &str = "slick";
const STATE_FILE: &str = "state.json";

/// What survives a restart: the last active connection and, per connection,
/// the last selected channel (by name, since ids may change).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedState {
    pub active_connection: Option<String>,
    pub selected_channels: BTreeMap<String, String>,
}

pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STATE_DIR_NAME).join(STATE_FILE))
}

/// Read saved state. A missing or unreadable file yields the empty state.
pub async fn load(path: &Path) -> SavedState {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no saved state");
            return SavedState::default();
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read saved state: {err}");
            return SavedState::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), "ignoring corrupt saved state: {err}");
        SavedState::default()
    })
}

pub async fn save(path: &Path, state: &SavedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let content = serde_json::to_vec_pretty(state)?;
    tokio::fs::write(path, content).await.with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
