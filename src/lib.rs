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

pub mod app;
pub mod config;
pub mod connection;
pub mod error;
pub mod persist;
pub mod text;
pub mod ui;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "slick", version, about = "A modal terminal chat client")]
pub struct Cli {
    /// Config file (defaults to the nearest .slickrc.json, then the user config dir)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Connection to show first
    #[arg(long)]
    pub connection: Option<String>,

    /// Where to keep the last active connection and channels
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Neither read nor write saved state
    #[arg(long, conflicts_with = "state_file")]
    pub no_state: bool,

    /// Write tracing diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (e.g. "info,slick::app=debug"); falls back to RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}

impl Cli {
    /// Saved-state location, or `None` when persistence is off.
    pub fn state_path(&self) -> Option<PathBuf> {
        if self.no_state {
            return None;
        }
        self.state_file.clone().or_else(persist::default_state_path)
    }
}
