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

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No connections configured")]
    NoConnections,
    #[error("Unknown connection `{0}`")]
    UnknownConnection(String),
}

impl AppError {
    pub const INVALID_CONFIG_EXIT_CODE: i32 = 20;
    pub const NO_CONNECTIONS_EXIT_CODE: i32 = 21;
    pub const UNKNOWN_CONNECTION_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) => Self::INVALID_CONFIG_EXIT_CODE,
            Self::NoConnections => Self::NO_CONNECTIONS_EXIT_CODE,
            Self::UnknownConnection(_) => Self::UNKNOWN_CONNECTION_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfig(detail) => {
                format!("The config file could not be read: {detail}")
            }
            Self::NoConnections => {
                "No connections configured. Add one to `connections` in .slickrc.json.".to_owned()
            }
            Self::UnknownConnection(name) => {
                format!("No connection named `{name}` in the config file.")
            }
        }
    }
}

/// Failures of a dispatched command or message submission. Shown on the
/// status line; the command bar is reset regardless.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no active connection")]
    NoConnection,
    #[error("no channel selected, press p to pick one")]
    NoChannel,
    #[error("connection `{0}` is closed")]
    ConnectionClosed(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(String),
}

/// A user id the connection's directory does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown user `{0}`")]
    UnknownUser(String),
}
