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

pub mod buffer;
pub mod commands;
mod events;
pub mod history;
pub mod keys;
pub mod picker;
mod state;

pub use events::{handle_client_event, handle_terminal_event};
pub use state::{App, Mode, Picker, PickerItem, PickerKind, StatusMessage};

use crate::Cli;
use crate::config::{Config, ConnectionKind};
use crate::connection::{self, ChatService, loopback::LoopbackService};
use crate::error::AppError;
use crate::persist::SavedState;
use commands::CommandRegistry;
use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

/// Build the app with no connections started yet.
pub fn create_app(config: &Config, saved: SavedState) -> App {
    App::new(CommandRegistry::with_builtins(), config.time_format.clone(), saved)
}

/// Spawn one driver per configured connection on the current `LocalSet` and
/// pick the active one: `--connection`, else the saved one, else the first.
pub fn start_connections(app: &mut App, config: &Config, cli: &Cli) -> Result<(), AppError> {
    for (index, conn) in config.connections.iter().enumerate() {
        let service: Box<dyn ChatService> = match conn.kind {
            ConnectionKind::Loopback => {
                Box::new(LoopbackService::new(&conn.user, &conn.channels, conn.echo))
            }
        };
        let handle = connection::spawn(index, &conn.name, service, app.event_tx.clone());
        app.add_connection(handle);
    }

    if let Some(name) = cli.connection.as_deref() {
        let index =
            app.connection_by_name(name).ok_or_else(|| AppError::UnknownConnection(name.to_owned()))?;
        app.active = Some(index);
    } else if let Some(index) =
        app.saved.active_connection.as_deref().and_then(|name| app.connection_by_name(name))
    {
        app.active = Some(index);
    }
    Ok(())
}

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableBracketedPaste);

    let mut events = EventStream::new();
    let tick_duration = Duration::from_millis(16);
    let mut last_render = Instant::now();

    loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                handle_terminal_event(app, event);
            }
            Some(event) = app.event_rx.recv() => {
                handle_client_event(app, event);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain whatever else is queued, keyboard first
        loop {
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                handle_terminal_event(app, event);
                continue;
            }
            match app.event_rx.try_recv() {
                Ok(event) => handle_client_event(app, event),
                Err(_) => break,
            }
        }

        if app.should_quit {
            break;
        }

        // Phase 3: render once
        if app.force_redraw {
            terminal.clear()?;
            app.force_redraw = false;
        }
        terminal.draw(|f| crate::ui::render(f, app))?;
        last_render = Instant::now();
    }

    shutdown(app);
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableBracketedPaste);
    ratatui::restore();
    Ok(())
}

/// Ask every driver to stop.
pub fn shutdown(app: &App) {
    for conn in &app.connections {
        conn.shutdown();
    }
    tracing::info!(connections = app.connections.len(), "shutdown requested");
}
