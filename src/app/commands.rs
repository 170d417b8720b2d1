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

use super::App;
use super::picker::Entry;
use super::state::{PickerItem, PickerKind};
use crate::error::CommandError;
use crate::text::{PartKind, PrintablePart};
use std::collections::HashMap;
use std::rc::Rc;

pub type Handler = Rc<dyn Fn(&mut App, &str) -> Result<(), CommandError>>;

/// One palette entry. `permutations` are the spellings that invoke it,
/// prefix included (`/quit`, `:q`).
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub argument_hint: Option<String>,
    pub permutations: Vec<String>,
    pub handler: Handler,
}

impl Command {
    pub fn new(
        name: &str,
        description: &str,
        argument_hint: Option<&str>,
        permutations: &[&str],
        handler: impl Fn(&mut App, &str) -> Result<(), CommandError> + 'static,
    ) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            argument_hint: argument_hint.map(str::to_owned),
            permutations: permutations.iter().map(|p| (*p).to_owned()).collect(),
            handler: Rc::new(handler),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("permutations", &self.permutations)
            .finish_non_exhaustive()
    }
}

/// Commands known to the dispatcher, in palette order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        for command in builtins() {
            registry.register(command);
        }
        registry
    }

    /// Add a command, replacing any existing one with the same name.
    pub fn register(&mut self, command: Command) {
        if let Some(existing) = self.commands.iter_mut().find(|c| c.name == command.name) {
            *existing = command;
        } else {
            self.commands.push(command);
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Find the command one of whose permutations is exactly `word`.
    pub fn lookup(&self, word: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.permutations.iter().any(|p| p == word))
    }
}

pub fn is_command_prefix(c: char) -> bool {
    matches!(c, '/' | ':')
}

/// Whether `text` is a bare command word, the only time the palette shows.
pub fn is_palette_token(text: &str) -> bool {
    text.starts_with(is_command_prefix) && !text.contains(char::is_whitespace)
}

/// Whether submitted text is a command rather than a message: its first word
/// is a known spelling, or a prefix followed by a letter. `:) thanks` is a
/// message.
pub fn is_invocation(registry: &CommandRegistry, text: &str) -> bool {
    let word = text.split_whitespace().next().unwrap_or_default();
    let mut chars = word.chars();
    chars.next().is_some_and(is_command_prefix)
        && (registry.lookup(word).is_some() || chars.next().is_some_and(char::is_alphabetic))
}

/// Run `input` (`/name args...`) against the registry.
pub fn dispatch(app: &mut App, input: &str) -> Result<(), CommandError> {
    let input = input.trim();
    let (word, args) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let handler = app
        .commands
        .lookup(word)
        .map(|c| Rc::clone(&c.handler))
        .ok_or_else(|| CommandError::UnknownCommand(word.to_owned()))?;
    tracing::debug!(command = word, "dispatching command");
    handler(app, args.trim())
}

/// Run a command by name with no arguments, as the palette does.
pub fn run_named(app: &mut App, name: &str) -> Result<(), CommandError> {
    let handler = app
        .commands
        .get(name)
        .map(|c| Rc::clone(&c.handler))
        .ok_or_else(|| CommandError::UnknownCommand(name.to_owned()))?;
    handler(app, "")
}

/// Show the palette filtered by the command word in the buffer.
pub fn open_palette(app: &mut App) {
    let entries = app
        .commands
        .commands()
        .iter()
        .map(|c| Entry::new(PickerItem::Command(c.name.clone()), c.name.clone()))
        .collect();
    let permutations: HashMap<String, Vec<String>> =
        app.commands.commands().iter().map(|c| (c.name.clone(), c.permutations.clone())).collect();

    app.picker.hide();
    app.picker.set_entries(entries, 1);
    // Exact spellings like `/q` beat substring hits on the name.
    app.picker.set_on_resort(Box::new(move |entries: &mut Vec<Entry<PickerItem>>, needle: &str| {
        if needle.chars().count() <= 1 {
            return;
        }
        entries.sort_by_key(|e| {
            let PickerItem::Command(name) = &e.item else { return true };
            !permutations.get(name).is_some_and(|p| p.iter().any(|p| p.starts_with(needle)))
        });
    }));
    app.picker_kind = PickerKind::Palette;
    app.picker.show(Box::new(|app: &mut App, item| {
        if let PickerItem::Command(name) = item {
            let result = run_named(app, &name);
            app.report(result);
        }
    }));
}

fn builtins() -> Vec<Command> {
    vec![
        Command::new("quit", "Exit slick", None, &["/quit", "/q", ":q", ":quit"], |app, _| {
            app.should_quit = true;
            Ok(())
        }),
        Command::new(
            "pick",
            "Pick a channel",
            Some("[filter]"),
            &["/pick", "/p", ":p", ":pick"],
            |app, args| {
                app.open_channel_picker(Some(args));
                Ok(())
            },
        ),
        Command::new("me", "Send an action", Some("<action>"), &["/me"], |app, args| {
            if args.is_empty() {
                return Err(CommandError::Usage("/me <action>".to_owned()));
            }
            app.active_connection()?.send_message(&format!("_{args}_"))
        }),
        Command::new("help", "List commands", None, &["/help", ":h", "/?"], |app, _| {
            let parts = help_parts(app);
            app.notice(parts);
            Ok(())
        }),
        Command::new("clear", "Clear this channel's view", None, &["/clear", ":clear"], |app, _| {
            app.active_connection_mut()?.clear_history();
            app.cursor.reset();
            Ok(())
        }),
    ]
}

fn help_parts(app: &App) -> Vec<PrintablePart> {
    let mut parts = vec![PrintablePart::new(PartKind::Bold, "Commands"), PrintablePart::newline()];
    for command in app.commands.commands() {
        parts.push(PrintablePart::new(PartKind::Code, command.permutations.join(" ")));
        let mut line = String::new();
        if let Some(hint) = &command.argument_hint {
            line.push(' ');
            line.push_str(hint);
        }
        line.push_str("  ");
        line.push_str(&command.description);
        parts.push(PrintablePart::plain(line));
        parts.push(PrintablePart::newline());
    }
    parts.pop();
    parts
}
