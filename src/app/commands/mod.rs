//! Built-in commands and the table they are resolved from.

pub mod hello;
pub mod help;

use crate::domain::ports::Command;
use crate::utils::error::{CartError, Result};

pub use hello::HelloCommand;
pub use help::HelpCommand;
pub use product_test::ProductTestCommand;

/// Command token for a directory name: `Hello` → `hello`, `product_test` stays.
pub fn command_token(directory: &str) -> String {
    directory.to_lowercase()
}

pub struct CommandTable {
    commands: Vec<(String, Box<dyn Command>)>,
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|(token, _)| token))
            .finish()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(Box::new(HelloCommand));
        table.register(Box::new(HelpCommand));
        table.register(Box::new(ProductTestCommand));
        table
    }

    /// 同名指令會覆蓋先前註冊的
    pub fn register(&mut self, command: Box<dyn Command>) {
        let token = command_token(command.directory());
        self.commands.retain(|(existing, _)| *existing != token);
        self.commands.push((token, command));
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Command> {
        self.commands
            .iter()
            .find(|(token, _)| token == name)
            .map(|(_, command)| command.as_ref())
            .ok_or_else(|| CartError::UnknownCommandError {
                name: name.to_string(),
            })
    }

    /// Tokens and descriptions, sorted by token.
    pub fn listing(&self) -> Vec<(&str, &'static str)> {
        let mut listing: Vec<_> = self
            .commands
            .iter()
            .map(|(token, command)| (token.as_str(), command.description()))
            .collect();
        listing.sort_by_key(|(token, _)| *token);
        listing
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::builtin()
    }
}
