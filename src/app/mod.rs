pub mod commands;
pub mod models;
pub mod printer;

use crate::core::bootstrap::Prepared;
use crate::core::registry::Registry;
use crate::domain::ports::{Command, CommandContext};
use crate::utils::error::Result;
use commands::CommandTable;
use printer::Printer;

/// Resolves a command and runs it against a prepared store.
#[derive(Debug)]
pub struct App {
    prepared: Prepared,
    commands: CommandTable,
    printer: Printer,
}

impl App {
    pub fn new(prepared: Prepared, printer: Printer) -> Self {
        Self {
            prepared,
            commands: CommandTable::builtin(),
            printer,
        }
    }

    pub fn register(&mut self, command: Box<dyn Command>) {
        self.commands.register(command);
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn prepared(&self) -> &Prepared {
        &self.prepared
    }

    pub fn run(&mut self, name: &str) -> Result<()> {
        let command = self.commands.resolve(name)?;
        tracing::info!("▶️ Running command {}", name);

        // 只有需要框架的指令才載入完整服務
        let mut registry = if command.requires_framework() {
            self.prepared.load()?.into_registry()
        } else {
            Registry::new()
        };

        let mut ctx = CommandContext {
            registry: &mut registry,
            printer: &mut self.printer,
            catalog: &self.commands,
        };
        command.handle(&mut ctx)?;

        tracing::info!("✅ Command {} finished", name);
        Ok(())
    }
}
