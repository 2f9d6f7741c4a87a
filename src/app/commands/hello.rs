use crate::domain::ports::{Command, CommandContext};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct HelloCommand;

impl Command for HelloCommand {
    fn directory(&self) -> &'static str {
        "hello"
    }

    fn description(&self) -> &'static str {
        "Print a greeting"
    }

    fn handle(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.printer.display("Hello World!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::CommandTable;
    use crate::app::printer::{OutputFormat, Printer};
    use crate::core::registry::Registry;

    #[test]
    fn test_hello_needs_no_services() {
        let (mut printer, output) = Printer::captured(OutputFormat::Table);
        let mut registry = Registry::new();
        let catalog = CommandTable::builtin();
        let mut ctx = CommandContext {
            registry: &mut registry,
            printer: &mut printer,
            catalog: &catalog,
        };

        HelloCommand.handle(&mut ctx).unwrap();
        assert!(!HelloCommand.requires_framework());
        assert_eq!(output.contents(), "Hello World!\n");
    }
}
