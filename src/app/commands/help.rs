use crate::domain::ports::{Command, CommandContext};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn directory(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "List available commands"
    }

    fn handle(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let listing = ctx.catalog.listing();
        let width = listing.iter().map(|(token, _)| token.len()).max().unwrap_or(0);

        ctx.printer.display("Available commands:")?;
        for (token, description) in listing {
            ctx.printer
                .display(&format!("  {:<width$}  {}", token, description, width = width))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::CommandTable;
    use crate::app::printer::{OutputFormat, Printer};
    use crate::core::registry::Registry;

    #[test]
    fn test_lists_every_command() {
        let (mut printer, output) = Printer::captured(OutputFormat::Table);
        let mut registry = Registry::new();
        let catalog = CommandTable::builtin();

        HelpCommand
            .handle(&mut CommandContext {
                registry: &mut registry,
                printer: &mut printer,
                catalog: &catalog,
            })
            .unwrap();

        let text = output.contents();
        assert!(text.starts_with("Available commands:\n"));
        assert!(text.contains("  hello         Print a greeting\n"));
        assert!(text.contains("  product_test  List the first products of the store\n"));
    }
}
