use crate::app::commands::CommandTable;
use crate::app::printer::Printer;
use crate::core::registry::Registry;
use crate::utils::error::Result;

/// Everything a command handler may touch during one invocation.
pub struct CommandContext<'a> {
    pub registry: &'a mut Registry,
    pub printer: &'a mut Printer,
    pub catalog: &'a CommandTable,
}

pub trait Command {
    /// Directory name the command token is derived from.
    fn directory(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// When true the full service registry is loaded before `handle` runs.
    fn requires_framework(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut CommandContext<'_>) -> Result<()>;
}
