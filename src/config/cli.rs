use crate::app::printer::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart")]
#[command(about = "Command shell for the storefront")]
pub struct CliArgs {
    /// Command to run; lists the available commands when omitted
    pub command: Option<String>,

    /// Store root holding .env, system/ and vqmod/
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// How tables are written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn command_name(&self) -> &str {
        self.command.as_deref().unwrap_or("help")
    }
}
