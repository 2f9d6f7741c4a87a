use cart_cli::utils::logger;
use cart_cli::{App, Bootstrap, CliArgs, Printer};
use clap::Parser;

fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting cart CLI");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let result = Bootstrap::new(&args.base_dir)
        .prepare()
        .and_then(|prepared| App::new(prepared, Printer::stdout(args.format)).run(args.command_name()));

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}
