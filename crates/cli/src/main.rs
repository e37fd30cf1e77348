//! `stockscan` binary entry point.

use std::process::ExitCode;

use clap::Parser;

use stockscan_cli::{Cli, Commands, commands, render_error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    stockscan_observability::init(cli.log_format);
    let config = cli.config();
    tracing::debug!(workstation = %config.workstation, "configuration resolved");

    let result = match cli.command {
        Commands::Export(args) => commands::export::execute(args, &config),
        Commands::Import(args) => commands::import::execute(args, &config),
        Commands::Master(args) => commands::master::execute(args, &config),
        Commands::Report(args) => commands::report::execute(args, &config),
        Commands::AddLocation(args) => commands::location::add(args, &config),
        Commands::Locations(args) => commands::location::list(args, &config),
        Commands::Scan(args) => commands::scan::scan(args, &config),
        Commands::Stock(args) => commands::scan::stock(args, &config),
        Commands::Where(args) => commands::scan::locate(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}
