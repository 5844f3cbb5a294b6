//! PingCrystal - terminal latency widget
//!
//! Pings a host once per cycle and shows the round-trip time, optionally
//! tinted from white toward blue as latency grows.

use clap::Parser;
use ping_crystal::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
};
use std::{error::Error, process};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let app = App::new(cli)?;
    app.run().await?;
    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (see --help for variable names)");
            eprintln!("  - The target must be a literal IPv4 or IPv6 address");
            eprintln!("  - Timeout and interval are positive millisecond values");
        }
        AppError::Probe(_) => {
            eprintln!();
            eprintln!("ICMP socket help:");
            eprintln!("  - On Linux, allow unprivileged ping: sysctl net.ipv4.ping_group_range=\"0 2147483647\"");
            eprintln!("  - Or grant the binary CAP_NET_RAW: setcap cap_net_raw+ep pingcrystal");
        }
        AppError::Network(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Try a different target with --target");
        }
        _ => {}
    }
}
