//! AuFS CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aufs_cli::{
    output::{ErrorOutput, OutputFormat, Render},
    run, Cli, CliError,
};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on --verbose flag or RUST_LOG env var
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if cli.verbose || has_rust_log {
        let mut filter = EnvFilter::from_default_env();
        if cli.verbose {
            if let Ok(directive) = "aufs=debug".parse() {
                filter = filter.add_directive(directive);
            }
        }
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    let format: OutputFormat = cli.format.into();
    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            print_error(&e, format);
            std::process::exit(e.exit_code());
        }
    }
}

/// Print a user-friendly error message with error code and recovery hint.
fn print_error(e: &CliError, format: OutputFormat) {
    let code = e.error_code();

    if format == OutputFormat::Json {
        println!("{}", ErrorOutput::new(e.to_string(), code).render(format));
        return;
    }

    // Error line with code
    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        code.to_string().yellow(),
        e
    );

    // Suggestion if available
    if let Some(suggestion) = code.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}
