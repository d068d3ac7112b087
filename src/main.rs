//! envtmpl CLI entry point
//!
//! Parses arguments, renders, and turns any failure into a readable message on
//! stderr with exit status 1.

use clap::Parser;
use envtmpl_cli::cli;
use envtmpl_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
