//! abell-components CLI entry point
//!
//! Renders one Abell component file, resolving every nested component it
//! imports, and prints the HTML, the JSON node tree or an outline.

use abell_components::cli::Cli;
use abell_components::core::ComponentError;
use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        match e.downcast_ref::<ComponentError>() {
            Some(component_error) => {
                eprintln!("{}", component_error.format_with_context().red());
            }
            None => {
                eprintln!("{}: {}", "error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {} {}", "caused by:".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }
}
