use std::path::PathBuf;

use clap::{Parser, Subcommand, builder::{Styles, styling::{AnsiColor, Effects}}, crate_description, crate_name, crate_version};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    styles = Styles::styled()
        .header(AnsiColor::BrightGreen.on_default() | Effects::BOLD | Effects::UNDERLINE)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default()))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<TopLevel>,
}

#[derive(Subcommand)]
pub enum TopLevel {
    /// Renders a decoded script dump (JSON) as pseudocode
    Render {
        /// Path to the JSON dump of a class or a single function
        path: PathBuf,

        /// Only render the function with this name
        #[arg(long)]
        function: Option<String>,

        /// Prefix instance-member variables with `this->`
        #[arg(long, default_value_t = false)]
        qualify_instance_members: bool,
    },
    /// Generate shell completion
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}
