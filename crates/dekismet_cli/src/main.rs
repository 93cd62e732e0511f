use clap::{CommandFactory, Parser};
use dekismet_lib::{RenderOptions, ScriptDump};
use tracing::debug;

use crate::cli::{Cli, TopLevel};

mod cli;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(TopLevel::Render {
            path,
            function,
            qualify_instance_members,
        }) => {
            let options = RenderOptions {
                qualify_instance_members,
            };
            let dump = match ScriptDump::load(&path) {
                Ok(dump) => dump,
                Err(e) => {
                    eprintln!("failed to load {path:?}: {e}");
                    std::process::exit(1);
                }
            };
            debug!(path = %path.display(), "loaded script dump");
            match function {
                Some(name) => match dump.render_function(&name, options) {
                    Ok(out) => print!("{out}"),
                    Err(e) => {
                        eprintln!("render error: {e}");
                        std::process::exit(1);
                    }
                },
                None => print!("{}", dump.render(options)),
            }
        }
        Some(TopLevel::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
        None => {
            Cli::command().print_help().unwrap();
        }
    }
}
