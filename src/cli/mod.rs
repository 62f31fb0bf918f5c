//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::{Context, Result};

pub use commands::CommandContext;
pub use types::{Cli, Commands};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Resolve the workspace root and load its configuration.
pub fn load_context(cli: &Cli) -> Result<CommandContext> {
    let root = if cli.root.is_absolute() {
        cli.root.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&cli.root)
    };
    anyhow::ensure!(
        root.is_dir(),
        "Workspace root {} is not a directory",
        root.display()
    );

    let config: Config = ConfigLoader::load(&root, cli.config.as_deref())?;
    Ok(CommandContext {
        root,
        config,
        json: cli.json,
    })
}

/// Run the selected command; `Ok(false)` means the quality gate failed.
pub async fn dispatch(command: Commands, ctx: &CommandContext) -> Result<bool> {
    match command {
        Commands::Analyze(args) => commands::analyze::execute(args, ctx).await,
        Commands::Gate(args) => commands::gate::execute(args, ctx).await,
        Commands::Discover(args) => commands::discover::execute(args, ctx),
        Commands::Report => commands::report::execute(ctx),
        Commands::Clean => commands::clean::execute(ctx),
    }
}

/// Print an error (with its cause chain) and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", console::style("error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1)
}

