//! Qualigate CLI entry point.

use clap::Parser;

use qualigate::cli::{dispatch, handle_error, load_context, Cli};
use qualigate::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let ctx = match load_context(&cli) {
        Ok(ctx) => ctx,
        Err(err) => handle_error(&err, json),
    };

    let _logger = match LoggerImpl::init(&ctx.config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, json),
    };

    match dispatch(cli.command, &ctx).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => handle_error(&err, json),
    }
}
