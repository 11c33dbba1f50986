//! CLI module for the workflow gateway
//!
//! - `serve`: HTTP server
//! - `run`: resolve a single request and print the result

pub mod run;
pub mod serve;

use clap::{Parser, Subcommand};

/// Workflow gateway - replays recorded OpenAPI workflows or plans calls on the fly
#[derive(Parser)]
#[command(name = "workflow-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Resolve one request and print the JSON result
    Run(run::RunArgs),
}
