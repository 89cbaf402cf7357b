//! CLI module for the event recommender.
//!
//! Subcommands:
//! - `serve`: Load or train the model and serve the HTTP API
//! - `train`: Train the model once and write the model file

mod serve;
mod train;

use clap::{Parser, Subcommand};

/// Event recommender - nearest-neighbour recommendations over registrations
#[derive(Parser)]
#[command(name = "event-recommender")]
#[command(about = "Event recommendation service over user registrations")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the recommendation API over HTTP
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "5003")]
        port: u16,
    },

    /// Train the model from the store and write the model file
    Train,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Serve { ref host, port } => self.run_serve(host, port).await,
            Command::Train => self.run_train().await,
        }
    }
}
