//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};

/// WorkshopWise - workshop listings and seat registrations
#[derive(Parser)]
#[command(name = "workshopwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create a default config.toml in the current directory
    Init,

    /// Inspect workshops
    Workshops {
        #[command(subcommand)]
        command: WorkshopCommands,
    },

    /// Inspect and create accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Print platform totals
    Report,
}

#[derive(Subcommand)]
pub enum WorkshopCommands {
    /// List workshops, newest first
    #[command(alias = "ls")]
    List {
        /// Only workshops with this status (active, inactive, completed)
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive match on title or company
        #[arg(long, short)]
        query: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List accounts
    #[command(alias = "ls")]
    List {
        /// Only accounts with this role (user, enterprise, admin)
        #[arg(long)]
        role: Option<String>,
    },

    /// Show one account and its registrations
    Show { username: String },

    /// Create an account
    Add {
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "user")]
        role: String,

        #[arg(long)]
        company: Option<String>,
    },
}

pub use commands::*;
