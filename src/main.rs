//! post-ignorer: manage the list of forum users whose posts are hidden
//!
//! The list is cached locally and, when a Gist id is configured, synced to
//! a shared Gist so every installation sees the same list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use post_ignorer::config::{DEFAULT_API_BASE, DEFAULT_FILE_NAME};
use post_ignorer::logging;

mod commands;

#[derive(Parser)]
#[command(name = "post-ignorer")]
#[command(about = "Ignore-list manager with local cache and Gist sync", long_about = None)]
#[command(version)]
struct Cli {
    /// Local store path (defaults to the platform data directory)
    #[arg(long, global = true, env = "POST_IGNORER_DB")]
    db: Option<PathBuf>,

    /// Gist holding the shared list (local-only when unset)
    #[arg(long, global = true, env = "POST_IGNORER_GIST_ID")]
    gist_id: Option<String>,

    /// File inside the Gist that holds the list
    #[arg(long, global = true, env = "POST_IGNORER_FILE", default_value = DEFAULT_FILE_NAME)]
    file_name: String,

    /// Gist API base URL
    #[arg(long, global = true, env = "POST_IGNORER_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Skip the remote entirely
    #[arg(long, global = true)]
    offline: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ignored users
    List {
        /// Wait for the remote and show the reconciled list
        #[arg(long)]
        sync: bool,
    },

    /// Ignore a user
    Add {
        /// User identifier as it appears on the site
        user: String,
    },

    /// Stop ignoring a user
    Remove {
        /// User identifier as it appears on the site
        user: String,
    },

    /// Tell whether a post by this author would be hidden
    Check {
        /// Post author (omit for posts without one)
        author: Option<String>,

        /// Post is exempt (e.g. first post of a thread)
        #[arg(long)]
        exempt: bool,
    },

    /// Decide visibility for a JSON batch of post records
    Filter {
        /// JSON file with [{"id", "author", "exempt"}] (stdin if omitted)
        input: Option<PathBuf>,

        /// Re-emit decisions if the remote list replaces the local one
        #[arg(long)]
        follow: bool,
    },

    /// Fetch the remote list and adopt it if newer
    Sync,

    /// Overwrite the remote list with the local one
    Push,

    /// Manage the cached Gist credential
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Cache a credential without prompting
    Set { token: String },

    /// Forget the cached credential
    Clear,

    /// Show whether a credential is cached
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let options = commands::Options {
        db: cli.db,
        gist_id: cli.gist_id,
        file_name: cli.file_name,
        api_base: cli.api_base,
        offline: cli.offline,
    };

    match cli.command {
        Commands::List { sync } => {
            let output = commands::list::execute(&options, sync).await?;
            println!("{}", output);
        }

        Commands::Add { user } => {
            commands::ignore::add(&options, &user).await?;
        }

        Commands::Remove { user } => {
            commands::ignore::remove(&options, &user).await?;
        }

        Commands::Check { author, exempt } => {
            let hidden = commands::check::execute(&options, author.as_deref(), exempt)?;
            if hidden {
                println!("{}", "hidden".red());
            } else {
                println!("{}", "visible".green());
            }
        }

        Commands::Filter { input, follow } => {
            commands::filter::execute(&options, input.as_deref(), follow).await?;
        }

        Commands::Sync => {
            commands::sync::sync(&options).await?;
        }

        Commands::Push => {
            commands::sync::push(&options).await?;
        }

        Commands::Token { action } => match action {
            TokenAction::Set { token } => commands::token::set(&options, &token)?,
            TokenAction::Clear => commands::token::clear(&options)?,
            TokenAction::Status => commands::token::status(&options)?,
        },
    }

    Ok(())
}
