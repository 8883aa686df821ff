// ABOUTME: Foodlab CLI - schema setup, recipe composition, NDB lookups, and nutrition reports
// ABOUTME: Prints JSON results on stdout; logs and prompts go to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors
//!
//! Usage:
//! ```bash
//! # Apply the graph schema to Dgraph
//! foodlab schema
//!
//! # Compose a recipe interactively
//! foodlab compose
//!
//! # Search NDB foods and fetch a report
//! foodlab ndb search --query potato --limit 20
//! foodlab ndb report --ndbno 11352
//!
//! # Find recipes and compute their nutrition
//! foodlab recipe search --query soup
//! foodlab recipe nutrition --name "Mashed Potatoes" --strict
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use foodlab::config::FoodlabConfig;
use foodlab::graph::CallContext;
use foodlab::logging::LoggingConfig;
use foodlab_ndb::http_client::PoolSettings;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(
    name = "foodlab",
    version,
    about = "Recipe graph and nutrition CLI",
    long_about = "Stores recipes, foods, and nutrients in Dgraph, looks foods up in the USDA NDB API, and reports recipe nutrition."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Dgraph HTTP endpoint override
    #[arg(long, global = true)]
    dgraph_url: Option<String>,

    /// Use a throwaway in-memory graph store instead of Dgraph
    #[arg(long, global = true)]
    in_memory: bool,

    /// Deadline for the whole command, in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Apply the graph schema
    Schema,

    /// Compose a recipe interactively
    Compose {
        /// Invalid answers tolerated per question
        #[arg(long, default_value = "3")]
        max_attempts: u32,
    },

    /// USDA NDB lookups
    Ndb {
        #[command(subcommand)]
        action: NdbCommand,
    },

    /// Stored recipes
    Recipe {
        #[command(subcommand)]
        action: RecipeCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum NdbCommand {
    /// Search foods by name
    Search {
        /// Search terms
        #[arg(long)]
        query: String,

        /// Hits requested per page (1-1500)
        #[arg(long)]
        page_size: Option<usize>,

        /// Stop after this many hits
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch a food report and show it as a food graph
    Report {
        /// NDB food number
        #[arg(long)]
        ndbno: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum RecipeCommand {
    /// Full-text search over recipe names
    Search {
        /// Search terms
        #[arg(long)]
        query: String,
    },

    /// Aggregate the nutrition of a recipe
    Nutrition {
        /// Exact recipe name
        #[arg(long)]
        name: String,

        /// Fail instead of warning when a nutrient is reported in different units
        #[arg(long)]
        strict: bool,
    },
}

fn call_context(timeout_secs: Option<u64>) -> CallContext {
    let ctx = timeout_secs.map_or_else(CallContext::background, |secs| {
        CallContext::with_timeout(Duration::from_secs(secs))
    });
    let token = ctx.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; cancelling");
            token.cancel();
        }
    });
    ctx
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    LoggingConfig::from_env().with_verbosity(cli.verbose).init()?;

    let mut config = FoodlabConfig::from_env();
    if let Some(url) = cli.dgraph_url {
        config.store.url = url;
    }
    debug!(store = %config.store.url, in_memory = cli.in_memory, "foodlab starting");
    foodlab_ndb::http_client::configure_shared_client(PoolSettings {
        timeout_secs: config.store.timeout_secs,
        connect_timeout_secs: config.store.connect_timeout_secs,
        ..PoolSettings::default()
    });

    let ctx = call_context(cli.timeout_secs);
    let store = helpers::store::open(&config, cli.in_memory)?;

    match cli.command {
        Command::Schema => commands::schema::apply(store.as_ref(), &ctx).await?,
        Command::Compose { max_attempts } => {
            commands::compose::run(&config, store, &ctx, max_attempts).await?;
        }
        Command::Ndb { action } => match action {
            NdbCommand::Search {
                query,
                page_size,
                limit,
            } => commands::ndb::search(&config, &query, page_size, limit).await?,
            NdbCommand::Report { ndbno } => commands::ndb::report(&config, &ndbno).await?,
        },
        Command::Recipe { action } => match action {
            RecipeCommand::Search { query } => {
                commands::recipe::search(store.as_ref(), &ctx, &query).await?;
            }
            RecipeCommand::Nutrition { name, strict } => {
                commands::recipe::nutrition(store.as_ref(), &ctx, &name, strict).await?;
            }
        },
    }

    Ok(())
}
