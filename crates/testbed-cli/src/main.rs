use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use testbed_core::types::{EntityId, SaveEntity};

mod client;

use client::ApiClient;

#[derive(Parser)]
#[command(name = "testbed", about = "Testbed CLI - client for the entity API")]
struct Cli {
    /// Testbed server URL
    #[arg(long, env = "TESTBED_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check database connectivity through the server
    Health,

    /// Create a new entity
    Create {
        /// Entity name
        #[arg(long)]
        name: String,

        /// Optional free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// List all entities
    List,

    /// Fetch one entity by id
    Get { id: i64 },

    /// Overwrite an existing entity
    Update {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an entity by id
    Delete { id: i64 },

    /// Search entities by name (case-insensitive substring unless --exact)
    Search {
        name: String,

        #[arg(long)]
        exact: bool,
    },
}

fn entity_params(name: String, description: Option<String>) -> SaveEntity {
    let params = SaveEntity::new(name);
    match description {
        Some(description) => params.with_description(description),
        None => params,
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.url);

    match cli.command {
        Commands::Health => println!("{}", client.health().await?),
        Commands::Create { name, description } => {
            let entity = client.create(&entity_params(name, description)).await?;
            print_json(&entity)?;
        }
        Commands::List => print_json(&client.list().await?)?,
        Commands::Get { id } => print_json(&client.get(EntityId(id)).await?)?,
        Commands::Update {
            id,
            name,
            description,
        } => {
            let entity = client
                .update(EntityId(id), &entity_params(name, description))
                .await?;
            print_json(&entity)?;
        }
        Commands::Delete { id } => println!("{}", client.delete(EntityId(id)).await?),
        Commands::Search { name, exact } => print_json(&client.search(&name, exact).await?)?,
    }

    Ok(())
}
