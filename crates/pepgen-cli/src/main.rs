//! Operational CLI for pepgen deployments: inspect the generation schedule
//! and provision API tokens/roles for manual triggers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "pepgen-cli")]
#[command(about = "pepgen operational command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the current generation schedule.
    Schedule,
    /// Store an API token for a user (hashed with the deployment salt).
    TokenAdd {
        #[arg(long)]
        user: Uuid,
        /// The raw bearer token value to register.
        #[arg(long)]
        token: String,
        #[arg(long)]
        label: Option<String>,
    },
    /// Grant a role to a user (e.g. `admin` for manual generation).
    RoleGrant {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = pepgen_core::load_app_config().context("loading configuration")?;
    let pool = pepgen_db::connect_pool(
        &config.database_url,
        pepgen_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("connecting to database")?;

    match cli.command {
        Commands::Schedule => {
            match pepgen_db::load_schedule(&pool).await? {
                None => println!("no generation schedule configured"),
                Some(schedule) => {
                    println!("id:                 {}", schedule.id);
                    println!("active:             {}", schedule.active);
                    println!("frequency:          {}", schedule.frequency.as_str());
                    println!(
                        "day_of_week:        {}",
                        schedule
                            .day_of_week
                            .map_or_else(|| "-".to_string(), |d| d.to_string())
                    );
                    println!("time_of_day (UTC):  {}", schedule.time_of_day);
                    println!("target_length:      {}", schedule.target_length.as_str());
                    println!(
                        "last_run_at:        {}",
                        schedule
                            .last_run_at
                            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339())
                    );
                    println!(
                        "next_run_at:        {}",
                        schedule
                            .next_run_at
                            .map_or_else(|| "unset".to_string(), |t| t.to_rfc3339())
                    );
                }
            }
        }
        Commands::TokenAdd { user, token, label } => {
            let hash = pepgen_db::hash_token(&config.api_token_hash_salt, &token);
            pepgen_db::insert_api_token(&pool, &hash, user, label.as_deref())
                .await
                .context("storing token")?;
            println!("token stored for user {user}");
        }
        Commands::RoleGrant { user, role } => {
            pepgen_db::grant_role(&pool, user, &role)
                .await
                .context("granting role")?;
            println!("granted role '{role}' to user {user}");
        }
    }

    Ok(())
}
