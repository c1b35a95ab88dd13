use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;

use agentdesk_agents::AgentStorage;
use agentdesk_cli::{init_tracing, run_server, Config};
use agentdesk_security::{NewUser, Role, UserStorage};

#[derive(Parser)]
#[command(name = "agentdesk")]
#[command(about = "Agentdesk - multi-tenant AI agent dashboard server")]
#[command(version)]
struct Cli {
    /// Database file (overrides AGENTDESK_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides AGENTDESK_API_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the database and apply pending migrations
    Migrate,
    /// Insert or refresh the bundled default agents
    Seed,
    /// Manage users
    #[command(subcommand)]
    Users(UsersCommands),
}

#[derive(Subcommand)]
enum UsersCommands {
    /// Create a user
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// User, Subscriber, or Admin
        #[arg(long, default_value = "User")]
        role: Role,
    },
    /// List all users
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            println!(
                "{} Starting Agentdesk on http://{}",
                "→".cyan(),
                config.socket_addr()
            );
            run_server(config).await
        }
        Commands::Migrate => {
            agentdesk_storage::init_pool(&config.database_path).await?;
            println!(
                "{} Database ready at {}",
                "✓".green(),
                config.database_path.display()
            );
            Ok(())
        }
        Commands::Seed => {
            let pool = agentdesk_storage::init_pool(&config.database_path).await?;
            let count = AgentStorage::new(pool).seed_default_agents().await?;
            println!("{} Seeded {} agents", "✓".green(), count);
            Ok(())
        }
        Commands::Users(UsersCommands::Add { email, name, role }) => {
            let pool = agentdesk_storage::init_pool(&config.database_path).await?;
            let user = UserStorage::new(pool)
                .create_user(NewUser { email, name, role })
                .await?;
            println!(
                "{} Created {} {} (id {})",
                "✓".green(),
                user.role,
                user.email.bold(),
                user.id
            );
            Ok(())
        }
        Commands::Users(UsersCommands::List) => {
            let pool = agentdesk_storage::init_pool(&config.database_path).await?;
            let users = UserStorage::new(pool).list_users().await?;
            if users.is_empty() {
                println!("{}", "No users found".yellow());
            }
            for user in users {
                println!("{:>5}  {:<10}  {}  ({})", user.id, user.role, user.email, user.name);
            }
            Ok(())
        }
    }
}
