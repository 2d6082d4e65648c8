//! Gothic Shop CLI - database migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! shop-cli migrate
//!
//! # Create an admin account (password from --password or SHOP_ADMIN_PASSWORD)
//! shop-cli admin create -u keeper
//!
//! # Replace an admin's password
//! shop-cli admin reset-password -u keeper --password 'new secret'
//!
//! # Hide a product from the storefront
//! shop-cli product set-stock 12 --in-stock false
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` / `admin reset-password` - Manage admin accounts
//! - `product set-stock` - Toggle product availability

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Gothic Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (defaults to `SHOP_ADMIN_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Replace an admin user's password
    ResetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password (defaults to `SHOP_ADMIN_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Mark a product as in or out of stock
    SetStock {
        /// Product ID
        id: i64,

        /// New availability
        #[arg(long, action = clap::ArgAction::Set)]
        in_stock: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create_user(&username, password).await?;
            }
            AdminAction::ResetPassword { username, password } => {
                commands::admin::reset_password(&username, password).await?;
            }
        },
        Commands::Product { action } => match action {
            ProductAction::SetStock { id, in_stock } => {
                commands::product::set_stock(id, in_stock).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_stock() {
        let cli = Cli::try_parse_from(["shop-cli", "product", "set-stock", "12", "--in-stock", "false"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Product {
                action: ProductAction::SetStock { id: 12, in_stock: false }
            })
        ));
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from(["shop-cli", "admin", "create", "-u", "keeper"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { password: None, .. }
            })
        ));
    }
}
