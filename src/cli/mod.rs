use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::DEFAULT_DATABASE_URL;
use commands::{init_database, serve};

#[derive(Parser)]
#[command(name = "library-api")]
#[command(about = "Library records service: users, authors, books and borrows over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema if missing, then start the web server
    Serve {
        /// Database URL
        ///
        /// For SQLite databases, use:
        ///   - sqlite://relative/path/library.db?mode=rwc (created if missing)
        ///   - sqlite:///absolute/path/library.db?mode=rwc
        #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 127.0.0.1:5000, 0.0.0.0:8080)
        #[arg(short, long, env = "BIND_ADDRESS", default_value = crate::config::DEFAULT_BIND_ADDRESS)]
        bind_address: String,
    },
    /// Initialize the database using migrations
    InitDb {
        /// Database URL
        ///
        /// The parent directory will be created automatically if it doesn't exist.
        #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { database_url, bind_address } => {
                serve(&database_url, &bind_address).await?;
            }
            Commands::InitDb { database_url } => {
                init_database(&database_url).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["library-api", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind_address, .. } => assert!(!bind_address.is_empty()),
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_init_db_with_explicit_url() {
        let cli = Cli::try_parse_from(["library-api", "init-db", "-d", "sqlite::memory:"]).unwrap();
        match cli.command {
            Commands::InitDb { database_url } => assert_eq!(database_url, "sqlite::memory:"),
            _ => panic!("expected init-db command"),
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["library-api"]).is_err());
    }
}
