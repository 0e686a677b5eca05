//! Folio CLI - Command line storefront for the Folio bookstore.
//!
//! Commands:
//! - `folio auth` - Log in and manage the bearer token
//! - `folio books` - Browse the catalogue
//! - `folio cart` - Show and edit the cart
//! - `folio orders` - List past orders
//! - `folio promo` - Validate promo codes
//! - `folio checkout` - Place an order by card, wallet, or cash on delivery
//! - `folio config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AuthArgs, BooksArgs, CartArgs, CheckoutArgs, ConfigArgs, OrdersArgs, PromoArgs,
};

/// Folio CLI - Shop the Folio bookstore from the terminal
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment section of the config file to use
    #[arg(short, long, global = true, env = "FOLIO_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and manage the bearer token
    Auth(AuthArgs),

    /// Browse the catalogue
    Books(BooksArgs),

    /// Show and edit the cart
    Cart(CartArgs),

    /// List past orders
    Orders(OrdersArgs),

    /// Validate promo codes
    Promo(PromoArgs),

    /// Place an order
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Route library logs to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = result {
        eprintln!("failed to initialise logging: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output)?;
    ctx.output
        .debug(&format!("Using backend {}", ctx.config.api.base_url));

    // Execute command
    let result = match cli.command {
        Commands::Auth(args) => commands::auth::run(args, &ctx).await,
        Commands::Books(args) => commands::books::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Promo(args) => commands::promo::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::{AuthCommand, BooksCommand, CartCommand};
    use folio_commerce::prelude::BookId;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("folio").chain(args.iter().copied()))
    }

    #[test]
    fn test_cart_add_defaults_to_one_copy() {
        let cli = parse(&["cart", "add", "42"]).unwrap();
        match cli.command {
            Commands::Cart(CartArgs {
                command: Some(CartCommand::Add { book, quantity }),
            }) => {
                assert_eq!(book, BookId::new(42));
                assert_eq!(quantity, 1);
            }
            _ => panic!("expected cart add"),
        }
    }

    #[test]
    fn test_cart_quantities_must_be_positive() {
        assert!(parse(&["cart", "add", "42", "--quantity", "0"]).is_err());
        assert!(parse(&["cart", "update", "42", "0"]).is_err());
        assert!(parse(&["cart", "remove", "not-a-number"]).is_err());
    }

    #[test]
    fn test_books_list_filters() {
        let cli = parse(&["books", "list", "--search", "dune", "--genre", "Sci-Fi"]).unwrap();
        match cli.command {
            Commands::Books(BooksArgs {
                command: Some(BooksCommand::List(filter)),
                ..
            }) => {
                assert_eq!(
                    filter.query().params(),
                    vec![
                        ("category", "Sci-Fi".to_string()),
                        ("search", "dune".to_string()),
                    ]
                );
            }
            _ => panic!("expected books list"),
        }
    }

    #[test]
    fn test_auth_login_takes_username() {
        let cli = parse(&["auth", "login", "--username", "ada"]).unwrap();
        match cli.command {
            Commands::Auth(AuthArgs {
                command: AuthCommand::Login { username, .. },
            }) => assert_eq!(username.as_deref(), Some("ada")),
            _ => panic!("expected auth login"),
        }
    }
}
