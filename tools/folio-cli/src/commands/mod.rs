//! CLI command implementations.

pub mod auth;
pub mod books;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod promo;

use clap::{Args, Subcommand, ValueEnum};
use folio_commerce::prelude::{BookId, BookQuery, PaymentMode};

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Log in with username and password and store the returned token.
    Login {
        /// Username. Prompted for when omitted.
        #[arg(short, long)]
        username: Option<String>,

        /// Password. Prompted for when omitted.
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Store the bearer token used for backend requests.
    SetToken {
        /// Token value.
        token: String,
    },
    /// Forget the stored token.
    Clear,
    /// Show whether a token is stored.
    Status,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart contents and total.
    Show,
    /// Add copies of a book.
    Add {
        /// Book id.
        book: BookId,
        /// Number of copies.
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Set how many copies of a book are in the cart.
    Update {
        /// Book id.
        book: BookId,
        /// New quantity.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove a book from the cart.
    Remove {
        /// Book id.
        book: BookId,
    },
    /// Remove everything from the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the books command.
#[derive(Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: Option<BooksCommand>,

    #[command(flatten)]
    pub filter: BookFilterArgs,
}

#[derive(Subcommand)]
pub enum BooksCommand {
    /// List catalogue books.
    List(BookFilterArgs),
}

/// Catalogue filters.
#[derive(Args, Clone, Default)]
pub struct BookFilterArgs {
    /// Search titles.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Genre.
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Author name.
    #[arg(short, long)]
    pub author: Option<String>,

    /// Publisher name.
    #[arg(short, long)]
    pub publisher: Option<String>,

    /// Show only the first N books.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl BookFilterArgs {
    pub fn query(&self) -> BookQuery {
        let mut query = BookQuery::new();
        if let Some(search) = &self.search {
            query = query.with_search(search.as_str());
        }
        if let Some(genre) = &self.genre {
            query = query.with_category(genre.as_str());
        }
        if let Some(author) = &self.author {
            query = query.with_author(author.as_str());
        }
        if let Some(publisher) = &self.publisher {
            query = query.with_publisher(publisher.as_str());
        }
        query
    }
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,

    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List past orders.
    List,
}

/// Arguments for the promo command.
#[derive(Args)]
pub struct PromoArgs {
    #[command(subcommand)]
    pub command: PromoCommand,
}

#[derive(Subcommand)]
pub enum PromoCommand {
    /// Check a promo code against the current cart total.
    Validate {
        /// Promo code.
        code: String,
    },
}

/// Payment mode as accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Credit or debit card.
    Card,
    /// Google Pay.
    Wallet,
    /// Cash on delivery.
    Cod,
}

impl From<ModeArg> for PaymentMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Card => PaymentMode::Card,
            ModeArg::Wallet => PaymentMode::Wallet,
            ModeArg::Cod => PaymentMode::CashOnDelivery,
        }
    }
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Payment mode.
    #[arg(short, long, value_enum, default_value = "card")]
    pub mode: ModeArg,

    /// Shipping address. Use `\n` for line breaks.
    #[arg(short, long)]
    pub address: String,

    /// Promo code applied to card payments.
    #[arg(short, long)]
    pub promo: Option<String>,

    /// Skip confirmation prompts.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
