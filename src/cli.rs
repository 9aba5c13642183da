use clap::{Parser, Subcommand};

/// shopluxe: command-line storefront client.
#[derive(Parser, Debug)]
#[command(name = "shopluxe", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Backend base URL (overrides SHOPLUXE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Render catalog failures as an error instead of an empty listing
    #[arg(long, global = true)]
    pub surface_errors: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the backend is reachable
    Ping,

    /// List product categories
    Categories(ListArgs),

    /// List products in a category
    Products(ProductsArgs),

    /// Show a single product
    Product(ProductArgs),

    /// Create an account; a verification code is emailed
    Signup(SignupArgs),

    /// Confirm an account with the emailed code
    Verify(VerifyArgs),

    /// Log in and store the session token
    Login(CredentialsArgs),

    /// Drop the stored session token
    Logout,

    /// Show whether a session is stored
    Status,

    /// Buy a product with a card
    Order(OrderArgs),

    /// Affiliate program
    #[command(subcommand)]
    Affiliate(AffiliateCommand),

    /// Print the device signal sent with login and signup
    Fingerprint {
        /// Print the raw segments instead of the encoded signal
        #[arg(long)]
        raw: bool,
    },
}

/// Output switch for listing commands.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output as JSON instead of TSV
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ProductsArgs {
    /// Category key (e.g. aesthetic, clothes, social)
    pub category: String,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Parser, Debug)]
pub struct ProductArgs {
    /// Product id (e.g. aes_001)
    pub id: String,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Parser, Debug)]
pub struct CredentialsArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "SHOPLUXE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser, Debug)]
pub struct SignupArgs {
    #[command(flatten)]
    pub credentials: CredentialsArgs,

    /// Wait for the emailed code on stdin and verify right away
    #[arg(long)]
    pub wait_for_code: bool,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Code from the verification email
    #[arg(long)]
    pub code: String,
}

#[derive(Parser, Debug)]
pub struct OrderArgs {
    /// Product id
    pub product_id: String,

    /// Card number
    #[arg(long, env = "SHOPLUXE_CARD_NUMBER", hide_env_values = true)]
    pub card_number: String,

    /// Expiry month (MM)
    #[arg(long)]
    pub expiry_month: String,

    /// Expiry year (YY)
    #[arg(long)]
    pub expiry_year: String,

    /// Card security code
    #[arg(long, env = "SHOPLUXE_CARD_CVV", hide_env_values = true)]
    pub cvv: String,

    /// Name on the card
    #[arg(long)]
    pub cardholder_name: String,

    /// Ask the backend not to keep the card on file
    #[arg(long)]
    pub no_save_card: bool,

    /// Referral code credited with the sale
    #[arg(long)]
    pub affiliate_code: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AffiliateCommand {
    /// Join the affiliate program
    Join {
        /// Contact email
        #[arg(long)]
        email: String,

        /// PayPal email for payouts
        #[arg(long)]
        paypal_email: String,
    },

    /// Show clicks, sales and commission for an affiliate code
    Dashboard {
        /// Affiliate code (e.g. LUX1234)
        code: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Print the program terms
    Terms,
}
