mod cli;
mod error;
mod output;

use clap::Parser;
use cli::{AffiliateCommand, Cli, Command, CredentialsArgs, OrderArgs};
use error::CliError;
use luxe::config::CATALOG_ERRORS_ENV;
use luxe::{CardInfo, CatalogFailureMode, DeviceSignal, Luxe, LuxeConfig, LuxeError};
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    let _ = dotenvy::dotenv(); // load .env if present

    let cli = Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    if let Err(e) = run(cli, cancel).await {
        if matches!(e, CliError::Luxe(LuxeError::Cancelled) | CliError::Interrupted) {
            info!("interrupted");
        } else {
            tracing::error!(error = %e, "{}", e.display_message());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), CliError> {
    let command = match cli.command {
        // Needs no backend.
        Command::Fingerprint { raw } => {
            let signal = DeviceSignal::default();
            let line = if raw { signal.raw() } else { signal.generate() };
            println!("{line}");
            return Ok(());
        }
        command => command,
    };

    let config = load_config(cli.backend_url, cli.surface_errors)?;
    let luxe = Luxe::new(config)?.with_shutdown(cancel);

    match command {
        Command::Ping => {
            let status = luxe.ping().await?;
            println!("{}", status.message);
        }

        Command::Categories(args) => {
            let view = luxe.catalog().load_categories().await;
            output::write_view(view, &mut std::io::stdout().lock(), |cats, w| {
                output::write_categories(cats, args.json, w)
            })?;
        }

        Command::Products(args) => {
            let view = luxe.catalog().load_products(&args.category).await;
            output::write_view(view, &mut std::io::stdout().lock(), |products, w| {
                output::write_products(products, args.list.json, w)
            })?;
        }

        Command::Product(args) => {
            let product = luxe.catalog().get_product(&args.id).await?;
            output::write_products(
                std::slice::from_ref(&product),
                args.list.json,
                &mut std::io::stdout().lock(),
            )?;
        }

        Command::Signup(args) => {
            signup(&luxe, args.credentials, args.wait_for_code).await?;
        }

        Command::Verify(args) => {
            let auth = luxe.auth_flow();
            auth.resume_verification(args.email)?;
            auth.set_verification_code(args.code);
            auth.submit().await?;
            println!("Email verified; logged in");
        }

        Command::Login(args) => {
            let auth = luxe.auth_flow();
            auth.open();
            auth.toggle_mode();
            auth.set_email(args.email);
            auth.set_password(args.password);
            auth.submit().await?;
            println!("Logged in");
        }

        Command::Logout => {
            luxe.logout()?;
            println!("Logged out");
        }

        Command::Status => {
            output::write_session(&luxe.current_session(), &mut std::io::stdout().lock())?;
        }

        Command::Order(args) => {
            let message = order(&luxe, args).await?;
            println!("{message}");
        }

        Command::Affiliate(AffiliateCommand::Join {
            email,
            paypal_email,
        }) => {
            let flow = luxe.affiliate_flow();
            flow.submit(email, paypal_email).await?;
            if let Some(message) = flow.message() {
                println!("{message}");
            }
        }

        Command::Affiliate(AffiliateCommand::Dashboard { code, list }) => {
            let dash = luxe.affiliate_flow().dashboard(&code).await?;
            output::write_dashboard(&dash, list.json, &mut std::io::stdout().lock())?;
        }

        Command::Affiliate(AffiliateCommand::Terms) => {
            for line in luxe::affiliate::COMMISSION_TERMS {
                println!("{line}");
            }
        }

        Command::Fingerprint { .. } => {}
    }

    Ok(())
}

/// `--backend-url` wins over the environment.
fn load_config(backend_url: Option<String>, surface_errors: bool) -> Result<LuxeConfig, CliError> {
    let mut config = match backend_url {
        Some(url) => {
            let mut config = LuxeConfig::new(url);
            if let Ok(mode) = std::env::var(CATALOG_ERRORS_ENV) {
                config.catalog_failure = mode.parse()?;
            }
            config
        }
        None => LuxeConfig::from_env()?,
    };
    if surface_errors {
        config.catalog_failure = CatalogFailureMode::Surface;
    }
    info!(backend = %config.api_base_url, catalog_failure = ?config.catalog_failure, "config loaded");
    Ok(config)
}

async fn signup(luxe: &Luxe, args: CredentialsArgs, wait_for_code: bool) -> Result<(), CliError> {
    let auth = luxe.auth_flow();
    auth.open();
    auth.set_email(args.email);
    auth.set_password(args.password);
    auth.submit().await?;
    if let Some(message) = auth.snapshot().message {
        println!("{message}");
    }
    if !wait_for_code {
        return Ok(());
    }

    eprint!("verification code: ");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let code = lines.next_line().await?.ok_or(CliError::Interrupted)?;
    auth.set_verification_code(code);
    auth.submit().await?;
    println!("Email verified; logged in");
    Ok(())
}

async fn order(luxe: &Luxe, args: OrderArgs) -> Result<String, CliError> {
    let product = luxe.catalog().get_product(&args.product_id).await?;
    info!(product_id = %product.id, final_price = product.final_price, "ordering");

    let checkout = luxe.checkout(product);
    checkout.set_affiliate_code(args.affiliate_code);
    checkout.set_card(CardInfo {
        card_number: args.card_number,
        expiry_month: args.expiry_month,
        expiry_year: args.expiry_year,
        cvv: args.cvv,
        cardholder_name: args.cardholder_name,
        save_card: !args.no_save_card,
    });

    match checkout.submit_order().await {
        Ok(message) => Ok(message),
        Err(LuxeError::Cancelled) => Err(CliError::Interrupted),
        Err(e) => {
            let shown = checkout
                .snapshot()
                .status
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| e.user_message());
            tracing::debug!(error = %e, "order rejected");
            Err(CliError::Failed(shown))
        }
    }
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
