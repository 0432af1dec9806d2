//! SkillBridge - Main Entry Point
//!
//! Command-line front end over the client commands. Prints JSON results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use skillbridge_client::{commands, config::Config, logging, AppContext};

#[derive(Parser, Debug)]
#[command(name = "skillbridge")]
#[command(about = "SkillBridge tutoring marketplace client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SKILLBRIDGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// List posted requirements
    Jobs,
    /// Tutor profile wizard data
    TeacherProfile,
    /// Coin balance and pricing plans
    Wallet,
    /// Buy a coin plan with a card payment method
    BuyCoins {
        #[arg(long)]
        plan: i64,
        #[arg(long)]
        payment_method: String,
    },
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Invalid configuration")?;
    logging::init(&config);
    info!("SkillBridge client starting...");

    let ctx = AppContext::create(config).context("Failed to initialize client")?;

    match cli.command {
        Command::Login { email, password } => {
            print(&commands::login(&ctx, &email, &password).await)?;
        }
        Command::Logout => {
            commands::logout(&ctx);
            println!("Logged out");
        }
        Command::Whoami => match commands::get_stored_session(&ctx) {
            Some(session) => print(&session)?,
            None => println!("Not logged in"),
        },
        Command::Jobs => {
            commands::get_stored_session(&ctx);
            print(&commands::dashboard(&ctx).await)?;
        }
        Command::TeacherProfile => {
            commands::get_stored_session(&ctx);
            print(&commands::teacher_profile(&ctx).await)?;
        }
        Command::Wallet => {
            commands::get_stored_session(&ctx);
            print(&commands::wallet_summary(&ctx).await)?;
        }
        Command::BuyCoins {
            plan,
            payment_method,
        } => {
            commands::get_stored_session(&ctx);
            print(&commands::buy_coins(&ctx, plan, &payment_method).await)?;
        }
    }

    if let Some(banner) = ctx.notifications.latest_error() {
        eprintln!("error: {}", banner.message);
    }
    ctx.teardown();
    Ok(())
}
