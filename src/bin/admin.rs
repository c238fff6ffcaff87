//! CLI administration tool for pantry-api.
//!
//! Manages user accounts, shows row counts and runs database diagnostics
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --admin
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Disable or re-enable an account
//! cargo run --bin admin -- user deactivate lucia@example.com
//! cargo run --bin admin -- user activate lucia@example.com
//!
//! # Grant the admin role
//! cargo run --bin admin -- user promote lucia@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use pantry_api::domain::entities::{NewUser, Role};
use pantry_api::domain::repositories::UserRepository;
use pantry_api::infrastructure::persistence::PgUserRepository;
use pantry_api::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 6;

/// CLI tool for managing pantry-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show row counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Create a user
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Give the user the admin role
        #[arg(long)]
        admin: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Allow a user to sign in again
    Activate { email: String },

    /// Block a user from signing in
    Deactivate { email: String },

    /// Grant the admin role
    Promote { email: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::List => list_users(&repo).await,
        UserAction::Create {
            name,
            email,
            admin,
            yes,
        } => create_user(&repo, name, email, admin, yes).await,
        UserAction::Activate { email } => set_active(&repo, &email, true).await,
        UserAction::Deactivate { email } => set_active(&repo, &email, false).await,
        UserAction::Promote { email } => promote(&repo, &email).await,
    }
}

/// Creates a user with interactive prompts for anything not given as a flag.
///
/// The password is always read from the terminal so it never lands in shell history.
async fn create_user(
    repo: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    admin: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    let email: String = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_lowercase();

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .validate_with(|input: &String| -> Result<(), String> {
            if input.len() >= MIN_PASSWORD_LEN {
                Ok(())
            } else {
                Err(format!("Use at least {MIN_PASSWORD_LEN} characters"))
            }
        })
        .interact()?;

    let role = if admin { Role::Admin } else { Role::User };

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!("  Role:  {}", role.as_str().bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(NewUser {
            name,
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id
    );
    println!();

    Ok(())
}

/// Lists all users with role and status.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   ID  Email                          Role   Last login        Status
///   ──────────────────────────────────────────────────────────────────────────
///   1   lucia@example.com              admin  2026-03-10 09:12  ACTIVE
/// ```
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<6} {:<17} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Last login".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        let status = if user.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        };
        let last_login = user
            .last_login_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<30} {:<6} {:<17} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.role.as_str(),
            last_login.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn set_active(repo: &PgUserRepository, email: &str, active: bool) -> Result<()> {
    if !active {
        let confirmed = Confirm::new()
            .with_prompt(format!("Deactivate {email}? Their tokens stop working immediately"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let updated = repo
        .set_active(email, active)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if !updated {
        anyhow::bail!("User not found: {email}");
    }

    let verb = if active { "activated" } else { "deactivated" };
    println!("{}", format!("✅ User {email} {verb}").green().bold());
    Ok(())
}

async fn promote(repo: &PgUserRepository, email: &str) -> Result<()> {
    let updated = repo
        .set_role(email, Role::Admin)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if !updated {
        anyhow::bail!("User not found: {email}");
    }

    println!("{}", format!("✅ {email} is now an admin").green().bold());
    Ok(())
}

/// Displays row counts for the main tables.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = [
        ("Users", "SELECT COUNT(*) FROM users"),
        ("Inventory items", "SELECT COUNT(*) FROM inventory"),
        (
            "  of which active",
            "SELECT COUNT(*) FROM inventory WHERE NOT is_finished",
        ),
        ("Recipes", "SELECT COUNT(*) FROM recipes"),
        ("Shopping lists", "SELECT COUNT(*) FROM shopping_lists"),
        ("List items", "SELECT COUNT(*) FROM shopping_list_items"),
    ];

    for (label, sql) in counts {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        println!(
            "  {:<18} {}",
            format!("{label}:"),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
