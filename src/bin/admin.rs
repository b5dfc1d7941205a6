//! CLI administration tool for qwiklink.
//!
//! Manages users and API tokens, shows statistics and checks the database
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user, then issue a token for them
//! cargo run --bin admin -- user create --name alice --email alice@example.com
//! cargo run --bin admin -- token create --user alice --name "alice laptop"
//!
//! # List tokens, revoke one by name or ID
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "alice laptop"
//!
//! # Statistics and database checks
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`); must match the server

use qwiklink::application::services::{AuthService, UserService};
use qwiklink::config::{Config, mask_connection_string};
use qwiklink::domain::entities::{NewUser, Role};
use qwiklink::domain::repositories::{TokenRepository, UserRepository};
use qwiklink::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing qwiklink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        /// User name (3-30 characters: letters, digits, '_', '.', '-')
        #[arg(short, long)]
        name: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Grant the ADMIN role in addition to USER
        #[arg(long)]
        admin: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token for a user
    Create {
        /// Owning user name
        #[arg(short, long)]
        user: Option<String>,

        /// Token name (e.g., "CI", "alice laptop")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
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

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::Create { name, email, admin } => {
            create_user(&UserService::new(repo), name, email, admin).await
        }
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a user after validating name and email.
async fn create_user(
    users: &UserService<PgUserRepository>,
    name: Option<String>,
    email: Option<String>,
    admin: bool,
) -> Result<()> {
    println!("{}", "Create user".bright_blue().bold());
    println!();

    let user_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("User name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let mut roles = vec![Role::User];
    if admin {
        roles.push(Role::Admin);
    }

    let new_user = NewUser {
        user_name,
        email,
        roles,
    };
    let user = users
        .register(new_user)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!(
        "{} {} (id {}, roles {})",
        "Created user".green().bold(),
        user.user_name.cyan(),
        user.id,
        user.roles.join(",")
    );
    println!();
    println!(
        "  Issue a token with: {} admin -- token create --user {}",
        "cargo run --bin".bright_cyan(),
        user.user_name
    );

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<32} {:<12}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Roles".bright_white().bold()
    );
    println!("  {}", "-".repeat(80).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<30} {:<32} {}",
            user.id.to_string().bright_black(),
            user.user_name.cyan(),
            user.email,
            user.roles.join(",")
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let repo = Arc::new(PgTokenRepository::new(pool.clone()));

    match action {
        TokenAction::Create {
            user,
            name,
            token,
            yes,
        } => {
            let users = UserService::new(Arc::new(PgUserRepository::new(pool)));
            create_token(&users, repo, user, name, token, yes).await
        }
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await,
    }
}

/// Issues a token for an existing user.
///
/// Only the HMAC of the token is stored; the raw value is shown once.
async fn create_token(
    users: &UserService<PgUserRepository>,
    repo: Arc<PgTokenRepository>,
    user: Option<String>,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API token".bright_blue().bold());
    println!();

    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
    if signing_secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    let user_name = match user {
        Some(u) => u,
        None => Input::new().with_prompt("User name").interact_text()?,
    };
    let owner = users
        .find_by_name(&user_name)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text(format!("{} token", owner.user_name))
            .interact_text()?,
    };

    if token.is_some() {
        println!("{}", "Using provided token value".yellow());
    }

    println!("  User:  {}", owner.user_name.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let auth = AuthService::new(repo, signing_secret);
    let (raw, _) = auth
        .issue_token(owner.id, &token_name, token)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "Token created.".green().bold());
    println!("  Token: {}", raw.bright_yellow().bold());
    println!(
        "{}",
        "Save this token now. It cannot be shown again.".red().bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" -H 'Content-Type: application/json' \\",
        raw.bright_yellow()
    );
    println!("       -d '{{\"actual_url\": \"https://example.com\"}}' http://localhost:3000/api/links");
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "API tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<30} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(90).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<6} {:<30} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.user_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by name or numeric ID after confirmation.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    println!("{}", "Revoke API token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

/// Shows mapping, user and active-token counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_mapping")
        .fetch_one(pool)
        .await?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Users:         {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", applied);
            println!();
        }
    }

    Ok(())
}
