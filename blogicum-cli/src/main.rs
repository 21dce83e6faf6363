// Blogicum - A blog platform built with Rust
// Copyright (C) 2026 Blogicum Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use blogicum_core::models::category::Category;
use blogicum_core::models::user::User;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use blogicum_db::repositories::{CategoryRepository, SessionRepository, UserRepository};

#[derive(Parser)]
#[command(name = "blogicum")]
#[command(about = "Blogicum CLI tool for user and category management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database (create tables)
    Init,

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Session management commands
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        email: String,
        /// Username
        username: String,
        /// Grant the staff flag (may delete any post)
        #[arg(long)]
        staff: bool,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// List all users
    List,

    /// Change a user's password
    Password {
        /// Username or email
        user: String,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Grant or revoke the staff flag
    SetStaff {
        /// Username or email
        user: String,
        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category title
        title: String,
        /// Slug (derived from the title if not given)
        #[arg(long)]
        slug: Option<String>,
        /// Description shown on the category page
        #[arg(long, default_value = "")]
        description: String,
        /// Create the category unpublished
        #[arg(long)]
        hidden: bool,
    },

    /// List all categories
    List,

    /// Publish a category
    Publish {
        /// Category slug
        slug: String,
    },

    /// Unpublish a category, hiding its posts from public listings
    Unpublish {
        /// Category slug
        slug: String,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Delete expired sessions
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:blogicum.db".to_string());

    match cli.command {
        Commands::Init => {
            println!("Initializing database at: {}", database_url);
            let _pool = blogicum_db::init_database(&database_url).await?;
            println!("Database initialized successfully!");
            Ok(())
        }
        Commands::User { command } => {
            let pool = blogicum_db::init_database(&database_url).await?;
            handle_user_command(command, pool).await
        }
        Commands::Category { command } => {
            let pool = blogicum_db::init_database(&database_url).await?;
            handle_category_command(command, pool).await
        }
        Commands::Sessions { command } => {
            let pool = blogicum_db::init_database(&database_url).await?;
            handle_session_command(command, pool).await
        }
    }
}

fn read_password(provided: Option<String>) -> Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => {
            print!("Password: ");
            use std::io::Write;
            std::io::stdout().flush()?;

            rpassword::read_password().context("Failed to read password")
        }
    }
}

async fn find_user(repo: &UserRepository, user: &str) -> Result<User> {
    let found = if user.contains('@') {
        repo.find_by_email(user).await?
    } else {
        repo.find_by_username(user).await?
    };

    found.ok_or_else(|| anyhow::anyhow!("User not found: {}", user))
}

async fn handle_user_command(command: UserCommands, pool: SqlitePool) -> Result<()> {
    let user_repo = UserRepository::new(pool);

    match command {
        UserCommands::Create {
            email,
            username,
            staff,
            password,
        } => {
            println!("Creating user: {} ({})", username, email);

            let password = read_password(password)?;

            let mut user = User::new(email, username, &password)?;
            user.is_staff = staff;

            let user_id = user_repo
                .create(&user)
                .await
                .context("Failed to create user")?;

            println!("User created successfully with ID: {}", user_id);
            if staff {
                println!("User has staff privileges");
            }
            Ok(())
        }

        UserCommands::List => {
            let users = user_repo.list_all().await?;

            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            for user in users {
                let mut flags = Vec::new();
                if user.is_staff {
                    flags.push("staff");
                }
                if !user.is_active {
                    flags.push("inactive");
                }

                let suffix = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                };
                println!("{:>5}  {} <{}>{}", user.id.unwrap_or(0), user.username, user.email, suffix);
            }
            Ok(())
        }

        UserCommands::Password { user, password } => {
            println!("Changing password for {}", user);

            let mut found = find_user(&user_repo, &user).await?;
            let password = read_password(password)?;

            found.set_password(&password)?;
            user_repo.update(&found).await?;

            println!("Password updated successfully!");
            Ok(())
        }

        UserCommands::SetStaff { user, revoke } => {
            let mut found = find_user(&user_repo, &user).await?;

            found.is_staff = !revoke;
            found.updated_at = chrono::Utc::now();
            user_repo.update(&found).await?;

            if revoke {
                println!("Staff flag revoked for {}", found.username);
            } else {
                println!("Staff flag granted to {}", found.username);
            }
            Ok(())
        }
    }
}

async fn handle_category_command(command: CategoryCommands, pool: SqlitePool) -> Result<()> {
    let category_repo = CategoryRepository::new(pool);

    match command {
        CategoryCommands::Create {
            title,
            slug,
            description,
            hidden,
        } => {
            let mut category = Category::new(title, slug);
            category.description = description;
            category.is_published = !hidden;

            let slug = category.slug.clone();
            let category_id = category_repo
                .create(&category)
                .await
                .context("Failed to create category")?;

            println!("Category created with ID {} (slug: {})", category_id, slug);
            Ok(())
        }

        CategoryCommands::List => {
            let categories = category_repo.list_all().await?;

            if categories.is_empty() {
                println!("No categories found.");
                return Ok(());
            }

            for category in categories {
                let marker = if category.is_published { "" } else { " [unpublished]" };
                println!(
                    "{:>5}  {} (slug: {}){}",
                    category.id.unwrap_or(0),
                    category.title,
                    category.slug,
                    marker
                );
            }
            Ok(())
        }

        CategoryCommands::Publish { slug } => {
            if category_repo.set_published(&slug, true).await? {
                println!("Category '{}' published", slug);
                Ok(())
            } else {
                anyhow::bail!("Category not found: {}", slug)
            }
        }

        CategoryCommands::Unpublish { slug } => {
            if category_repo.set_published(&slug, false).await? {
                println!("Category '{}' unpublished", slug);
                Ok(())
            } else {
                anyhow::bail!("Category not found: {}", slug)
            }
        }
    }
}

async fn handle_session_command(command: SessionCommands, pool: SqlitePool) -> Result<()> {
    let session_repo = SessionRepository::new(pool);

    match command {
        SessionCommands::Cleanup => {
            let deleted = session_repo.delete_expired().await?;
            println!("Deleted {} expired session(s)", deleted);
            Ok(())
        }
    }
}
