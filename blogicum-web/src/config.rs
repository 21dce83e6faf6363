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
use blogicum_core::pagination::DEFAULT_PAGE_SIZE;
use blogicum_core::models::session::DEFAULT_SESSION_HOURS;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub templates_dir: String,
    pub uploads_dir: String,
    pub development_mode: bool,
    pub page_size: u32,
    pub session_hours: i64,
    pub max_upload_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Default templates directory relative to the workspace root
        let project_root = Self::find_project_root()?;
        let default_templates_dir = project_root.join("templates").to_string_lossy().to_string();

        let default_uploads_dir = env::var("HOME")
            .map(|home| PathBuf::from(home).join(".blogicum").join("uploads"))
            .unwrap_or_else(|_| PathBuf::from("/var/blogicum/uploads"))
            .to_string_lossy()
            .to_string();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:blogicum.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
            templates_dir: env::var("TEMPLATES_DIR").unwrap_or(default_templates_dir),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or(default_uploads_dir),
            development_mode: env::var("DEVELOPMENT_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            session_hours: env::var("SESSION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_HOURS),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB default
                .parse()
                .unwrap_or(10_485_760),
        })
    }

    /// Find the project root by looking for the workspace Cargo.toml
    fn find_project_root() -> Result<PathBuf> {
        let mut current_dir = env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                let content = std::fs::read_to_string(&cargo_toml)?;
                if content.contains("[workspace]") {
                    return Ok(current_dir);
                }
            }

            if !current_dir.pop() {
                break;
            }
        }

        env::current_dir().context("Failed to determine project root")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
