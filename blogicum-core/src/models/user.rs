use anyhow::Result;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Allow single char before @ but disallow leading/trailing dots
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
    )
    .expect("Failed to compile email regex")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("Failed to compile username regex"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hash-free projection of a user, safe to hand to templates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
}

impl User {
    /// Create a new user with a hashed password
    pub fn new(email: String, username: String, password: &str) -> Result<Self> {
        Self::validate_email(&email).map_err(|e| anyhow::anyhow!("Invalid email: {}", e))?;
        Self::validate_username(&username)
            .map_err(|e| anyhow::anyhow!("Invalid username: {}", e))?;

        let password_hash = Self::hash_password(password)?;
        let now = Utc::now();

        Ok(Self {
            id: None,
            email,
            username,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_active: true,
            is_staff: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        use argon2::password_hash::rand_core::OsRng;

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Set a new password for the user
    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.password_hash = Self::hash_password(password)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Verify a password against the stored hash
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> Result<(), String> {
        if email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        if email.len() > 255 {
            return Err("Email cannot exceed 255 characters".to_string());
        }

        if !EMAIL_REGEX.is_match(email) {
            return Err("Invalid email format".to_string());
        }

        Ok(())
    }

    /// Validate username format
    pub fn validate_username(username: &str) -> Result<(), String> {
        if username.is_empty() {
            return Err("Username cannot be empty".to_string());
        }

        if username.len() < 3 {
            return Err("Username must be at least 3 characters".to_string());
        }

        if username.len() > 50 {
            return Err("Username cannot exceed 50 characters".to_string());
        }

        if !USERNAME_REGEX.is_match(username) {
            return Err(
                "Username must start with a letter and contain only letters, numbers, underscores, and hyphens"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Validate all user fields
    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_email(&self.email)?;
        Self::validate_username(&self.username)?;

        if self.password_hash.is_empty() {
            return Err("Password hash cannot be empty".to_string());
        }

        Ok(())
    }

    /// Full name if set, otherwise the username
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Projection for template contexts, without the password hash
    pub fn profile(&self) -> Option<UserProfile> {
        Some(UserProfile {
            id: self.id?,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            is_staff: self.is_staff,
        })
    }
}
