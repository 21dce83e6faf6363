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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default session lifetime in hours
pub const DEFAULT_SESSION_HOURS: i64 = 24;

/// A server-side login session. The browser only ever holds the opaque id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with the default expiration
    pub fn new(user_id: i64) -> Self {
        Self::new_with_expiry(user_id, Duration::hours(DEFAULT_SESSION_HOURS))
    }

    /// Create a new session with custom expiration
    pub fn new_with_expiry(user_id: i64, expiry_duration: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + expiry_duration,
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let before = Utc::now();
        let session = Session::new(123);
        let after = Utc::now();

        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.user_id, 123);
        assert!(session.created_at >= before);
        assert!(session.created_at <= after);

        let expected_expiry = session.created_at + Duration::hours(DEFAULT_SESSION_HOURS);
        assert_eq!(session.expires_at, expected_expiry);
    }

    #[test]
    fn test_session_ids_unique() {
        let a = Session::new(1);
        let b = Session::new(1);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_expired() {
        let fresh = Session::new_with_expiry(1, Duration::hours(1));
        assert!(!fresh.is_expired());

        let stale = Session {
            id: Uuid::new_v4().to_string(),
            user_id: 1,
            expires_at: Utc::now() - Duration::hours(1),
            created_at: Utc::now() - Duration::hours(2),
        };
        assert!(stale.is_expired());
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let session = Session::new(42);

        let json = serde_json::to_string(&session).unwrap();
        let deserialized: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(session, deserialized);
    }
}
