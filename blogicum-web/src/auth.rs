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

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    RequestPartsExt,
};
use axum_extra::extract::CookieJar;
use blogicum_core::models::{session::Session, user::User};
use blogicum_db::repositories::{SessionRepository, UserRepository};

use crate::AppState;

pub const LOGIN_URL: &str = "/auth/login/";
pub const SESSION_COOKIE: &str = "session_id";

/// Current authenticated user, extracted from the session cookie
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

/// Why authentication failed. A missing or dead session sends the browser
/// to the login form, matching how unauthenticated mutations are handled
/// throughout the site; only infrastructure failures surface as errors.
#[derive(Debug)]
pub enum AuthRejection {
    NotLoggedIn,
    Internal(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotLoggedIn => Redirect::to(LOGIN_URL).into_response(),
            Self::Internal(details) => {
                tracing::error!(details = %details, "Authentication lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let jar = parts
            .extract::<CookieJar>()
            .await
            .map_err(|_| AuthRejection::NotLoggedIn)?;
        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AuthRejection::NotLoggedIn)?;

        let session_repo = SessionRepository::new(state.db.clone());
        let session = session_repo
            .find_by_id(&session_id)
            .await
            .map_err(|e| AuthRejection::Internal(format!("{:?}", e)))?
            .ok_or(AuthRejection::NotLoggedIn)?;

        if session.is_expired() {
            return Err(AuthRejection::NotLoggedIn);
        }

        let user_repo = UserRepository::new(state.db.clone());
        let user = user_repo
            .find_by_id(session.user_id)
            .await
            .map_err(|e| AuthRejection::Internal(format!("{:?}", e)))?
            .ok_or(AuthRejection::NotLoggedIn)?;

        if !user.is_active {
            return Err(AuthRejection::NotLoggedIn);
        }

        Ok(CurrentUser { user, session })
    }
}

/// Optional authenticated user, for pages that render either way
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(AuthRejection::NotLoggedIn) => Ok(OptionalUser(None)),
            Err(e) => Err(e),
        }
    }
}

impl OptionalUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().and_then(|current| current.user.id)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|current| &current.user)
    }
}
