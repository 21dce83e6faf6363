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
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    auth::OptionalUser,
    error::AppError,
    handlers::{self, base_context, render},
    AppState,
};

pub fn create_router(state: AppState) -> Router {
    let max_upload_size = state.config.max_upload_size;
    let uploads_dir = state.config.uploads_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(health))
        // Listings
        .route("/", get(handlers::index))
        .route("/category/{slug}/", get(handlers::category_posts))
        .route("/profile/{username}/", get(handlers::profile_page))
        // Profile editing
        .route(
            "/edit_profile/",
            get(handlers::edit_profile_form).post(handlers::edit_profile),
        )
        // Posts
        .route(
            "/posts/create/",
            get(handlers::create_post_form).post(handlers::create_post),
        )
        .route("/posts/{post_id}/", get(handlers::post_detail))
        .route(
            "/posts/{post_id}/edit/",
            get(handlers::edit_post_form).post(handlers::edit_post),
        )
        .route(
            "/posts/{post_id}/delete/",
            get(handlers::delete_post_form).post(handlers::delete_post),
        )
        // Comments
        .route(
            "/posts/{post_id}/comment/",
            get(handlers::add_comment_form).post(handlers::add_comment),
        )
        .route(
            "/posts/{post_id}/edit_comment/{comment_id}/",
            get(handlers::edit_comment_form).post(handlers::edit_comment),
        )
        .route(
            "/posts/{post_id}/delete_comment/{comment_id}/",
            get(handlers::delete_comment_form).post(handlers::delete_comment),
        )
        // Authentication
        .route(
            "/auth/login/",
            get(handlers::login_form).post(handlers::login),
        )
        .route(
            "/auth/logout/",
            get(handlers::logout).post(handlers::logout),
        )
        .route(
            "/auth/registration/",
            get(handlers::registration_form).post(handlers::register),
        )
        // Uploaded post images
        .nest_service("/media", ServeDir::new(uploads_dir))
        // Styled 404 page for everything else
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_upload_size))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Response, AppError> {
    let mut context = base_context(viewer.user());
    context.insert("error_title", "Page not found");
    context.insert("error_message", "The page you requested does not exist.");

    let html = render(&state, "error.html", &context)?;

    Ok((StatusCode::NOT_FOUND, html).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LOGIN_URL;
    use crate::test_helpers::{
        create_test_app_state, create_test_category, create_test_post, create_test_user,
    };
    use anyhow::Result;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use blogicum_db::repositories::UserRepository;

    async fn test_server() -> Result<(TestServer, AppState)> {
        let state = create_test_app_state().await?;
        let app = create_router(state.clone());
        let mut server = TestServer::new(app).map_err(|e| anyhow::anyhow!("{e}"))?;
        server.save_cookies();
        Ok((server, state))
    }

    async fn log_in(server: &TestServer, username: &str) {
        let response = server
            .post("/auth/login/")
            .form(&[("username", username), ("password", "password123")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_health_endpoint() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
        response.assert_text("OK");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_renders_empty() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("No posts yet"));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_shows_visible_post() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;
        let category = create_test_category(&state.db, "Travel", true).await?;
        create_test_post(&state.db, author.id.unwrap(), category.id, "Hello world").await?;

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);

        let text = response.text();
        assert!(text.contains("Hello world"));
        assert!(text.contains("/profile/author/"));
        assert!(text.contains("/category/travel/"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/definitely/not/here/").await;
        response.assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_post_is_404() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/posts/42/").await;
        response.assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_post_requires_login() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/posts/create/").await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", LOGIN_URL);

        Ok(())
    }

    #[tokio::test]
    async fn test_comment_post_requires_login() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;
        let post = create_test_post(&state.db, author.id.unwrap(), None, "Post").await?;

        let response = server
            .post(&format!("/posts/{}/comment/", post.id.unwrap()))
            .form(&[("text", "drive-by")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", LOGIN_URL);

        Ok(())
    }

    #[tokio::test]
    async fn test_login_then_create_post_form() -> Result<()> {
        let (server, state) = test_server().await?;
        create_test_user(&state.db, "author", false).await?;

        log_in(&server, "author").await;

        let response = server.get("/posts/create/").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("New post"));

        Ok(())
    }

    #[tokio::test]
    async fn test_logged_in_comment_flow() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;
        create_test_user(&state.db, "reader", false).await?;
        let category = create_test_category(&state.db, "Travel", true).await?;
        let post =
            create_test_post(&state.db, author.id.unwrap(), category.id, "Commented post").await?;
        let detail_url = format!("/posts/{}/", post.id.unwrap());

        log_in(&server, "reader").await;

        let response = server
            .post(&format!("/posts/{}/comment/", post.id.unwrap()))
            .form(&[("text", "First!")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", detail_url.as_str());

        let detail = server.get(&detail_url).await;
        detail.assert_status(StatusCode::OK);
        assert!(detail.text().contains("First!"));

        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_post_404_for_visitor_200_for_author() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;

        let mut draft = blogicum_core::models::post::Post::new(
            "Secret".into(),
            "body".into(),
            author.id.unwrap(),
        );
        draft.is_published = false;
        let id = blogicum_db::repositories::PostRepository::new(state.db.clone())
            .create(&draft)
            .await?;

        let response = server.get(&format!("/posts/{}/", id)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        log_in(&server, "author").await;

        let response = server.get(&format!("/posts/{}/", id)).await;
        response.assert_status(StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn test_category_page_and_404s() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;
        let travel = create_test_category(&state.db, "Travel", true).await?;
        create_test_category(&state.db, "Hidden", false).await?;
        create_test_post(&state.db, author.id.unwrap(), travel.id, "On the road").await?;

        let response = server.get("/category/travel/").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("On the road"));

        server
            .get("/category/hidden/")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/category/missing/")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn test_registration_flow() -> Result<()> {
        let (server, state) = test_server().await?;

        let response = server
            .post("/auth/registration/")
            .form(&[
                ("username", "brandnew"),
                ("email", "brandnew@example.com"),
                ("password", "password123"),
                ("password_confirm", "password123"),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", LOGIN_URL);

        assert!(UserRepository::new(state.db.clone())
            .find_by_username("brandnew")
            .await?
            .is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_logout_clears_login() -> Result<()> {
        let (server, state) = test_server().await?;
        create_test_user(&state.db, "author", false).await?;

        log_in(&server, "author").await;

        let response = server.get("/auth/logout/").await;
        response.assert_status(StatusCode::SEE_OTHER);

        // Back to being redirected as an anonymous visitor
        let response = server.get("/posts/create/").await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", LOGIN_URL);

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_page_query_is_400() -> Result<()> {
        let (server, _) = test_server().await?;

        let response = server.get("/?page=not-a-number").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn test_pagination_second_page() -> Result<()> {
        let (server, state) = test_server().await?;
        let author = create_test_user(&state.db, "author", false).await?;
        let category = create_test_category(&state.db, "Travel", true).await?;

        let repo = blogicum_db::repositories::PostRepository::new(state.db.clone());
        let now = chrono::Utc::now();
        for i in 0..12 {
            let mut post = blogicum_core::models::post::Post::new(
                format!("numbered-{i}"),
                "body".into(),
                author.id.unwrap(),
            );
            post.category_id = category.id;
            post.pub_date = now - chrono::Duration::hours(i);
            repo.create(&post).await?;
        }

        let first = server.get("/").await;
        first.assert_status(StatusCode::OK);
        assert!(first.text().contains("numbered-0"));
        assert!(!first.text().contains("numbered-11"));

        let second = server.get("/?page=2").await;
        second.assert_status(StatusCode::OK);
        assert!(second.text().contains("numbered-11"));
        assert!(!second.text().contains(">numbered-0<"));

        Ok(())
    }
}
