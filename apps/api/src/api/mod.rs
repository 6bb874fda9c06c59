// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use handlers::{auth, posts, profile, users};

/// Builds the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(auth::index))
        .route("/health", get(auth::health_check))
        // Auth
        .route("/api/auth", post(auth::login))
        // Users
        .route("/api/users", post(users::register).get(users::current_user))
        // Profiles
        .route(
            "/api/profile",
            get(profile::list_profiles)
                .post(profile::upsert_profile)
                .delete(profile::delete_account),
        )
        .route("/api/profile/me", get(profile::my_profile))
        .route("/api/profile/user/:user_id", get(profile::profile_by_user))
        .route("/api/profile/experience", put(profile::add_experience))
        .route(
            "/api/profile/experience/:experience_id",
            delete(profile::delete_experience),
        )
        .route("/api/profile/education", put(profile::add_education))
        .route(
            "/api/profile/education/:education_id",
            delete(profile::delete_education),
        )
        .route("/api/profile/github/:username", get(profile::github_repos))
        // Posts
        .route("/api/post", post(posts::create_post))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
