// Shared application state
// Built once in `main` and handed to every handler through axum's `State`

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::JwtConfig;
use crate::domain::repositories::{PostRepository, ProfileRepository, UserRepository};
use crate::infrastructure::github::GithubClient;
use crate::infrastructure::repositories::{
    InMemoryPostRepository, InMemoryProfileRepository, InMemoryUserRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresUserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub github: Arc<dyn GithubClient>,
    pub jwt: JwtConfig,
}

impl AppState {
    /// State backed by a Postgres pool
    pub fn postgres(pool: PgPool, jwt: JwtConfig, github: Arc<dyn GithubClient>) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool)),
            github,
            jwt,
        }
    }

    /// State backed by process memory (dev/test)
    pub fn in_memory(jwt: JwtConfig, github: Arc<dyn GithubClient>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            profiles: Arc::new(InMemoryProfileRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            github,
            jwt,
        }
    }
}

impl FromRef<AppState> for JwtConfig {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
