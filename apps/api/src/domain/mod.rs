// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod post;
pub mod profile;
pub mod repositories;
pub mod user;
pub mod validation;
