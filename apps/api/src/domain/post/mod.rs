// Post domain module

#![allow(clippy::module_inception)]

pub mod post;

pub use post::{Comment, Like, Post};
