//! Built-in provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::Provider`]
//! for one upstream source.

pub mod arxiv;
pub mod github;
pub mod web;

pub use arxiv::ArxivProvider;
pub use github::GithubProvider;
pub use web::WebProvider;
