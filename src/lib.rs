//! quickdeploy - deploy-and-verify helper for hosted serverless functions.
//!
//! Uploads a function's source text to the first candidate API endpoint that
//! accepts it, and falls back to probing the already-deployed function's health
//! endpoint when no candidate does.

pub mod config;
pub mod deploy;
pub mod error;
pub mod health;

pub use deploy::Deployer;
pub use error::FatalError;
