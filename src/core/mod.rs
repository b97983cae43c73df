//! Data model, policy and shared state.

pub mod alert;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod hash;
pub mod identity;
pub mod time;
pub mod types;
pub mod validate;
