//! pbt: build, deploy and package plugins from a declarative manifest
//!
//! The library exposes every verb as a function returning a structured
//! result (`commands`), the engine behind them (`build`, `deploy`,
//! `package`) and the seams to the outside world (`tools`).

pub mod build;
pub mod commands;
pub mod common;
pub mod context;
pub mod deploy;
pub mod errors;
pub mod package;
pub mod prompt;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use common::GlobalOpts;
pub use context::Context;
pub use errors::PbtError;
