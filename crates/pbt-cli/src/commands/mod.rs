//! Verbs exposed by the `pbt` binary
//!
//! Each module holds the structured operation, callable as a library
//! function, and the `handle_*` function the CLI dispatches to.

pub mod clean;
pub mod compile;
pub mod config;
pub mod create;
pub mod deploy;
pub mod docs;
pub mod list;
pub mod package;
pub mod translate;
pub mod validate;

pub use clean::{clean, clean_deployment, CleanReport};
pub use compile::compile;
pub use create::scaffold;
pub use deploy::deploy;
pub use docs::{build_docs, clean_docs};
pub use list::list_manifest;
pub use package::package;
pub use translate::translate;
pub use validate::validate;
