//! Building: derived artifacts, documentation and translations

pub mod compiler;
pub mod docs;
pub mod stale;
pub mod translate;

pub use compiler::{ArtifactCompiler, CompileEntry, CompileReport, CompileStatus};
pub use stale::is_stale;
pub use translate::{TranslateReport, TranslateStatus};
