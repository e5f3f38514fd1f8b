pub mod archive;

pub use archive::{archive, select_archiver, ArchiveResult};
