//! Cache media: where cache entries physically live.

pub mod file;
pub mod memory;

pub use file::FileMedium;
pub use memory::MemoryMedium;
