//! Store implementations.

pub mod filesystem;
pub mod memory;

pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;
