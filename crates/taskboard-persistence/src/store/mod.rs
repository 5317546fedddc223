pub mod atomic_writer;
pub mod json_file_cache;
pub mod memory_cache;

pub use atomic_writer::AtomicWriter;
pub use json_file_cache::JsonFileCache;
pub use memory_cache::MemoryCache;
