//! Vector store backends: a persistent LanceDB table and an in-memory store.

pub mod lance;
pub mod memory;
pub mod schema;
pub mod table;

pub use lance::LanceVectorStore;
pub use memory::MemoryVectorStore;
