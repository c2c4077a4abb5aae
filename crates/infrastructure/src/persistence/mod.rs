//! Secure store implementations.

mod file_secure_store;
mod memory_secure_store;

pub use file_secure_store::FileSecureStore;
pub use memory_secure_store::MemorySecureStore;
