pub mod disk;
pub mod memory;

pub use disk::FjallRateStore;
pub use memory::MemoryRateStore;
