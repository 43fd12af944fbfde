//! In-memory store implementations backed by `DashMap`.

pub mod blacklist;
pub mod device;

pub use blacklist::MemoryBlacklistStore;
pub use device::MemoryDeviceStore;
