//! PostgreSQL repository implementations.

pub mod blacklist;
pub mod device;

pub use blacklist::BlacklistRepository;
pub use device::DeviceRepository;
