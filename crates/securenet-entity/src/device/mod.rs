//! Device registry entity.

pub mod model;

pub use model::{DeviceRecord, DeviceRegistration};
