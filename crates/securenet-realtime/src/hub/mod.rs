//! Hub core: name bindings, snapshot broadcasts, command routing, and the
//! per-RPC controller.

pub mod broadcaster;
pub mod controller;
pub mod registry;
pub mod router;
