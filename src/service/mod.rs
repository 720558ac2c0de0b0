//! Service Module
//!
//! Business logic layer for the control server: marker-file inspection and
//! the privileged unregister command.

pub mod status;
pub mod unregister;
