//! Shim module to abstract over std and loom primitives.
//!
//! Every atomic and `Arc` in this crate is imported through here, so the same
//! sources compile against `std` for production and against `loom` for model
//! checking (`--features loom`).

#[cfg(not(feature = "loom"))]
pub mod atomic {
    pub use std::sync::atomic::*;
}

#[cfg(feature = "loom")]
pub mod atomic {
    pub use loom::sync::atomic::*;
}

#[cfg(not(feature = "loom"))]
pub mod sync {
    pub use std::sync::Arc;
}

#[cfg(feature = "loom")]
pub mod sync {
    pub use loom::sync::Arc;
}
