//! Icon pixel processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Cover-fit** | centred `crop_imm` + Lanczos3 `resize_exact` |
//! | **Encode** | PNG, RGBA8 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover-fit geometry (unit testable)
//! - **Backend**: [`IconBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, IconBackend};
pub use calculations::center_crop_rect;
pub use rust_backend::RustBackend;
