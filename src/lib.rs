//! Block Breeze (workspace facade crate).
//!
//! This package keeps the `block_breeze::{core,adapter,types}` public API
//! stable while the implementation lives in dedicated crates under `crates/`.

pub use block_breeze_adapter as adapter;
pub use block_breeze_core as core;
pub use block_breeze_types as types;
