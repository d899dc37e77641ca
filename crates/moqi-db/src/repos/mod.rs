//! Repository modules implementing CRUD operations for MoQi entities.
//!
//! Each module adds methods to `MoqiService` via `impl MoqiService` blocks.

pub mod interaction;
pub mod startup;
pub mod swiper;
