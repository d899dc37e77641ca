//! Entity structs for MoQi domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `moqi-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod interaction;
mod startup;
mod swiper;

pub use interaction::{Interaction, InteractionFilter, InteractionPatch, NewInteraction};
pub use startup::Startup;
pub use swiper::Swiper;
