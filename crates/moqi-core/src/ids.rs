//! ID prefixes for MoQi entities.
//!
//! IDs are `{prefix}-{8 hex chars}`, e.g. `stu-a3f8b2c1`. The database layer
//! generates the random suffix; this module only owns the prefixes.

pub const PREFIX_STARTUP: &str = "stu";
pub const PREFIX_SWIPER: &str = "swp";
pub const PREFIX_INTERACTION: &str = "int";

/// Format an ID from a prefix and a numeric suffix (used by the in-memory store).
#[must_use]
pub fn format_id(prefix: &str, n: u32) -> String {
    format!("{prefix}-{n:08x}")
}

/// Check whether `id` carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|suffix| !suffix.is_empty())
}
