//! Terminal glyphs used in progress and summary output.

pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
