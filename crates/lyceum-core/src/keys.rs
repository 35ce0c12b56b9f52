//! Fixed keys for the persisted layout.
//!
//! The backing store is a single shared namespace; prefixing is the only
//! isolation discipline. Both chat collections are flat arrays under one
//! key each: messages are deliberately not nested inside conversations, so
//! the pruner can operate on the whole list.

/// Marker key gating whether stored data is trusted or discarded.
pub const SCHEMA_KEY: &str = "lyceum::meta::schema";

/// Expected value of [`SCHEMA_KEY`]; anything else is reseeded.
pub const SCHEMA_VERSION: &str = "1";

/// All conversation records, as one JSON array.
pub const CONVERSATIONS_KEY: &str = "lyceum::chat::conversations";

/// All messages across all conversations, as one flat JSON array.
pub const MESSAGES_KEY: &str = "lyceum::chat::messages";

/// The rate limiter's current window.
pub const RATE_WINDOW_KEY: &str = "lyceum::ratelimit::window";
