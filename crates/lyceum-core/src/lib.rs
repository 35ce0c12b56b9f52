mod clock;
mod error;
mod keys;
mod limits;
mod message;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LyceumError;
pub use keys::{CONVERSATIONS_KEY, MESSAGES_KEY, RATE_WINDOW_KEY, SCHEMA_KEY, SCHEMA_VERSION};
pub use limits::{
    CAPACITY_BUDGET_BYTES, HOURLY_REQUEST_LIMIT, MAX_MESSAGES_PER_CONVERSATION,
    PURGE_HIGH_WATER_PERCENT, WINDOW_MINUTES,
};
pub use message::{ChatMessage, Conversation, MessageRole};
pub use store::DurableStore;
