//! Lyceum — client-resident durable storage for course-discussion AI
//! conversations.
//!
//! This crate re-exports the Lyceum sub-crates for convenient
//! single-import usage.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `core` | `DurableStore` and `Clock` traits, message and conversation types, `LyceumError`, keys and default limits |
//! | `store` | `InMemoryStore`, `FileStore`, `QuotaAccountant` |
//! | `memory` | `ChatHistory` and the recency pruner |
//! | `limiter` | `RateLimiter`, `RateLimitStatus`, `UsageLevel` |
//! | `session` | `AssistantStore` facade over the components |
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chrono::Utc;
//! use lyceum::core::ChatMessage;
//! use lyceum::session::AssistantStore;
//! use lyceum::store::InMemoryStore;
//!
//! let assistant = AssistantStore::new(Arc::new(InMemoryStore::new()));
//! let conv = assistant.create_conversation("user-1").unwrap();
//!
//! if assistant.try_record_request() {
//!     let msg = ChatMessage::user("m1", &conv.id, "What is a borrow?", Utc::now());
//!     assistant.append_message(&msg).unwrap();
//! }
//! ```

/// Core traits and types: `DurableStore`, `Clock`, `ChatMessage`,
/// `Conversation`, `LyceumError`, persisted-layout keys, default limits.
pub use lyceum_core as core;

/// Durable store backends and quota accounting.
pub use lyceum_store as store;

/// Bounded conversation history and the recency pruner.
pub use lyceum_memory as memory;

/// Fixed-window request rate tracking.
pub use lyceum_limiter as limiter;

/// Store-backed assistant session facade.
pub use lyceum_session as session;
