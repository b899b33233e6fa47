pub mod entry;
pub mod relevance;
pub mod store;

pub use entry::{ConversationEntry, USER_SPEAKER};
pub use relevance::relevance_score;
pub use store::{MemoryError, MemoryStats, MemoryStore};
