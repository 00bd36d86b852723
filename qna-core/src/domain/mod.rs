pub mod conversation;
pub mod types;

pub use conversation::{ConversationHistory, ConversationTurn, Part, Role};
pub use types::{Intent, Persona};
