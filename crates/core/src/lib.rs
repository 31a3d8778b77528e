pub mod conversation;
pub mod llm;

pub use conversation::Conversation;
