//! Completion-service clients: chat (single, batched, tool-calling turns),
//! a closed-variant tool dispatcher, and image generation.

pub mod chat;
pub mod image;
pub mod tools;

pub use chat::{ChatClient, ChatSession, ChatTurn, Message};
pub use image::ImageClient;
pub use tools::{ToolKind, ToolRegistry, ToolSpec};
