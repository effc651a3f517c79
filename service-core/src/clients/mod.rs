//! HTTP clients for collaborating services.
pub mod document;
pub mod genai;

pub use document::{ConversationMessage, Document, DocumentChunk, DocumentClient, MessageRole};
pub use genai::{
    Content, GenaiClient, GenaiError, GenerateContentRequest, GenerateContentResponse, InlineData,
    Part,
};
