//! Prompt templates for the chat pipeline.
//!
//! Template text is data: the service interpolates into these constants
//! instead of scattering inline literals.

/// Canned answer when neither chunks nor history are available. Returned
/// without calling the generation gateway.
pub const NO_CONTEXT_MESSAGE: &str = "I couldn't find any relevant information in the uploaded documents to answer your question. Please make sure your question is related to the content of the documents.";

/// Placeholder document block when only conversation history exists.
pub const NO_DOCUMENT_CONTEXT: &str =
    "No relevant document content found for this specific question.";

/// Placeholder history block for the first turn of a conversation.
pub const NO_CONVERSATION: &str = "No previous conversation.";

/// System instruction sent with every chat generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that answers questions based on provided document content and conversation history. Use both sources to provide accurate answers. Never make up information not found in the sources.";

/// Main RAG template. `{context}`, `{conversation_history}` and `{query}`
/// are replaced at render time.
pub const RAG_PROMPT: &str = r#"You are a helpful AI assistant that answers questions based on the provided document content and conversation history.

IMPORTANT INSTRUCTIONS:
1. Use information from both the provided documents and conversation history to answer questions
2. If the question cannot be answered from either the documents or conversation history, clearly state that you don't have that information
3. Do not make up or infer information not explicitly stated in the documents or conversation
4. Be concise and accurate
5. Use the conversation history to understand context
6. If no document content is available but conversation history exists, answer based on the conversation history

DOCUMENT CONTENT:
{context}

CONVERSATION HISTORY:
{conversation_history}

CURRENT QUESTION: {query}

ANSWER:"#;

pub fn render_rag_prompt(context: &str, conversation_history: &str, query: &str) -> String {
    RAG_PROMPT
        .replace("{context}", context)
        .replace("{conversation_history}", conversation_history)
        .replace("{query}", query)
}
