//! Augmentation: turn retrieved chunks and a question into chat messages.

use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are a RAG powered assistant.

# User message structure:
- `RAG CONTEXT` - Retrieved documents relevant to the query.
- `USER QUESTION` - The user's actual question.

## Instructions:
- Use information from `RAG CONTEXT` as context when answering `USER QUESTION`.
- Answer ONLY based on conversation history and RAG context.
- If no relevant information exists in `RAG CONTEXT` or conversation history, state that you cannot answer the question.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Retrieved texts separated by blank lines, in ranking order.
pub fn format_context(texts: &[String]) -> String {
    texts.join("\n\n")
}

pub fn augment(context: &[String], question: &str) -> String {
    format!("## RAG CONTEXT:\n{}\n\n\n## USER QUESTION:\n{question}\n", format_context(context))
}

/// System prompt followed by the augmented user turn.
pub fn build_messages(context: &[String], question: &str) -> Vec<Message> {
    vec![Message::new(Role::System, SYSTEM_PROMPT), Message::new(Role::User, augment(context, question))]
}
