//! Conversation memory

use llm_core::{ChatMessage, Role};

/// Ordered log of the messages sent to the model
///
/// Append-only, except that the system message content can be rewritten in
/// place through [`ConversationMemory::system_content_mut`].
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationMemory {
    /// Seed a memory with a system message followed by the user task
    pub fn seeded(system_prompt: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(task)],
        }
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[cfg(test)]
    pub fn find_first_by_role(&self, role: Role) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.role == role)
    }

    /// Content of the system message, which is always the first message
    #[cfg(test)]
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(ChatMessage::text)
    }

    /// Mutable access to the system message content
    pub fn system_content_mut(&mut self) -> Option<&mut String> {
        self.messages
            .first_mut()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.get_or_insert_with(String::new))
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_core::ToolCall;

    #[test]
    fn test_seeded_memory() {
        let memory = ConversationMemory::seeded("You are a writer", "Document this");
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.messages()[0].role, Role::System);
        assert_eq!(memory.messages()[1].role, Role::User);
        assert_eq!(memory.system_content(), Some("You are a writer"));
        assert_eq!(memory.last_message().unwrap().text(), "Document this");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut memory = ConversationMemory::seeded("sys", "task");
        memory.append(ChatMessage::assistant_with_tools(
            None,
            vec![ToolCall::new("call_1", "list_files", "{}")],
        ));
        memory.append(ChatMessage::tool_result("call_1", "list_files", "[]"));

        let roles: Vec<_> = memory.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
        assert_eq!(memory.find_first_by_role(Role::Tool).unwrap().tool_call_id.as_deref(), Some("call_1"));
        assert!(memory.find_first_by_role(Role::Assistant).unwrap().has_tool_calls());
    }

    #[test]
    fn test_system_content_rewrite() {
        let mut memory = ConversationMemory::seeded("base", "task");
        memory.system_content_mut().unwrap().push_str(" + suffix");
        assert_eq!(memory.system_content(), Some("base + suffix"));
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_empty_memory_has_no_system_message() {
        let mut memory = ConversationMemory::default();
        assert!(memory.is_empty());
        assert!(memory.system_content().is_none());
        assert!(memory.system_content_mut().is_none());
    }
}
