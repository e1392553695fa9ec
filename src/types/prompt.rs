use super::message::Message;

/// An ordered sequence of messages for a chat call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    messages: Vec<Message>,
}

impl Prompt {
    /// Create a new empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the three-role prompt used by every service call: an empty system
    /// message, the user input, and an empty assistant message.
    ///
    /// The input is forwarded untouched, including when it is empty.
    pub fn scaffold(input: impl Into<String>) -> Self {
        Self::new()
            .with_system("")
            .with_user(input)
            .with_assistant("")
    }

    /// Add a system message.
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Add a user message.
    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Add an assistant message.
    pub fn with_assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Prompt { messages }
    }
}
