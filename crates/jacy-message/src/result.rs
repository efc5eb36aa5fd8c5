//! Per-stage message accumulation and the stage return type.

use crate::message::{any_error, Message};

/// Accumulates messages for one stage.
#[derive(Debug, Default)]
pub struct MessageHolder {
    messages: Vec<Message>,
}

impl MessageHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn extend(&mut self, messages: Vec<Message>) {
        self.messages.extend(messages);
    }

    pub fn has_errors(&self) -> bool {
        any_error(&self.messages)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Finish the stage: wrap an artifact together with everything
    /// collected so far.
    pub fn result<T>(self, value: T) -> MessageResult<T> {
        MessageResult {
            value,
            messages: self.messages,
        }
    }

    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

/// What every stage returns: a best-effort artifact plus the messages
/// produced while building it. Stages never abort on user errors.
#[derive(Debug)]
pub struct MessageResult<T> {
    pub value: T,
    pub messages: Vec<Message>,
}

impl<T> MessageResult<T> {
    pub fn new(value: T, messages: Vec<Message>) -> Self {
        Self { value, messages }
    }

    /// An artifact produced without any messages.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            messages: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        any_error(&self.messages)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MessageResult<U> {
        MessageResult {
            value: f(self.value),
            messages: self.messages,
        }
    }

    /// Split into the artifact and the messages, typically to merge
    /// the messages into the driver's running list.
    pub fn split(self) -> (T, Vec<Message>) {
        (self.value, self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MessageBuilder;

    #[test]
    fn holder_tracks_errors() {
        let mut holder = MessageHolder::new();
        assert!(!holder.has_errors());
        MessageBuilder::warn().text("w").emit(&mut holder);
        assert!(!holder.has_errors());
        MessageBuilder::error().text("e").emit(&mut holder);
        assert!(holder.has_errors());
        assert_eq!(holder.len(), 2);
    }

    #[test]
    fn result_carries_value_and_messages() {
        let mut holder = MessageHolder::new();
        MessageBuilder::error().text("boom").emit(&mut holder);
        let result = holder.result(7u32);
        assert!(result.has_errors());
        let (value, messages) = result.map(|v| v + 1).split();
        assert_eq!(value, 8);
        assert_eq!(messages.len(), 1);
    }
}
