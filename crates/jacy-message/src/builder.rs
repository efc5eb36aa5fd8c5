//! Fluent construction of messages.

use jacy_span::Span;

use crate::message::{Label, LabelKind, Level, Message, EID};
use crate::result::MessageHolder;

/// Builder used by every stage to assemble a [`Message`] before
/// handing it to a [`MessageHolder`].
///
/// ```
/// # use jacy_message::{MessageBuilder, MessageHolder};
/// # use jacy_span::{Span, FileId};
/// let mut holder = MessageHolder::new();
/// MessageBuilder::error()
///     .text("unexpected token")
///     .primary(Span::new(4, 1, FileId::new(0)), "expected `;`")
///     .emit(&mut holder);
/// assert!(holder.has_errors());
/// ```
#[derive(Debug)]
pub struct MessageBuilder {
    msg: Message,
}

impl MessageBuilder {
    fn with_level(level: Level) -> Self {
        Self {
            msg: Message {
                level,
                text: String::new(),
                eid: EID::NONE,
                primary_label: None,
                labels: Vec::new(),
            },
        }
    }

    pub fn error() -> Self {
        Self::with_level(Level::Error)
    }

    pub fn warn() -> Self {
        Self::with_level(Level::Warn)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.msg.text = text.into();
        self
    }

    pub fn eid(mut self, eid: EID) -> Self {
        self.msg.eid = eid;
        self
    }

    /// Set the primary label. A message has at most one; the last call
    /// wins.
    pub fn primary(mut self, span: Span, text: impl Into<String>) -> Self {
        self.msg.primary_label = Some(Label::new(LabelKind::Primary, span, text));
        self
    }

    pub fn help(mut self, span: Span, text: impl Into<String>) -> Self {
        self.msg.labels.push(Label::new(LabelKind::Help, span, text));
        self
    }

    pub fn aux(mut self, span: Span, text: impl Into<String>) -> Self {
        self.msg.labels.push(Label::new(LabelKind::Aux, span, text));
        self
    }

    pub fn build(self) -> Message {
        self.msg
    }

    pub fn emit(self, holder: &mut MessageHolder) {
        holder.add(self.msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacy_span::FileId;

    #[test]
    fn builder_assembles_all_parts() {
        let span = Span::new(1, 2, FileId::new(0));
        let aux = Span::new(9, 2, FileId::new(0));
        let msg = MessageBuilder::error()
            .text("`x` has been already declared")
            .primary(span, "redeclared here")
            .aux(aux, "previous declaration")
            .eid(EID(42))
            .build();
        assert_eq!(msg.level, Level::Error);
        assert_eq!(msg.span(), Some(span));
        assert_eq!(msg.labels.len(), 1);
        assert_eq!(msg.labels[0].kind, LabelKind::Aux);
        assert_eq!(msg.eid, EID(42));
    }

    #[test]
    fn warnings_are_not_errors() {
        let msg = MessageBuilder::warn().text("chained comparison").build();
        assert!(!msg.is_error());
        assert_eq!(msg.span(), None);
    }
}
