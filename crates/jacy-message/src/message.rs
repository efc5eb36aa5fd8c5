//! The message model: levels, labels and the message itself.

use jacy_span::Span;
use strum_macros::Display;

/// Severity of a message. `None` is reserved for messages that only
/// carry labels attached to some other message.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    None,
}

/// What role a label plays in the rendered diagnostic.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LabelKind {
    /// Where the problem occurred; its span is the message span.
    Primary,
    Help,
    /// Auxiliary context, e.g. "previous definition is here".
    Aux,
}

/// A `^^^-- something wrong here` annotation under a span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub kind: LabelKind,
    pub span: Span,
    pub text: String,
}

impl Label {
    pub fn new(kind: LabelKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

/// Explanation id, pointing at the long-form description of an error
/// kind. `NONE` means no explanation exists yet.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EID(pub u32);

impl EID {
    pub const NONE: EID = EID(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl std::fmt::Display for EID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:04}", self.0)
    }
}

/// One diagnostic: level, text, optional primary label, extra labels
/// and an optional explanation id.
#[derive(Clone, Debug)]
pub struct Message {
    pub level: Level,
    pub text: String,
    pub eid: EID,
    pub primary_label: Option<Label>,
    pub labels: Vec<Label>,
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    /// The span the message points at, when it has a primary label.
    pub fn span(&self) -> Option<Span> {
        self.primary_label.as_ref().map(|label| label.span)
    }
}

/// Whether any message in a list is an error.
pub fn any_error(messages: &[Message]) -> bool {
    messages.iter().any(Message::is_error)
}
