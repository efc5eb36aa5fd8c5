//! Plain-text rendering of messages.
//!
//! Renders `file:line:col`, the offending source line and a caret
//! underline. Colored/themed output is a concern of the external
//! highlighter, not of this crate.

use jacy_span::{SourceMap, Span};

use crate::message::{Label, LabelKind, Message};

/// Renders messages against a [`SourceMap`].
pub struct MessageDumper<'a> {
    source_map: &'a SourceMap,
}

impl<'a> MessageDumper<'a> {
    pub fn new(source_map: &'a SourceMap) -> Self {
        Self { source_map }
    }

    /// Render one message into a string.
    pub fn render(&self, msg: &Message) -> String {
        let mut out = String::new();
        match msg.eid {
            eid if eid.is_none() => out.push_str(&format!("{}: {}\n", msg.level, msg.text)),
            eid => out.push_str(&format!("{}[{}]: {}\n", msg.level, eid, msg.text)),
        }
        if let Some(primary) = &msg.primary_label {
            self.render_label(&mut out, primary);
        }
        for label in &msg.labels {
            self.render_label(&mut out, label);
        }
        out
    }

    /// Render a full list, one message after another.
    pub fn render_all(&self, messages: &[Message]) -> String {
        messages.iter().map(|m| self.render(m)).collect()
    }

    fn render_label(&self, out: &mut String, label: &Label) {
        if label.span.is_dummy() {
            if !label.text.is_empty() {
                out.push_str(&format!("  = {}: {}\n", label_word(label.kind), label.text));
            }
            return;
        }
        let Ok((line, col)) = self.source_map.line_col(label.span.file, label.span.pos) else {
            return;
        };
        let Ok(file) = self.source_map.file(label.span.file) else {
            return;
        };
        out.push_str(&format!(
            "  --> {}:{}:{}\n",
            file.path().display(),
            line,
            col
        ));
        if let Some(text) = file.line(line as usize - 1) {
            out.push_str(&format!("   | {text}\n"));
            out.push_str("   | ");
            out.push_str(&" ".repeat(col as usize - 1));
            out.push_str(&"^".repeat((label.span.len as usize).max(1)));
            if !label.text.is_empty() {
                out.push_str(&format!("-- {}", label.text));
            }
            out.push('\n');
        }
    }

    /// Convenience for a caret under an arbitrary span with no
    /// message wrapper, used by dev dumps.
    pub fn render_span(&self, span: Span) -> String {
        let mut out = String::new();
        self.render_label(
            &mut out,
            &Label::new(LabelKind::Primary, span, String::new()),
        );
        out
    }
}

fn label_word(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Primary => "note",
        LabelKind::Help => "help",
        LabelKind::Aux => "note",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MessageBuilder;
    use jacy_span::SourceMap;

    #[test]
    fn renders_location_line_and_caret() {
        let mut map = SourceMap::new();
        let file = map.add_file("main.jc", "let x = ;\n");
        let span = Span::new(8, 1, file);
        let msg = MessageBuilder::error()
            .text("expected expression")
            .primary(span, "after `=`")
            .build();
        let rendered = MessageDumper::new(&map).render(&msg);
        assert!(rendered.contains("error: expected expression"));
        assert!(rendered.contains("main.jc:1:9"));
        assert!(rendered.contains("let x = ;"));
        assert!(rendered.contains("^-- after `=`"));
    }

    #[test]
    fn dummy_spans_render_as_plain_notes() {
        let map = SourceMap::new();
        let msg = MessageBuilder::warn()
            .text("top level")
            .help(Span::DUMMY, "try something else")
            .build();
        let rendered = MessageDumper::new(&map).render(&msg);
        assert!(rendered.contains("warn: top level"));
        assert!(rendered.contains("= help: try something else"));
    }
}
