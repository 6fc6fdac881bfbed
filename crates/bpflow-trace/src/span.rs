//! Category-tagged text.
//!
//! The engine never decides how text looks. Everything it emits is a
//! [`StyledText`]: a sequence of plain runs, [`SpanKind`]-tagged runs and
//! cross-reference links. A [`crate::render::Renderer`] turns that into
//! Markdown, HTML or plain text.

use std::fmt;

use crate::render::{PlainRenderer, Renderer};

/// Semantic category of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Keyword,
    Variable,
    FunctionName,
    EventName,
    MacroName,
    DataType,
    PinName,
    ParamName,
    Operator,
    LiteralString,
    LiteralNumber,
    LiteralBool,
    LiteralName,
    LiteralObject,
    LiteralTag,
    LiteralContainer,
    LiteralStructType,
    LiteralStructValue,
    LiteralText,
    LiteralUnknown,
    EnumType,
    EnumValue,
    ClassName,
    ComponentName,
    WidgetName,
    DelegateName,
    TimelineName,
    GraphName,
    Modifier,
    Info,
    Error,
}

impl SpanKind {
    /// CSS class used by the HTML renderer.
    pub fn css_class(self) -> &'static str {
        match self {
            SpanKind::Keyword => "bp-keyword",
            SpanKind::Variable => "bp-var",
            SpanKind::FunctionName => "bp-func-name",
            SpanKind::EventName => "bp-event-name",
            SpanKind::MacroName => "bp-macro-name",
            SpanKind::DataType => "bp-data-type",
            SpanKind::PinName => "bp-pin-name",
            SpanKind::ParamName => "bp-param-name",
            SpanKind::Operator => "bp-operator",
            SpanKind::LiteralString => "bp-literal-string",
            SpanKind::LiteralNumber => "bp-literal-number",
            SpanKind::LiteralBool => "bp-literal-bool",
            SpanKind::LiteralName => "bp-literal-name",
            SpanKind::LiteralObject => "bp-literal-object",
            SpanKind::LiteralTag => "bp-literal-tag",
            SpanKind::LiteralContainer => "bp-literal-container",
            SpanKind::LiteralStructType => "bp-literal-struct-type",
            SpanKind::LiteralStructValue => "bp-literal-struct-val",
            SpanKind::LiteralText => "bp-literal-text",
            SpanKind::LiteralUnknown => "bp-literal-unknown",
            SpanKind::EnumType => "bp-enum-type",
            SpanKind::EnumValue => "bp-enum-value",
            SpanKind::ClassName => "bp-class-name",
            SpanKind::ComponentName => "bp-component-name",
            SpanKind::WidgetName => "bp-widget-name",
            SpanKind::DelegateName => "bp-delegate-name",
            SpanKind::TimelineName => "bp-timeline-name",
            SpanKind::GraphName => "bp-graph-name",
            SpanKind::Modifier => "bp-modifier",
            SpanKind::Info => "bp-info",
            SpanKind::Error => "bp-error",
        }
    }
}

/// One run of a [`StyledText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Styled { kind: SpanKind, text: String },
    /// Cross-reference to an anchor, with its own styled label.
    Link { anchor: String, label: StyledText },
}

/// Ordered, category-tagged text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    segments: Vec<Segment>,
}

impl StyledText {
    pub fn new() -> Self {
        StyledText::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        StyledText::new().with_plain(text)
    }

    pub fn styled(kind: SpanKind, text: impl Into<String>) -> Self {
        StyledText::new().with(kind, text)
    }

    pub fn link(anchor: impl Into<String>, label: StyledText) -> Self {
        StyledText {
            segments: vec![Segment::Link {
                anchor: anchor.into(),
                label,
            }],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| match s {
            Segment::Plain(t) => t.is_empty(),
            Segment::Styled { text, .. } => text.is_empty(),
            Segment::Link { label, .. } => label.is_empty(),
        })
    }

    /// Chained builder: appends a plain run.
    pub fn with_plain(mut self, text: impl Into<String>) -> Self {
        self.push_plain(text);
        self
    }

    /// Chained builder: appends a tagged run.
    pub fn with(mut self, kind: SpanKind, text: impl Into<String>) -> Self {
        self.push(kind, text);
        self
    }

    /// Chained builder: appends another styled text.
    pub fn with_text(mut self, other: StyledText) -> Self {
        self.append(other);
        self
    }

    pub fn push_plain(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(Segment::Plain(last)) = self.segments.last_mut() {
            last.push_str(&text);
        } else {
            self.segments.push(Segment::Plain(text));
        }
        self
    }

    pub fn push(&mut self, kind: SpanKind, text: impl Into<String>) -> &mut Self {
        self.segments.push(Segment::Styled {
            kind,
            text: text.into(),
        });
        self
    }

    pub fn append(&mut self, other: StyledText) -> &mut Self {
        for segment in other.segments {
            match segment {
                Segment::Plain(text) => {
                    self.push_plain(text);
                }
                other => self.segments.push(other),
            }
        }
        self
    }

    /// Joins items with a plain separator.
    pub fn join(items: impl IntoIterator<Item = StyledText>, separator: &str) -> StyledText {
        let mut out = StyledText::new();
        for (idx, item) in items.into_iter().enumerate() {
            if idx > 0 {
                out.push_plain(separator);
            }
            out.append(item);
        }
        out
    }

    /// `(inner)`
    pub fn parenthesized(inner: StyledText) -> StyledText {
        StyledText::plain("(").with_text(inner).with_plain(")")
    }

    /// Raw text of every run, without any decoration or quoting.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(t) => out.push_str(t),
                Segment::Styled { text, .. } => out.push_str(text),
                Segment::Link { label, .. } => out.push_str(&label.raw_text()),
            }
        }
        out
    }

    /// Anchors of every link in this text, in order.
    pub fn anchors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for segment in &self.segments {
            if let Segment::Link { anchor, label } = segment {
                out.push(anchor.as_str());
                out.extend(label.anchors());
            }
        }
        out
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&PlainRenderer.render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_runs_merge() {
        let mut text = StyledText::plain("a");
        text.push_plain("b").push_plain("");
        assert_eq!(text.segments(), &[Segment::Plain("ab".into())]);
    }

    #[test]
    fn join_inserts_separators() {
        let joined = StyledText::join(
            vec![
                StyledText::styled(SpanKind::Variable, "X"),
                StyledText::styled(SpanKind::Variable, "Y"),
            ],
            ", ",
        );
        assert_eq!(joined.raw_text(), "X, Y");
        assert_eq!(joined.segments().len(), 3);
    }

    #[test]
    fn emptiness_ignores_empty_runs() {
        assert!(StyledText::new().is_empty());
        assert!(StyledText::styled(SpanKind::Info, "").is_empty());
        assert!(!StyledText::plain("x").is_empty());
    }

    #[test]
    fn anchors_are_collected() {
        let text = StyledText::plain("call ")
            .with_text(StyledText::link("a-b", StyledText::plain("B")))
            .with_plain(" and ")
            .with_text(StyledText::link("c", StyledText::plain("C")));
        assert_eq!(text.anchors(), vec!["a-b", "c"]);
        assert_eq!(text.raw_text(), "call B and C");
    }
}
