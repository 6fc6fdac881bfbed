//! Renderers: turn [`StyledText`] into Markdown, HTML or plain text.
//!
//! The engine produces exactly one kind of output regardless of target
//! format. Every formatting decision (emphasis, backticks, `<span>` classes,
//! link syntax, escaping) is made here.

use std::fmt;
use std::str::FromStr;

use crate::span::{Segment, SpanKind, StyledText};

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Markdown,
    Html,
    Plain,
}

impl OutputMode {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputMode::Markdown => Box::new(MarkdownRenderer),
            OutputMode::Html => Box::new(HtmlRenderer),
            OutputMode::Plain => Box::new(PlainRenderer),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Markdown => "markdown",
            OutputMode::Html => "html",
            OutputMode::Plain => "plain",
        })
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputMode::Markdown),
            "html" => Ok(OutputMode::Html),
            "plain" | "text" | "txt" => Ok(OutputMode::Plain),
            other => Err(format!("unknown output mode: {other}")),
        }
    }
}

/// A styling back end.
///
/// Implementors provide the three primitive conversions; the composite
/// methods have default implementations built on them.
pub trait Renderer {
    /// One tagged run.
    fn span(&self, kind: SpanKind, text: &str) -> String;

    /// Untagged text.
    fn plain(&self, text: &str) -> String;

    /// A cross-reference whose label has already been rendered.
    fn link(&self, anchor: &str, rendered_label: &str) -> String;

    /// A definition heading carrying its anchor.
    fn heading(&self, anchor: &str, title: &StyledText) -> String;

    /// Text emitted before a block of trace lines.
    fn begin_trace(&self) -> String {
        String::new()
    }

    /// Text emitted after a block of trace lines.
    fn end_trace(&self) -> String {
        String::new()
    }

    fn render(&self, text: &StyledText) -> String {
        let mut out = String::new();
        for segment in text.segments() {
            match segment {
                Segment::Plain(t) => out.push_str(&self.plain(t)),
                Segment::Styled { kind, text } => out.push_str(&self.span(*kind, text)),
                Segment::Link { anchor, label } => {
                    let label = self.render(label);
                    out.push_str(&self.link(anchor, &label));
                }
            }
        }
        out
    }

    /// One trace line: structural prefix plus content, newline-terminated.
    fn line(&self, prefix: &str, content: &StyledText) -> String {
        format!("{}{}\n", self.plain(prefix), self.render(content))
    }
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

fn backticked(text: &str) -> String {
    if text.contains('`') {
        format!("`` {text} ``")
    } else {
        format!("`{text}`")
    }
}

impl Renderer for MarkdownRenderer {
    fn span(&self, kind: SpanKind, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        match kind {
            SpanKind::Keyword | SpanKind::EventName => format!("**{text}**"),
            SpanKind::LiteralString | SpanKind::LiteralText => format!("\"{text}\""),
            SpanKind::Error => format!("**[ERROR: {text}]**"),
            SpanKind::Operator
            | SpanKind::LiteralNumber
            | SpanKind::LiteralBool
            | SpanKind::LiteralContainer
            | SpanKind::LiteralStructValue
            | SpanKind::LiteralUnknown
            | SpanKind::Modifier
            | SpanKind::Info => text.to_string(),
            SpanKind::Variable
            | SpanKind::FunctionName
            | SpanKind::MacroName
            | SpanKind::DataType
            | SpanKind::PinName
            | SpanKind::ParamName
            | SpanKind::LiteralName
            | SpanKind::LiteralObject
            | SpanKind::LiteralTag
            | SpanKind::LiteralStructType
            | SpanKind::EnumType
            | SpanKind::EnumValue
            | SpanKind::ClassName
            | SpanKind::ComponentName
            | SpanKind::WidgetName
            | SpanKind::DelegateName
            | SpanKind::TimelineName
            | SpanKind::GraphName => backticked(text),
        }
    }

    fn plain(&self, text: &str) -> String {
        text.to_string()
    }

    fn link(&self, anchor: &str, rendered_label: &str) -> String {
        format!("[{rendered_label}](#{anchor})")
    }

    fn heading(&self, anchor: &str, title: &StyledText) -> String {
        format!("<a id=\"{anchor}\"></a>\n### {}\n", self.render(title))
    }

    fn line(&self, prefix: &str, content: &StyledText) -> String {
        // Two trailing spaces keep consecutive lines from being reflowed.
        format!("{}{}  \n", prefix, self.render(content))
    }
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

impl Renderer for HtmlRenderer {
    fn span(&self, kind: SpanKind, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let body = match kind {
            SpanKind::LiteralString | SpanKind::LiteralText => {
                format!("&quot;{}&quot;", escape_html(text))
            }
            SpanKind::Error => format!("[ERROR: {}]", escape_html(text)),
            _ => escape_html(text),
        };
        format!("<span class=\"{}\">{}</span>", kind.css_class(), body)
    }

    fn plain(&self, text: &str) -> String {
        escape_html(text)
    }

    fn link(&self, anchor: &str, rendered_label: &str) -> String {
        format!(
            "<a href=\"#{}\" class=\"bp-link\">{}</a>",
            escape_html(anchor),
            rendered_label
        )
    }

    fn heading(&self, anchor: &str, title: &StyledText) -> String {
        format!(
            "<h3 id=\"{}\">{}</h3>\n",
            escape_html(anchor),
            self.render(title)
        )
    }

    fn begin_trace(&self) -> String {
        "<pre class=\"bp-trace\">\n".to_string()
    }

    fn end_trace(&self) -> String {
        "</pre>\n".to_string()
    }
}

// ---------------------------------------------------------------------------
// Plain
// ---------------------------------------------------------------------------

/// Undecorated text. String literals keep their quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn span(&self, kind: SpanKind, text: &str) -> String {
        match kind {
            SpanKind::LiteralString | SpanKind::LiteralText => format!("\"{text}\""),
            SpanKind::Error => format!("[ERROR: {text}]"),
            _ => text.to_string(),
        }
    }

    fn plain(&self, text: &str) -> String {
        text.to_string()
    }

    fn link(&self, _anchor: &str, rendered_label: &str) -> String {
        rendered_label.to_string()
    }

    fn heading(&self, _anchor: &str, title: &StyledText) -> String {
        format!("== {} ==\n", self.render(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StyledText {
        StyledText::styled(SpanKind::Keyword, "Set")
            .with_plain(" ")
            .with(SpanKind::Variable, "Speed")
            .with_plain(" = ")
            .with(SpanKind::LiteralString, "a<b")
    }

    #[test]
    fn markdown_decoration() {
        let md = MarkdownRenderer.render(&sample());
        assert_eq!(md, "**Set** `Speed` = \"a<b\"");
        let err = MarkdownRenderer.span(SpanKind::Error, "missing pin");
        assert_eq!(err, "**[ERROR: missing pin]**");
    }

    #[test]
    fn markdown_links_wrap_rendered_labels() {
        let text = StyledText::link("game-a-foo", StyledText::styled(SpanKind::FunctionName, "Foo"));
        assert_eq!(MarkdownRenderer.render(&text), "[`Foo`](#game-a-foo)");
    }

    #[test]
    fn html_escapes_and_tags() {
        let html = HtmlRenderer.render(&sample());
        assert_eq!(
            html,
            "<span class=\"bp-keyword\">Set</span> <span class=\"bp-var\">Speed</span> = \
             <span class=\"bp-literal-string\">&quot;a&lt;b&quot;</span>"
        );
        let link = HtmlRenderer.render(&StyledText::link("x", StyledText::plain("X")));
        assert_eq!(link, "<a href=\"#x\" class=\"bp-link\">X</a>");
    }

    #[test]
    fn plain_keeps_only_text() {
        assert_eq!(PlainRenderer.render(&sample()), "Set Speed = \"a<b\"");
        assert_eq!(sample().to_string(), "Set Speed = \"a<b\"");
        let link = StyledText::link("x", StyledText::plain("Foo"));
        assert_eq!(PlainRenderer.render(&link), "Foo");
    }

    #[test]
    fn output_mode_parsing() {
        assert_eq!("HTML".parse::<OutputMode>(), Ok(OutputMode::Html));
        assert_eq!("md".parse::<OutputMode>(), Ok(OutputMode::Markdown));
        assert!("rtf".parse::<OutputMode>().is_err());
    }
}
