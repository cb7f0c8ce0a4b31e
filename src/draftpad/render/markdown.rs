use super::{Rendered, Renderer};
use crate::error::RenderError;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag};

/// CommonMark + GFM extensions rendered with pulldown-cmark.
///
/// Math spans and `mermaid` fences are passed through as marked-up elements;
/// typesetting and diagram layout are left to whatever displays the html.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_MATH);
        Self { options }
    }

    pub fn render_html(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 3 / 2);
        let mut in_diagram = false;

        let events = Parser::new_ext(text, self.options).map(|event| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang)))
                if &**lang == "mermaid" =>
            {
                in_diagram = true;
                Event::Html("<pre class=\"mermaid\">".into())
            }
            Event::End(pulldown_cmark::TagEnd::CodeBlock) if in_diagram => {
                in_diagram = false;
                Event::Html("</pre>\n".into())
            }
            other => other,
        });

        html::push_html(&mut out, events);
        out
    }
}

impl Renderer for MarkdownRenderer {
    async fn render(&self, text: &str) -> Result<Rendered, RenderError> {
        if text.contains('\0') {
            return Err(RenderError("input contains NUL bytes".to_string()));
        }
        Ok(Rendered {
            html: self.render_html(text),
            word_count: text.split_whitespace().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = MarkdownRenderer::new().render_html("# Title\n\nSome *text*");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn renders_gfm_tables_and_tasks() {
        let html = MarkdownRenderer::new().render_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn mermaid_fences_become_diagram_blocks() {
        let html = MarkdownRenderer::new().render_html("```mermaid\ngraph TD; A-->B\n```\n");
        assert!(html.contains("<pre class=\"mermaid\">"));
        assert!(html.contains("A--&gt;B"));
        assert!(!html.contains("<code"));
    }

    #[test]
    fn other_fences_stay_code() {
        let html = MarkdownRenderer::new().render_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<code class=\"language-rust\">"));
    }

    #[tokio::test]
    async fn render_counts_words() {
        let rendered = MarkdownRenderer::new().render("one two\nthree").await.unwrap();
        assert_eq!(rendered.word_count, 3);
    }

    #[tokio::test]
    async fn nul_bytes_are_rejected() {
        let err = MarkdownRenderer::new().render("a\0b").await.unwrap_err();
        assert!(err.0.contains("NUL"));
    }
}
