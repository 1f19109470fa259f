//! Render blocks → ratatui `Text`.
//!
//! The terminal counterpart of `render::html`: Markdown goes through
//! `pulldown_cmark` into styled `Line`/`Span` values, code is boxed and
//! highlighted with syntect, images become a one-line placeholder. Raw HTML
//! in a reply is shown as literal text, the same way the HTML renderer
//! escapes it.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::render::RenderBlock;
use crate::render::blocks::DEFAULT_CODE_LANGUAGE;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME: LazyLock<Option<Theme>> = LazyLock::new(|| {
    ThemeSet::load_defaults()
        .themes
        .remove("base16-ocean.dark")
});

const BORDER: Color = Color::DarkGray;

/// Render a reply's blocks. `separate` puts a blank line between blocks,
/// the terminal form of the `<br>` between assistant blocks.
pub fn render_blocks(blocks: &[RenderBlock], base_fg: Color, separate: bool) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 && separate {
            w.push_line(Line::default());
        }
        w.needs_newline = false;
        match block {
            RenderBlock::Text { markdown } => w.markdown(markdown),
            RenderBlock::Code { language, content } => w.code_box(language, content),
            RenderBlock::Image { url, alt } => w.image(alt, url),
        }
    }
    w.text
}

/// Parse Markdown into styled `Text`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    w.markdown(content);
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack; styles compose via `patch`.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote and code box borders).
    line_prefixes: Vec<Span<'static>>,
    /// None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Open fenced code block: language and buffered content.
    code: Option<(String, String)>,
    link_url: Option<String>,
    /// Cells of the table row being built.
    table_row: Option<Vec<String>>,
    needs_newline: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            code: None,
            link_url: None,
            table_row: None,
            needs_newline: false,
        }
    }

    fn markdown(&mut self, content: &str) {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);
        opts.insert(Options::ENABLE_TABLES);

        for event in Parser::new_ext(content, opts) {
            self.handle(event);
        }
    }

    // ── Style helpers ───────────────────────────────────────────────────

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        if let Some((_, buf)) = self.code.as_mut() {
            match event {
                Event::Text(t) => buf.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, content)) = self.code.take() {
                        self.code_box(&language, &content);
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::Html(raw) | Event::InlineHtml(raw) => self.text(raw),
            Event::SoftBreak | Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(BORDER),
                )));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::raw(marker));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = heading_style(self.base_fg, level);
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(heading_depth(level))),
                    hs,
                )));
                self.push_style(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", Style::default().fg(BORDER)));
                self.push_style(
                    Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let depth = self.list_indices.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}- "),
                        Some(n) => {
                            let s = format!("{indent}{n}. ");
                            *n += 1;
                            s
                        }
                    };
                    self.push_span(Span::styled(marker, Style::default().fg(BORDER)));
                }
            }
            Tag::Table(_) => self.blank_line_if_needed(),
            Tag::TableHead | Tag::TableRow => self.table_row = Some(Vec::new()),
            Tag::TableCell => {
                if let Some(row) = self.table_row.as_mut() {
                    row.push(String::new());
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Image { .. } => self.push_span(Span::styled(
                "🖼 ",
                Style::default().fg(Color::Magenta),
            )),
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let head = matches!(tag, TagEnd::TableHead);
                if let Some(cells) = self.table_row.take() {
                    let style = if head {
                        self.style().add_modifier(Modifier::BOLD)
                    } else {
                        self.style()
                    };
                    self.push_line(Line::from(Span::styled(cells.join(" │ "), style)));
                }
            }
            TagEnd::Table => self.needs_newline = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take().filter(|u| !u.is_empty()) {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(
                        url,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");

        if let Some(cell) = self.table_row.as_mut().and_then(|row| row.last_mut()) {
            cell.push_str(&text);
            return;
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        if let Some(cell) = self.table_row.as_mut().and_then(|row| row.last_mut()) {
            cell.push_str(&cow);
            return;
        }
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        self.push_span(Span::styled(cow.to_string(), style));
    }

    /// `╭── lang ──` / `│ code` / `╰──`, highlighted when syntect knows the language.
    fn code_box(&mut self, language: &str, content: &str) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        let label = if language.is_empty() {
            DEFAULT_CODE_LANGUAGE
        } else {
            language
        };
        let bs = Style::default().fg(BORDER);
        self.push_line(Line::from(vec![
            Span::styled("╭── ", bs),
            Span::styled(label.to_owned(), bs.add_modifier(Modifier::BOLD)),
            Span::styled(" ──", bs),
        ]));
        self.line_prefixes.push(Span::styled("│ ", bs));

        let content = content.replace('\t', "    ");
        let mut highlighter = THEME.as_ref().and_then(|theme| {
            SYNTAX_SET
                .find_syntax_by_token(language)
                .map(|syntax| HighlightLines::new(syntax, theme))
        });

        for line in LinesWithEndings::from(content.as_str()) {
            let spans = match highlighter.as_mut() {
                Some(hl) => highlighted_spans(hl, line),
                None => None,
            }
            .unwrap_or_else(|| {
                vec![Span::styled(
                    line.trim_end_matches('\n').to_owned(),
                    Style::default().fg(Color::White),
                )]
            });
            self.push_line(Line::from(spans));
        }

        self.line_prefixes.pop();
        self.push_line(Line::from(Span::styled("╰──", bs)));
        self.needs_newline = true;
    }

    fn image(&mut self, alt: &str, url: &str) {
        let label = if alt.is_empty() { "image" } else { alt };
        let mut spans = vec![
            Span::styled("🖼 ", Style::default().fg(Color::Magenta)),
            Span::styled(label.to_owned(), self.style().add_modifier(Modifier::ITALIC)),
        ];
        // Inline data URLs are far too long to print.
        if !url.starts_with("data:") && !url.is_empty() {
            spans.push(Span::styled(
                format!(" ({url})"),
                Style::default().fg(Color::Cyan),
            ));
        }
        self.push_line(Line::from(spans));
        self.needs_newline = true;
    }
}

fn highlighted_spans(hl: &mut HighlightLines<'_>, line: &str) -> Option<Vec<Span<'static>>> {
    let ranges = hl.highlight_line(line, &SYNTAX_SET).ok()?;
    Some(
        ranges
            .into_iter()
            .filter_map(|(style, frag)| {
                let content = frag.trim_end_matches('\n');
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
            })
            .collect(),
    )
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().fg(base_fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Hello", Color::Blue);
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {line:?}");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("Some **bold** text", Color::Blue);
        let bold = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn raw_html_is_shown_literally() {
        let lines = plain_lines(&render("hi <b>there</b>", Color::Blue));
        assert_eq!(lines[0], "hi <b>there</b>");
    }

    #[test]
    fn single_newline_starts_a_new_line() {
        let lines = plain_lines(&render("one\ntwo", Color::Blue));
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn fenced_code_is_boxed_with_label() {
        let lines = plain_lines(&render("```\nline1\n\tline2\n```", Color::Blue));
        assert_eq!(lines[0], "╭── plaintext ──");
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│     line2");
        assert_eq!(lines.last().map(String::as_str), Some("╰──"));
    }

    #[test]
    fn tables_render_as_rows() {
        let lines = plain_lines(&render("| a | b |\n|---|---|\n| 1 | 2 |", Color::Blue));
        assert_eq!(lines, vec!["a │ b", "1 │ 2"]);
    }

    #[test]
    fn blocks_are_separated_for_assistant_replies() {
        let blocks = vec![
            RenderBlock::Text {
                markdown: "Here:".into(),
            },
            RenderBlock::Code {
                language: "rust".into(),
                content: "fn main() {}\n".into(),
            },
            RenderBlock::Image {
                url: "https://x/cat.png".into(),
                alt: "a cat".into(),
            },
        ];
        let lines = plain_lines(&render_blocks(&blocks, Color::Blue, true));
        assert_eq!(lines[0], "Here:");
        assert_eq!(lines[1], "");
        assert!(lines.iter().any(|l| l == "╭── rust ──"));
        assert!(lines.iter().any(|l| l.contains("fn main() {}")));
        assert_eq!(lines.last().unwrap(), "🖼 a cat (https://x/cat.png)");
    }

    #[test]
    fn data_urls_are_not_printed() {
        let blocks = vec![RenderBlock::Image {
            url: "data:image/png;base64,AAAA".into(),
            alt: String::new(),
        }];
        let lines = plain_lines(&render_blocks(&blocks, Color::Blue, false));
        assert_eq!(lines, vec!["🖼 image"]);
    }
}
