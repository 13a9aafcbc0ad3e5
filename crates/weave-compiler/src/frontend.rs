//! Front-end: import prelude, Markdown and embedded component tags to AST.

use std::borrow::Cow;
use std::sync::LazyLock;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde_json::Value;

use crate::ast::{AstElement, AstKind, AstNode, push_node};
use crate::error::CompileError;
use crate::markup::{AttrValue, Token, find_tag_end, tokenize};

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+([A-Za-z_][A-Za-z0-9_]*)\s+from\s+"[^"]*"\s*;?\s*$"#).unwrap()
});

/// Built-in tags that never have children and need no closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parsed document: import bindings in order and the body tree.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub bindings: Vec<String>,
    pub nodes: Vec<AstNode>,
}

/// Parser options for document bodies.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_SUPERSCRIPT
        | Options::ENABLE_SUBSCRIPT
}

/// Parse synthesized source text.
///
/// `prelude_lines` synthesized lines precede the document body; reported line
/// numbers are relative to the body. Imports inside the body may only repeat
/// names bound by the prelude.
pub(crate) fn parse(source: &str, prelude_lines: usize) -> Result<Parsed, CompileError> {
    let mut bindings: Vec<String> = Vec::new();
    let mut offset = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let Some(caps) = IMPORT_RE.captures(trimmed) else {
                break;
            };
            let name = &caps[1];
            if !bindings.iter().any(|b| b == name) {
                if index >= prelude_lines {
                    return Err(CompileError::UnresolvedImport {
                        name: name.to_owned(),
                        line: index - prelude_lines + 1,
                    });
                }
                bindings.push(name.to_owned());
            }
        }
        offset += line.len();
    }

    let body = join_multiline_tags(&source[offset..]);
    let mut builder = AstBuilder {
        bindings: &bindings,
        lines: LineIndex::new(source, prelude_lines),
        base: offset,
        root: Vec::new(),
        stack: Vec::new(),
        table_head: false,
        alignments: Vec::new(),
        cell: 0,
    };

    let parser = Parser::new_ext(&body, parser_options());
    for (event, range) in parser.into_offset_iter() {
        builder.event(event, range.start)?;
    }
    let nodes = builder.finish()?;

    Ok(Parsed { bindings, nodes })
}

/// Fold block-level opening tags that span several lines onto one line.
///
/// Line breaks inside such a tag become spaces so the Markdown parser sees a
/// single-line HTML block. Byte offsets are unchanged. Fenced code is left
/// alone, as is a tag that is still open at a blank line.
fn join_multiline_tags(body: &str) -> Cow<'_, str> {
    let mut joined: Option<Vec<u8>> = None;
    let mut fence: Option<&str> = None;
    let mut pos = 0;

    while pos < body.len() {
        let line_end = body[pos..].find('\n').map_or(body.len(), |i| pos + i + 1);
        let line = &body[pos..line_end];
        let indent = line.len() - line.trim_start_matches(' ').len();
        let content = line[indent..].trim_end();

        if let Some(marker) = fence {
            if indent < 4 && content.starts_with(marker) {
                fence = None;
            }
        } else if indent < 4 && (content.starts_with("```") || content.starts_with("~~~")) {
            fence = Some(&content[..3]);
        } else if indent < 4
            && content.starts_with('<')
            && content[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            && let Some(end) = multiline_tag_end(&body[pos + indent..])
        {
            let tag_end = pos + indent + end;
            let bytes = joined.get_or_insert_with(|| body.as_bytes().to_vec());
            for b in &mut bytes[pos + indent..tag_end] {
                if *b == b'\n' || *b == b'\r' {
                    *b = b' ';
                }
            }
            pos = body[tag_end..].find('\n').map_or(body.len(), |i| tag_end + i + 1);
            continue;
        }
        pos = line_end;
    }

    match joined.map(String::from_utf8) {
        Some(Ok(text)) => Cow::Owned(text),
        _ => Cow::Borrowed(body),
    }
}

/// Byte length of an opening tag at the start of `s` when it closes on a
/// later line, or `None` when it closes on its first line or never.
fn multiline_tag_end(s: &str) -> Option<usize> {
    let len = find_tag_end(&s[1..])? + 2;
    let tag = &s[..len];
    if !tag.contains('\n') || tag.lines().skip(1).any(|line| line.trim().is_empty()) {
        return None;
    }
    Some(len)
}

/// Maps byte offsets to 1-based body line numbers.
struct LineIndex {
    starts: Vec<usize>,
    prelude_lines: usize,
}

impl LineIndex {
    fn new(source: &str, prelude_lines: usize) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            starts,
            prelude_lines,
        }
    }

    fn line(&self, offset: usize) -> usize {
        let absolute = self.starts.partition_point(|&start| start <= offset);
        absolute.saturating_sub(self.prelude_lines).max(1)
    }
}

struct Frame {
    element: AstElement,
    /// Opened by an explicit tag rather than Markdown syntax.
    markup: bool,
    line: usize,
}

fn element_name(el: &AstElement) -> &str {
    match &el.kind {
        AstKind::Tag(name) | AstKind::Component(name) => name,
    }
}

struct AstBuilder<'a> {
    bindings: &'a [String],
    lines: LineIndex,
    base: usize,
    root: Vec<AstNode>,
    stack: Vec<Frame>,
    table_head: bool,
    alignments: Vec<Alignment>,
    cell: usize,
}

impl AstBuilder<'_> {
    fn event(&mut self, event: Event<'_>, start: usize) -> Result<(), CompileError> {
        let offset = self.base + start;
        match event {
            Event::Start(tag) => self.start_tag(tag, offset),
            Event::End(tag) => return self.end_tag(tag),
            Event::Text(text) => self.push(AstNode::Text(text.into_string())),
            Event::Code(code) => {
                let mut el = AstElement::tag("code");
                el.push(AstNode::Text(code.into_string()));
                self.push(el.into());
            }
            Event::Html(html) | Event::InlineHtml(html) => return self.markup(&html, offset),
            Event::SoftBreak => self.push(AstNode::Text("\n".to_owned())),
            Event::HardBreak => self.push(AstElement::tag("br").into()),
            Event::Rule => self.push(AstElement::tag("hr").into()),
            Event::TaskListMarker(checked) => self.push(
                AstElement::tag("input")
                    .with_attr("type", "checkbox")
                    .with_attr("checked", checked)
                    .with_attr("disabled", true)
                    .into(),
            ),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>, offset: usize) {
        let element = match tag {
            Tag::Paragraph => AstElement::tag("p"),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let mut el = AstElement::tag(heading_tag(level));
                if let Some(id) = id {
                    el = el.with_attr("id", id.into_string());
                }
                if !classes.is_empty() {
                    let joined: Vec<String> = classes.into_iter().map(|c| c.into_string()).collect();
                    el = el.with_attr("className", joined.join(" "));
                }
                for (name, value) in attrs {
                    let value = value.map_or(Value::Bool(true), |v| Value::String(v.into_string()));
                    el = el.with_attr(&name, value);
                }
                el
            }
            Tag::BlockQuote(_) => AstElement::tag("blockquote"),
            Tag::CodeBlock(kind) => {
                self.open(AstElement::tag("pre"), false, offset);
                let mut code = AstElement::tag("code");
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = info.split_whitespace().next()
                {
                    code = code.with_attr("className", format!("language-{lang}"));
                }
                code
            }
            Tag::List(start) => match start {
                Some(1) => AstElement::tag("ol"),
                Some(n) => AstElement::tag("ol").with_attr("start", n),
                None => AstElement::tag("ul"),
            },
            Tag::Item => AstElement::tag("li"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => return,
            Tag::DefinitionList => AstElement::tag("dl"),
            Tag::DefinitionListTitle => AstElement::tag("dt"),
            Tag::DefinitionListDefinition => AstElement::tag("dd"),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                AstElement::tag("table")
            }
            Tag::TableHead => {
                self.table_head = true;
                self.cell = 0;
                self.open(AstElement::tag("thead"), false, offset);
                AstElement::tag("tr")
            }
            Tag::TableRow => {
                if self.stack.last().is_some_and(|f| f.element.is_tag("table")) {
                    self.open(AstElement::tag("tbody"), false, offset);
                }
                self.cell = 0;
                AstElement::tag("tr")
            }
            Tag::TableCell => {
                let mut el = AstElement::tag(if self.table_head { "th" } else { "td" });
                match self.alignments.get(self.cell) {
                    Some(Alignment::Left) => el = el.with_attr("align", "left"),
                    Some(Alignment::Center) => el = el.with_attr("align", "center"),
                    Some(Alignment::Right) => el = el.with_attr("align", "right"),
                    Some(Alignment::None) | None => {}
                }
                el
            }
            Tag::Emphasis => AstElement::tag("em"),
            Tag::Strong => AstElement::tag("strong"),
            Tag::Strikethrough => AstElement::tag("del"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut el = AstElement::tag("a").with_attr("href", dest_url.into_string());
                if !title.is_empty() {
                    el = el.with_attr("title", title.into_string());
                }
                el
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut el = AstElement::tag("img").with_attr("src", dest_url.into_string());
                if !title.is_empty() {
                    el = el.with_attr("title", title.into_string());
                }
                el
            }
            Tag::Superscript => AstElement::tag("sup"),
            Tag::Subscript => AstElement::tag("sub"),
        };
        self.open(element, false, offset);
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), CompileError> {
        match tag {
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::CodeBlock => {
                self.close_markdown()?;
                self.close_markdown()?;
            }
            TagEnd::TableHead => {
                self.table_head = false;
                self.close_markdown()?;
                self.close_markdown()?;
            }
            TagEnd::TableCell => {
                self.cell += 1;
                self.close_markdown()?;
            }
            TagEnd::Table => {
                if self.stack.last().is_some_and(|f| f.element.is_tag("tbody")) {
                    self.close_markdown()?;
                }
                self.alignments.clear();
                self.close_markdown()?;
            }
            TagEnd::Image => {
                if let Some(mut el) = self.pop_markdown()? {
                    let alt = el.text_content();
                    el.children.clear();
                    self.push(el.with_attr("alt", alt).into());
                }
            }
            _ => self.close_markdown()?,
        }
        Ok(())
    }

    fn markup(&mut self, html: &str, offset: usize) -> Result<(), CompileError> {
        for (at, token) in tokenize(html) {
            let line = self.lines.line(offset + at);
            match token {
                Token::Text(text) => self.push(AstNode::Text(text)),
                Token::Open {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let element = self.markup_element(&name, attrs, line)?;
                    if self_closing || VOID_TAGS.contains(&name.as_str()) {
                        self.push(element.into());
                    } else {
                        self.stack.push(Frame {
                            element,
                            markup: true,
                            line,
                        });
                    }
                }
                Token::Close { name } => self.close_markup(&name, line)?,
            }
        }
        Ok(())
    }

    fn markup_element(
        &self,
        name: &str,
        attrs: Vec<(String, AttrValue)>,
        line: usize,
    ) -> Result<AstElement, CompileError> {
        let mut element = if name.starts_with(|c: char| c.is_ascii_lowercase()) {
            AstElement::tag(name)
        } else if self.bindings.iter().any(|b| b == name) {
            AstElement::component(name)
        } else {
            return Err(CompileError::UnknownComponent {
                name: name.to_owned(),
                line,
            });
        };

        for (attr, value) in attrs {
            let value = match value {
                AttrValue::Literal(s) => Value::String(s),
                AttrValue::Flag => Value::Bool(true),
                AttrValue::Expression(expr) => {
                    serde_json::from_str(&expr).map_err(|e| CompileError::InvalidAttribute {
                        name: attr.clone(),
                        message: e.to_string(),
                        line,
                    })?
                }
            };
            if attr == "key" {
                element.key = Some(match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    _ => {
                        return Err(CompileError::InvalidAttribute {
                            name: attr,
                            message: "key must be a string or number".to_owned(),
                            line,
                        });
                    }
                });
            } else {
                element.attrs.insert(attr, value);
            }
        }
        Ok(element)
    }

    fn close_markup(&mut self, name: &str, line: usize) -> Result<(), CompileError> {
        match self.stack.last() {
            Some(frame) if frame.markup && element_name(&frame.element) == name => {
                if let Some(frame) = self.stack.pop() {
                    self.push(frame.element.into());
                }
                Ok(())
            }
            Some(frame) if frame.markup => Err(CompileError::MismatchedTag {
                expected: element_name(&frame.element).to_owned(),
                found: name.to_owned(),
                line,
            }),
            _ if VOID_TAGS.contains(&name) => Ok(()),
            _ => Err(CompileError::UnexpectedClosingTag {
                name: name.to_owned(),
                line,
            }),
        }
    }

    fn open(&mut self, element: AstElement, markup: bool, offset: usize) {
        let line = self.lines.line(offset);
        self.stack.push(Frame {
            element,
            markup,
            line,
        });
    }

    /// Pop the innermost element opened by Markdown syntax.
    fn pop_markdown(&mut self) -> Result<Option<AstElement>, CompileError> {
        match self.stack.pop() {
            Some(frame) if frame.markup => Err(CompileError::UnclosedTag {
                name: element_name(&frame.element).to_owned(),
                line: frame.line,
            }),
            frame => Ok(frame.map(|f| f.element)),
        }
    }

    fn close_markdown(&mut self) -> Result<(), CompileError> {
        if let Some(element) = self.pop_markdown()? {
            self.push(element.into());
        }
        Ok(())
    }

    fn push(&mut self, node: AstNode) {
        match self.stack.last_mut() {
            Some(frame) => frame.element.push(node),
            None => push_node(&mut self.root, node),
        }
    }

    fn finish(mut self) -> Result<Vec<AstNode>, CompileError> {
        if let Some(frame) = self.stack.pop() {
            return Err(CompileError::UnclosedTag {
                name: element_name(&frame.element).to_owned(),
                line: frame.line,
            });
        }
        Ok(self.root)
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn text(s: &str) -> AstNode {
        AstNode::Text(s.to_owned())
    }

    fn el(mut element: AstElement, children: Vec<AstNode>) -> AstNode {
        element.children = children;
        AstNode::Element(element)
    }

    fn parse_body(body: &str) -> Result<Parsed, CompileError> {
        parse(body, 0)
    }

    #[test]
    fn test_import_prelude_becomes_bindings() {
        let source = "import Intro from \"Intro\";\nimport Note from \"Note\";\n\nHello\n";
        let parsed = parse(source, 3).unwrap();
        assert_eq!(parsed.bindings, ["Intro", "Note"]);
        assert_eq!(parsed.nodes, vec![el(AstElement::tag("p"), vec![text("Hello")])]);
    }

    #[test]
    fn test_paragraph_and_inline_formatting() {
        let parsed = parse_body("Hello *big* **bold** ~~old~~ `code`").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("p"),
                vec![
                    text("Hello "),
                    el(AstElement::tag("em"), vec![text("big")]),
                    text(" "),
                    el(AstElement::tag("strong"), vec![text("bold")]),
                    text(" "),
                    el(AstElement::tag("del"), vec![text("old")]),
                    text(" "),
                    el(AstElement::tag("code"), vec![text("code")]),
                ]
            )]
        );
    }

    #[test]
    fn test_heading_with_explicit_id() {
        let parsed = parse_body("## Using hooks {#hooks}").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("h2").with_attr("id", "hooks"),
                vec![text("Using hooks")]
            )]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let parsed = parse_body("```js\nconst a = 1;\n```\n").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("pre"),
                vec![el(
                    AstElement::tag("code").with_attr("className", "language-js"),
                    vec![text("const a = 1;\n")]
                )]
            )]
        );
    }

    #[test]
    fn test_ordered_list_start_and_tasks() {
        let parsed = parse_body("3. three\n4. four\n").unwrap();
        let AstNode::Element(list) = &parsed.nodes[0] else {
            panic!("expected list");
        };
        assert!(list.is_tag("ol"));
        assert_eq!(list.attrs.get("start"), Some(&json!(3)));
        assert_eq!(list.children.len(), 2);

        let parsed = parse_body("- [x] done\n").unwrap();
        let AstNode::Element(list) = &parsed.nodes[0] else {
            panic!("expected list");
        };
        let AstNode::Element(item) = &list.children[0] else {
            panic!("expected item");
        };
        let AstNode::Element(input) = &item.children[0] else {
            panic!("expected checkbox");
        };
        assert!(input.is_tag("input"));
        assert_eq!(input.attrs.get("checked"), Some(&json!(true)));
    }

    #[test]
    fn test_table_structure() {
        let parsed = parse_body("| a | b |\n|:--|--:|\n| 1 | 2 |\n").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("table"),
                vec![
                    el(
                        AstElement::tag("thead"),
                        vec![el(
                            AstElement::tag("tr"),
                            vec![
                                el(AstElement::tag("th").with_attr("align", "left"), vec![text("a")]),
                                el(AstElement::tag("th").with_attr("align", "right"), vec![text("b")]),
                            ]
                        )]
                    ),
                    el(
                        AstElement::tag("tbody"),
                        vec![el(
                            AstElement::tag("tr"),
                            vec![
                                el(AstElement::tag("td").with_attr("align", "left"), vec![text("1")]),
                                el(AstElement::tag("td").with_attr("align", "right"), vec![text("2")]),
                            ]
                        )]
                    ),
                ]
            )]
        );
    }

    #[test]
    fn test_image_alt_collected() {
        let parsed = parse_body("![A *cat*](cat.png \"Cat\")").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("p"),
                vec![el(
                    AstElement::tag("img")
                        .with_attr("src", "cat.png")
                        .with_attr("title", "Cat")
                        .with_attr("alt", "A cat"),
                    vec![]
                )]
            )]
        );
    }

    #[test]
    fn test_block_component_wraps_markdown() {
        let source = "import Note from \"Note\";\n\n<Note tone=\"warm\" key=\"n1\">\n\nSome **text**\n\n</Note>\n";
        let parsed = parse(source, 2).unwrap();
        let mut note = AstElement::component("Note").with_attr("tone", "warm");
        note.key = Some("n1".to_owned());
        assert_eq!(
            parsed.nodes,
            vec![el(
                note,
                vec![el(
                    AstElement::tag("p"),
                    vec![
                        text("Some "),
                        el(AstElement::tag("strong"), vec![text("text")])
                    ]
                )]
            )]
        );
    }

    #[test]
    fn test_inline_component_in_paragraph() {
        let source = "import Badge from \"Badge\";\n\nNew <Badge count={2} /> here";
        let parsed = parse(source, 2).unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("p"),
                vec![
                    text("New "),
                    el(AstElement::component("Badge").with_attr("count", 2), vec![]),
                    text(" here"),
                ]
            )]
        );
    }

    #[test]
    fn test_unknown_component_reports_line() {
        let err = parse_body("Intro text\n\n<Missing />\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownComponent {
                name: "Missing".to_owned(),
                line: 3
            }
        );
    }

    #[test]
    fn test_line_numbers_skip_prelude() {
        let source = "import A from \"A\";\n\n<Nope />\n";
        let err = parse(source, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownComponent {
                name: "Nope".to_owned(),
                line: 1
            }
        );
    }

    #[test]
    fn test_mismatched_and_unclosed_tags() {
        let source = "import A from \"A\";\nimport B from \"B\";\n\n<A>\n<B>\n</A>\n";
        let err = parse(source, 3).unwrap_err();
        assert!(matches!(err, CompileError::MismatchedTag { ref expected, ref found, .. } if expected == "B" && found == "A"));

        let source = "import A from \"A\";\n\n<A>\n\ntext\n";
        let err = parse(source, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnclosedTag {
                name: "A".to_owned(),
                line: 1
            }
        );
    }

    #[test]
    fn test_body_import_must_be_declared() {
        let source = "import Note from \"Note\";\n\nimport Note from \"Note\";\n\n<Note />\n";
        let parsed = parse(source, 2).unwrap();
        assert_eq!(parsed.bindings, ["Note"]);

        let source = "import Note from \"Note\";\n\nimport Ghost from \"Ghost\";\n\n<Ghost />\n";
        let err = parse(source, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvedImport {
                name: "Ghost".to_owned(),
                line: 1
            }
        );
    }

    #[test]
    fn test_multiline_block_tag() {
        let source = "import Note from \"Note\";\n\n<Note\n  tone=\"warm\"\n  level={2}>\n\nHi\n\n</Note>\n";
        let parsed = parse(source, 2).unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::component("Note")
                    .with_attr("tone", "warm")
                    .with_attr("level", 2),
                vec![el(AstElement::tag("p"), vec![text("Hi")])]
            )]
        );
    }

    #[test]
    fn test_multiline_tag_keeps_line_numbers() {
        let source = "import Note from \"Note\";\n\n<Note\n  tone=\"warm\">\n\n<Missing />\n\n</Note>\n";
        let err = parse(source, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownComponent {
                name: "Missing".to_owned(),
                line: 4
            }
        );
    }

    #[test]
    fn test_join_multiline_tags_skips_code_and_blank_lines() {
        let fenced = "```html\n<div\n  class=\"x\">\n```\n";
        assert_eq!(join_multiline_tags(fenced), fenced);

        let open = "<div\n\nclass=\"x\">\n";
        assert_eq!(join_multiline_tags(open), open);

        assert_eq!(
            join_multiline_tags("<div\n  class=\"x\">\ntext\n"),
            "<div   class=\"x\">\ntext\n"
        );
    }

    #[test]
    fn test_unexpected_closing_tag() {
        let err = parse_body("<div>\n\n</span>\n").unwrap_err();
        assert!(matches!(err, CompileError::MismatchedTag { .. }));

        let err = parse_body("</section>\n").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedClosingTag { ref name, .. } if name == "section"));
    }

    #[test]
    fn test_invalid_attribute_expression() {
        let err = parse_body("<div data={oops} />\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidAttribute { ref name, line: 1, .. } if name == "data"));
    }

    #[test]
    fn test_void_tags_and_comments() {
        let parsed = parse_body("<!-- note to self -->\n\nline<br>after\n").unwrap();
        assert_eq!(
            parsed.nodes,
            vec![el(
                AstElement::tag("p"),
                vec![text("line"), el(AstElement::tag("br"), vec![]), text("after")]
            )]
        );
    }
}
