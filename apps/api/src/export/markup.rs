//! Reads rendered resume markup into a flat list of text blocks.
//!
//! Only what the exporter draws is kept: headings, paragraphs and list items
//! in document order. Inline tags are transparent, block-level tags start a
//! new block, and whitespace collapses the way a browser would collapse it.

use crate::export::font_metrics::FontFamily;
use crate::export::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Heading,
    Subheading,
    Body,
    ListItem,
}

impl BlockKind {
    pub fn is_bold(self) -> bool {
        matches!(self, BlockKind::Title | BlockKind::Heading | BlockKind::Subheading)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub family: FontFamily,
    pub blocks: Vec<Block>,
}

/// Elements whose content cannot be drawn from the markup alone.
const UNRASTERIZABLE: [&str; 4] = ["iframe", "object", "embed", "script"];

/// Elements whose content is never text on the page.
const SKIPPED: [&str; 4] = ["style", "head", "title", "template"];

const BLOCK_TAGS: [&str; 22] = [
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt", "footer",
    "header", "hr", "html", "main", "nav", "ol", "p", "section", "table", "tr", "ul",
];

struct Tag<'a> {
    name: String,
    closing: bool,
    attrs: &'a str,
}

fn parse_tag(raw: &str) -> Tag<'_> {
    let raw = raw.trim().trim_end_matches('/');
    let (closing, rest) = match raw.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, raw),
    };
    let end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    Tag {
        name: rest[..end].to_ascii_lowercase(),
        closing,
        attrs: &rest[end..],
    }
}

fn has_class(attrs: &str, class: &str) -> bool {
    let Some(start) = attrs.find("class=") else {
        return false;
    };
    let value = &attrs[start + "class=".len()..];
    let value = match value.chars().next() {
        Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or(""),
        _ => value.split_whitespace().next().unwrap_or(""),
    };
    value.split_whitespace().any(|c| c == class)
}

/// Decodes the named entities the renderer emits plus numeric references.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

struct Builder {
    blocks: Vec<Block>,
    kind: BlockKind,
    text: String,
}

impl Builder {
    fn flush(&mut self) {
        let collapsed = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            self.blocks.push(Block {
                kind: self.kind,
                text: collapsed,
            });
        }
        self.text.clear();
    }

    fn start(&mut self, kind: BlockKind) {
        self.flush();
        self.kind = kind;
    }
}

fn heading_kind(name: &str) -> Option<BlockKind> {
    match name {
        "h1" => Some(BlockKind::Title),
        "h2" => Some(BlockKind::Heading),
        "h3" | "h4" | "h5" | "h6" => Some(BlockKind::Subheading),
        _ => None,
    }
}

/// Parses markup into blocks. Fails on content that cannot be drawn and on
/// markup with no visible text.
pub fn parse(markup: &str) -> Result<Document, ExportError> {
    let mut family = None;
    let mut b = Builder {
        blocks: Vec::new(),
        kind: BlockKind::Body,
        text: String::new(),
    };
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        b.text.push_str(&decode_entities(&rest[..lt]));
        let after = &rest[lt + 1..];

        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }
        let Some(gt) = after.find('>') else {
            // A lone '<' is text.
            b.text.push('<');
            rest = after;
            continue;
        };
        let tag = parse_tag(&after[..gt]);
        rest = &after[gt + 1..];

        if tag.name.starts_with('!') || tag.name.starts_with('?') {
            continue;
        }
        if UNRASTERIZABLE.contains(&tag.name.as_str()) {
            return Err(ExportError::Unrasterizable(tag.name));
        }
        if !tag.closing && family.is_none() {
            family = Some(if has_class(tag.attrs, "font-serif") {
                FontFamily::Serif
            } else {
                FontFamily::Sans
            });
        }
        if !tag.closing && SKIPPED.contains(&tag.name.as_str()) {
            let close = format!("</{}", tag.name);
            rest = rest
                .to_ascii_lowercase()
                .find(&close)
                .and_then(|at| rest[at..].find('>').map(|gt| &rest[at + gt + 1..]))
                .unwrap_or("");
            continue;
        }

        if let Some(kind) = heading_kind(&tag.name) {
            b.start(if tag.closing { BlockKind::Body } else { kind });
        } else if tag.name == "li" {
            b.start(if tag.closing { BlockKind::Body } else { BlockKind::ListItem });
        } else if BLOCK_TAGS.contains(&tag.name.as_str()) {
            // Block boundaries inside a heading or item keep its kind.
            let kind = b.kind;
            b.flush();
            b.kind = kind;
        } else if tag.name == "td" || tag.name == "th" {
            b.text.push(' ');
        }
    }
    b.text.push_str(&decode_entities(rest));
    b.flush();

    if b.blocks.is_empty() {
        return Err(ExportError::EmptyDocument);
    }
    Ok(Document {
        family: family.unwrap_or(FontFamily::Sans),
        blocks: b.blocks,
    })
}
