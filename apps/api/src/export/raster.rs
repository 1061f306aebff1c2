//! Lays text blocks out at device resolution.
//!
//! The result is a display list: one positioned text run per printed line, in
//! device pixels measured from the top-left of the content box of an
//! infinitely tall page. Pagination slices it afterwards.

use crate::export::font_metrics::{FontFamily, FontMetricTable};
use crate::export::markup::{BlockKind, Document};
use crate::export::surface::PageGeometry;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f32 = 1.4;

const BULLET: &str = "- ";

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Left edge, device px from the content box.
    pub x: f32,
    /// Top of the line box, device px.
    pub top: f32,
    /// Height of the line box, device px.
    pub height: f32,
    /// Font size, device px.
    pub size: f32,
    pub bold: bool,
}

impl TextRun {
    /// Baseline offset from the top of the line box.
    pub fn baseline(&self) -> f32 {
        self.top + (self.height + self.size * 0.7) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub family: FontFamily,
    pub runs: Vec<TextRun>,
}

struct BlockStyle {
    /// CSS px.
    size: f32,
    space_before: f32,
    space_after: f32,
}

fn style(kind: BlockKind) -> BlockStyle {
    match kind {
        BlockKind::Title => BlockStyle {
            size: 30.0,
            space_before: 0.0,
            space_after: 6.0,
        },
        BlockKind::Heading => BlockStyle {
            size: 20.0,
            space_before: 14.0,
            space_after: 6.0,
        },
        BlockKind::Subheading => BlockStyle {
            size: 16.0,
            space_before: 8.0,
            space_after: 2.0,
        },
        BlockKind::Body => BlockStyle {
            size: 14.0,
            space_before: 0.0,
            space_after: 4.0,
        },
        BlockKind::ListItem => BlockStyle {
            size: 14.0,
            space_before: 0.0,
            space_after: 2.0,
        },
    }
}

/// Splits a word that is wider than a whole line at character boundaries.
fn split_long_word<'a>(
    word: &'a str,
    metrics: &FontMetricTable,
    size: f32,
    bold: bool,
    max_width: f32,
) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut width = 0.0_f32;
    for (i, c) in word.char_indices() {
        let w = metrics.measure_px(c.encode_utf8(&mut [0; 4]), size, bold);
        if i > start && width + w > max_width {
            pieces.push(&word[start..i]);
            start = i;
            width = 0.0;
        }
        width += w;
    }
    pieces.push(&word[start..]);
    pieces
}

/// Greedy word wrap. Returns the lines of `text` fitting within `max_width` px.
pub fn wrap(
    text: &str,
    metrics: &FontMetricTable,
    size: f32,
    bold: bool,
    max_width: f32,
) -> Vec<String> {
    let space_w = metrics.space_width * size;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let pieces = if metrics.measure_px(word, size, bold) > max_width {
            split_long_word(word, metrics, size, bold, max_width)
        } else {
            vec![word]
        };
        for piece in pieces {
            let word_w = metrics.measure_px(piece, size, bold);
            if current.is_empty() {
                current.push_str(piece);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(piece);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(piece);
                current_width += space_w + word_w;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Rasterizes `document` onto the content box of `geometry`.
pub fn rasterize(document: &Document, geometry: &PageGeometry) -> DisplayList {
    let metrics = document.family.metrics();
    let scale = geometry.scale;
    let content_width = geometry.content_width_px();
    let mut runs = Vec::new();
    let mut y = 0.0_f32;

    for (index, block) in document.blocks.iter().enumerate() {
        let s = style(block.kind);
        let size = s.size * scale;
        let bold = block.kind.is_bold();
        let line_height = size * LINE_HEIGHT;
        if index > 0 {
            y += s.space_before * scale;
        }

        let (indent, first_prefix) = if block.kind == BlockKind::ListItem {
            (metrics.measure_px(BULLET, size, bold), BULLET)
        } else {
            (0.0, "")
        };

        for (i, line) in wrap(&block.text, metrics, size, bold, content_width - indent)
            .into_iter()
            .enumerate()
        {
            let (x, text) = if i == 0 && !first_prefix.is_empty() {
                (0.0, format!("{first_prefix}{line}"))
            } else {
                (indent, line)
            };
            runs.push(TextRun {
                text,
                x,
                top: y,
                height: line_height,
                size,
                bold,
            });
            y += line_height;
        }
        y += s.space_after * scale;
    }

    DisplayList {
        family: document.family,
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::markup::Block;

    fn doc(blocks: Vec<(BlockKind, &str)>) -> Document {
        Document {
            family: FontFamily::Sans,
            blocks: blocks
                .into_iter()
                .map(|(kind, text)| Block {
                    kind,
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let metrics = FontFamily::Sans.metrics();
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let lines = wrap(&text, metrics, 28.0, false, 600.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_px(line, 28.0, false) <= 600.0);
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let metrics = FontFamily::Sans.metrics();
        let word = "x".repeat(200);
        let lines = wrap(&word, metrics, 28.0, false, 300.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap("   ", FontFamily::Serif.metrics(), 28.0, false, 300.0).is_empty());
    }

    #[test]
    fn test_runs_stack_top_to_bottom_at_scale() {
        let list = rasterize(
            &doc(vec![(BlockKind::Title, "Jane Doe"), (BlockKind::Body, "Engineer")]),
            &PageGeometry::A4,
        );
        assert_eq!(list.runs.len(), 2);
        assert_eq!(list.runs[0].size, 60.0);
        assert!(list.runs[0].bold);
        assert!(!list.runs[1].bold);
        assert!(list.runs[1].top >= list.runs[0].top + list.runs[0].height);
    }

    #[test]
    fn test_list_item_gets_bullet_and_hanging_indent() {
        let long = "word ".repeat(120);
        let list = rasterize(&doc(vec![(BlockKind::ListItem, long.as_str())]), &PageGeometry::A4);
        assert!(list.runs.len() > 1);
        assert!(list.runs[0].text.starts_with("- "));
        assert_eq!(list.runs[0].x, 0.0);
        assert!(list.runs[1].x > 0.0);
    }

    #[test]
    fn test_baseline_inside_line_box() {
        let list = rasterize(&doc(vec![(BlockKind::Body, "x")]), &PageGeometry::A4);
        let run = &list.runs[0];
        assert!(run.baseline() > run.top && run.baseline() < run.top + run.height);
    }
}
