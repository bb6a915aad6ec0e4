//! DOCX-to-HTML conversion
//!
//! Walks a loaded document paragraph by paragraph and emits a template
//! fragment: fixed inheritance boilerplate around `<p>` blocks whose runs
//! are wrapped in nested `<i>`/`<b>`/`<u>` tags with inline styles.
//!
//! Style resolution is a set of pure per-attribute functions; the caller
//! decides at every call site whether a missing value falls back to the
//! configured default or is omitted from the output.

use super::{Alignment, DocumentSource, ParagraphSource, RunSource, SIZE_UNITS_PER_POINT};

/// Stored point sizes are too small for on-screen display; every emitted
/// `font-size` is scaled by this factor.
const FONT_SCALING: u32 = 2;

/// Candidate point sizes tried when mapping raw units back to points.
const MAX_POINT_CANDIDATE: i64 = 63;

const LINE_BREAK: &str = "<br>";

/// Template-inheritance boilerplate surrounding the generated markup. The
/// fragment plugs into the site's `article.html` under the `title` and
/// `article` blocks.
const FRAGMENT_HEADER: &str = "\n{% extends \"article.html\" %}\n{% block title %}{{ db_entry.title }}{% endblock %}\n{% block article %}\n";
const FRAGMENT_FOOTER: &str = "\n{% endblock %}\n";

/// What a resolver does when the source attribute is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Substitute the configured default.
    Default,
    /// Leave the attribute out of the emitted style.
    Omit,
}

/// Immutable default style attributes, substituted wherever a source
/// attribute is missing and fallback is requested.
#[derive(Debug, Clone)]
pub struct StyleDefaults {
    pub font: String,
    /// Point size (pre display scaling).
    pub size: u32,
    pub align: Alignment,
    /// Hex color including the leading `#`.
    pub color: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font: "calibri".to_string(),
            size: 11,
            align: Alignment::Left,
            color: "#000000".to_string(),
        }
    }
}

/// Pure, single-pass converter from a document model to an HTML fragment.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    defaults: StyleDefaults,
}

impl DocxConverter {
    pub fn new(defaults: StyleDefaults) -> Self {
        Self { defaults }
    }

    /// Full template fragment: boilerplate header, converted paragraphs,
    /// closing footer.
    pub fn convert(&self, doc: &DocumentSource) -> String {
        format!("{}{}{}", FRAGMENT_HEADER, self.content_html(doc), FRAGMENT_FOOTER)
    }

    /// Converted paragraphs only, without the surrounding boilerplate.
    /// This is what gets stored as an article's body.
    pub fn content_html(&self, doc: &DocumentSource) -> String {
        let mut html = String::new();
        for paragraph in &doc.paragraphs {
            html.push_str(&self.render_paragraph(paragraph));
        }
        html
    }

    /// Paragraph-level font/size/alignment are sampled from the first run
    /// only; mixed-style paragraphs keep the first run's values. A
    /// paragraph without runs renders as a line break with default style.
    /// Color stays a run-level concern and is never applied to the `<p>`.
    fn render_paragraph(&self, paragraph: &ParagraphSource) -> String {
        let mut content = String::new();
        let (font, size, align) = match paragraph.runs.first() {
            Some(first) => (
                resolve_font(first.font.as_deref(), Fallback::Default, &self.defaults),
                resolve_size(first.size, Fallback::Default, &self.defaults),
                resolve_align(paragraph.alignment, Fallback::Default, &self.defaults),
            ),
            None => {
                content.push_str(LINE_BREAK);
                (
                    Some(self.defaults.font.clone()),
                    Some(self.defaults.size),
                    Some(self.defaults.align.as_css()),
                )
            }
        };

        for run in &paragraph.runs {
            content.push_str(&self.render_run(run));
        }

        let style = style_declaration(font.as_deref(), size, align, None);
        format!("{}\n", wrap("p", &content, &style))
    }

    /// Decorations compose by successive wrapping in fixed order: italic
    /// first, then bold around it, then underline around the result. An
    /// undecorated run passes through as plain text.
    fn render_run(&self, run: &RunSource) -> String {
        if run.text.is_empty() {
            return LINE_BREAK.to_string();
        }

        let font = resolve_font(run.font.as_deref(), Fallback::Omit, &self.defaults);
        let size = resolve_size(run.size, Fallback::Omit, &self.defaults);
        let color = resolve_color(run.color.as_deref(), &self.defaults);
        let style = style_declaration(font.as_deref(), size, None, Some(&color));

        let mut content = run.text.clone();
        let decorations = [(run.italic, "i"), (run.bold, "b"), (run.underline, "u")];
        for (enabled, tag) in decorations {
            if enabled {
                content = wrap(tag, &content, &style);
            }
        }
        content
    }
}

/// Lowercased font family name, or the fallback policy's answer.
pub fn resolve_font(name: Option<&str>, policy: Fallback, defaults: &StyleDefaults) -> Option<String> {
    match name {
        Some(name) if !name.is_empty() => Some(name.to_lowercase()),
        _ => match policy {
            Fallback::Default => Some(defaults.font.clone()),
            Fallback::Omit => None,
        },
    }
}

/// Map a raw size in internal units back to whole points by scanning for
/// an exact candidate match. A raw value that is no exact multiple of the
/// unit scale resolves to nothing rather than an error.
pub fn resolve_size(raw: Option<i64>, policy: Fallback, defaults: &StyleDefaults) -> Option<u32> {
    match raw {
        Some(raw) if raw != 0 => (0..=MAX_POINT_CANDIDATE)
            .find(|points| points * SIZE_UNITS_PER_POINT == raw)
            .map(|points| points as u32),
        _ => match policy {
            Fallback::Default => Some(defaults.size),
            Fallback::Omit => None,
        },
    }
}

pub fn resolve_align(
    alignment: Option<Alignment>,
    policy: Fallback,
    defaults: &StyleDefaults,
) -> Option<&'static str> {
    match alignment {
        Some(alignment) => Some(alignment.as_css()),
        None => match policy {
            Fallback::Default => Some(defaults.align.as_css()),
            Fallback::Omit => None,
        },
    }
}

/// Hex digits become `#`-prefixed CSS. Both true absence and the literal
/// string "None" resolve to the default: the source library stringifies a
/// missing color as "None" instead of returning nothing.
pub fn resolve_color(hex: Option<&str>, defaults: &StyleDefaults) -> String {
    match hex {
        Some(hex) if !hex.is_empty() && hex != "None" => format!("#{hex}"),
        _ => defaults.color.clone(),
    }
}

/// Inline style declaration from the resolved attributes. Absent fields
/// contribute nothing; an all-absent declaration is the empty string.
fn style_declaration(
    font: Option<&str>,
    size: Option<u32>,
    align: Option<&str>,
    color: Option<&str>,
) -> String {
    let mut style = String::new();
    if let Some(font) = font {
        style.push_str(&format!("font-family: {font};"));
    }
    if let Some(size) = size {
        style.push_str(&format!("font-size: {}px;", size * FONT_SCALING));
    }
    if let Some(align) = align {
        style.push_str(&format!("text-align: {align};"));
    }
    if let Some(color) = color {
        style.push_str(&format!("color: {color};"));
    }
    style
}

/// Wrap content in a tag, attaching the style attribute only when the
/// declaration is non-empty.
fn wrap(tag: &str, content: &str, style: &str) -> String {
    if style.is_empty() {
        format!("<{tag}>{content}</{tag}>")
    } else {
        format!("<{tag} style='{style}'>{content}</{tag}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> RunSource {
        RunSource {
            text: text.to_string(),
            ..RunSource::default()
        }
    }

    fn single_paragraph(runs: Vec<RunSource>, alignment: Option<Alignment>) -> DocumentSource {
        DocumentSource {
            paragraphs: vec![ParagraphSource { alignment, runs }],
        }
    }

    #[test]
    fn absent_attributes_resolve_to_documented_defaults() {
        let defaults = StyleDefaults::default();
        assert_eq!(
            resolve_font(None, Fallback::Default, &defaults).as_deref(),
            Some("calibri")
        );
        assert_eq!(resolve_size(None, Fallback::Default, &defaults), Some(11));
        assert_eq!(
            resolve_align(None, Fallback::Default, &defaults),
            Some("left")
        );
        assert_eq!(resolve_color(None, &defaults), "#000000");
    }

    #[test]
    fn absent_attributes_omitted_without_fallback() {
        let defaults = StyleDefaults::default();
        assert_eq!(resolve_font(None, Fallback::Omit, &defaults), None);
        assert_eq!(resolve_size(None, Fallback::Omit, &defaults), None);
        assert_eq!(resolve_align(None, Fallback::Omit, &defaults), None);
    }

    #[test]
    fn size_round_trips_for_every_point_candidate() {
        let defaults = StyleDefaults::default();
        for points in 0..=63i64 {
            let raw = points * SIZE_UNITS_PER_POINT;
            if points == 0 {
                // raw 0 counts as absent and takes the fallback path
                assert_eq!(
                    resolve_size(Some(raw), Fallback::Default, &defaults),
                    Some(defaults.size)
                );
            } else {
                assert_eq!(
                    resolve_size(Some(raw), Fallback::Default, &defaults),
                    Some(points as u32)
                );
            }
        }
    }

    #[test]
    fn inexact_size_resolves_to_absent() {
        let defaults = StyleDefaults::default();
        assert_eq!(resolve_size(Some(230), Fallback::Default, &defaults), None);
        assert_eq!(resolve_size(Some(230), Fallback::Omit, &defaults), None);
        // Out of the candidate range entirely
        assert_eq!(
            resolve_size(Some(64 * SIZE_UNITS_PER_POINT), Fallback::Default, &defaults),
            None
        );
    }

    #[test]
    fn color_sentinel_and_hex_prefix() {
        let defaults = StyleDefaults::default();
        assert_eq!(resolve_color(None, &defaults), "#000000");
        assert_eq!(resolve_color(Some("None"), &defaults), "#000000");
        assert_eq!(resolve_color(Some("abcdef"), &defaults), "#abcdef");
    }

    #[test]
    fn font_names_are_lowercased() {
        let defaults = StyleDefaults::default();
        assert_eq!(
            resolve_font(Some("Times New Roman"), Fallback::Omit, &defaults).as_deref(),
            Some("times new roman")
        );
    }

    #[test]
    fn decorations_nest_italic_then_bold_then_underline() {
        let converter = DocxConverter::default();
        let doc = single_paragraph(
            vec![RunSource {
                text: "x".to_string(),
                italic: true,
                bold: true,
                underline: true,
                ..RunSource::default()
            }],
            None,
        );
        let html = converter.content_html(&doc);
        let u_at = html.find("<u ").unwrap();
        let b_at = html.find("<b ").unwrap();
        let i_at = html.find("<i ").unwrap();
        assert!(u_at < b_at && b_at < i_at, "expected u(b(i(text))): {html}");
        assert!(html.contains("x</i></b></u>"));
    }

    #[test]
    fn empty_run_text_becomes_a_line_break() {
        let converter = DocxConverter::default();
        let doc = single_paragraph(
            vec![RunSource {
                text: String::new(),
                bold: true,
                underline: true,
                ..RunSource::default()
            }],
            None,
        );
        let html = converter.content_html(&doc);
        assert!(html.contains("><br></p>"));
        // "<br>" shares a prefix with "<b", so check both tag forms
        assert!(
            !html.contains("<b>") && !html.contains("<b "),
            "no empty decorated tag expected: {html}"
        );
        assert!(
            !html.contains("<u>") && !html.contains("<u "),
            "no empty decorated tag expected: {html}"
        );
    }

    #[test]
    fn paragraph_without_runs_breaks_line_with_default_style() {
        let converter = DocxConverter::default();
        let doc = DocumentSource {
            paragraphs: vec![ParagraphSource::default()],
        };
        let html = converter.content_html(&doc);
        assert_eq!(
            html,
            "<p style='font-family: calibri;font-size: 22px;text-align: left;'><br></p>\n"
        );
    }

    #[test]
    fn undecorated_run_stays_plain_text() {
        let converter = DocxConverter::default();
        let doc = single_paragraph(vec![run("just words")], None);
        let html = converter.content_html(&doc);
        assert!(html.contains(">just words</p>"));
        assert!(!html.contains("<i") && !html.contains("<b") && !html.contains("<u"));
    }

    #[test]
    fn end_to_end_single_bold_run() {
        let converter = DocxConverter::default();
        let doc = single_paragraph(
            vec![RunSource {
                text: "Hello".to_string(),
                font: Some("Arial".to_string()),
                size: Some(240),
                color: Some("FF0000".to_string()),
                bold: true,
                ..RunSource::default()
            }],
            Some(Alignment::Center),
        );
        let html = converter.content_html(&doc);
        assert_eq!(
            html,
            "<p style='font-family: arial;font-size: 24px;text-align: center;'>\
             <b style='font-family: arial;font-size: 24px;color: #FF0000;'>Hello</b></p>\n"
        );
    }

    #[test]
    fn fragment_carries_title_and_article_blocks() {
        let converter = DocxConverter::default();
        let doc = single_paragraph(vec![run("body")], None);
        let fragment = converter.convert(&doc);
        assert!(fragment.starts_with("\n{% extends \"article.html\" %}"));
        assert!(fragment.contains("{% block title %}{{ db_entry.title }}{% endblock %}"));
        assert!(fragment.contains("{% block article %}"));
        assert!(fragment.ends_with("\n{% endblock %}\n"));
        assert!(fragment.contains(">body</p>"));
    }

    #[test]
    fn mixed_paragraph_samples_first_run_only() {
        let converter = DocxConverter::default();
        let first = RunSource {
            text: "big".to_string(),
            font: Some("Georgia".to_string()),
            size: Some(320), // 16pt
            ..RunSource::default()
        };
        let second = RunSource {
            text: " small".to_string(),
            font: Some("Courier".to_string()),
            size: Some(160), // 8pt
            bold: true,
            ..RunSource::default()
        };
        let doc = single_paragraph(vec![first, second], Some(Alignment::Right));
        let html = converter.content_html(&doc);
        assert!(html.starts_with(
            "<p style='font-family: georgia;font-size: 32px;text-align: right;'>"
        ));
        assert!(html.contains("<b style='font-family: courier;font-size: 16px;color: #000000;'>"));
    }
}
