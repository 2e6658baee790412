//! Markdown sanitization.
//!
//! Story and chapter bodies are markdown with a restricted inline-HTML
//! surface. Only a small allow-list of bare formatting tags survives; every
//! other tag, and any allowed tag carrying attributes, is entity-escaped
//! rather than removed so no author text is ever dropped. Code spans and
//! fenced code blocks are passed through untouched, since HTML inside code is
//! literal text to a markdown renderer.
//!
//! The filter is a single pass over the text. It tracks code context
//! (backtick runs and fences) but never parses markdown structure beyond
//! that.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Inline HTML tags that survive sanitization (bare, attribute-free form).
pub const ALLOWED_TAGS: &[&str] = &[
    "em",
    "strong",
    "b",
    "i",
    "u",
    "s",
    "sub",
    "sup",
    "br",
    "hr",
    "blockquote",
    "p",
    "span",
];

/// A sanitized markdown body.
///
/// The only way to build one from raw input is [`Markdown::sanitize`], so
/// every `Markdown` held by the domain has already passed the filter.
///
/// # Example
///
/// ```
/// use quill_domain::Markdown;
///
/// let body = Markdown::sanitize("He was <em>gone</em>. <script>x()</script>");
/// assert_eq!(
///     body.as_str(),
///     "He was <em>gone</em>. &lt;script&gt;x()&lt;/script&gt;"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markdown(String);

impl Markdown {
    /// Sanitizes raw markdown input.
    #[must_use]
    pub fn sanitize(raw: &str) -> Self {
        Self(sanitize_markdown(raw))
    }

    /// Wraps text that is already sanitized (store-internal use).
    #[must_use]
    pub fn from_sanitized(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the body as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Matches a bare opening/closing/self-closing tag with no attributes.
fn bare_tag_regex() -> &'static Regex {
    static BARE_TAG: OnceLock<Regex> = OnceLock::new();
    BARE_TAG.get_or_init(|| {
        Regex::new(r"^</?([a-zA-Z][a-zA-Z0-9]*)\s*/?>").expect("static regex is valid")
    })
}

/// Matches any tag-like construct, attributes and all.
fn any_tag_regex() -> &'static Regex {
    static ANY_TAG: OnceLock<Regex> = OnceLock::new();
    ANY_TAG.get_or_init(|| Regex::new(r"^</?[a-zA-Z][^>]*>").expect("static regex is valid"))
}

/// Runs the allow-list filter over a full markdown document.
fn sanitize_markdown(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // (fence char, fence length) while inside a fenced block
    let mut fence: Option<(char, usize)> = None;

    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(open) = fence_marker(trimmed) {
            match fence {
                None => {
                    fence = Some(open);
                    out.push_str(line);
                    continue;
                }
                Some((ch, len)) if open.0 == ch && open.1 >= len => {
                    fence = None;
                    out.push_str(line);
                    continue;
                }
                Some(_) => {}
            }
        }

        if fence.is_some() {
            out.push_str(line);
        } else {
            sanitize_line(line, &mut out);
        }
    }

    out
}

/// Returns the fence marker (char, run length) if the line opens or closes a
/// fenced code block.
fn fence_marker(trimmed_line: &str) -> Option<(char, usize)> {
    let first = trimmed_line.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = trimmed_line.chars().take_while(|&c| c == first).count();
    (run >= 3).then_some((first, run))
}

/// Sanitizes a single line outside any fenced block.
///
/// Inline code spans (matched backtick runs) are copied verbatim; `<` outside
/// code either begins an allowed bare tag (kept) or gets entity-escaped.
fn sanitize_line(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                let run = backtick_run(line, i);
                match find_closing_run(line, i + run, run) {
                    Some(end) => {
                        // Whole code span, verbatim
                        out.push_str(&line[i..end]);
                        i = end;
                    }
                    None => {
                        // Unmatched run is literal text
                        out.push_str(&line[i..i + run]);
                        i += run;
                    }
                }
            }
            b'<' => {
                let rest = &line[i..];
                if let Some(m) = bare_tag_regex().find(rest) {
                    let name = tag_name(m.as_str());
                    if ALLOWED_TAGS.contains(&name.to_lowercase().as_str()) {
                        out.push_str(m.as_str());
                        i += m.end();
                        continue;
                    }
                }
                // Disallowed tag, allowed tag with attributes, or a stray `<`
                if let Some(m) = any_tag_regex().find(rest) {
                    out.push_str(&html_escape::encode_text(m.as_str()));
                    i += m.end();
                } else {
                    out.push_str("&lt;");
                    i += 1;
                }
            }
            _ => {
                // Copy up to the next character of interest in one go
                let next = line[i..]
                    .find(['`', '<'])
                    .map_or(line.len(), |off| i + off);
                out.push_str(&line[i..next]);
                i = next;
            }
        }
    }
}

/// Length of the backtick run starting at `start`.
fn backtick_run(line: &str, start: usize) -> usize {
    line[start..].chars().take_while(|&c| c == '`').count()
}

/// Finds the end (exclusive) of the code span opened by a run of `len`
/// backticks, scanning from `from`. Per CommonMark the closing run must have
/// exactly the same length.
fn find_closing_run(line: &str, from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    let bytes = line.as_bytes();
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = backtick_run(line, i);
            if run == len {
                return Some(i + run);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Extracts the tag name from a matched bare tag like `</em>` or `<br/>`.
fn tag_name(tag: &str) -> &str {
    let inner = tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .trim_end_matches('>')
        .trim_end_matches('/');
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        let body = Markdown::sanitize("It was a dark and stormy night.");
        assert_eq!(body.as_str(), "It was a dark and stormy night.");
    }

    #[test]
    fn test_allowed_tags_kept() {
        let body = Markdown::sanitize("<em>whisper</em> and <strong>shout</strong><br>");
        assert_eq!(
            body.as_str(),
            "<em>whisper</em> and <strong>shout</strong><br>"
        );
    }

    #[test]
    fn test_allowed_tag_case_insensitive() {
        let body = Markdown::sanitize("<EM>loud</EM>");
        assert_eq!(body.as_str(), "<EM>loud</EM>");
    }

    #[test]
    fn test_self_closing_allowed() {
        let body = Markdown::sanitize("line<br/>break<hr />");
        assert_eq!(body.as_str(), "line<br/>break<hr />");
    }

    #[test]
    fn test_disallowed_tag_escaped_not_removed() {
        let body = Markdown::sanitize("<script>alert(1)</script>");
        assert_eq!(body.as_str(), "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn test_allowed_tag_with_attributes_escaped() {
        let body = Markdown::sanitize(r#"<span onclick="x()">hi</span>"#);
        assert_eq!(
            body.as_str(),
            "&lt;span onclick=\"x()\"&gt;hi</span>"
        );
    }

    #[test]
    fn test_stray_angle_bracket_escaped() {
        let body = Markdown::sanitize("3 < 5 and 5 > 3");
        assert_eq!(body.as_str(), "3 &lt; 5 and 5 > 3");
    }

    #[test]
    fn test_inline_code_untouched() {
        let body = Markdown::sanitize("use `<script>` carefully");
        assert_eq!(body.as_str(), "use `<script>` carefully");
    }

    #[test]
    fn test_double_backtick_code_span() {
        let body = Markdown::sanitize("``<b>`</b>`` and <script>");
        assert_eq!(body.as_str(), "``<b>`</b>`` and &lt;script&gt;");
    }

    #[test]
    fn test_unmatched_backtick_still_sanitizes_rest() {
        let body = Markdown::sanitize("a ` lone tick <script>");
        assert_eq!(body.as_str(), "a ` lone tick &lt;script&gt;");
    }

    #[test]
    fn test_fenced_block_untouched() {
        let raw = "before <script>\n```\n<script>inside</script>\n```\nafter <script>";
        let body = Markdown::sanitize(raw);
        assert_eq!(
            body.as_str(),
            "before &lt;script&gt;\n```\n<script>inside</script>\n```\nafter &lt;script&gt;"
        );
    }

    #[test]
    fn test_tilde_fence() {
        let raw = "~~~\n<img src=x>\n~~~";
        let body = Markdown::sanitize(raw);
        assert_eq!(body.as_str(), raw);
    }

    #[test]
    fn test_fence_requires_matching_length_to_close() {
        // The 4-backtick fence is not closed by the 3-backtick line
        let raw = "````\n<script>\n```\nstill code <b x=1>\n````\nout <script>";
        let body = Markdown::sanitize(raw);
        assert_eq!(
            body.as_str(),
            "````\n<script>\n```\nstill code <b x=1>\n````\nout &lt;script&gt;"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = Markdown::sanitize("<script>x</script> and <em>fine</em>");
        let twice = Markdown::sanitize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_markdown_syntax_untouched() {
        let raw = "# Title\n\n*emphasis* and [link](https://example.com)\n\n> quote";
        assert_eq!(Markdown::sanitize(raw).as_str(), raw);
    }

    #[test]
    fn test_empty_input() {
        let body = Markdown::sanitize("");
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
    }

    proptest::proptest! {
        /// Sanitizing twice is the same as sanitizing once, for any input.
        #[test]
        fn prop_sanitize_idempotent(raw in "\\PC{0,200}") {
            let once = Markdown::sanitize(&raw);
            let twice = Markdown::sanitize(once.as_str());
            proptest::prop_assert_eq!(once, twice);
        }

        /// Output never contains a raw tag outside the allow-list.
        #[test]
        fn prop_no_disallowed_bare_tags(raw in "[a-z<>/ ]{0,120}") {
            let body = Markdown::sanitize(&raw);
            let text = body.as_str();
            for (pos, _) in text.match_indices('<') {
                if let Some(m) = any_tag_regex().find(&text[pos..]) {
                    let name = tag_name(m.as_str()).to_lowercase();
                    proptest::prop_assert!(
                        ALLOWED_TAGS.contains(&name.as_str()),
                        "kept tag {:?}", m.as_str()
                    );
                }
            }
        }
    }
}
