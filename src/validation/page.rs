//! Page body handling for liveness probes: charset detection, `<title>`
//! extraction, and wrapping titles for display.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::core::constants::probe;

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([a-zA-Z0-9_:.\-]+)"#)
        .expect("Failed to compile meta charset pattern")
});

static HEADER_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([a-zA-Z0-9_:.\-]+)"#)
        .expect("Failed to compile header charset pattern")
});

/// Decode a response body using its apparent encoding.
///
/// A `<meta charset>` declaration near the top of the document wins, then the
/// charset of the `Content-Type` header. Undeclared bodies are decoded in the
/// encoding guessed from their bytes. Undecodable bytes become U+FFFD instead
/// of failing the probe.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = sniff_meta_charset(bytes)
        .or_else(|| content_type.and_then(charset_from_content_type))
        .unwrap_or_else(|| guess_encoding(bytes));

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn guess_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(probe::CHARSET_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps[1].as_bytes())
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let caps = HEADER_CHARSET.captures(content_type)?;
    Encoding::for_label(caps[1].as_bytes())
}

/// Text of the first `<title>` element, if it has any non-blank content.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Title as recorded in a result row: wrapped, or `"null"` when missing.
pub fn display_title(title: Option<&str>, width: usize) -> String {
    match title {
        Some(title) if !title.trim().is_empty() => wrap_text(title, width),
        _ => probe::NULL_TITLE.to_string(),
    }
}

/// Wrap `text` into lines of at most `width` characters, breaking at
/// whitespace. Runs of whitespace collapse to a single space and words longer
/// than `width` are split across lines.
pub fn wrap_text(text: &str, width: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    textwrap::wrap(&text, width.max(1)).join("\n")
}
