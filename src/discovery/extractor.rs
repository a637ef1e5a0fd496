use once_cell::sync::Lazy;
use regex::{Match, Regex};
use rustc_hash::FxHashSet;

use crate::core::constants::extraction;
use crate::core::types::{Candidate, ExtractionMode};

use std::net::Ipv4Addr;

const SCHEME_URL_PATTERN: &str = r"https?://[^\s，、,]+";
const DOTTED_QUAD_PATTERN: &str = r"[0-9]{1,3}(?:\.[0-9]{1,3}){3}";
const PORT_LABEL_PATTERN: &str = r"(?i)(?:prot|port)[:：]\s*([0-9]+)";

static SCHEME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(SCHEME_URL_PATTERN).expect("Failed to compile scheme URL pattern"));

static DOTTED_QUAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(DOTTED_QUAD_PATTERN).expect("Failed to compile dotted quad pattern"));

static PORT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(PORT_LABEL_PATTERN).expect("Failed to compile port label pattern"));

// Built from the TLD allow-list so the two never drift apart
static BARE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?:www\.)?[a-zA-Z0-9-]+\.(?:{})(?:\.[a-zA-Z]{{2,}})?",
        extraction::DOMAIN_TLDS.join("|")
    );
    Regex::new(&pattern).expect("Failed to compile bare domain pattern")
});

pub trait ExtractCandidates {
    fn extract(&self, text: &str, mode: ExtractionMode) -> Vec<Candidate>;
}

#[derive(Default, Debug)]
pub struct Extractor {}

impl ExtractCandidates for Extractor {
    fn extract(&self, text: &str, mode: ExtractionMode) -> Vec<Candidate> {
        match mode {
            ExtractionMode::Ip => extract_ips(text).into_iter().map(Candidate::new).collect(),
            ExtractionMode::Url => extract_urls(text).into_iter().map(Candidate::new).collect(),
        }
    }
}

/// Extract every URL-like identifier from `text`.
///
/// Three passes are unioned: explicit `http(s)://` URLs, bare dotted quads
/// (turned into `http://ip[:port]`), and bare domains on a fixed TLD
/// allow-list (turned into `https://domain`). Results are unique by exact
/// string; callers must not rely on their order.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut set = CandidateSet::default();

    for url in scheme_urls(text) {
        set.insert(url);
    }
    for url in ip_urls(text) {
        set.insert(url);
    }
    for url in domain_urls(text) {
        set.insert(url);
    }

    set.into_vec()
}

/// Extract every valid IPv4 address from `text`, in canonical form.
///
/// Dotted quads that fail standard IPv4 parsing (an octet above 255, a
/// leading zero) are dropped without error.
pub fn extract_ips(text: &str) -> Vec<String> {
    let mut set = CandidateSet::default();

    for m in find_guarded(&DOTTED_QUAD, text, is_standalone_quad) {
        if let Ok(ip) = m.as_str().parse::<Ipv4Addr>() {
            set.insert(ip.to_string());
        }
    }

    set.into_vec()
}

/// Strip trailing `}`, `"`, fullwidth and plain commas, then surrounding whitespace.
pub fn clean_result(item: &str) -> &str {
    item.trim_end_matches(&extraction::TRAILING_NOISE[..]).trim()
}

fn scheme_urls(text: &str) -> impl Iterator<Item = String> + '_ {
    SCHEME_URL
        .find_iter(text)
        .map(|m| clean_result(m.as_str()))
        .filter(|url| has_host(url))
        .map(str::to_string)
}

fn ip_urls(text: &str) -> Vec<String> {
    find_guarded(&DOTTED_QUAD, text, is_standalone_quad)
        .into_iter()
        .map(|m| {
            let following: String = text[m.end()..]
                .chars()
                .take(extraction::PORT_LOOKAHEAD_CHARS)
                .collect();
            let url = match PORT_LABEL.captures(&following) {
                Some(caps) => format!("http://{}:{}", m.as_str(), &caps[1]),
                None => format!("http://{}", m.as_str()),
            };
            clean_result(&url).to_string()
        })
        .collect()
}

fn domain_urls(text: &str) -> Vec<String> {
    find_guarded(&BARE_DOMAIN, text, is_standalone_domain)
        .into_iter()
        .map(|m| format!("https://{}", clean_result(m.as_str())))
        .collect()
}

/// Find non-overlapping matches of `re`, skipping any match whose surroundings
/// `accept` rejects. After a rejection the search resumes one character past
/// the rejected start, so a valid token later in the same run is still found.
fn find_guarded<'t, F>(re: &Regex, text: &'t str, accept: F) -> Vec<Match<'t>>
where
    F: Fn(&str, usize, usize) -> bool,
{
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        if accept(text, m.start(), m.end()) {
            found.push(m);
            pos = m.end();
        } else {
            pos = next_char_boundary(text, m.start());
        }
    }

    found
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

fn char_before(text: &str, at: usize) -> Option<char> {
    text[..at].chars().next_back()
}

// A dotted quad embedded in a longer numeric run (a version string, a longer
// dotted sequence) is not an address.
fn is_standalone_quad(text: &str, start: usize, end: usize) -> bool {
    if matches!(char_before(text, start), Some(c) if c.is_ascii_digit() || c == '.') {
        return false;
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some('.') => !matches!(after.next(), Some(c) if c.is_ascii_digit()),
        _ => true,
    }
}

// Bare domains must start a hostname: not right after `://`, a dot, or any
// label character. Only `www.` subdomains survive, as part of the match.
fn is_standalone_domain(text: &str, start: usize, _end: usize) -> bool {
    if text[..start].ends_with("://") {
        return false;
    }
    !matches!(
        char_before(text, start),
        Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
    )
}

fn has_host(url: &str) -> bool {
    url.split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty())
}

/// Insertion-ordered set of extracted strings.
#[derive(Default)]
struct CandidateSet {
    seen: FxHashSet<String>,
    ordered: Vec<String>,
}

impl CandidateSet {
    fn insert(&mut self, value: String) {
        if self.seen.insert(value.clone()) {
            self.ordered.push(value);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
