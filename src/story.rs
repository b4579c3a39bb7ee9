//! Turning raw model output into story pages.

use crate::models::StoryPage;
use crate::{Error, Result};

/// Replace typographic punctuation with plain ASCII equivalents.
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2026}' => out.push_str("..."),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2014}' => out.push_str("--"),
            '\u{2013}' | '\u{2012}' | '\u{2010}' | '\u{2011}' => out.push('-'),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// A line like `Page 3`, `**Page 3:**` or `## Page 3` that only labels a page.
fn is_page_heading(line: &str) -> bool {
    let stripped = line.trim_matches(|c: char| c == '*' || c == '#' || c == '_' || c.is_whitespace());
    let stripped = stripped.trim_end_matches(':').trim_end_matches('*').trim();
    let Some(rest) = stripped
        .get(..4)
        .filter(|head| head.eq_ignore_ascii_case("page"))
        .map(|_| stripped[4..].trim())
    else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

/// Split story text into pages separated by blank lines.
///
/// Heading-only lines are dropped. The result must contain exactly
/// `expected` non-empty pages.
pub fn parse_story(raw: &str, expected: usize) -> Result<Vec<StoryPage>> {
    let text = normalize_punctuation(raw);

    let mut pages = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                pages.push(StoryPage::new(std::mem::take(&mut current)));
            }
            continue;
        }
        if is_page_heading(line) {
            continue;
        }
        current.push(line.to_string());
    }
    if !current.is_empty() {
        pages.push(StoryPage::new(current));
    }

    if pages.len() != expected {
        return Err(Error::UpstreamResponse(format!(
            "expected {} story pages separated by blank lines, got {}",
            expected,
            pages.len()
        )));
    }

    tracing::debug!("Parsed {} story pages", pages.len());
    Ok(pages)
}
