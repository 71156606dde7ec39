/*!
 * Regex sentence splitter used when no locale facility applies.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of non-terminators, then its closing `.`/`!`/`?` punctuation
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?]+[.]*!*\?*[!?]?").expect("sentence pattern is valid")
});

/// Split text at sentence terminators.
///
/// Characters the pattern does not consume (leading or repeated terminators)
/// are glued onto the previous piece, or onto the first piece when they lead
/// the text, so the pieces always concatenate back to `text`. Text without
/// any match comes back as a single piece.
pub fn fallback_split(text: &str) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut leading = String::new();
    let mut cursor = 0;

    for m in SENTENCE_PATTERN.find_iter(text) {
        let gap = &text[cursor..m.start()];
        match pieces.last_mut() {
            Some(previous) => previous.push_str(gap),
            None => leading.push_str(gap),
        }

        if pieces.is_empty() {
            pieces.push(format!("{}{}", leading, m.as_str()));
        } else {
            pieces.push(m.as_str().to_string());
        }
        cursor = m.end();
    }

    match pieces.last_mut() {
        Some(last) => last.push_str(&text[cursor..]),
        None => pieces.push(text.to_string()),
    }

    pieces
}
