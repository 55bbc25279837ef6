//! Text normalisation shared by the matching tiers.

const QUOTES: [char; 2] = ['\'', '"'];

/// Remove single and double quote characters.
pub fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| !QUOTES.contains(c)).collect()
}

/// Lowercase, quote-free words of `text`. Words that consisted only of quotes are dropped.
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| strip_quotes(w).to_lowercase()).filter(|w| !w.is_empty()).collect()
}

/// Parse the first word as a numeric id.
pub fn leading_id(text: &str) -> Option<i64> {
    text.split_whitespace().next().and_then(|w| w.parse::<i64>().ok())
}
