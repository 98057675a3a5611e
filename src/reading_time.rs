use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

lazy_static! {
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE_REGEX: Regex = Regex::new(r"`[^`]*`").unwrap();
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref MARKDOWN_MARKER_REGEX: Regex = Regex::new(r"[#*_~\[\]()]").unwrap();
    static ref NEWLINE_REGEX: Regex = Regex::new(r"\n+").unwrap();
    static ref JSON_PUNCTUATION_REGEX: Regex = Regex::new(r#"[{}\[\]",:]"#).unwrap();
}

/// Text left once code, tags and markdown markers are removed.
pub fn strip_markup(content: &str) -> String {
    let text = CODE_BLOCK_REGEX.replace_all(content, "");
    let text = INLINE_CODE_REGEX.replace_all(&text, "");
    let text = HTML_TAG_REGEX.replace_all(&text, "");
    let text = MARKDOWN_MARKER_REGEX.replace_all(&text, "");
    let text = NEWLINE_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn minutes_for(words: usize, words_per_minute: u32) -> u32 {
    let wpm = match words_per_minute {
        0 => DEFAULT_WORDS_PER_MINUTE,
        x => x,
    } as usize;
    words.div_ceil(wpm) as u32
}

/// Minutes needed to read `content`, rounded up. Empty content takes 0 minutes.
pub fn estimate(content: &str, words_per_minute: u32) -> u32 {
    if content.is_empty() {
        return 0;
    }
    let words = word_count(&strip_markup(content));
    minutes_for(words, words_per_minute)
}

/// Estimate for structured content (a parsed markdown tree, for instance).
///
/// Strings are treated as text. Anything else is serialized and its JSON punctuation
/// blanked out before counting, so keys and node types are counted as words too.
/// The result is only an approximation.
pub fn estimate_value(content: &Value, words_per_minute: u32) -> u32 {
    match content {
        Value::Null => 0,
        Value::String(text) => estimate(text, words_per_minute),
        other => {
            let serialized = other.to_string();
            let text = JSON_PUNCTUATION_REGEX.replace_all(&serialized, " ");
            minutes_for(word_count(&text), words_per_minute)
        }
    }
}

pub fn format_reading_time(minutes: u32) -> String {
    match minutes {
        0 => "< 1 min read".to_string(),
        1 => "1 min read".to_string(),
        x => format!("{} min read", x),
    }
}

/// Same labels as [`format_reading_time`] for fractional estimates. Values under one
/// minute read as "< 1 min read"; larger values are truncated.
pub fn format_reading_time_f64(minutes: f64) -> String {
    if minutes.is_nan() || minutes < 1.0 {
        return format_reading_time(0);
    }
    format_reading_time(minutes as u32)
}
