use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

const BLOG_SEGMENT: &str = "blog";

lazy_static! {
    // One or more ASCII digits followed by exactly one hyphen: "12-my-post" -> "my-post"
    static ref NUMERIC_PREFIX_REGEX: Regex = Regex::new(r"^[0-9]+-").unwrap();
    static ref SLASH_RUN_REGEX: Regex = Regex::new(r"/{2,}").unwrap();
}

/// Removes the ordering prefix of a slug. Slugs without a prefix are returned as-is.
pub fn strip_numeric_prefix(slug: &str) -> &str {
    match NUMERIC_PREFIX_REGEX.find(slug) {
        Some(m) => &slug[m.end()..],
        None => slug,
    }
}

/// Canonical form of a blog post path.
///
/// Query string and fragment are dropped, repeated slashes are collapsed and the
/// ordering prefix of the last segment is removed:
///
/// ```
/// use blogfeed::path_utils::canonicalize;
/// assert_eq!(canonicalize("/blog/12-my-post"), "/blog/my-post");
/// assert_eq!(canonicalize("/blog/2024/07-title?x=1#top"), "/blog/2024/title");
/// assert_eq!(canonicalize("/about"), "/about");
/// ```
///
/// Anything that is not shaped like `/blog/<...>` is returned unchanged.
pub fn canonicalize(path: &str) -> String {
    let without_query = path.split('?').next().unwrap_or_default();
    let trimmed = without_query.split('#').next().unwrap_or_default();
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 || segments[0] != BLOG_SEGMENT {
        return path.to_string();
    }

    let last = segments[segments.len() - 1];
    let cleaned_last = strip_numeric_prefix(last);

    let mut canonical = String::with_capacity(trimmed.len());
    canonical.push('/');
    canonical.push_str(BLOG_SEGMENT);
    for segment in &segments[1..segments.len() - 1] {
        canonical.push('/');
        canonical.push_str(segment);
    }
    canonical.push('/');
    canonical.push_str(cleaned_last);
    canonical
}

/// Collapses slash runs and removes the trailing slash. Empty input becomes `/`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let collapsed = SLASH_RUN_REGEX.replace_all(path, "/");
    if collapsed == "/" {
        return collapsed.into_owned();
    }

    match collapsed.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => collapsed.into_owned(),
    }
}

/// ASCII characters whose escapes survive [`decode_path`]: `%3F` stays `%3F` so it is
/// never mistaken for the start of a query
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Byte of the `%XX` escape `bytes` starts with
fn escaped_byte(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [b'%', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
            let hex = [*hi, *lo];
            u8::from_str_radix(std::str::from_utf8(&hex).ok()?, 16).ok()
        }
        _ => None,
    }
}

/// Percent-decodes a path coming from the content store (`%20` -> ` `).
///
/// Escapes of reserved characters (`%2F`, `%3F`, `%23`, ...) are kept so they stay part
/// of the segment they belong to. Malformed escapes or invalid UTF-8 leave the path
/// untouched.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    if !path.contains('%') {
        return Cow::Borrowed(path);
    }

    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            decoded.push(bytes[i]);
            i += 1;
            continue;
        }

        let Some(byte) = escaped_byte(&bytes[i..]) else {
            return Cow::Borrowed(path);
        };
        if RESERVED.contains(&byte) {
            decoded.extend_from_slice(&bytes[i..i + 3]);
        } else {
            decoded.push(byte);
        }
        i += 3;
    }

    match String::from_utf8(decoded) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(_) => Cow::Borrowed(path),
    }
}

/// Joins the site base url and a site relative path with a single slash.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base_url, path)
}

/// Percent-encodes every segment of a path, keeping the slashes and the escapes
/// already present.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        encoded.push_str(&urlencoding::encode(&rest[..pos]));
        let tail = &rest[pos..];
        if escaped_byte(tail.as_bytes()).is_some() {
            encoded.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            encoded.push_str("%25");
            rest = &tail[1..];
        }
    }
    encoded.push_str(&urlencoding::encode(rest));
    encoded
}

/// The public url of a post. The raw path is decoded first so paths the content
/// store already encoded are not encoded twice.
pub fn post_url(base_url: &str, raw_path: &str) -> String {
    let decoded = decode_path(raw_path);
    absolute_url(base_url, &encode_path(&canonicalize(&decoded)))
}
