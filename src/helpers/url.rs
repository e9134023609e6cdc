//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left readable in path segments
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Path of a post page
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/blog/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", encode_segment(slug))
}

/// Path of a tag page
///
/// # Examples
/// ```ignore
/// tag_path("C++") // -> "/tags/C%2B%2B"
/// ```
pub fn tag_path(tag: &str) -> String {
    format!("/tags/{}", encode_segment(tag))
}

/// Path to the admin dashboard carrying a one-shot status message
pub fn admin_notice_path(key: &str, message: &str) -> String {
    format!("/admin?{}={}", key, utf8_percent_encode(message, NON_ALPHANUMERIC))
}
