/// Filesystem-safe names for audit directories and files
use crate::constants::PATH_UNSAFE_CHARS;

/// Removes characters that are illegal in common filesystems, collapses
/// whitespace runs to one space and trims the result
///
/// # Examples
/// ```
/// use mailrelay_core::utils::path::sanitize_for_path;
///
/// assert_eq!(sanitize_for_path("Prof. Li / Wang"), "Prof. Li Wang");
/// assert_eq!(sanitize_for_path("  a:b*c?  "), "abc");
/// ```
pub fn sanitize_for_path(input: &str) -> String {
    let filtered: String = input
        .chars()
        .filter(|c| !PATH_UNSAFE_CHARS.contains(c) && !c.is_control())
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitized name that is also safe as a single path component
pub fn sanitize_path_component(input: &str) -> String {
    sanitize_for_path(input).trim_matches('.').trim().to_string()
}
