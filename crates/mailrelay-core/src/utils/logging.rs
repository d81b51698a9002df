/// PII redaction for log lines
///
/// Addresses and subjects of relayed mail end up in the audit files only;
/// the process log gets these redacted forms.
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Redacts email addresses from text, preserving the domain
///
/// # Examples
/// ```
/// use mailrelay_core::utils::logging::redact_email;
///
/// assert_eq!(redact_email("prof@uni.edu"), "***@uni.edu");
/// assert_eq!(redact_email("Send to a.b@mail.cn now"), "Send to ***@mail.cn now");
/// ```
pub fn redact_email(text: &str) -> String {
    EMAIL_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            match email.find('@') {
                Some(at_pos) => format!("***{}", &email[at_pos..]),
                None => "***@***".to_string(),
            }
        })
        .to_string()
}

/// Shows the first few characters of a subject and its length
///
/// # Examples
/// ```
/// use mailrelay_core::utils::logging::redact_subject;
///
/// assert_eq!(redact_subject("PhD application"), "PhD...[15 chars]");
/// assert_eq!(redact_subject("Hi"), "Hi");
/// ```
pub fn redact_subject(subject: &str) -> String {
    const MAX_VISIBLE_CHARS: usize = 3;
    const MIN_LENGTH_TO_REDACT: usize = 6;

    let length = subject.chars().count();
    if length < MIN_LENGTH_TO_REDACT {
        subject.to_string()
    } else {
        let visible: String = subject.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}...[{} chars]", visible, length)
    }
}

/// Domain part of an address, for log fields
pub fn extract_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, d)| d).unwrap_or("unknown")
}
