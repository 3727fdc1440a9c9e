/// Normalizes an author profile link into a PID
///
/// `https://dblp.org/pid/12/345.html` becomes `12-345`. Links without a
/// `/pid/` part, or with fewer than two non-empty segments after it, yield
/// None.
///
/// # Examples
///
/// ```
/// use dblp_harvest::extract::normalize_pid;
///
/// assert_eq!(normalize_pid("https://dblp.org/pid/12/345.html"), Some("12-345".to_string()));
/// assert_eq!(normalize_pid("https://dblp.org/db/conf/aaai/index.html"), None);
/// ```
pub fn normalize_pid(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("/pid/")?;
    let rest = rest.strip_suffix(".html").unwrap_or(rest);

    let mut segments = rest.split('/');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let second = segments.next().filter(|s| !s.is_empty())?;

    Some(format!("{}-{}", first, second))
}
