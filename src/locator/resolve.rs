use crate::locator::{PageRef, VenueRef, VenueType};
use crate::LocatorError;

/// Splits a locator into its last three path segments
///
/// Query strings and fragments are dropped first so that
/// `.../aaai2025.html?view=bibtex` resolves like `.../aaai2025.html`.
fn last_three_segments(locator: &str) -> Result<[&str; 3], LocatorError> {
    let path = locator
        .split(['?', '#'])
        .next()
        .unwrap_or(locator);

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 3 {
        return Err(LocatorError::Malformed(format!(
            "expected at least 3 path segments, got {} in '{}'",
            segments.len(),
            locator
        )));
    }

    let tail = &segments[segments.len() - 3..];
    Ok([tail[0], tail[1], tail[2]])
}

fn venue_from_segments(
    kind: &str,
    name: &str,
    locator: &str,
) -> Result<VenueRef, LocatorError> {
    if kind.is_empty() || name.is_empty() {
        return Err(LocatorError::Malformed(format!(
            "empty venue segment in '{}'",
            locator
        )));
    }

    let venue_type =
        VenueType::from_segment(kind).ok_or_else(|| LocatorError::UnknownVenueType {
            kind: kind.to_string(),
            locator: locator.to_string(),
        })?;

    Ok(VenueRef {
        venue_type,
        venue_name: name.to_string(),
    })
}

/// Resolves the venue a locator belongs to
///
/// Uses the first two of the last three path segments:
/// `<venue_type>/<venue_name>/<page_file>`.
///
/// # Examples
///
/// ```
/// use dblp_harvest::locator::{resolve_venue, VenueType};
///
/// let venue = resolve_venue("https://dblp.org/db/conf/aaai/index.html").unwrap();
/// assert_eq!(venue.venue_type, VenueType::Conf);
/// assert_eq!(venue.venue_name, "aaai");
/// ```
pub fn resolve_venue(locator: &str) -> Result<VenueRef, LocatorError> {
    let [kind, name, _] = last_three_segments(locator)?;
    venue_from_segments(kind, name, locator)
}

/// Resolves the page a locator points at
///
/// The page name is the final path segment cut at its first `.`, so
/// `aaai2025.html` becomes `aaai2025`.
///
/// # Examples
///
/// ```
/// use dblp_harvest::locator::resolve_page;
///
/// let page = resolve_page("https://dblp.org/db/journals/tse/tse50.html").unwrap();
/// assert_eq!(page.venue_name, "tse");
/// assert_eq!(page.page_name, "tse50");
/// ```
pub fn resolve_page(locator: &str) -> Result<PageRef, LocatorError> {
    let [kind, name, file] = last_three_segments(locator)?;
    let venue = venue_from_segments(kind, name, locator)?;

    let page_name = file.split('.').next().unwrap_or(file);
    if page_name.is_empty() {
        return Err(LocatorError::Malformed(format!(
            "empty page name in '{}'",
            locator
        )));
    }

    Ok(PageRef {
        venue_type: venue.venue_type,
        venue_name: venue.venue_name,
        page_name: page_name.to_string(),
    })
}
