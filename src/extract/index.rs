//! Venue index extraction
//!
//! Conference and journal index pages list their editions differently:
//! - `conf/<name>/index.html` marks each edition with an `a.toc-link`
//! - `journals/<name>/index.html` lists volumes as plain anchors inside the
//!   `<ul>` children of `#main`

use crate::locator::VenueType;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

struct IndexSelectors {
    toc_link: Selector,
    main: Selector,
    anchor: Selector,
}

static SELECTORS: LazyLock<IndexSelectors> = LazyLock::new(|| IndexSelectors {
    toc_link: Selector::parse("a.toc-link[href]").expect("Failed to parse toc link selector"),
    main: Selector::parse("#main").expect("Failed to parse main selector"),
    anchor: Selector::parse("a[href]").expect("Failed to parse anchor selector"),
});

/// Extracts the edition page locators listed on a venue index
///
/// Hrefs are resolved against `index_url`, so relative links come back
/// absolute. Duplicates are dropped, keeping the first occurrence.
///
/// # Arguments
///
/// * `html` - The index page body
/// * `venue_type` - Selects the index layout
/// * `index_url` - Locator the index was fetched from
///
/// # Returns
///
/// Edition locators in document order
pub fn extract_child_links(html: &str, venue_type: VenueType, index_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let base_url = Url::parse(index_url).ok();

    let hrefs = match venue_type {
        VenueType::Conf => conf_hrefs(&document),
        VenueType::Journal => journal_hrefs(&document),
    };

    let mut seen = HashSet::new();
    hrefs
        .into_iter()
        .filter_map(|href| resolve_link(href, base_url.as_ref()))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

fn conf_hrefs(document: &Html) -> Vec<&str> {
    document
        .select(&SELECTORS.toc_link)
        .filter_map(|a| a.value().attr("href"))
        .collect()
}

fn journal_hrefs(document: &Html) -> Vec<&str> {
    let Some(main) = document.select(&SELECTORS.main).next() else {
        tracing::debug!("Journal index has no #main region");
        return Vec::new();
    };

    main.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "ul")
        .flat_map(|list| {
            list.select(&SELECTORS.anchor)
                .filter_map(|a| a.value().attr("href"))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Resolves a link href to an absolute locator
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto: schemes
/// - non-HTTP(S) URLs after resolution
///
/// Without a base URL the href is kept as written.
fn resolve_link(href: &str, base_url: Option<&Url>) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") {
        return None;
    }

    let Some(base) = base_url else {
        return Some(href.to_string());
    };

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Dropping unresolvable href {}: {}", href, e);
            None
        }
    }
}
