//! Edition page extraction
//!
//! DBLP edition pages keep their content in `#main` as a flat run of siblings:
//!
//! ```html
//! <div id="main">
//!   <header class="h2"><h2>Main Track</h2></header>
//!   <ul class="publ-list">
//!     <li class="entry inproceedings">
//!       <cite>
//!         <span itemprop="author"><a itemprop="url" href=".../pid/1/23.html">
//!           <span itemprop="name">Jane Doe</span></a></span>
//!         <span class="title" itemprop="name">Paper X.</span>
//!       </cite>
//!     </li>
//!   </ul>
//! </div>
//! ```
//!
//! Headers open tracks; publication lists feed the most recently opened one.

use crate::extract::pid::normalize_pid;
use crate::extract::records::{AuthorRecord, PageRecords, PaperRecord};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

struct PageSelectors {
    main: Selector,
    heading: Selector,
    cite: Selector,
    name: Selector,
    author: Selector,
    author_url: Selector,
}

static SELECTORS: LazyLock<PageSelectors> = LazyLock::new(|| PageSelectors {
    main: Selector::parse("#main").expect("Failed to parse main selector"),
    heading: Selector::parse("h2").expect("Failed to parse heading selector"),
    cite: Selector::parse("cite").expect("Failed to parse cite selector"),
    name: Selector::parse(r#"span[itemprop="name"]"#).expect("Failed to parse name selector"),
    author: Selector::parse(r#"span[itemprop="author"]"#)
        .expect("Failed to parse author selector"),
    author_url: Selector::parse(r#"a[itemprop="url"]"#)
        .expect("Failed to parse author url selector"),
});

const TRACK_HEADER_CLASS: &str = "h2";
const PUBLICATION_LIST_CLASS: &str = "publ-list";

/// Options controlling page extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Track that receives publication lists appearing before any track
    /// header. When None those lists are skipped.
    pub default_track: Option<String>,
}

/// Extracts the track → paper → author records from an edition page
///
/// A page without a `#main` region yields an empty record set.
///
/// # Example
///
/// ```
/// use dblp_harvest::extract::{extract_page, ExtractOptions};
///
/// let html = r#"<div id="main">
///   <header class="h2"><h2>Main Track</h2></header>
///   <ul class="publ-list"><li><cite><span itemprop="name">Paper X.</span></cite></li></ul>
/// </div>"#;
/// let records = extract_page(html, &ExtractOptions::default());
/// assert_eq!(records.track("Main Track").unwrap()[0].title, "Paper X.");
/// ```
pub fn extract_page(html: &str, options: &ExtractOptions) -> PageRecords {
    let document = Html::parse_document(html);
    extract_document(&document, options)
}

/// Same as [`extract_page`] for an already-parsed document
pub fn extract_document(document: &Html, options: &ExtractOptions) -> PageRecords {
    let mut records = PageRecords::new();

    let Some(main) = document.select(&SELECTORS.main).next() else {
        tracing::debug!("No #main region, nothing to extract");
        return records;
    };

    let mut current_track: Option<String> = None;

    for child in main.children().filter_map(ElementRef::wrap) {
        if is_track_header(&child) {
            let name = track_name(&child);
            records.open_track(&name);
            current_track = Some(name);
        } else if is_publication_list(&child) {
            let Some(track) = current_track
                .as_deref()
                .or(options.default_track.as_deref())
            else {
                tracing::debug!("Skipping publication list outside any track");
                continue;
            };

            for item in child
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "li")
            {
                if let Some(paper) = extract_paper(&item) {
                    records.push_paper(track, paper);
                }
            }
        }
    }

    records
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn is_track_header(element: &ElementRef) -> bool {
    element.value().name() == "header" && has_class(element, TRACK_HEADER_CLASS)
}

fn is_publication_list(element: &ElementRef) -> bool {
    element.value().name() == "ul" && has_class(element, PUBLICATION_LIST_CLASS)
}

fn track_name(header: &ElementRef) -> String {
    match header.select(&SELECTORS.heading).next() {
        Some(heading) => element_text(&heading),
        None => element_text(header),
    }
}

/// Builds a paper from one list item
///
/// Items without a citation are not papers. The title is the last name span
/// in the citation; earlier ones belong to authors.
fn extract_paper(item: &ElementRef) -> Option<PaperRecord> {
    let cite = item.select(&SELECTORS.cite).next()?;

    let Some(title) = cite.select(&SELECTORS.name).last() else {
        tracing::debug!("Citation without a name element, skipping");
        return None;
    };

    let authors = cite
        .select(&SELECTORS.author)
        .map(|author| extract_author(&author))
        .collect();

    Some(PaperRecord {
        title: element_text(&title),
        authors,
    })
}

fn extract_author(author: &ElementRef) -> AuthorRecord {
    let name = match author.select(&SELECTORS.name).next() {
        Some(name) => element_text(&name),
        None => element_text(author),
    };

    let pid = author
        .select(&SELECTORS.author_url)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(normalize_pid);

    AuthorRecord { name, pid }
}

/// Text content with runs of whitespace collapsed to single spaces
fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn citation(title: &str, authors: &[(&str, Option<&str>)]) -> String {
        let mut cite = String::from("<li class=\"entry\"><cite>");
        for (name, link) in authors {
            match link {
                Some(href) => cite.push_str(&format!(
                    r#"<span itemprop="author"><a itemprop="url" href="{}"><span itemprop="name">{}</span></a></span>, "#,
                    href, name
                )),
                None => cite.push_str(&format!(
                    r#"<span itemprop="author"><span itemprop="name">{}</span></span>, "#,
                    name
                )),
            }
        }
        cite.push_str(&format!(
            r#"<span class="title" itemprop="name">{}</span></cite></li>"#,
            title
        ));
        cite
    }

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><div id="main">{}</div></body></html>"#,
            body
        )
    }

    fn header(name: &str) -> String {
        format!(r#"<header class="h2"><h2>{}</h2></header>"#, name)
    }

    fn list(items: &[String]) -> String {
        format!(r#"<ul class="publ-list">{}</ul>"#, items.concat())
    }

    #[test]
    fn test_single_track_end_to_end() {
        let html = page(&format!(
            "{}{}",
            header("Main Track"),
            list(&[citation(
                "Paper X",
                &[("Jane Doe", Some("https://dblp.org/pid/1/23.html"))]
            )])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!({
                "Main Track": [{
                    "title": "Paper X",
                    "authors": [{"name": "Jane Doe", "pid": "1-23"}]
                }]
            })
        );
    }

    #[test]
    fn test_tracks_keep_document_order() {
        let html = page(&format!(
            "{}{}{}{}",
            header("B"),
            list(&[citation("first", &[])]),
            header("A"),
            list(&[citation("second", &[])]),
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track_names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(records.track("B").unwrap()[0].title, "first");
        assert_eq!(records.track("A").unwrap()[0].title, "second");
    }

    #[test]
    fn test_recurring_track_name_appends() {
        let html = page(&format!(
            "{}{}{}{}{}{}",
            header("A"),
            list(&[citation("one", &[])]),
            header("B"),
            list(&[citation("two", &[])]),
            header("A"),
            list(&[citation("three", &[])]),
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.len(), 2);
        let titles: Vec<_> = records
            .track("A")
            .unwrap()
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["one", "three"]);
    }

    #[test]
    fn test_list_before_any_track_is_skipped_by_default() {
        let html = page(&format!(
            "{}{}{}",
            list(&[citation("orphan", &[])]),
            header("Main"),
            list(&[citation("kept", &[])]),
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track_names().collect::<Vec<_>>(), vec!["Main"]);
        assert_eq!(records.paper_count(), 1);
    }

    #[test]
    fn test_list_before_any_track_uses_default_track_when_configured() {
        let html = page(&format!(
            "{}{}{}",
            list(&[citation("orphan", &[])]),
            header("Main"),
            list(&[citation("kept", &[])]),
        ));

        let options = ExtractOptions {
            default_track: Some("Default".to_string()),
        };
        let records = extract_page(&html, &options);
        assert_eq!(
            records.track_names().collect::<Vec<_>>(),
            vec!["Default", "Main"]
        );
        assert_eq!(records.track("Default").unwrap()[0].title, "orphan");
    }

    #[test]
    fn test_title_is_last_name_span_with_whitespace_collapsed() {
        let html = page(&format!(
            "{}{}",
            header("  Main \n Track  "),
            list(&[citation(
                "\n   A   Study of\n  Things.  ",
                &[("Alice", None), ("Bob", None)]
            )])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        let papers = records.track("Main Track").unwrap();
        assert_eq!(papers[0].title, "A Study of Things.");
        assert_eq!(papers[0].authors.len(), 2);
        assert_eq!(papers[0].authors[1].name, "Bob");
    }

    #[test]
    fn test_author_without_profile_link_has_no_pid() {
        let html = page(&format!(
            "{}{}",
            header("Main"),
            list(&[citation(
                "Paper",
                &[
                    ("Linked", Some("https://dblp.org/pid/12/345.html")),
                    ("Unlinked", None),
                    ("Odd", Some("https://example.com/people/odd")),
                ]
            )])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        let authors = &records.track("Main").unwrap()[0].authors;
        assert_eq!(authors[0].pid.as_deref(), Some("12-345"));
        assert_eq!(authors[1].pid, None);
        assert_eq!(authors[2].pid, None);
    }

    #[test]
    fn test_items_without_citation_are_skipped() {
        let items = vec![
            "<li class=\"drop-down\">menu</li>".to_string(),
            citation("Real Paper", &[]),
        ];
        let html = page(&format!("{}{}", header("Main"), list(&items)));

        let records = extract_page(&html, &ExtractOptions::default());
        let papers = records.track("Main").unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title, "Real Paper");
    }

    #[test]
    fn test_citation_without_name_is_skipped() {
        let items = vec!["<li><cite>no spans here</cite></li>".to_string()];
        let html = page(&format!("{}{}", header("Main"), list(&items)));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track("Main").unwrap().len(), 0);
    }

    #[test]
    fn test_empty_track_is_kept() {
        let html = page(&format!(
            "{}{}{}",
            header("Empty"),
            header("Full"),
            list(&[citation("x", &[])])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track("Empty").unwrap().len(), 0);
        assert_eq!(records.track("Full").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_main_region_yields_empty() {
        let html = "<html><body><ul class=\"publ-list\"><li><cite><span itemprop=\"name\">x</span></cite></li></ul></body></html>";
        let records = extract_page(html, &ExtractOptions::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_nested_headers_are_not_track_boundaries() {
        let html = page(&format!(
            "{}<div>{}</div>{}",
            header("Outer"),
            header("Nested"),
            list(&[citation("x", &[])])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track_names().collect::<Vec<_>>(), vec!["Outer"]);
        assert_eq!(records.track("Outer").unwrap().len(), 1);
    }

    #[test]
    fn test_unclassed_lists_are_ignored() {
        let html = page(&format!(
            "{}<ul><li><cite><span itemprop=\"name\">nav</span></cite></li></ul>",
            header("Main"),
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track("Main").unwrap().len(), 0);
    }

    #[test]
    fn test_header_without_h2_uses_own_text() {
        let html = page(&format!(
            "<header class=\"h2\">Workshop Papers</header>{}",
            list(&[citation("x", &[])])
        ));

        let records = extract_page(&html, &ExtractOptions::default());
        assert_eq!(records.track("Workshop Papers").unwrap().len(), 1);
    }
}
