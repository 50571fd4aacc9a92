//! `Link` response header parsing.
//!
//! GitHub carries pagination exclusively in the `Link` header:
//! `<https://api.github.com/user/repos?page=2>; rel="next", <...?page=10>; rel="last"`
//!
//! This is a small hand-rolled tokenizer: entries separated by `,`, each
//! entry's segments by `;`, a `<...>` URL segment first and `key="value"`
//! parameters after. Malformed entries are skipped, never fatal.

use std::collections::HashMap;

/// Parse a `Link` header into a relation-name → URL map.
///
/// `None` and empty headers give an empty map. Unknown relations are kept;
/// a duplicated relation resolves to its last occurrence.
pub fn parse_link_header(header: Option<&str>) -> HashMap<String, String> {
    let Some(header) = header else {
        return HashMap::new();
    };

    let mut links = HashMap::new();

    for entry in header.split(',') {
        let mut segments = entry.split(';');
        let url_segment = segments.next().unwrap_or("");
        let params: Vec<&str> = segments.collect();
        if params.is_empty() {
            // An entry without parameters cannot name its relation.
            continue;
        }

        let Some(url) = bracketed_url(url_segment.trim()) else {
            continue;
        };
        let Some(rel) = params.iter().find_map(|param| rel_name(param.trim())) else {
            continue;
        };

        links.insert(rel.to_string(), url.to_string());
    }

    links
}

/// The content strictly between `<` and `>`, if the segment is bracketed.
fn bracketed_url(segment: &str) -> Option<&str> {
    let url = segment.strip_prefix('<')?.strip_suffix('>')?;
    (!url.is_empty()).then_some(url)
}

/// The value of a `rel="..."` parameter segment.
fn rel_name(param: &str) -> Option<&str> {
    let value = param.strip_prefix("rel=")?;
    let value = value.strip_prefix('"')?.strip_suffix('"')?;
    (!value.is_empty()).then_some(value)
}

/// Extract the `page` query parameter from a URL.
///
/// Walks the query parameters explicitly so `per_page=10` never matches.
fn page_number(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page=")?.parse().ok())
}

/// Parsed pagination links, answering the two questions the fetch path asks.
#[derive(Debug, Clone, Default)]
pub struct PageLinks {
    links: HashMap<String, String>,
}

impl PageLinks {
    pub fn parse(header: Option<&str>) -> Self {
        Self {
            links: parse_link_header(header),
        }
    }

    /// URL for a relation, if the header carried one.
    pub fn url(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    /// Whether the server advertised a further page.
    pub fn has_next(&self) -> bool {
        self.links.contains_key("next")
    }

    /// Total page count from the `last` link, falling back to the page just
    /// fetched when the link is missing or carries no usable page number.
    pub fn total_pages(&self, fetched_page: u32) -> u32 {
        self.url("last").and_then(page_number).unwrap_or(fetched_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_none_and_empty() {
        assert!(parse_link_header(None).is_empty());
        assert!(parse_link_header(Some("")).is_empty());
    }

    #[test]
    fn test_parse_next_and_last() {
        // Real GitHub Link header format
        let header = r#"<https://api.github.com/user/repos?per_page=10&page=2>; rel="next", <https://api.github.com/user/repos?per_page=10&page=9>; rel="last""#;

        let links = parse_link_header(Some(header));
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://api.github.com/user/repos?per_page=10&page=2")
        );
        assert_eq!(
            links.get("last").map(String::as_str),
            Some("https://api.github.com/user/repos?per_page=10&page=9")
        );
    }

    #[test]
    fn test_parse_keeps_other_relations() {
        let header = r#"<https://api.example.com/x?page=1>; rel="first", <https://api.example.com/x?page=3>; rel="prev""#;

        let links = parse_link_header(Some(header));
        assert_eq!(
            links.get("first").map(String::as_str),
            Some("https://api.example.com/x?page=1")
        );
        assert_eq!(
            links.get("prev").map(String::as_str),
            Some("https://api.example.com/x?page=3")
        );
    }

    #[test]
    fn test_parse_skips_garbage() {
        assert!(parse_link_header(Some("garbage-no-semicolon")).is_empty());
        // No angle brackets around the URL
        assert!(parse_link_header(Some(r#"https://a.example/x; rel="next""#)).is_empty());
        // No rel parameter
        assert!(parse_link_header(Some("<https://a.example/x>; title=\"x\"")).is_empty());
        // Empty URL and empty rel
        assert!(parse_link_header(Some(r#"<>; rel="next""#)).is_empty());
        assert!(parse_link_header(Some(r#"<https://a.example/x>; rel="""#)).is_empty());
    }

    #[test]
    fn test_parse_bad_entry_does_not_poison_good_ones() {
        let header = r#"garbage, <https://a.example/x?page=2>; rel="next""#;

        let links = parse_link_header(Some(header));
        assert_eq!(links.len(), 1);
        assert!(links.contains_key("next"));
    }

    #[test]
    fn test_parse_duplicate_relation_last_wins() {
        let header =
            r#"<https://a.example/x?page=2>; rel="next", <https://a.example/x?page=7>; rel="next""#;

        let links = parse_link_header(Some(header));
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://a.example/x?page=7")
        );
    }

    #[test]
    fn test_parse_rel_after_other_params() {
        let header = r#"<https://a.example/x?page=4>; title="more"; rel="next""#;

        let links = parse_link_header(Some(header));
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://a.example/x?page=4")
        );
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number("https://api.github.com/repos?page=5"), Some(5));
        assert_eq!(
            page_number("https://api.github.com/repos?per_page=10&page=3"),
            Some(3)
        );
        // per_page alone must not count as a page
        assert_eq!(page_number("https://api.github.com/repos?per_page=100"), None);
        assert_eq!(page_number("https://api.github.com/repos"), None);
        assert_eq!(page_number("https://api.github.com/repos?page=abc"), None);
    }

    #[test]
    fn test_has_next() {
        let links = PageLinks::parse(Some(r#"<https://a.example/x?page=2>; rel="next""#));
        assert!(links.has_next());

        let links = PageLinks::parse(Some(r#"<https://a.example/x?page=9>; rel="last""#));
        assert!(!links.has_next());

        assert!(!PageLinks::parse(None).has_next());
    }

    #[test]
    fn test_total_pages_from_last_link() {
        let links = PageLinks::parse(Some(
            r#"<https://a.example/x?page=2>; rel="next", <https://a.example/x?per_page=10&page=5>; rel="last""#,
        ));
        assert_eq!(links.total_pages(1), 5);
    }

    #[test]
    fn test_total_pages_falls_back_to_fetched_page() {
        // No last link at all
        assert_eq!(PageLinks::parse(None).total_pages(3), 3);

        // Last link present but without a page parameter
        let links = PageLinks::parse(Some(r#"<https://a.example/x?per_page=10>; rel="last""#));
        assert_eq!(links.total_pages(4), 4);
    }
}
