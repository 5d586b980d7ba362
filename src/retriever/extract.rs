//! Readable-text and metadata extraction from HTML pages

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::{ElementRef, Html, Selector};

/// Likely main-content containers, in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".post-content",
    ".article-body",
    "div[class*=\"content\"]",
    "body",
];

/// Elements whose text is never part of the article
const EXCLUDED_SELECTOR: &str =
    "script, style, noscript, iframe, header, footer, nav, aside, .ad, .advert, .popup";

/// Text and metadata extracted from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedArticle {
    pub text: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Extract the readable article text and metadata of an HTML document.
///
/// The first container selector yielding readable text wins, and all of its
/// outermost matches contribute. `body` is the last resort; an empty `text`
/// means the page has nothing readable.
pub fn extract_article(html: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);
    let excluded = Selector::parse(EXCLUDED_SELECTOR).ok();

    let mut text = String::new();
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        let combined = document
            .select(&selector)
            .filter(|el| !has_ancestor_matching(el, &selector))
            .map(|el| readable_text(&el, excluded.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");

        let cleaned = collapse_whitespace(&combined);
        if !cleaned.is_empty() {
            tracing::debug!(
                selector = %selector_str,
                length = cleaned.len(),
                "Selected content container"
            );
            text = cleaned;
            break;
        }
    }

    ExtractedArticle {
        text,
        title: extract_title(&document),
        description: extract_description(&document),
        published: extract_published(&document),
    }
}

/// Collapse every whitespace run to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_ancestor_matching(element: &ElementRef, selector: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

/// Text nodes under `element`, skipping those inside excluded elements
fn readable_text(element: &ElementRef, excluded: Option<&Selector>) -> String {
    if excluded.is_some_and(|selector| selector.matches(element)) {
        return String::new();
    }

    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = excluded.is_some_and(|selector| {
            node.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| selector.matches(&ancestor))
        });
        if hidden {
            continue;
        }

        text.push_str(fragment);
        text.push(' ');
    }
    text
}

/// Extract title from <title> or <meta property="og:title">
fn extract_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("title")
        && let Some(el) = document.select(&selector).next()
    {
        let title = collapse_whitespace(&el.text().collect::<String>());
        if !title.is_empty() {
            return Some(title);
        }
    }

    extract_meta_property(document, "og:title")
}

/// Extract description from <meta name="description"> or <meta property="og:description">
fn extract_description(document: &Html) -> Option<String> {
    extract_meta_name(document, "description")
        .or_else(|| extract_meta_property(document, "og:description"))
}

fn extract_published(document: &Html) -> Option<DateTime<Utc>> {
    extract_meta_property(document, "article:published_time")
        .or_else(|| extract_meta_name(document, "date"))
        .or_else(|| extract_meta_name(document, "dc.date"))
        .and_then(|date_str| parse_date(&date_str))
}

fn extract_meta_name(document: &Html, name: &str) -> Option<String> {
    extract_meta(document, &format!("meta[name=\"{}\"]", name))
}

fn extract_meta_property(document: &Html, property: &str) -> Option<String> {
    extract_meta(document, &format!("meta[property=\"{}\"]", property))
}

fn extract_meta(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

/// Parse the date formats commonly found in page metadata
fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%B %d, %Y",
        "%d %B %Y",
    ];

    for fmt in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(date_str, fmt)
            && let Some(midnight) = date.and_hms_opt(0, 0, 0)
        {
            return Some(midnight.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>  Why   Everyone Is Wrong </title>
  <meta name="description" content="An opinion piece.">
  <meta property="article:published_time" content="2024-03-05T10:30:00Z">
  <style>.x { color: red; }</style>
</head>
<body>
  <header>Site Header</header>
  <nav>Home | About</nav>
  <article>
    <h1>Why Everyone Is Wrong</h1>
    <p>Everyone is doing it,
       so it must be right.</p>
    <div class="ad">Buy now!</div>
    <script>track();</script>
    <p>That is the whole argument.</p>
  </article>
  <aside>Related links</aside>
  <footer>Copyright</footer>
</body>
</html>"#;

    #[test]
    fn test_extracts_article_text() {
        let article = extract_article(PAGE);

        assert_eq!(
            article.text,
            "Why Everyone Is Wrong Everyone is doing it, so it must be right. That is the whole argument."
        );
    }

    #[test]
    fn test_extracts_metadata() {
        let article = extract_article(PAGE);

        assert_eq!(article.title.as_deref(), Some("Why Everyone Is Wrong"));
        assert_eq!(article.description.as_deref(), Some("An opinion piece."));
        assert_eq!(
            article.published,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_falls_back_to_body_without_boilerplate() {
        let html = r#"<html><body>
            <header>Header</header>
            <p>Plain   body text.</p>
            <footer>Footer</footer>
        </body></html>"#;

        let article = extract_article(html);
        assert_eq!(article.text, "Plain body text.");
        assert_eq!(article.title, None);
    }

    #[test]
    fn test_content_class_container() {
        let html = r#"<html><body>
            <div class="sidebar">Sidebar</div>
            <div class="main-content"><p>First.</p><div class="inner-content">Nested.</div></div>
            <div class="page-content">Second.</div>
        </body></html>"#;

        let article = extract_article(html);
        assert_eq!(article.text, "First. Nested. Second.");
    }

    #[test]
    fn test_empty_container_falls_through() {
        let html = r#"<html><body>
            <main><script>var x = 1;</script></main>
            <p>Visible text.</p>
        </body></html>"#;

        assert_eq!(extract_article(html).text, "Visible text.");
    }

    #[test]
    fn test_no_readable_content() {
        let html = "<html><head><script>1</script></head><body><nav>Menu</nav></body></html>";
        assert!(extract_article(html).text.is_empty());
    }

    #[test]
    fn test_og_fallbacks() {
        let html = r#"<html><head>
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <meta name="date" content="2023-11-02">
        </head><body><p>x</p></body></html>"#;

        let article = extract_article(html);
        assert_eq!(article.title.as_deref(), Some("OG Title"));
        assert_eq!(article.description.as_deref(), Some("OG Description"));
        assert_eq!(
            article.published,
            Some(Utc.with_ymd_and_hms(2023, 11, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("January 15, 2024"), Some(expected));
        assert_eq!(parse_date("15 January 2024"), Some(expected));
        assert_eq!(parse_date("Mon, 15 Jan 2024 00:00:00 +0000"), Some(expected));
        assert_eq!(
            parse_date("2024-01-15T08:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap())
        );
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }
}
