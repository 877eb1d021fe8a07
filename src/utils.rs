use chrono::{DateTime, Utc};
use lazy_regex::regex;
use scraper::ElementRef;

const RFC822_GMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Turns an href found in the markup into an absolute URL under `origin`.
/// Already absolute links are returned unchanged.
pub fn absolute_link(origin: &str, href: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

pub fn rfc822(time: DateTime<Utc>) -> String {
    time.format(RFC822_GMT).to_string()
}

pub(crate) fn get_now() -> DateTime<Utc> {
    Utc::now()
}

/// Text content of an element with runs of whitespace collapsed.
pub(crate) fn element_text(el: &ElementRef) -> String {
    let text = el.text().collect::<String>();
    regex!(r"\s+").replace_all(&text, " ").trim().to_string()
}
