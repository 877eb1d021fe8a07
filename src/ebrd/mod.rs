mod extractor;

pub use extractor::{EbrdExtractor, RowStrategy};

use crate::Listing;

use std::fmt;

/// Placeholder for a location or posting date cell the row does not have.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub title: String,
    /// Absolute URL of the posting, also its identity.
    pub link: String,
    pub location: String,
    /// Display text as shown on the site, never parsed.
    pub posting_date: String,
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title           : {}", self.title)?;
        writeln!(f, "Link            : {}", self.link)?;
        writeln!(f, "Location        : {}", self.location)?;
        writeln!(f, "Posting Date    : {}", self.posting_date)
    }
}

impl Listing for JobRecord {
    fn get_link(&self) -> &str {
        self.link.as_str()
    }
}
