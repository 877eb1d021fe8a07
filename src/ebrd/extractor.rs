use crate::{
    config::SiteConfig,
    ebrd::{JobRecord, NOT_SPECIFIED},
    error::RowError,
    utils::{absolute_link, element_text},
    Extractor, ScraperError,
};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").expect(E);
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

/// Ways of picking data rows out of the results table, tried in order.
#[derive(Debug, Clone)]
pub enum RowStrategy {
    /// Rows carrying the site's data row class.
    ByClass(Selector),
    /// Any row with at least one link, for when the row class changes.
    WithLink,
}

impl RowStrategy {
    pub fn select<'a>(&self, table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self {
            RowStrategy::ByClass(selector) => table.select(selector).collect(),
            RowStrategy::WithLink => table
                .select(&TR)
                .filter(|row| row.select(&A).next().is_some())
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct EbrdExtractor {
    origin: String,
    table: Selector,
    rows: Vec<RowStrategy>,
}

fn class_selector(tag: &str, class: &str) -> Result<Selector, ScraperError> {
    let selector = format!("{}.{}", tag, class);
    Selector::parse(&selector).map_err(|_| ScraperError::Selector(selector.clone()))
}

impl EbrdExtractor {
    pub fn new(config: &SiteConfig) -> Result<Self, ScraperError> {
        Ok(EbrdExtractor {
            origin: config.origin.clone(),
            table: class_selector("table", &config.table_class)?,
            rows: vec![
                RowStrategy::ByClass(class_selector("tr", &config.row_class)?),
                RowStrategy::WithLink,
            ],
        })
    }

    /// `Ok(None)` means the row is not a job at all.
    pub fn extract_row(&self, row: &ElementRef) -> Result<Option<JobRecord>, RowError> {
        let Some(anchor) = row.select(&A).next() else {
            return Ok(None);
        };

        let title = element_text(&anchor);
        if title.is_empty() {
            return Ok(None);
        }

        // A missing href resolves to the site root, the job is still listed.
        let href = anchor.value().attr("href").map(str::trim).unwrap_or("");
        let link = absolute_link(&self.origin, href);
        if reqwest::Url::parse(&link).is_err() {
            return Err(RowError::InvalidLink(link));
        }

        let cells = row.select(&TD).collect::<Vec<_>>();
        let cell_text = |i: usize| {
            cells
                .get(i)
                .map(element_text)
                .unwrap_or_else(|| NOT_SPECIFIED.to_string())
        };

        Ok(Some(JobRecord {
            title,
            link,
            location: cell_text(1),
            posting_date: cell_text(2),
        }))
    }

    fn log_tables(doc: &Html) {
        let tables = doc.select(&TABLE).collect::<Vec<_>>();
        warn!("Found {} table(s) total", tables.len());
        if !tables.is_empty() {
            warn!(
                "Table classes found: [{}]",
                tables
                    .iter()
                    .map(|t| format!("[{}]", t.value().classes().join(", ")))
                    .join(", ")
            );
        }
    }
}

impl Extractor for EbrdExtractor {
    type Record = JobRecord;

    fn extract(&self, doc: &Html) -> Vec<JobRecord> {
        let Some(table) = doc.select(&self.table).next() else {
            warn!("Could not find job listings table");
            Self::log_tables(doc);
            return vec![];
        };
        info!("Job table found, parsing jobs...");

        let rows = self
            .rows
            .iter()
            .map(|strategy| (strategy, strategy.select(table)))
            .find(|(_, rows)| !rows.is_empty())
            .map(|(strategy, rows)| {
                debug!("Rows selected by {:?}", strategy);
                rows
            })
            .unwrap_or_default();
        info!("Found {} job rows", rows.len());

        rows.iter()
            .filter_map(|row| match self.extract_row(row) {
                Ok(job) => job,
                Err(e) => {
                    warn!("Error parsing job row: {}", e);
                    None
                }
            })
            .collect()
    }
}
