//! RSS 2.0 rendering of the job list.
//!
//! The output is indented by two spaces, declares UTF-8 and carries an
//! `atom:link rel="self"` so feed validators accept it.

use crate::{config::SiteConfig, ebrd::JobRecord, utils::rfc822, ScraperError};
use chrono::{DateTime, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io::Write;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const RSS_MIME: &str = "application/rss+xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    /// Where the feed file itself is published.
    pub self_url: String,
}

impl FeedChannel {
    pub fn from_config(config: &SiteConfig) -> Self {
        FeedChannel {
            title: config.feed_title.clone(),
            link: config.search_url(),
            description: config.feed_description.clone(),
            language: config.language.clone(),
            self_url: config.self_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

impl FeedItem {
    /// The posting date stays display text inside the description; `pub_date`
    /// is the time of the run.
    pub fn from_job(job: &JobRecord, pub_date: &str) -> Self {
        FeedItem {
            title: job.title.clone(),
            link: job.link.clone(),
            description: format!(
                "Location: {}\nPosting Date: {}",
                job.location, job.posting_date
            ),
            pub_date: pub_date.to_string(),
        }
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ScraperError> {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text(writer, "title", &self.title)?;
        write_text(writer, "link", &self.link)?;
        write_text(writer, "description", &self.description)?;
        write_text(writer, "pubDate", &self.pub_date)?;
        writer.write_event(Event::Start(
            BytesStart::new("guid").with_attributes([("isPermaLink", "true")]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(&self.link)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
        Ok(())
    }
}

fn write_text<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), ScraperError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Renders `jobs` in order, one item each. Callers dedup beforehand.
pub fn build_feed(
    channel: &FeedChannel,
    jobs: &[JobRecord],
    now: DateTime<Utc>,
) -> Result<String, ScraperError> {
    let now = rfc822(now);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0"), ("xmlns:atom", ATOM_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text(&mut writer, "title", &channel.title)?;
    write_text(&mut writer, "link", &channel.link)?;
    write_text(&mut writer, "description", &channel.description)?;
    write_text(&mut writer, "language", &channel.language)?;
    write_text(&mut writer, "lastBuildDate", &now)?;
    writer.write_event(Event::Empty(BytesStart::new("atom:link").with_attributes([
        ("href", channel.self_url.as_str()),
        ("rel", "self"),
        ("type", RSS_MIME),
    ])))?;

    for job in jobs {
        FeedItem::from_job(job, &now).write(&mut writer)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}
