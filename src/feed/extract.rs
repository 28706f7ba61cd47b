// src/feed/extract.rs
//! Pulls one candidate warning out of a raw feed document.
//!
//! The feed is a BoM "product" XML document. Only six addressed fields
//! matter; everything else in the document is ignored:
//!   - `text[@type="warning_area_summary"]/p`  — which districts are covered
//!   - `text[@type="warning_title"]/p`
//!   - `text[@type="warning_headline"]`        — direct element text, no <p>
//!   - `text[@type="synoptic_situation"]/p`
//!   - `amoc/identifier`, `amoc/issue-time-utc` — identity composition only
//!
//! For each field the first match in document order wins, and only text
//! appearing before the first child element of the addressed node is taken.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::feed::types::WarningOccurrence;

/// The document is not well-formed, or is missing a field a warning bulletin
/// is required to carry. Callers treat this the same as "no warning".
#[derive(Debug, Error)]
#[error("malformed feed: {0}")]
pub struct MalformedFeed(String);

fn malformed(msg: impl ToString) -> MalformedFeed {
    MalformedFeed(msg.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AreaSummary,
    Title,
    Headline,
    Situation,
    Identifier,
    IssueTime,
}

impl Field {
    fn for_text_type(t: &str) -> Option<Field> {
        match t {
            "warning_area_summary" => Some(Field::AreaSummary),
            "warning_title" => Some(Field::Title),
            "warning_headline" => Some(Field::Headline),
            "synoptic_situation" => Some(Field::Situation),
            _ => None,
        }
    }

    /// Headline text sits directly on the `text` element; the others are
    /// wrapped in a `<p>` child.
    fn wrapped_in_p(&self) -> bool {
        !matches!(self, Field::Headline | Field::Identifier | Field::IssueTime)
    }
}

#[derive(Debug, Default)]
struct Sections {
    area_summary: Option<String>,
    title: Option<String>,
    headline: Option<String>,
    situation: Option<String>,
    identifier: Option<String>,
    issue_time: Option<String>,
}

impl Sections {
    fn get(&self, field: Field) -> &Option<String> {
        match field {
            Field::AreaSummary => &self.area_summary,
            Field::Title => &self.title,
            Field::Headline => &self.headline,
            Field::Situation => &self.situation,
            Field::Identifier => &self.identifier,
            Field::IssueTime => &self.issue_time,
        }
    }

    fn set_first(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::AreaSummary => &mut self.area_summary,
            Field::Title => &mut self.title,
            Field::Headline => &mut self.headline,
            Field::Situation => &mut self.situation,
            Field::Identifier => &mut self.identifier,
            Field::IssueTime => &mut self.issue_time,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// One open element on the walk stack.
struct Elem {
    name: String,
    /// `type` attribute when the element is a `<text>` section.
    text_type: Option<String>,
}

/// Text being collected for one addressed node. Collection stops at the
/// node's first child element, matching ElementTree `.text` semantics.
struct Capture {
    field: Field,
    buf: String,
    depth: usize,
}

fn text_type_attr(e: &BytesStart<'_>) -> Result<Option<String>, MalformedFeed> {
    if e.local_name().as_ref() != b"text" {
        return Ok(None);
    }
    let attr = e.try_get_attribute("type").map_err(malformed)?;
    match attr {
        Some(a) => Ok(Some(a.unescape_value().map_err(malformed)?.into_owned())),
        None => Ok(None),
    }
}

fn parse_sections(doc: &[u8]) -> Result<Sections, MalformedFeed> {
    let mut reader = Reader::from_reader(doc);
    let mut buf = Vec::new();

    let mut sections = Sections::default();
    let mut stack: Vec<Elem> = Vec::new();
    let mut capture: Option<Capture> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(malformed(e)),
            Ok(Event::Start(e)) => {
                // Any child element terminates a pending capture.
                if let Some(c) = capture.take() {
                    sections.set_first(c.field, c.buf);
                }

                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let text_type = text_type_attr(&e)?;
                if let Some(target) = begin_capture(&name, text_type.as_deref(), &stack, &sections)
                {
                    capture = Some(Capture {
                        field: target,
                        buf: String::new(),
                        depth: stack.len() + 1,
                    });
                }
                stack.push(Elem { name, text_type });
            }
            Ok(Event::Empty(_)) => {
                // Self-closing children also end the addressed node's text.
                if let Some(c) = capture.take() {
                    sections.set_first(c.field, c.buf);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(c) = capture.take_if(|c| c.depth == stack.len()) {
                    sections.set_first(c.field, c.buf);
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                if let Some(c) = capture.as_mut() {
                    c.buf.push_str(&t.unescape().map_err(malformed)?);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(c) = capture.as_mut() {
                    c.buf.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(sections)
}

/// Decide whether the element just opened is a node whose text we want.
fn begin_capture(
    name: &str,
    text_type: Option<&str>,
    stack: &[Elem],
    sections: &Sections,
) -> Option<Field> {
    let parent = stack.last();

    let field = match name {
        // <p> under an addressed <text> section
        "p" => parent
            .and_then(|p| p.text_type.as_deref())
            .and_then(Field::for_text_type)
            .filter(|f| f.wrapped_in_p()),
        // headline text lives on the <text> element itself
        "text" => text_type
            .and_then(Field::for_text_type)
            .filter(|f| !f.wrapped_in_p()),
        "identifier" if parent.is_some_and(|p| p.name == "amoc") => Some(Field::Identifier),
        "issue-time-utc" if parent.is_some_and(|p| p.name == "amoc") => Some(Field::IssueTime),
        _ => None,
    };

    field.filter(|f| sections.get(*f).is_none())
}

/// Parse a feed document and extract the warning applying to `town`, if any.
///
/// `Ok(None)` covers the two normal quiet outcomes: the document carries no
/// area summary (nothing issued for the region), or a warning is active but
/// its area summary does not mention the configured town.
pub fn extract(doc: &[u8], town: &str) -> Result<Option<WarningOccurrence>, MalformedFeed> {
    let sections = parse_sections(doc)?;

    let area = match sections.area_summary {
        Some(ref a) if !a.trim().is_empty() => a,
        _ => return Ok(None),
    };

    // A bulletin must carry its identity fields even before the town check.
    let identifier = sections
        .identifier
        .ok_or_else(|| malformed("missing amoc identifier"))?;
    let issue_time = sections
        .issue_time
        .ok_or_else(|| malformed("missing amoc issue-time-utc"))?;

    if !area.to_lowercase().contains(&town.to_lowercase()) {
        return Ok(None);
    }

    let title = sections
        .title
        .ok_or_else(|| malformed("missing warning_title"))?;
    let headline = sections
        .headline
        .ok_or_else(|| malformed("missing warning_headline"))?;
    let situation = sections
        .situation
        .ok_or_else(|| malformed("missing synoptic_situation"))?;

    Ok(Some(WarningOccurrence {
        identity: format!("{identifier}{issue_time}"),
        title: title.trim().to_string(),
        message: format!("{headline}\n\n{situation}").trim().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<product version="1.6.2">
  <amoc>
    <source><sender>Australian Government Bureau of Meteorology</sender></source>
    <identifier>IDQ21037</identifier>
    <issue-time-utc>2025-11-03T04:30:00Z</issue-time-utc>
  </amoc>
  <warning>
    <warning-info>
      <text type="warning_title">
        <p>Severe Thunderstorm Warning</p>
      </text>
      <text type="warning_headline">For damaging winds and large hailstones.</text>
      <text type="warning_area_summary">
        <p>Ipswich, Logan and the Scenic Rim</p>
      </text>
      <text type="synoptic_situation">
        <p>A trough moving east triggers thunderstorms over the southeast.</p>
      </text>
    </warning-info>
  </warning>
</product>
"#;

    #[test]
    fn extracts_matching_town() {
        let occ = extract(FEED.as_bytes(), "Ipswich").unwrap().unwrap();
        assert_eq!(occ.identity, "IDQ210372025-11-03T04:30:00Z");
        assert_eq!(occ.title, "Severe Thunderstorm Warning");
        assert_eq!(
            occ.message,
            "For damaging winds and large hailstones.\n\nA trough moving east triggers thunderstorms over the southeast."
        );
    }

    #[test]
    fn town_match_is_case_insensitive_substring() {
        assert!(extract(FEED.as_bytes(), "ipswich").unwrap().is_some());
        assert!(extract(FEED.as_bytes(), "scenic rim").unwrap().is_some());
    }

    #[test]
    fn non_matching_town_is_none() {
        assert!(extract(FEED.as_bytes(), "Brisbane").unwrap().is_none());
    }

    #[test]
    fn missing_area_summary_is_none() {
        let doc = FEED.replace("warning_area_summary", "somewhere_else");
        assert!(extract(doc.as_bytes(), "Ipswich").unwrap().is_none());
    }

    #[test]
    fn blank_area_summary_is_none() {
        let doc = FEED.replace("Ipswich, Logan and the Scenic Rim", "   ");
        assert!(extract(doc.as_bytes(), "Ipswich").unwrap().is_none());
    }

    #[test]
    fn first_matching_section_wins() {
        let doc = FEED.replace(
            "</warning-info>",
            r#"<text type="warning_area_summary"><p>Cairns</p></text></warning-info>"#,
        );
        assert!(extract(doc.as_bytes(), "Cairns").unwrap().is_none());
        assert!(extract(doc.as_bytes(), "Ipswich").unwrap().is_some());
    }

    #[test]
    fn missing_identity_fields_are_malformed() {
        let doc = FEED.replace("identifier>", "ident>");
        assert!(extract(doc.as_bytes(), "Ipswich").is_err());
        // Even when the town does not match: identity is read first.
        assert!(extract(doc.as_bytes(), "Brisbane").is_err());
    }

    #[test]
    fn matched_warning_without_title_is_malformed() {
        let doc = FEED.replace("warning_title", "other_text");
        assert!(extract(doc.as_bytes(), "Ipswich").is_err());
        // ...but an unmatched town never needs the title.
        assert!(extract(doc.as_bytes(), "Brisbane").unwrap().is_none());
    }

    #[test]
    fn truncated_document_is_malformed() {
        // Cut mid-tag so the reader hits a syntax error, not a quiet EOF.
        let cut = FEED.find("</product>").unwrap() + "</pro".len();
        assert!(extract(FEED[..cut].as_bytes(), "Ipswich").is_err());
    }

    #[test]
    fn entities_are_unescaped() {
        let doc = FEED.replace("Logan and", "Logan &amp;");
        let occ = extract(doc.as_bytes(), "Ipswich").unwrap().unwrap();
        assert!(occ.identity.starts_with("IDQ21037"));
    }
}
