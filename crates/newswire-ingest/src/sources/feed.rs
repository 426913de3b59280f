//! RSS 2.0 / RSS 1.0 / Atom syndication feed adapter.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use encoding_rs::{Encoding, UTF_8};
use newswire_core::{NewsItem, SourceConfig};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use reqwest::header::CONTENT_TYPE;

use super::{build_item, get_ok};
use crate::error::IngestError;
use crate::normalize::{clean_text, strip_html};

const ROOT_ELEMENTS: &[&str] = &["rss", "feed", "rdf:RDF", "RDF"];
const ENTRY_ELEMENTS: &[&str] = &["item", "entry"];

pub(super) async fn fetch_feed(
    client: &reqwest::Client,
    source: &SourceConfig,
    url: &str,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let response = get_ok(client, url).await?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await?;
    let xml = decode_feed_body(&body, content_type.as_deref());
    parse_feed(&xml, source, now)
}

/// Decode a feed body to UTF-8.
///
/// Precedence: byte-order mark, then the `Content-Type` charset, then the
/// `encoding` of the XML declaration, then UTF-8. Unknown labels are ignored.
#[must_use]
pub(crate) fn decode_feed_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(header_charset))
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches('"').as_bytes())
    })
}

/// `encoding="..."` from a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(1024)];
    let start = head.iter().position(|b| !b.is_ascii_whitespace())?;
    let head = head[start..].strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = &rest[1..][..rest[1..].find(quote)?];
    Encoding::for_label(label.as_bytes())
}

/// Raw field text for one `<item>` / `<entry>` before normalization.
#[derive(Debug, Default)]
struct RawEntry {
    title: String,
    link: String,
    summary: String,
    description: String,
    guid: String,
    published: String,
    updated: String,
}

impl RawEntry {
    fn set(&mut self, field: &str, text: String) {
        let slot = match field {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "summary" => &mut self.summary,
            "description" => &mut self.description,
            "guid" | "id" => &mut self.guid,
            "pubDate" | "published" | "dc:date" => &mut self.published,
            "updated" => &mut self.updated,
            _ => return,
        };
        if slot.is_empty() {
            *slot = text;
        }
    }

    fn into_item(self, source: &SourceConfig, now: DateTime<Utc>) -> NewsItem {
        let title = clean_text(&self.title);
        let raw_summary = if self.summary.trim().is_empty() {
            &self.description
        } else {
            &self.summary
        };
        let summary = clean_text(&strip_html(raw_summary));

        let mut url = self.link.trim().to_string();
        if url.is_empty() && is_http_url(self.guid.trim()) {
            url = self.guid.trim().to_string();
        }

        let raw_date = if self.published.trim().is_empty() {
            &self.updated
        } else {
            &self.published
        };
        let pub_date = parse_feed_date(raw_date).unwrap_or(now);

        build_item(source, title, summary, url, pub_date)
    }
}

/// Parse a syndication document into items in document order.
///
/// Accepts RSS 2.0 (`<rss>`), RSS 1.0 (`<rdf:RDF>`), and Atom (`<feed>`)
/// roots. Entries with no link are kept with an empty URL; entries with no
/// parseable date use `now`.
///
/// # Errors
///
/// Returns [`IngestError::Xml`] if the XML is not well-formed, or
/// [`IngestError::MalformedFeed`] if the root is not a known feed element or
/// the document ends with open elements.
pub fn parse_feed(
    xml: &str,
    source: &SourceConfig,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut saw_root = false;
    let mut entry_depth: Option<usize> = None;
    let mut field: Option<(String, usize)> = None;
    let mut field_text = String::new();
    let mut entry = RawEntry::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if !saw_root {
                    check_root(&name)?;
                    saw_root = true;
                }
                depth += 1;
                match entry_depth {
                    None if ENTRY_ELEMENTS.contains(&name.as_str()) => {
                        entry_depth = Some(depth);
                        entry = RawEntry::default();
                    }
                    Some(d) if depth == d + 1 && field.is_none() => {
                        if name == "link" {
                            if let Some(href) = atom_href(&e) {
                                entry.set("link", href);
                            }
                        }
                        field = Some((name, depth));
                        field_text.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if !saw_root {
                    check_root(&name)?;
                    saw_root = true;
                }
                if entry_depth == Some(depth) && name == "link" {
                    if let Some(href) = atom_href(&e) {
                        entry.set("link", href);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some((name, d)) = &field {
                    if *d == depth {
                        entry.set(name, std::mem::take(&mut field_text));
                        field = None;
                    }
                }
                if entry_depth == Some(depth) {
                    entry_depth = None;
                    items.push(std::mem::take(&mut entry).into_item(source, now));
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    push_chunk(&mut field_text, &unescape_text(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    push_chunk(&mut field_text, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(IngestError::Xml(e)),
            _ => {}
        }
    }

    if !saw_root {
        return Err(IngestError::MalformedFeed("no root element".to_string()));
    }
    if depth != 0 {
        return Err(IngestError::MalformedFeed(
            "unexpected end of document".to_string(),
        ));
    }
    Ok(items)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn check_root(name: &str) -> Result<(), IngestError> {
    if ROOT_ELEMENTS.contains(&name) {
        Ok(())
    } else {
        Err(IngestError::MalformedFeed(format!(
            "unsupported root element <{name}>"
        )))
    }
}

/// `href` of an Atom `<link>` whose `rel` is absent or `alternate`.
fn atom_href(e: &BytesStart<'_>) -> Option<String> {
    let mut href = None;
    let mut rel_ok = true;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"href" => href = Some(attr.unescape_value().unwrap_or_default().into_owned()),
            b"rel" => rel_ok = attr.unescape_value().is_ok_and(|v| v == "alternate"),
            _ => {}
        }
    }
    href.filter(|h| rel_ok && !h.trim().is_empty())
}

/// Unescape XML and HTML named entities; undecodable text is kept verbatim.
fn unescape_text(e: &BytesText<'_>) -> String {
    e.unescape_with(resolve_html5_entity)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned())
}

fn push_chunk(buf: &mut String, chunk: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(chunk);
}

fn is_http_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// RFC 2822 first (RSS), then RFC 3339 (Atom, Dublin Core).
fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_source;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>World News</title>
    <link>https://example.com/</link>
    <item>
      <title> Hello   World </title>
      <link>https://example.com/hello</link>
      <description><![CDATA[<p>Breaking <b>news</b></p>]]></description>
      <pubDate>Tue, 10 Jun 2025 08:30:00 GMT</pubDate>
    </item>
    <item>
      <title>No link here</title>
      <description>Plain summary</description>
    </item>
    <item>
      <title>Guid fallback</title>
      <guid isPermaLink="true">https://example.com/guid</guid>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom feed</title>
  <link href="https://example.com/" rel="self"/>
  <entry>
    <title>Atom entry</title>
    <link rel="edit" href="https://example.com/edit/1"/>
    <link rel="alternate" href="https://example.com/atom/1"/>
    <summary>Atom summary</summary>
    <updated>2025-06-11T12:00:00Z</updated>
  </entry>
</feed>"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_rss_items_in_document_order() {
        let items = parse_feed(RSS, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Hello World");
        assert_eq!(items[0].summary, "Breaking news");
        assert_eq!(items[0].url, "https://example.com/hello");
        assert_eq!(
            items[0].pub_date,
            Utc.with_ymd_and_hms(2025, 6, 10, 8, 30, 0).unwrap()
        );
        assert_eq!(items[0].source, "BBC");
        assert_eq!(items[0].country, "UK");
    }

    #[test]
    fn item_without_link_keeps_empty_url() {
        let items = parse_feed(RSS, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert_eq!(items[1].url, "");
        assert_eq!(items[1].summary, "Plain summary");
        assert_eq!(items[1].pub_date, now());
    }

    #[test]
    fn guid_url_used_when_link_missing() {
        let items = parse_feed(RSS, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert_eq!(items[2].url, "https://example.com/guid");
        assert_eq!(items[2].pub_date, now(), "unparseable date falls back to now");
        assert_eq!(items[2].summary, "");
    }

    #[test]
    fn channel_level_fields_do_not_leak_into_items() {
        let items = parse_feed(RSS, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert!(items.iter().all(|i| i.title != "World News"));
    }

    #[test]
    fn parses_atom_alternate_link_and_updated_date() {
        let items = parse_feed(ATOM, &test_source("US", "CNN"), now()).expect("valid Atom");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://example.com/atom/1");
        assert_eq!(items[0].summary, "Atom summary");
        assert_eq!(
            items[0].pub_date,
            Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn rdf_root_with_dublin_core_date() {
        let xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <item>
    <title>RDF item</title>
    <link>https://example.com/rdf</link>
    <dc:date>2025-05-01T00:00:00Z</dc:date>
  </item>
</rdf:RDF>"#;
        let items = parse_feed(xml, &test_source("DE", "DW"), now()).expect("valid RDF");
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].pub_date,
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_channel_yields_no_items() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        let items = parse_feed(xml, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert!(items.is_empty());
    }

    #[test]
    fn non_feed_root_is_rejected() {
        let result = parse_feed(
            "<html><body>nope</body></html>",
            &test_source("UK", "BBC"),
            now(),
        );
        assert!(matches!(result, Err(IngestError::MalformedFeed(_))));
    }

    #[test]
    fn plain_text_is_rejected() {
        let result = parse_feed("this is not xml", &test_source("UK", "BBC"), now());
        assert!(matches!(result, Err(IngestError::MalformedFeed(_))));
    }

    #[test]
    fn html_named_entities_are_resolved() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Hello&nbsp;World &amp; more&hellip;</title>
    <link>https://example.com/cafe</link>
    <description>Caf&eacute; opens &#8220;today&#8221;</description>
  </item>
</channel></rss>"#;
        let items = parse_feed(xml, &test_source("FR", "AFP"), now()).expect("valid RSS");
        assert_eq!(items[0].title, "Hello World & more\u{2026}");
        assert_eq!(items[0].summary, "Caf\u{e9} opens \u{201c}today\u{201d}");
    }

    #[test]
    fn unknown_entity_keeps_raw_text() {
        let xml = r#"<rss><channel><item><title>Odd &bogus; entity</title></item></channel></rss>"#;
        let items = parse_feed(xml, &test_source("UK", "BBC"), now()).expect("valid RSS");
        assert_eq!(items[0].title, "Odd &bogus; entity");
    }

    #[test]
    fn declared_latin1_encoding_is_honoured() {
        let body = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><item><title>Caf\xe9</title></item></channel></rss>";
        let xml = decode_feed_body(body, Some("application/rss+xml"));
        let items = parse_feed(&xml, &test_source("FR", "AFP"), now()).expect("valid RSS");
        assert_eq!(items[0].title, "Caf\u{e9}");
    }

    #[test]
    fn header_charset_overrides_declaration() {
        let body = "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss/>\u{e9}";
        let xml = decode_feed_body(body.as_bytes(), Some("text/xml; charset=\"utf-8\""));
        assert!(xml.ends_with('\u{e9}'));
    }

    #[test]
    fn undeclared_body_defaults_to_utf8() {
        let xml = decode_feed_body("<rss>Caf\u{e9}</rss>".as_bytes(), None);
        assert_eq!(xml, "<rss>Caf\u{e9}</rss>");
    }

    #[test]
    fn unknown_declared_label_falls_back_to_utf8() {
        let body = "<?xml version='1.0' encoding='x-made-up'?><rss>\u{e9}</rss>";
        let xml = decode_feed_body(body.as_bytes(), None);
        assert!(xml.contains('\u{e9}'));
    }

    #[test]
    fn truncated_document_is_an_error() {
        let result = parse_feed(
            "<rss><channel><item><title>Unclosed",
            &test_source("UK", "BBC"),
            now(),
        );
        assert!(result.is_err());
    }
}
