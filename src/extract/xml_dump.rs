//! Extractor for raw MediaWiki `pages-articles` XML dumps.
//!
//! Pages are scanned line by line between `<page>` and `</page>`; only
//! namespace 0 pages that are not redirects become articles. Page text is
//! XML-unescaped and converted from wikitext to plain text, with the page
//! title as the first line.

use std::io::BufRead;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::wikitext;
use super::{Article, ArticleStream, Extractor, open_shard, read_line_lossy};
use crate::error::{Result, WikiFreqError};

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"<title>([^<]*)</title>").unwrap();
    static ref NS_PATTERN: Regex = Regex::new(r"<ns>(\d+)</ns>").unwrap();
    static ref ID_PATTERN: Regex = Regex::new(r"<id>(\d+)</id>").unwrap();
    static ref TEXT_PATTERN: Regex = Regex::new(r"(?s)<text[^>]*?(?:/>|>(.*?)</text>)").unwrap();
    static ref REDIRECT_PATTERN: Regex = Regex::new(r"<redirect\b").unwrap();
}

/// Iterates over the `<page>…</page>` blocks of a dump.
pub struct PageScanner<R> {
    reader: R,
    line: Vec<u8>,
    done: bool,
}

impl<R: BufRead> PageScanner<R> {
    pub fn new(reader: R) -> Self {
        PageScanner {
            reader,
            line: Vec::new(),
            done: false,
        }
    }

    fn next_page(&mut self) -> Result<Option<String>> {
        let mut page: Option<String> = None;
        while let Some(line) = read_line_lossy(&mut self.reader, &mut self.line)? {
            match page.as_mut() {
                None => {
                    if let Some(start) = line.find("<page>") {
                        page = Some(line[start..].to_string());
                        if line[start..].contains("</page>") {
                            return Ok(page);
                        }
                    }
                }
                Some(buffer) => {
                    buffer.push('\n');
                    buffer.push_str(&line);
                    if line.contains("</page>") {
                        return Ok(page);
                    }
                }
            }
        }
        if page.is_some() {
            log::debug!("Dump ended inside an unterminated <page>");
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for PageScanner<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_page() {
            Ok(Some(page)) => Some(Ok(page)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Turn one `<page>` block into an article. `Ok(None)` for pages that are
/// not articles (other namespaces, redirects).
pub fn parse_page(page_xml: &str) -> Result<Option<Article>> {
    if let Some(cap) = NS_PATTERN.captures(page_xml) {
        if &cap[1] != "0" {
            return Ok(None);
        }
    }
    if REDIRECT_PATTERN.is_match(page_xml) {
        return Ok(None);
    }

    let title = TITLE_PATTERN
        .captures(page_xml)
        .map(|cap| wikitext::unescape(&cap[1]).into_owned());
    let id = match ID_PATTERN.captures(page_xml) {
        Some(cap) => cap[1].to_string(),
        None => {
            return Err(WikiFreqError::malformed_article(
                title.unwrap_or_default(),
                "page has no <id>",
            ));
        }
    };
    let text = match TEXT_PATTERN.captures(page_xml) {
        Some(cap) => cap.get(1).map_or("", |m| m.as_str()),
        None => return Err(WikiFreqError::malformed_article(id, "page has no <text>")),
    };

    let body = wikitext::strip(&wikitext::unescape(text));
    let text = match title {
        Some(title) if body.is_empty() => title,
        Some(title) => format!("{title}\n{body}"),
        None => body,
    };

    Ok(Some(Article { id, text }))
}

/// Reads `{lang}wiki-{date}-pages-articles{N}.xml[.bz2]` shards.
#[derive(Clone, Debug, Default)]
pub struct XmlDumpExtractor;

impl XmlDumpExtractor {
    pub fn new() -> Self {
        XmlDumpExtractor
    }
}

impl Extractor for XmlDumpExtractor {
    fn extract(&self, shard: &Path) -> Result<ArticleStream> {
        let pages = PageScanner::new(open_shard(shard)?);
        let articles = pages.filter_map(|page| match page {
            Ok(page) => parse_page(&page).transpose(),
            Err(e) => Some(Err(e)),
        });
        Ok(Box::new(articles))
    }

    fn name(&self) -> &'static str {
        "xml"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const DUMP: &str = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.11/">
  <siteinfo>
    <sitename>Wikipedia</sitename>
  </siteinfo>
  <page>
    <title>Tokyo</title>
    <ns>0</ns>
    <id>12</id>
    <revision>
      <id>999</id>
      <text bytes="60" xml:space="preserve">'''Tokyo''' is a [[city]].&lt;ref&gt;cite&lt;/ref&gt;
{{Infobox}}
More text.</text>
    </revision>
  </page>
  <page>
    <title>Talk:Tokyo</title>
    <ns>1</ns>
    <id>13</id>
    <revision><text>talk</text></revision>
  </page>
  <page>
    <title>Tokio</title>
    <ns>0</ns>
    <id>14</id>
    <redirect title="Tokyo" />
    <revision><text>#REDIRECT [[Tokyo]]</text></revision>
  </page>
  <page>
    <title>Empty</title>
    <ns>0</ns>
    <id>15</id>
    <revision><text bytes="0" /></revision>
  </page>
</mediawiki>
"#;

    #[test]
    fn test_page_scanner() {
        let pages: Vec<_> = PageScanner::new(Cursor::new(DUMP))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(pages.len(), 4);
        assert!(pages[0].starts_with("<page>"));
        assert!(pages[0].ends_with("</page>"));
    }

    #[test]
    fn test_parse_pages() {
        let articles: Vec<Article> = PageScanner::new(Cursor::new(DUMP))
            .filter_map(|p| parse_page(&p.unwrap()).unwrap())
            .collect();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "12");
        assert_eq!(
            articles[0].text,
            "Tokyo\nTokyo is a city.<ref>cite</ref>\nMore text."
        );
        assert_eq!(articles[1].id, "15");
        assert_eq!(articles[1].text, "Empty");
    }

    #[test]
    fn test_page_without_id_is_malformed() {
        let err = parse_page("<page><title>X</title><ns>0</ns><text>x</text></page>").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_single_line_page() {
        let pages: Vec<_> = PageScanner::new(Cursor::new("<page><id>1</id><text>a</text></page>\n"))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_unterminated_page_dropped() {
        let pages: Vec<_> = PageScanner::new(Cursor::new("<page>\n<id>1</id>\n"))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert!(pages.is_empty());
    }
}
