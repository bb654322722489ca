//! Extractor for plain-text article files in the WikiExtractor layout:
//!
//! ```text
//! <doc id="12" url="https://en.wikipedia.org/wiki?curid=12" title="Anarchism">
//! Anarchism
//!
//! Anarchism is a political philosophy ...
//! </doc>
//! ```
//!
//! Text between the tags is passed on verbatim, including the title line.

use std::io::BufRead;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::{Article, ArticleStream, Extractor, open_shard, read_line_lossy};
use crate::error::{Result, WikiFreqError};

lazy_static! {
    static ref DOC_ID: Regex = Regex::new(r#"\bid="([^"]*)""#).unwrap();
}

struct OpenDoc {
    id: String,
    lines: Vec<String>,
}

impl OpenDoc {
    fn into_article(self) -> Article {
        Article::new(self.id, self.lines.join("\n"))
    }
}

/// Iterates over the `<doc>` blocks of a reader.
pub struct DocReader<R> {
    reader: R,
    line: Vec<u8>,
    open: Option<OpenDoc>,
    done: bool,
}

impl<R: BufRead> DocReader<R> {
    pub fn new(reader: R) -> Self {
        DocReader {
            reader,
            line: Vec::new(),
            open: None,
            done: false,
        }
    }

    fn next_doc(&mut self) -> Result<Option<Article>> {
        while let Some(line) = read_line_lossy(&mut self.reader, &mut self.line)? {
            if line.starts_with("<doc ") || line == "<doc>" {
                let id = DOC_ID
                    .captures(&line)
                    .map(|cap| cap[1].to_string())
                    .unwrap_or_default();
                let next = OpenDoc {
                    id,
                    lines: Vec::new(),
                };
                if let Some(unclosed) = self.open.replace(next) {
                    return Err(unclosed_error(unclosed));
                }
                continue;
            }
            if line.starts_with("</doc>") {
                match self.open.take() {
                    Some(doc) => return Ok(Some(doc.into_article())),
                    None => continue,
                }
            }
            if let Some(doc) = self.open.as_mut() {
                doc.lines.push(line);
            }
        }
        match self.open.take() {
            Some(unclosed) => Err(unclosed_error(unclosed)),
            None => Ok(None),
        }
    }
}

fn unclosed_error(doc: OpenDoc) -> WikiFreqError {
    WikiFreqError::malformed_article(doc.id, "<doc> is not closed")
}

impl<R: BufRead> Iterator for DocReader<R> {
    type Item = Result<Article>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_doc() {
            Ok(Some(article)) => Some(Ok(article)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                if !e.is_recoverable() {
                    self.done = true;
                }
                Some(Err(e))
            }
        }
    }
}

/// Reads WikiExtractor-style `<doc>` files, optionally compressed.
#[derive(Clone, Debug, Default)]
pub struct DocFileExtractor;

impl DocFileExtractor {
    pub fn new() -> Self {
        DocFileExtractor
    }
}

impl Extractor for DocFileExtractor {
    fn extract(&self, shard: &Path) -> Result<ArticleStream> {
        Ok(Box::new(DocReader::new(open_shard(shard)?)))
    }

    fn name(&self) -> &'static str {
        "doc"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read(text: &str) -> Vec<Result<Article>> {
        DocReader::new(Cursor::new(text.to_string())).collect()
    }

    #[test]
    fn test_read_docs() {
        let docs = read(concat!(
            "<doc id=\"1\" url=\"u\" title=\"A\">\nA\n\nFirst article.\n</doc>\n",
            "<doc id=\"2\" url=\"u\" title=\"B\">\nB\n<ref>x</ref>\n</doc>\n",
        ));
        let docs: Vec<Article> = docs.into_iter().map(|d| d.unwrap()).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Article::new("1", "A\n\nFirst article."));
        assert_eq!(docs[1], Article::new("2", "B\n<ref>x</ref>"));
    }

    #[test]
    fn test_unclosed_doc_reported_then_continues() {
        let docs = read(concat!(
            "<doc id=\"1\">\nlost\n",
            "<doc id=\"2\">\nkept\n</doc>\n",
        ));
        assert_eq!(docs.len(), 2);
        match &docs[0] {
            Err(WikiFreqError::MalformedArticle { article_id, .. }) => assert_eq!(article_id, "1"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(docs[1].as_ref().unwrap(), &Article::new("2", "kept"));
    }

    #[test]
    fn test_unclosed_at_end() {
        let docs = read("<doc id=\"9\">\ntext\n");
        assert_eq!(docs.len(), 1);
        assert!(docs[0].as_ref().unwrap_err().is_recoverable());
    }

    #[test]
    fn test_lines_outside_docs_ignored() {
        let docs = read("junk\n</doc>\n<doc id=\"3\">\nx\n</doc>\ntrailer\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_ref().unwrap().id, "3");
    }
}
