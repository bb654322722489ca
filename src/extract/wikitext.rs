//! Wikitext to plain text.
//!
//! A best-effort conversion: templates, tables, comments, media and category
//! links are dropped; links keep their label; emphasis quotes, heading marks
//! and list markers are removed. Reference tags and other HTML-like residue
//! are left for the markup cleaner.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref INNER_TEMPLATE: Regex = Regex::new(r"\{\{[^{}]*\}\}").unwrap();
    static ref MEDIA_LINK: Regex = Regex::new(concat!(
        r"(?i)\[\[\s*(?:file|image|media|category|ファイル|画像|カテゴリ|文件|图像|分类|",
        r"datei|bild|kategorie|fichier|catégorie|archivo|categoría)\s*:",
        r"[^\[\]]*(?:\[\[[^\[\]]*\]\][^\[\]]*)*\]\]",
    ))
    .unwrap();
    static ref LINK: Regex = Regex::new(r"\[\[(?:[^\[\]|]*\|)?([^\[\]|]*)\]\]").unwrap();
    static ref EXTERNAL_LINK: Regex = Regex::new(r"\[(?:https?:)?//[^\s\]]+(?:\s+([^\]]*))?\]").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"'{2,5}").unwrap();
    static ref HEADING: Regex = Regex::new(r"^(=+)\s*(.*?)\s*=+\s*$").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^[*#:;]+\s*").unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos|nbsp);").unwrap();
}

// Nested templates are removed from the inside out; deeper nesting than this
// is left in place.
const MAX_TEMPLATE_DEPTH: usize = 16;

/// Replace XML/HTML character references.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => {
                let number = if let Some(hex) = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    entity[1..].parse().ok()
                };
                number.and_then(char::from_u32)
            }
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn remove_templates(text: &str) -> String {
    let mut text = text.to_string();
    for _ in 0..MAX_TEMPLATE_DEPTH {
        if !text.contains("{{") {
            break;
        }
        let replaced = INNER_TEMPLATE.replace_all(&text, "");
        if let Cow::Owned(replaced) = replaced {
            text = replaced;
        } else {
            break;
        }
    }
    text
}

/// Drop `{| … |}` tables, which may nest and span many lines.
fn remove_tables(text: &str) -> String {
    let mut depth = 0usize;
    let mut kept = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("{|") {
            depth += 1;
            continue;
        }
        if depth > 0 {
            if trimmed.starts_with("|}") {
                depth -= 1;
            }
            continue;
        }
        kept.push(line);
    }
    kept.join("\n")
}

fn strip_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || (line.starts_with("__") && line.ends_with("__")) {
        return None;
    }
    let line = match HEADING.captures(line) {
        Some(caps) => caps[2].to_string(),
        None => LIST_MARKER.replace(line, "").into_owned(),
    };
    let line = EMPHASIS.replace_all(&line, "").into_owned();
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// Convert the wikitext of one page into plain text lines.
pub fn strip(wikitext: &str) -> String {
    let text = COMMENT.replace_all(wikitext, "");
    let text = remove_templates(&text);
    let text = remove_tables(&text);
    let text = MEDIA_LINK.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = EXTERNAL_LINK.replace_all(&text, "$1");

    text.lines()
        .filter_map(strip_line)
        .map(|line| unescape(&line).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
