//! HTML table extraction for division reports.
//!
//! Reports are produced by the tournament scoring software as plain HTML with
//! closed `<table>`, `<tr>` and `<td>`/`<th>` tags. Anything nested inside a
//! cell is flattened to its text.

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

static TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table\s*>").unwrap());

static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").unwrap());

static CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<t[dh]\b([^>]*)>(.*?)</t[dh]\s*>").unwrap());

static COLSPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bcolspan\s*=\s*["']?(\d+)"#).unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

/// Value substituted for empty cells.
pub const NULL_CELL: &str = "0";

/// One extracted table. The first source row becomes `headers`; every row in
/// `rows` has at least as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from raw rows, treating the first as the header row and
    /// normalizing blanks in the rest to [`NULL_CELL`].
    pub fn from_rows(mut raw: Vec<Vec<String>>) -> Option<Self> {
        raw.retain(|row| row.iter().any(|cell| !cell.is_empty()));
        if raw.is_empty() {
            return None;
        }

        let headers = raw.remove(0);
        let rows = raw
            .into_iter()
            .map(|mut row| {
                if row.len() < headers.len() {
                    row.resize(headers.len(), String::new());
                }
                for cell in row.iter_mut() {
                    if cell.is_empty() {
                        *cell = NULL_CELL.to_string();
                    }
                }
                row
            })
            .collect();

        Some(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or `""` when the coordinates fall outside the table.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.headers
            .iter()
            .chain(self.rows.iter().flatten())
            .any(|cell| cell.contains(needle))
    }
}

/// Extracts every table in `markup`, in document order.
pub fn extract_tables(markup: &str) -> Vec<Table> {
    TABLE_REGEX
        .captures_iter(markup)
        .filter_map(|table_cap| {
            let body = table_cap.get(1)?.as_str();
            let raw_rows = ROW_REGEX
                .captures_iter(body)
                .filter_map(|row_cap| row_cap.get(1).map(|m| parse_row(m.as_str())))
                .filter(|cells| !cells.is_empty())
                .collect();
            Table::from_rows(raw_rows)
        })
        .collect()
}

/// Extracts the tables whose text contains `locator`.
pub fn find_tables(markup: &str, locator: &str) -> Vec<Table> {
    extract_tables(markup)
        .into_iter()
        .filter(|t| t.contains_text(locator))
        .collect()
}

fn parse_row(row_html: &str) -> Vec<String> {
    let mut cells = Vec::new();

    for cap in CELL_REGEX.captures_iter(row_html) {
        let attrs = cap.get(1).map(|m| m.as_str()).unwrap_or("");
        let text = cap.get(2).map(|m| cell_text(m.as_str())).unwrap_or_default();

        let span = COLSPAN_REGEX
            .captures(attrs)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);

        for _ in 1..span {
            cells.push(text.clone());
        }
        cells.push(text);
    }

    cells
}

/// Tag-stripped, entity-decoded, whitespace-collapsed text of a cell.
pub fn cell_text(html: &str) -> String {
    let stripped = TAG_REGEX.replace_all(html, " ");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn decode_entities(s: &str) -> String {
    ENTITY_REGEX
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
