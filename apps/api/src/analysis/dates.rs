//! Finds date ranges in resume text and flags the ones that end after the
//! evaluation date.
//!
//! Three independent passes collect date tokens (`MM/YYYY`, `YYYY/MM`,
//! month name + year). Each line holding a hyphen-family separator is then
//! split into a start and an end fragment, and each fragment resolves to the
//! last token whose raw text it contains. "Ongoing" vocabulary on the end side
//! resolves to [`RangeEnd::Present`], which is never in the future.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::turkish::fold;

const MONTHS: &[(&str, u32)] = &[
    ("ocak", 1),
    ("subat", 2),
    ("mart", 3),
    ("nisan", 4),
    ("mayis", 5),
    ("haziran", 6),
    ("temmuz", 7),
    ("agustos", 8),
    ("eylul", 9),
    ("ekim", 10),
    ("kasim", 11),
    ("aralik", 12),
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

static MONTH_LOOKUP: Lazy<HashMap<&'static str, u32>> =
    Lazy::new(|| MONTHS.iter().copied().collect());

static MONTH_YEAR_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(0?[1-9]|1[0-2])[ \t]*[/.\-][ \t]*(\d{4})\b").expect("valid MM/YYYY regex")
});

static YEAR_MONTH_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})[ \t]*[/.\-][ \t]*(0?[1-9]|1[0-2])\b").expect("valid YYYY/MM regex")
});

static WORD_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\p{L}{2,20})\.?[ \t\u{a0}]+(\d{4})\b").expect("valid month-name regex"));

static ONGOING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(present|current|currently|now|ongoing|devam|halen|hala|hâlâ|güncel|guncel|günümüz|gunumuz|şu an|su an)\b",
    )
    .expect("valid ongoing regex")
});

const SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// A month-precision date found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateToken {
    pub raw: String,
    pub year: i32,
    pub month: u32,
}

impl DateToken {
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeEnd {
    Date(DateToken),
    Present,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub raw: String,
    pub start: DateToken,
    pub end: RangeEnd,
}

impl DateRange {
    /// Whether the range ends in a calendar month after `evaluation_date`.
    /// Ongoing ranges never do.
    pub fn is_future(&self, evaluation_date: NaiveDate) -> bool {
        match &self.end {
            RangeEnd::Present => false,
            RangeEnd::Date(end) => end.ordinal() > month_ordinal(evaluation_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateReport {
    pub ranges: Vec<DateRange>,
    pub future_ranges: Vec<String>,
    pub malformed: Vec<String>,
    pub summary: String,
}

fn month_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 100 + i64::from(date.month())
}

struct Scan {
    tokens: Vec<DateToken>,
    /// Word + year pairs whose word is not a known month name.
    unknown_month_words: Vec<String>,
}

fn scan_tokens(text: &str) -> Scan {
    let mut tokens = Vec::new();

    for caps in MONTH_YEAR_NUMERIC.captures_iter(text) {
        if let (Ok(month), Ok(year)) = (caps[1].parse::<u32>(), caps[2].parse::<i32>()) {
            tokens.push(DateToken {
                raw: caps[0].to_string(),
                year,
                month,
            });
        }
    }
    for caps in YEAR_MONTH_NUMERIC.captures_iter(text) {
        if let (Ok(year), Ok(month)) = (caps[1].parse::<i32>(), caps[2].parse::<u32>()) {
            tokens.push(DateToken {
                raw: caps[0].to_string(),
                year,
                month,
            });
        }
    }

    let mut unknown_month_words = Vec::new();
    for caps in WORD_YEAR.captures_iter(text) {
        let Ok(year) = caps[2].parse::<i32>() else { continue };
        match MONTH_LOOKUP.get(fold(&caps[1]).as_str()) {
            Some(&month) => tokens.push(DateToken {
                raw: caps[0].to_string(),
                year,
                month,
            }),
            None => unknown_month_words.push(caps[0].to_string()),
        }
    }

    Scan {
        tokens,
        unknown_month_words,
    }
}

/// Last token whose raw text occurs in `fragment`.
fn resolve<'a>(fragment: &str, tokens: &'a [DateToken]) -> Option<&'a DateToken> {
    tokens.iter().rev().find(|t| fragment.contains(t.raw.as_str()))
}

fn is_ongoing(fragment: &str) -> bool {
    ONGOING.is_match(fragment)
}

/// Splits a line at its range separator: the first hyphen-family character
/// with whitespace on either side, else the first one at all.
fn split_range(line: &str) -> Option<(&str, &str)> {
    let positions: Vec<(usize, char)> = line
        .char_indices()
        .filter(|(_, c)| SEPARATORS.contains(c))
        .collect();
    let spaced = positions.iter().find(|(i, c)| {
        let before = line[..*i].chars().next_back();
        let after = line[*i + c.len_utf8()..].chars().next();
        before.is_some_and(char::is_whitespace) || after.is_some_and(char::is_whitespace)
    });
    let (index, sep) = spaced.or(positions.first()).copied()?;
    Some((&line[..index], &line[index + sep.len_utf8()..]))
}

fn strip_leading_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || SEPARATORS.contains(&c) || c == '•' || c == '*'
    })
}

/// Scans `text` for date ranges and classifies them against `evaluation_date`.
pub fn analyze_dates(text: &str, evaluation_date: NaiveDate) -> DateReport {
    let scan = scan_tokens(text);
    let mut ranges = Vec::new();
    let mut malformed: Vec<String> = Vec::new();

    for line in text.lines().map(strip_leading_markers) {
        let Some((left, right)) = split_range(line) else {
            continue;
        };
        let (left, right) = (left.trim(), right.trim());

        // An unknown word + year is a broken month name only when the other
        // side of the range is a date.
        for (side, other) in [(left, right), (right, left)] {
            let unknown = scan.unknown_month_words.iter().any(|w| w == side);
            let paired = is_ongoing(other) || resolve(other, &scan.tokens).is_some();
            if unknown && paired && !malformed.iter().any(|m| m == side) {
                malformed.push(side.to_string());
            }
        }

        let Some(start) = resolve(left, &scan.tokens) else {
            continue;
        };
        let end = if is_ongoing(right) {
            RangeEnd::Present
        } else {
            match resolve(right, &scan.tokens) {
                Some(token) => RangeEnd::Date(token.clone()),
                None => continue,
            }
        };
        ranges.push(DateRange {
            raw: format!("{left} - {right}"),
            start: start.clone(),
            end,
        });
    }

    let future_ranges: Vec<String> = ranges
        .iter()
        .filter(|r| r.is_future(evaluation_date))
        .map(|r| r.raw.clone())
        .collect();

    let mut summary = if future_ranges.is_empty() {
        "Gelecek tarih aralığı saptanmadı.".to_string()
    } else {
        format!("Gelecek tarih aralığı saptandı ({}).", future_ranges.len())
    };
    if !malformed.is_empty() {
        summary.push_str(&format!(" Anlaşılamayan tarih ifadesi ({}).", malformed.len()));
    }

    DateReport {
        ranges,
        future_ranges,
        malformed,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_present_range_is_never_future() {
        for evaluation in [date(2000, 1, 1), date(2022, 6, 1), date(2099, 12, 31)] {
            let report = analyze_dates("Backend Developer\n06/2022 - present", evaluation);
            assert_eq!(report.ranges.len(), 1);
            assert_eq!(report.ranges[0].end, RangeEnd::Present);
            assert!(report.future_ranges.is_empty());
        }
    }

    #[test]
    fn test_far_future_end_is_flagged() {
        let report = analyze_dates("01/2023 - 01/2099", date(2024, 1, 1));
        assert_eq!(report.future_ranges, vec!["01/2023 - 01/2099"]);
        assert_eq!(report.summary, "Gelecek tarih aralığı saptandı (1).");
    }

    #[test]
    fn test_same_month_is_not_future() {
        let report = analyze_dates("01/2023 - 06/2024", date(2024, 6, 30));
        assert!(report.future_ranges.is_empty());
        assert_eq!(report.summary, "Gelecek tarih aralığı saptanmadı.");
        let report = analyze_dates("01/2023 - 07/2024", date(2024, 6, 30));
        assert_eq!(report.future_ranges.len(), 1);
    }

    #[test]
    fn test_unknown_month_name_is_malformed() {
        let report = analyze_dates("Mart 2023 - Undefnmonth 2024", date(2024, 1, 1));
        assert_eq!(report.malformed, vec!["Undefnmonth 2024"]);
        assert!(report.ranges.is_empty());
        assert!(report.summary.contains("Anlaşılamayan"));
    }

    #[test]
    fn test_word_and_year_against_bare_year_is_not_malformed() {
        for line in ["Lisans 2014 - 2018", "Google 2019 - 2021", "Python 2019 - 2021"] {
            let report = analyze_dates(line, date(2024, 6, 1));
            assert!(report.malformed.is_empty(), "{line}");
            assert_eq!(report.summary, "Gelecek tarih aralığı saptanmadı.");
        }
    }

    #[test]
    fn test_unknown_month_name_against_ongoing_end_is_malformed() {
        let report = analyze_dates("Undefnmonth 2021 - halen", date(2024, 6, 1));
        assert_eq!(report.malformed, vec!["Undefnmonth 2021"]);
    }

    #[test]
    fn test_long_unknown_month_name_is_malformed() {
        let report = analyze_dates("Mart 2023 - Septembruaryxyz 2024", date(2024, 1, 1));
        assert_eq!(report.malformed, vec!["Septembruaryxyz 2024"]);
    }

    #[test]
    fn test_word_before_year_inside_a_longer_fragment_is_not_malformed() {
        let report = analyze_dates("Developer at Google 2019 - 03/2021", date(2024, 1, 1));
        assert!(report.malformed.is_empty());
    }

    #[test]
    fn test_turkish_and_english_month_names() {
        let report = analyze_dates(
            "Şubat 2021 – Ağustos 2026\nJan 2020 - Sept 2020\nEylül 2019 — halen",
            date(2024, 6, 1),
        );
        assert_eq!(report.ranges.len(), 3);
        assert_eq!(
            report.ranges[0].end,
            RangeEnd::Date(DateToken {
                raw: "Ağustos 2026".to_string(),
                year: 2026,
                month: 8
            })
        );
        assert_eq!(report.ranges[1].start.month, 1);
        assert_eq!(report.ranges[2].end, RangeEnd::Present);
        assert_eq!(report.future_ranges, vec!["Şubat 2021 - Ağustos 2026"]);
    }

    #[test]
    fn test_year_first_and_dotted_forms() {
        let report = analyze_dates("2020/01 - 2023.06\n03.2019 - 05.2020", date(2024, 1, 1));
        assert_eq!(report.ranges.len(), 2);
        assert_eq!(report.ranges[0].start.year, 2020);
        assert_eq!(report.ranges[0].start.month, 1);
        assert_eq!(report.ranges[1].end, RangeEnd::Date(DateToken {
            raw: "05.2020".to_string(),
            year: 2020,
            month: 5
        }));
    }

    #[test]
    fn test_hyphenated_dates_split_on_spaced_separator() {
        let report = analyze_dates("2020-01 - 2030-06", date(2024, 1, 1));
        assert_eq!(report.ranges.len(), 1);
        assert_eq!(report.ranges[0].start.year, 2020);
        assert_eq!(report.future_ranges, vec!["2020-01 - 2030-06"]);
    }

    #[test]
    fn test_unresolvable_lines_are_skipped() {
        let report = analyze_dates(
            "- React, Node.js\nKariyer - hedefler\n2019 - 2021\n06/2020 - belirsiz",
            date(2024, 1, 1),
        );
        assert!(report.ranges.is_empty());
        assert!(report.future_ranges.is_empty());
    }

    #[test]
    fn test_bulleted_range_line() {
        let report = analyze_dates("- 06/2023 - 12/2025 Acme", date(2024, 6, 1));
        assert_eq!(report.future_ranges, vec!["06/2023 - 12/2025 Acme"]);
    }

    #[test]
    fn test_last_token_in_fragment_wins() {
        let report = analyze_dates("01/2020 02/2020 - 03/2020", date(2024, 1, 1));
        assert_eq!(report.ranges[0].start.month, 2);
    }

    #[test]
    fn test_empty_and_adversarial_text() {
        let report = analyze_dates("", date(2024, 1, 1));
        assert!(report.ranges.is_empty());
        let report = analyze_dates("---\n– —\n9999/99 - 13/2020\n\u{2013}", date(2024, 1, 1));
        assert!(report.future_ranges.is_empty());
    }
}
