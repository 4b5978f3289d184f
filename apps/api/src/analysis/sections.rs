//! Turns a free-form analysis reply into the four review sections.
//!
//! The parser is an explicit state machine over trimmed, non-empty lines.
//! The state is the section currently receiving content; the only transition
//! is a recognized heading at the start of a line. A heading phrase that
//! appears mid-sentence is ordinary content.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::actionable::synthesize;
use crate::analysis::entities;
use crate::analysis::turkish::tolerant_pattern;

/// The one bullet marker used in every finalized list item.
pub const BULLET: &str = "- ";

/// Summary lines beyond this count are dropped.
pub const MAX_SUMMARY_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Summary,
    Strengths,
    Weaknesses,
    Additions,
}

impl Section {
    /// Heading line written for this section.
    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "Kısa Genel Değerlendirme",
            Section::Strengths => "Güçlü Yönler",
            Section::Weaknesses => "Gelişmeye Açık Alanlar",
            Section::Additions => "Eklenebilecek Yönler",
        }
    }
}

/// Canonical heading phrasings. Longer phrases come before the phrases they
/// contain so "Kısa Genel Değerlendirme" is not read as "Genel Değerlendirme".
pub const HEADINGS: &[(&str, Section)] = &[
    ("kısa genel değerlendirme", Section::Summary),
    ("genel değerlendirme", Section::Summary),
    ("güçlü yönler", Section::Strengths),
    ("gelişmeye açık alanlar", Section::Weaknesses),
    ("zayıf yönler", Section::Weaknesses),
    ("eklenebilecek yönler", Section::Additions),
];

static HEADING_RULES: Lazy<Vec<(Regex, Section)>> = Lazy::new(|| {
    HEADINGS
        .iter()
        .map(|(phrase, section)| {
            let pattern = format!(r"^(?i){}\b", tolerant_pattern(phrase));
            (Regex::new(&pattern).expect("valid heading regex"), *section)
        })
        .collect()
});

/// Markdown-ish noise some providers put in front of lines.
static LINE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[#>*\s]+").expect("valid noise regex"));

static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-•*]\s*)+").expect("valid bullet regex"));

/// Separator noise between a heading phrase and inline content on the same line.
static HEADING_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s:*]+").expect("valid tail regex"));

/// Structured review. Every list item starts with exactly one [`BULLET`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub additions: Vec<String>,
}

impl ParsedAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.additions.is_empty()
    }

    /// Writes the review in the heading convention [`parse`] reads: a heading
    /// line per section, sections separated by a blank line.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<&str> = vec![Section::Summary.title()];
        lines.extend(self.summary.lines());
        for (section, items) in [
            (Section::Strengths, &self.strengths),
            (Section::Weaknesses, &self.weaknesses),
            (Section::Additions, &self.additions),
        ] {
            lines.push("");
            lines.push(section.title());
            lines.extend(items.iter().map(String::as_str));
        }
        lines.join("\n")
    }
}

/// What a client should display for a reply: the sections when the reply
/// followed the heading convention, otherwise the whole cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisView {
    Sections(ParsedAnalysis),
    Raw { text: String },
}

/// Removes any leading run of `-`, `•`, `*` markers and surrounding whitespace.
pub fn strip_bullet(item: &str) -> &str {
    let item = item.trim();
    match BULLET_MARKER.find(item) {
        Some(marker) => item[marker.end()..].trim(),
        None => item,
    }
}

/// Re-prefixes `item` with [`BULLET`]; `None` when nothing is left after
/// stripping existing markers.
pub fn to_bullet(item: &str) -> Option<String> {
    let body = strip_bullet(item);
    (!body.is_empty()).then(|| format!("{BULLET}{body}"))
}

/// Recognizes a heading at the start of an already de-noised line and
/// returns its section plus whatever follows the heading phrase.
pub fn recognize_heading(line: &str) -> Option<(Section, &str)> {
    HEADING_RULES.iter().find_map(|(rule, section)| {
        rule.find(line).map(|m| {
            let rest = &line[m.end()..];
            let skip = HEADING_TAIL.find(rest).map_or(0, |t| t.end());
            (*section, rest[skip..].trim())
        })
    })
}

/// Line-at-a-time parser. Feed trimmed, non-empty lines, then `finish`.
#[derive(Debug)]
pub struct SectionParser {
    state: Section,
    summary: Vec<String>,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    additions: Vec<String>,
    headings_seen: usize,
}

impl SectionParser {
    pub fn new() -> Self {
        Self {
            state: Section::Summary,
            summary: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            additions: Vec::new(),
            headings_seen: 0,
        }
    }

    pub fn state(&self) -> Section {
        self.state
    }

    pub fn headings_seen(&self) -> usize {
        self.headings_seen
    }

    pub fn feed(&mut self, line: &str) {
        let cleaned = LINE_NOISE.replace(line, "");
        if let Some((section, rest)) = recognize_heading(&cleaned) {
            self.state = section;
            self.headings_seen += 1;
            if !rest.is_empty() {
                self.push(rest);
            }
            return;
        }
        self.push(&cleaned);
    }

    fn push(&mut self, text: &str) {
        let list = match self.state {
            Section::Summary => {
                let line = strip_bullet(text);
                if !line.is_empty() && self.summary.len() < MAX_SUMMARY_LINES {
                    self.summary.push(line.to_string());
                }
                return;
            }
            Section::Strengths => &mut self.strengths,
            Section::Weaknesses => &mut self.weaknesses,
            Section::Additions => &mut self.additions,
        };
        if let Some(item) = to_bullet(text) {
            list.push(item);
        }
    }

    /// Closes the parse. An empty additions section is backfilled from the
    /// weaknesses.
    pub fn finish(self) -> ParsedAnalysis {
        let additions = if self.additions.is_empty() && !self.weaknesses.is_empty() {
            synthesize(&self.weaknesses)
        } else {
            self.additions
        };
        ParsedAnalysis {
            summary: self.summary.join("\n"),
            strengths: self.strengths,
            weaknesses: self.weaknesses,
            additions,
        }
    }
}

fn run(text: &str) -> (ParsedAnalysis, usize) {
    let cleaned = entities::clean(text);
    let mut parser = SectionParser::new();
    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        parser.feed(line);
    }
    let headings = parser.headings_seen();
    (parser.finish(), headings)
}

/// Parses a reply into sections. Text before the first heading is summary.
pub fn parse(text: &str) -> ParsedAnalysis {
    run(text).0
}

/// Parses a reply for display, falling back to the raw cleaned text when no
/// heading was recognized or nothing could be extracted.
pub fn view(text: &str) -> AnalysisView {
    let (parsed, headings) = run(text);
    if headings == 0 || parsed.is_empty() {
        AnalysisView::Raw {
            text: entities::clean(text).trim().to_string(),
        }
    } else {
        AnalysisView::Sections(parsed)
    }
}
