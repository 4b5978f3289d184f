//! Derives "additions" from "weaknesses" when a reply leaves the additions
//! section empty.
//!
//! This is a lexical rewrite, not a grammar transformation: deficiency-toned
//! Turkish phrasing ("eklenebilir", "sınırlı", "yok") is replaced with an
//! imperative, and anything that still does not open with an action verb gets
//! the generic "Geliştirin: " lead-in.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::sections::{strip_bullet, BULLET};
use crate::analysis::turkish::tolerant_pattern;

/// At most this many weaknesses are turned into additions.
pub const MAX_SYNTHESIZED: usize = 6;

/// Lead-in for items that do not start with a recognized action verb.
pub const LEAD_IN: &str = "Geliştirin: ";

/// (phrase, replacement, whole word only), applied in order.
const REWRITES: &[(&str, &str, bool)] = &[
    ("eklenebilir", "ekleyin", false),
    ("netleştirilebilir", "netleştirin", false),
    ("örneklendirilebilir", "örneklendirin", false),
    ("belirtilebilir", "belirtin", false),
    ("gösterilebilir", "gösterin", false),
    ("iyileştirilebilir", "iyileştirin", false),
    ("arttırılabilir", "arttırın", false),
    ("artırılabilir", "arttırın", false),
    ("sınırlı", "güncelleyin", false),
    ("yok", "ekleyin", true),
];

const ACTION_VERBS: &[&str] = &[
    "ekleyin",
    "netleştirin",
    "örneklendirin",
    "belirtin",
    "gösterin",
    "iyileştirin",
    "arttırın",
    "güncelleyin",
    "geliştirin",
];

static REWRITE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REWRITES
        .iter()
        .map(|(phrase, replacement, whole_word)| {
            let body = tolerant_pattern(phrase);
            let pattern = if *whole_word {
                format!(r"(?i)\b{body}\b")
            } else {
                format!("(?i){body}")
            };
            (Regex::new(&pattern).expect("valid rewrite regex"), *replacement)
        })
        .collect()
});

static ACTION_VERB: Lazy<Regex> = Lazy::new(|| {
    let alternation: Vec<String> = ACTION_VERBS.iter().map(|v| tolerant_pattern(v)).collect();
    Regex::new(&format!(r"^(?i)(?:{})\b", alternation.join("|"))).expect("valid action verb regex")
});

/// Rewrites up to [`MAX_SYNTHESIZED`] weakness bullets into addition bullets.
pub fn synthesize(weaknesses: &[String]) -> Vec<String> {
    weaknesses
        .iter()
        .take(MAX_SYNTHESIZED)
        .map(|weakness| to_actionable(weakness))
        .collect()
}

/// Rewrites one weakness into an imperative bullet ending in punctuation.
pub fn to_actionable(weakness: &str) -> String {
    let mut text = strip_bullet(weakness).to_string();
    for (rule, replacement) in REWRITE_RULES.iter() {
        text = rule.replace_all(&text, *replacement).into_owned();
    }
    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    let text = if ACTION_VERB.is_match(&text) {
        capitalize_first(&text)
    } else {
        format!("{LEAD_IN}{text}")
    };
    format!("{BULLET}{text}")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some('i') => format!("İ{}", chars.as_str()),
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when `item` (bullet marker ignored) opens with a recognized action verb.
pub fn starts_with_action(item: &str) -> bool {
    ACTION_VERB.is_match(strip_bullet(item))
}
