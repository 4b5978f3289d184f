//! Repairs and decodes HTML character references in provider output.
//!
//! Hosted models occasionally emit `&quot;` split across tokens as
//! `& q u o t ;`. `normalize` glues such sequences back together and `decode`
//! turns every reference into its literal character. Run `normalize` first.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `&`, then up to 30 characters on the same line without another `&` or `;`.
static ENTITY_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([^;&\n]{1,30});").expect("valid entity body regex"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("valid entity regex")
});

/// Removes whitespace embedded inside `&...;` sequences of up to 30 characters
/// when the compacted sequence is a reference [`decode`] understands. Text such
/// as `R&D ekibi;` is left alone.
pub fn normalize(input: &str) -> String {
    ENTITY_BODY
        .replace_all(input, |caps: &Captures| {
            let compact: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
            if decode_reference(&compact).is_some() {
                format!("&{compact};")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Decodes named (`&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`) and
/// numeric (`&#39;`, `&#x27;`) references in a single pass.
///
/// Unknown names and invalid code points are left as they are.
pub fn decode(input: &str) -> String {
    ENTITY
        .replace_all(input, |caps: &Captures| {
            decode_reference(&caps[1]).map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// `normalize` followed by `decode`.
pub fn clean(input: &str) -> String {
    decode(&normalize(input))
}

fn decode_reference(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|c| *c != '\0');
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_split_entity() {
        assert_eq!(normalize("He said & q u o t ;hi& quot;"), "He said &quot;hi&quot;");
    }

    #[test]
    fn test_normalize_leaves_ampersand_prose_alone() {
        for text in [
            "A & B are partners; they work together",
            "R&D ekibinde çalıştı; P&L sorumluluğu",
            "Q & A oturumları; haftalık",
        ] {
            assert_eq!(normalize(text), text);
        }
    }

    #[test]
    fn test_normalize_does_not_cross_lines() {
        let text = "- R&D ekibinde çalıştı\n- CI/CD; GitHub Actions";
        assert_eq!(normalize(text), text);
        assert_eq!(normalize("& q u o t\n;"), "& q u o t\n;");
    }

    #[test]
    fn test_normalize_finds_split_entity_after_stray_ampersand() {
        assert_eq!(normalize("R&D & a m p ; Q"), "R&D &amp; Q");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "plain text",
            "& q u o t ;",
            "&      &b b b b b b b b b b b b b b b b b b b b b b b;",
            "R&D ekibi; & # 3 9 ;",
            "x &a m p; y & l t ; z",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode("&lt;b&gt; &amp; &quot;x&quot; &apos;y&apos;"),
            "<b> & \"x\" 'y'"
        );
        assert_eq!(decode("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode("it&#39;s &#x27;ok&#X27;"), "it's 'ok'");
        assert_eq!(decode("&#305;"), "ı");
    }

    #[test]
    fn test_decode_is_single_pass() {
        assert_eq!(decode("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_leaves_unknown_and_invalid_references() {
        assert_eq!(decode("&bogus; &#xD800; &#0;"), "&bogus; &#xD800; &#0;");
    }

    #[test]
    fn test_decode_is_noop_on_literal_text() {
        let literal = "Güçlü Yönler\n- \"Rust\" & 'Go' < > ;";
        assert_eq!(decode(literal), literal);
        assert_eq!(decode(&decode(literal)), decode(literal));
    }

    #[test]
    fn test_clean_runs_both_steps() {
        assert_eq!(clean("Say & q u o t ;hi&quot;"), "Say \"hi\"");
    }
}
