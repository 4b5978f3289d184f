//! Turkish-aware text helpers shared by the parser, the date checker and the
//! heuristic analyzer.
//!
//! Resume text and model replies arrive with every combination of dotted and
//! dotless I, with or without diacritics (ASCII keyboards, PDF extraction
//! artifacts). Matching is done either on a folded copy of the text or with
//! patterns that accept each letter's variants.

/// Lower-cases `input` and strips Turkish diacritics: `ş→s`, `ğ→g`, `ü→u`,
/// `ö→o`, `ç→c`, and every I variant (`I`, `İ`, `ı`) to `i`.
pub fn fold(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            'I' | 'İ' | 'ı' | 'i' | 'Î' | 'î' => out.push('i'),
            'Ş' | 'ş' => out.push('s'),
            'Ğ' | 'ğ' => out.push('g'),
            'Ü' | 'ü' | 'Û' | 'û' => out.push('u'),
            'Ö' | 'ö' => out.push('o'),
            'Ç' | 'ç' => out.push('c'),
            'Â' | 'â' => out.push('a'),
            // Combining dot above, left behind by `"İ".to_lowercase()`.
            '\u{307}' => {}
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// Builds a regex fragment matching `phrase` with Turkish letter tolerance.
///
/// Each letter that has a dotted/dotless or diacritic twin becomes a class
/// holding both forms in both cases, and each space matches any whitespace
/// run. The caller is expected to compile the fragment case-insensitively.
pub fn tolerant_pattern(phrase: &str) -> String {
    let mut pattern = String::new();
    for c in phrase.chars() {
        match c {
            'i' | 'ı' | 'I' | 'İ' => pattern.push_str("[iıİI]"),
            'g' | 'ğ' => pattern.push_str("[gğGĞ]"),
            's' | 'ş' => pattern.push_str("[sşSŞ]"),
            'c' | 'ç' => pattern.push_str("[cçCÇ]"),
            'o' | 'ö' => pattern.push_str("[oöOÖ]"),
            'u' | 'ü' => pattern.push_str("[uüUÜ]"),
            ' ' => pattern.push_str(r"\s+"),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_fold_strips_diacritics_and_i_variants() {
        assert_eq!(fold("GÜÇLÜ YÖNLER"), "guclu yonler");
        assert_eq!(fold("İletişim"), "iletisim");
        assert_eq!(fold("AĞUSTOS"), "agustos");
        assert_eq!(fold("Işık"), "isik");
    }

    #[test]
    fn test_fold_leaves_ascii_untouched_apart_from_case() {
        assert_eq!(fold("React & Node.js"), "react & node.js");
    }

    #[test]
    fn test_tolerant_pattern_matches_all_spellings() {
        let re = Regex::new(&format!("^(?i){}$", tolerant_pattern("eklenebilecek yönler"))).unwrap();
        assert!(re.is_match("Eklenebilecek Yönler"));
        assert!(re.is_match("EKLENEBİLECEK YÖNLER"));
        assert!(re.is_match("eklenebilecek yonler"));
        assert!(re.is_match("Eklenebılecek   Yönler"));
        assert!(!re.is_match("Eklenebilecek"));
    }

    #[test]
    fn test_tolerant_pattern_escapes_metacharacters() {
        let re = Regex::new(&tolerant_pattern("a/b (x)")).unwrap();
        assert!(re.is_match("a/b (x)"));
    }
}
