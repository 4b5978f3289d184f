//! Contact-detail masking applied to resume text before it is sent to a
//! hosted model.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches shorter than this are left alone by the phone rule.
const MIN_PHONE_CHARS: usize = 7;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?linkedin\.com/[A-Za-z0-9_\-./]+")
        .expect("valid linkedin regex")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?(?:\(?\d{3}\)?[\s.-]?)?\d{3}[\s.-]?\d{2,4}")
        .expect("valid phone regex")
});

static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t ]+").expect("valid space regex"));

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank regex"));

/// Replaces e-mail addresses, LinkedIn profile URLs and phone numbers with
/// placeholders, then tidies whitespace.
pub fn mask_pii(input: &str) -> String {
    let out = EMAIL.replace_all(input, "[email]");
    // URLs first so the digits in a profile slug are not read as a phone.
    let out = LINKEDIN.replace_all(&out, "[linkedin]");
    let out = PHONE.replace_all(&out, |caps: &Captures| {
        let found = &caps[0];
        if found.chars().count() >= MIN_PHONE_CHARS {
            "[phone]".to_string()
        } else {
            found.to_string()
        }
    });
    let out = INLINE_SPACE.replace_all(&out, " ");
    let out = BLANK_RUN.replace_all(&out, "\n\n");
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_email() {
        assert_eq!(mask_pii("İletişim: ayse.yilmaz+cv@example.com.tr"), "İletişim: [email]");
    }

    #[test]
    fn test_masks_phone_numbers() {
        assert_eq!(mask_pii("Tel: +90 532 123 4567"), "Tel: [phone]");
        assert_eq!(mask_pii("Tel: 555-123-4567"), "Tel: [phone]");
    }

    #[test]
    fn test_short_numbers_survive() {
        assert_eq!(mask_pii("3 yıl deneyim, 12345 kullanıcı"), "3 yıl deneyim, 12345 kullanıcı");
    }

    #[test]
    fn test_masks_linkedin_url_with_digits() {
        assert_eq!(
            mask_pii("Profil: https://www.linkedin.com/in/ayse-yilmaz-1234567/"),
            "Profil: [linkedin]"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(mask_pii("  a \t  b\n\n\n\nc  "), "a b\n\nc");
    }
}
