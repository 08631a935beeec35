//! Password normalization.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a password with Unicode NFKC.
///
/// Visually identical passwords can arrive as different code-point
/// sequences depending on keyboard and platform; normalizing before key
/// derivation makes them derive the same key. Total function: any input
/// normalizes.
pub fn normalize(password: &str) -> String {
    password.nfkc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_unchanged() {
        assert_eq!(normalize("correct horse battery staple"), "correct horse battery staple");
    }

    #[test]
    fn composed_and_decomposed_forms_agree() {
        // U+00E9 vs U+0065 U+0301 (e + combining acute)
        assert_eq!(normalize("caf\u{e9}"), normalize("cafe\u{301}"));
    }

    #[test]
    fn compatibility_characters_are_folded() {
        // U+FB01 (latin small ligature fi) folds to "fi" under NFKC
        assert_eq!(normalize("\u{fb01}n"), "fin");
    }

    #[test]
    fn empty_password_normalizes() {
        assert_eq!(normalize(""), "");
    }
}
