//! Text normalization for Hebrew catalog text.
//!
//! Every comparison the engine makes (topic lookup, keyword filtering, search,
//! canonical ids) goes through [`normalize`], so authored text that differs
//! only in vowel points, dash style, spacing or case compares equal.

use std::sync::LazyLock;

use regex::Regex;

static SPACED_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*").expect("static pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

/// Bidirectional control marks (LRM, RLM, embeddings, overrides and isolates).
const fn is_directional_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// Hebrew cantillation marks and vowel points.
///
/// Hebrew punctuation in the same block (maqaf, paseq, sof pasuq, nun
/// hafukha) is not a point and is kept.
const fn is_hebrew_point(c: char) -> bool {
    matches!(
        c,
        '\u{0591}'..='\u{05AF}'
            | '\u{05B0}'..='\u{05BD}'
            | '\u{05BF}'
            | '\u{05C1}'
            | '\u{05C2}'
            | '\u{05C4}'
            | '\u{05C5}'
            | '\u{05C7}'
    )
}

/// Code points treated as a plain ASCII hyphen.
pub(crate) const fn is_dash(c: char) -> bool {
    matches!(
        c,
        '\u{058A}' // Armenian hyphen
            | '\u{05BE}' // Hebrew maqaf
            | '\u{1806}' // Mongolian todo soft hyphen
            | '\u{2010}'..='\u{2015}' // hyphen, non-breaking hyphen, figure dash, en/em dash, bar
            | '\u{2043}' // hyphen bullet
            | '\u{2053}' // swung dash
            | '\u{207B}' // superscript minus
            | '\u{208B}' // subscript minus
            | '\u{2212}' // minus sign
            | '\u{2E17}' // double oblique hyphen
            | '\u{2E1A}'
            | '\u{2E3A}'
            | '\u{2E3B}'
            | '\u{2E40}'
            | '\u{301C}' // wave dash
            | '\u{FE31}'
            | '\u{FE32}'
            | '\u{FE58}'
            | '\u{FE63}'
            | '\u{FF0D}'
    )
}

/// Canonicalizes catalog text for comparison.
///
/// Applied in order: directional marks removed, non-breaking spaces turned
/// into plain spaces, Hebrew points stripped, dash variants mapped to `-`,
/// whitespace around hyphens removed, trimmed, whitespace runs collapsed to a
/// single space, lowercased.
///
/// The function is total and idempotent.
///
/// ```
/// use curriculum::normalize;
///
/// assert_eq!(normalize("  Front\u{00A0}Kick \u{2013} Left "), "front kick-left");
/// assert_eq!(normalize("בְּעִיטָה"), "בעיטה");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter(|c| !is_directional_mark(*c) && !is_hebrew_point(*c))
        .map(|c| match c {
            '\u{00A0}' | '\u{202F}' => ' ',
            c if is_dash(c) => '-',
            c => c,
        })
        .collect();

    let joined = SPACED_HYPHEN.replace_all(&mapped, "-");
    let collapsed = WHITESPACE_RUN.replace_all(joined.trim(), " ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("\u{05BE}"; "maqaf")]
    #[test_case("\u{2010}"; "hyphen")]
    #[test_case("\u{2011}"; "non-breaking hyphen")]
    #[test_case("\u{2012}"; "figure dash")]
    #[test_case("\u{2013}"; "en dash")]
    #[test_case("\u{2014}"; "em dash")]
    #[test_case("\u{2015}"; "horizontal bar")]
    #[test_case("\u{2212}"; "minus sign")]
    #[test_case("\u{FE63}"; "small hyphen-minus")]
    #[test_case("\u{FF0D}"; "fullwidth hyphen-minus")]
    #[test_case("\u{058A}"; "armenian hyphen")]
    #[test_case("\u{1806}"; "mongolian todo soft hyphen")]
    #[test_case("\u{2053}"; "swung dash")]
    #[test_case("\u{207B}"; "superscript minus")]
    #[test_case("\u{208B}"; "subscript minus")]
    #[test_case("\u{2E17}"; "double oblique hyphen")]
    #[test_case("\u{2E1A}"; "hyphen with diaeresis")]
    #[test_case("\u{2E40}"; "double hyphen")]
    #[test_case("\u{301C}"; "wave dash")]
    #[test_case("\u{FE31}"; "vertical em dash")]
    #[test_case("\u{FE32}"; "vertical en dash")]
    #[test_case(" \u{2013} "; "spaced en dash")]
    fn dash_variants_unify(variant: &str) {
        let text = format!("a{variant}b");
        assert_eq!(normalize(&text), normalize("a-b"));
        assert_eq!(normalize(&text), "a-b");
    }

    #[test_case("\u{200F}הגנה\u{200E}", "הגנה"; "directional marks")]
    #[test_case("הֲגָנָה", "הגנה"; "vowel points")]
    #[test_case("א\u{00A0}\u{00A0}ב", "א ב"; "non-breaking spaces")]
    #[test_case("  Front   KICK\t", "front kick"; "case and whitespace")]
    #[test_case("סכין - מלמעלה", "סכין-מלמעלה"; "spaced hyphen")]
    #[test_case("", ""; "empty")]
    #[test_case(" \u{200F} ", ""; "only marks and spaces")]
    fn normalizes(input: &str, expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn maqaf_is_not_stripped_as_a_point() {
        assert_eq!(normalize("בית\u{05BE}ספר"), "בית-ספר");
    }

    #[test_case("Hello  World"; "ascii")]
    #[test_case("  \u{2014} leading dash"; "leading dash")]
    #[test_case("הֲגָנָה פְּנִימִית \u{05BE} בְּעִיטָה"; "pointed hebrew with maqaf")]
    #[test_case("x \u{00A0}-\u{2003}y"; "mixed spaces around hyphen")]
    #[test_case("İSTANBUL"; "dotted capital")]
    #[test_case("a\u{200F} \u{200E}- b"; "marks between spaces and hyphen")]
    fn normalization_is_idempotent(input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}
