//! Text normalization helpers applied to extracted page text.

use std::sync::LazyLock;

use regex::Regex;

/// Trim the text and collapse every run of blank lines into one blank line.
pub(crate) fn normalize_text(raw: &str) -> String {
    static BLANK_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

    BLANK_RUN_RE.replace_all(raw.trim(), "\n\n").into_owned()
}

/// Number of whitespace-delimited tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
///
/// `"the ux of data"` becomes `"The Ux Of Data"`; `"don't"` becomes `"Don'T"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Fallback title built from a file stem: dashes become spaces, then title case.
pub fn title_from_stem(stem: &str) -> String {
    title_case(&stem.replace('-', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_blank_runs() {
        let raw = "\n\n  First paragraph.\n\n\n   \n\nSecond.\n \t\nThird.  \n\n";
        assert_eq!(
            normalize_text(raw),
            "First paragraph.\n\nSecond.\n\nThird."
        );
    }

    #[test]
    fn keeps_single_newlines() {
        assert_eq!(normalize_text("a\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn counts_tokens() {
        assert_eq!(count_words("one  two\nthree\n\n four"), 4);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn title_case_runs() {
        assert_eq!(title_case("design system"), "Design System");
        assert_eq!(title_case("HOW to 3d print"), "How To 3D Print");
        assert_eq!(title_case("don't"), "Don'T");
    }

    #[test]
    fn stem_fallback() {
        assert_eq!(
            title_from_stem("the-analytic-workflow-3e551e67647f"),
            "The Analytic Workflow 3E551E67647F"
        );
    }
}
