//! Language detection and content segmentation hooks.

use mnemo_memory::LanguageHint;

/// Whether the text contains any CJK unified ideograph.
pub fn is_cjk(text: &str) -> bool {
    text.chars()
        .any(|character| ('\u{4e00}'..='\u{9fff}').contains(&character))
}

/// Language hint for the sentiment backend, derived from the text itself.
pub fn language_hint(text: &str) -> LanguageHint {
    if is_cjk(text) {
        LanguageHint::Zh
    } else {
        LanguageHint::En
    }
}

/// Produces the language-normalized form of a turn's content.
///
/// Languages without whitespace tokenization need an external segmenter;
/// when none is configured the pipeline stores no segmented content.
pub trait Segmenter: Send + Sync {
    /// Segment the text into a whitespace-joined token form.
    fn segment(&self, text: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::{is_cjk, language_hint};
    use mnemo_memory::LanguageHint;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_cjk_content() {
        assert!(is_cjk("你好"));
        assert!(is_cjk("mixed 问题 text"));
        assert!(!is_cjk("plain english"));
        assert!(!is_cjk(""));
    }

    #[test]
    fn hint_follows_detection() {
        assert_eq!(language_hint("为什么"), LanguageHint::Zh);
        assert_eq!(language_hint("why"), LanguageHint::En);
    }
}
