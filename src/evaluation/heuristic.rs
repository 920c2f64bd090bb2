//! Substring-overlap grounding heuristic
//!
//! A cheap, deterministic signal of whether an answer is lifted from the
//! retrieved context: slide a fixed-length window across each fragment and
//! look for a verbatim match inside the answer. Recall-oriented; it
//! complements the judge-based faithfulness verdict, never replaces it.

use crate::types::ContextFragment;

/// Fragments are compared by their first 200 characters only, which bounds
/// the scan and matches what the analytics rows store
pub const FRAGMENT_PREFIX_CHARS: usize = 200;

/// Default minimum overlap window, in characters
pub const DEFAULT_MIN_OVERLAP: usize = 10;

/// Report whether any `min_overlap`-character run of a context fragment
/// appears verbatim in the answer
///
/// Fragments shorter than the window (after truncation to
/// [`FRAGMENT_PREFIX_CHARS`]) cannot match. Windows are sliced on char
/// boundaries so multi-byte text never panics.
pub fn answer_grounded(
    answer: &str,
    sources: &[ContextFragment],
    min_overlap: usize,
) -> bool {
    if min_overlap == 0 {
        return false;
    }

    for fragment in sources {
        let truncated = char_prefix(&fragment.text, FRAGMENT_PREFIX_CHARS);
        let boundaries: Vec<usize> = truncated.char_indices().map(|(i, _)| i).collect();
        let n_chars = boundaries.len();
        if n_chars < min_overlap {
            continue;
        }

        for start in 0..=(n_chars - min_overlap) {
            let begin = boundaries[start];
            let end = if start + min_overlap < n_chars {
                boundaries[start + min_overlap]
            } else {
                truncated.len()
            };
            if answer.contains(&truncated[begin..end]) {
                return true;
            }
        }
    }

    false
}

/// First `max_chars` characters of a string, on char boundaries
pub(crate) fn char_prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str) -> ContextFragment {
        ContextFragment::new(text, "doc.pdf")
    }

    #[test]
    fn test_overlap_detected() {
        let answer = "The sky is blue today.";
        let sources = vec![frag("scientists note that the sky is blue today because of scattering")];
        assert!(answer_grounded(answer, &sources, DEFAULT_MIN_OVERLAP));
    }

    #[test]
    fn test_no_overlap() {
        let answer = "Completely unrelated text.";
        let sources = vec![frag("irrelevant filler content here")];
        assert!(!answer_grounded(answer, &sources, DEFAULT_MIN_OVERLAP));
    }

    #[test]
    fn test_fragment_shorter_than_window_never_matches() {
        let answer = "short txt";
        let sources = vec![frag("short txt")];
        assert!(!answer_grounded(answer, &sources, 10));
        assert!(answer_grounded(answer, &sources, 5));
    }

    #[test]
    fn test_overlap_beyond_truncation_is_ignored() {
        // The matching run sits past the 200-char prefix, so it must not count.
        let mut text = "x".repeat(FRAGMENT_PREFIX_CHARS);
        text.push_str("needle appears here verbatim");
        let sources = vec![frag(&text)];
        assert!(!answer_grounded(
            "the needle appears here verbatim",
            &sources,
            DEFAULT_MIN_OVERLAP
        ));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let answer = "cafés près de la gare routière";
        let sources = vec![frag("les cafés près de la gare routière sont fermés")];
        assert!(answer_grounded(answer, &sources, DEFAULT_MIN_OVERLAP));
    }

    #[test]
    fn test_empty_sources() {
        assert!(!answer_grounded("anything", &[], DEFAULT_MIN_OVERLAP));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let sources = vec![frag("content")];
        assert!(!answer_grounded("content", &sources, 0));
    }
}
