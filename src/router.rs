//! Deterministic capability routing
//!
//! A closed set of capabilities replaces free-form model-driven tool choice:
//! questions about the uploaded document corpus go to retrieval search,
//! everything else falls through to web search. The rule is a plain keyword
//! match so routing decisions are reproducible in tests.

/// Answering capabilities the assistant can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Search the PDF knowledge base
    RetrievalSearch,

    /// General web search
    WebSearch,
}

/// Keywords that pin a question to the document corpus
const RETRIEVAL_HINTS: &[&str] = &[
    "pdf", "document", "file", "upload", "chapter", "page", "section", "paper", "report",
    "according to",
];

/// Route a question to a capability
///
/// Case-insensitive substring match against the retrieval hint list; no
/// match routes to web search.
pub fn route(question: &str) -> Capability {
    let lowered = question.to_lowercase();
    if RETRIEVAL_HINTS.iter().any(|hint| lowered.contains(hint)) {
        Capability::RetrievalSearch
    } else {
        Capability::WebSearch
    }
}
