//! Searchable chunk list derived from a parsed résumé.

use super::types::ParsedDocument;

/// Whole-document markdown first, then one `"{title}\n{content}"` chunk per section.
pub fn build_chunks(document: &ParsedDocument) -> Vec<String> {
    std::iter::once(document.markdown.clone())
        .chain(document.sections.iter().map(|section| section.to_chunk()))
        .collect()
}
