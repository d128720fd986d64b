use crate::{CategoryRecord, CodeId, CodeRecord, Excerpt, NodeKey, StoreError};

/// Data access needed by the code graph.
///
/// Calls are synchronous; the graph runs on the UI thread and the coding
/// database is local.
pub trait CodingStore {
    /// All categories, ordered by name.
    fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError>;

    fn list_codes(&self) -> Result<Vec<CodeRecord>, StoreError>;

    fn update_memo(&mut self, node: NodeKey, text: &str) -> Result<(), StoreError>;

    /// Text, image and A/V codings of a code across all files and coders.
    fn fetch_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StoreError>;

    /// Codings of a code that fall inside a case-assigned span.
    fn fetch_case_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StoreError>;
}
