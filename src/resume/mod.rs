//! Résumé pipeline: extraction, sectioning, chunking, ranking, and the latest-role heuristic.

pub mod chunks;
pub mod extract;
pub mod index;
pub mod latest_role;
pub mod sections;
mod service;
pub mod types;

pub use index::{DEFAULT_TOP_K, HybridIndex};
pub use latest_role::extract_latest_role;
pub use service::{ResumeApi, ResumeService};
pub use types::{
    Answer, ExtractError, IndexError, LatestRole, ParsedDocument, RoleEvidence, Section,
    ServiceError, Snippet,
};
