//! Purpose: Entity model handed across the boundary (queries, results, replies, metadata).
//! Exports: One type per entity plus the column/preview helpers they use.
//! Role: Plain Rust values with their own validation; no raw pointers live here.
//! Invariants: Shared entities are `Send + Sync` and guard their own mutable state.
//! Invariants: Aggregations copy values in; nothing here borrows caller memory.

mod activation;
mod category;
mod child_scope;
mod department;
mod layout;
mod metadata;
mod query;
mod reply;
mod result;
mod scope_base;
mod widget;

pub use activation::{ActivationResponse, ActivationStatus};
pub use category::Category;
pub use child_scope::{ChildScope, ChildScopeList};
pub use department::Department;
pub use layout::{ColumnLayout, MAX_COLUMNS};
pub use metadata::{ActionMetadata, Connectivity, QueryMetadata, ScopeMetadata, SearchMetadata};
pub use query::CannedQuery;
pub use reply::{Completion, PreviewReply, SearchReply};
pub use result::ScopeResult;
pub use scope_base::ScopeBase;
pub use widget::{PreviewWidget, parse_widgets};
