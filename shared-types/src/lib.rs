pub mod company;
pub mod contact;
pub mod duplicate;
pub mod record;

pub use company::{CompaniesResponse, Company};
pub use contact::{Contact, ContactsResponse};
pub use duplicate::{DuplicateMatch, MatchType, MergePreview, RelatedEntity, RelatedRecordCounts};
pub use record::{Record, RecordKind};

/// Identity of a persisted record, as issued by the backend
pub type RecordId = String;
