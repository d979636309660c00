//! Duplicate detection and merge engine for CRM records.
//!
//! Given a candidate contact or company and a snapshot of existing records,
//! the engine tells whether the candidate duplicates one of them and, when
//! two records are merged, computes the merged field values.
//!
//! # Pipeline
//!
//! - **Exact**: same normalized email (contacts) or same resolved domain
//!   (companies), see [`find_exact_duplicates`]
//! - **Fuzzy**: names within an edit-distance threshold, see
//!   [`find_fuzzy_duplicates`]
//! - **Reconcile**: one entry per existing record, exact first, see
//!   [`reconcile`]
//! - **Merge**: [`merge_contacts`], [`merge_companies`] and
//!   [`get_merge_preview`]
//!
//! Everything here is a pure function over borrowed snapshots. Persisting a
//! merge and repointing related records is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use dedup_engine::DuplicateDetector;
//! use shared_types::Contact;
//!
//! let existing = vec![Contact::named("Jane Doe").with_id("c1").with_email("jane@acme.com")];
//! let candidate = Contact::named("Jane Doe").with_email("jane@acme.com");
//!
//! let check = DuplicateDetector::default().check(&candidate, &existing);
//! assert!(check.has_exact());
//! ```

pub mod detector;
pub mod domain;
pub mod error;
pub mod exact;
pub mod fuzzy;
pub mod merge;
pub mod preview;
pub mod reconcile;
pub mod record;
pub mod similarity;

pub use detector::{DetectorOptions, DuplicateCheck, DuplicateDetector, DuplicatePair};
pub use domain::{extract_domain, resolve_company_domain};
pub use error::DedupError;
pub use exact::find_exact_duplicates;
pub use fuzzy::{
    find_fuzzy_duplicates, find_fuzzy_duplicates_with, FuzzyThreshold, DEFAULT_FUZZY_THRESHOLD,
};
pub use merge::{
    merge_companies, merge_contacts, suggest_primary, Completeness, Mergeable, PrimaryChoice,
};
pub use preview::{get_merge_preview, get_record_merge_preview};
pub use reconcile::reconcile;
pub use record::{Dedupable, ReconcileKey};
pub use similarity::similarity;
