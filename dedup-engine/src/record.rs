use shared_types::{Company, Contact, Record, RecordKind};

use crate::domain::resolve_company_domain;

/// Key that identifies one existing record when exact and fuzzy results are
/// merged into a single list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReconcileKey {
    Id(RecordKind, String),
    Email(String),
    Domain(String),
}

/// What the detectors need to know about a record.
pub trait Dedupable: Clone {
    fn kind(&self) -> RecordKind;

    fn record_id(&self) -> Option<&str>;

    /// Name compared by the fuzzy detector
    fn match_name(&self) -> Option<&str>;

    /// Unique identity signal compared by the exact detector: the normalized
    /// email of a contact, the resolved domain of a company.
    fn identity_key(&self) -> Option<String>;

    /// Normalized email, used as the reconcile key for unsaved records
    fn normalized_email(&self) -> Option<String>;

    fn reconcile_key(&self) -> Option<ReconcileKey> {
        if let Some(id) = self.record_id() {
            return Some(ReconcileKey::Id(self.kind(), id.to_string()));
        }
        if let Some(email) = self.normalized_email() {
            return Some(ReconcileKey::Email(email));
        }
        if self.kind() == RecordKind::Company {
            return self.identity_key().map(ReconcileKey::Domain);
        }
        None
    }

    /// True when both records carry the same id. Records without an id are
    /// never considered the same record.
    fn is_same_record(&self, other: &Self) -> bool {
        match (self.record_id(), other.record_id()) {
            (Some(a), Some(b)) => self.kind() == other.kind() && a == b,
            _ => false,
        }
    }
}

/// Trimmed, lowercased email, or `None` when blank
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    non_blank(email).map(|e| e.to_lowercase())
}

/// Trimmed value, or `None` when absent or whitespace-only
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Dedupable for Contact {
    fn kind(&self) -> RecordKind {
        RecordKind::Contact
    }

    fn record_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    fn match_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    fn identity_key(&self) -> Option<String> {
        self.normalized_email()
    }

    fn normalized_email(&self) -> Option<String> {
        normalize_email(self.email.as_deref())
    }
}

impl Dedupable for Company {
    fn kind(&self) -> RecordKind {
        RecordKind::Company
    }

    fn record_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    fn match_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    fn identity_key(&self) -> Option<String> {
        resolve_company_domain(self)
    }

    fn normalized_email(&self) -> Option<String> {
        normalize_email(self.email.as_deref())
    }
}

impl Dedupable for Record {
    fn kind(&self) -> RecordKind {
        Record::kind(self)
    }

    fn record_id(&self) -> Option<&str> {
        match self {
            Record::Contact(contact) => contact.record_id(),
            Record::Company(company) => company.record_id(),
        }
    }

    fn match_name(&self) -> Option<&str> {
        match self {
            Record::Contact(contact) => contact.match_name(),
            Record::Company(company) => company.match_name(),
        }
    }

    fn identity_key(&self) -> Option<String> {
        match self {
            Record::Contact(contact) => contact.identity_key(),
            Record::Company(company) => company.identity_key(),
        }
    }

    fn normalized_email(&self) -> Option<String> {
        match self {
            Record::Contact(contact) => contact.normalized_email(),
            Record::Company(company) => company.normalized_email(),
        }
    }
}
