use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::{Company, Contact, RecordId};

/// Which kind of CRM record a value holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Contact,
    Company,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Contact => write!(f, "contact"),
            RecordKind::Company => write!(f, "company"),
        }
    }
}

/// A contact or a company, tagged on the wire by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Record {
    Contact(Contact),
    Company(Company),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Contact(_) => RecordKind::Contact,
            Record::Company(_) => RecordKind::Company,
        }
    }

    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Record::Contact(contact) => contact.id.as_ref(),
            Record::Company(company) => company.id.as_ref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Record::Contact(contact) => contact.name.as_deref(),
            Record::Company(company) => company.name.as_deref(),
        }
    }
}

impl From<Contact> for Record {
    fn from(contact: Contact) -> Self {
        Record::Contact(contact)
    }
}

impl From<Company> for Record {
    fn from(company: Company) -> Self {
        Record::Company(company)
    }
}
