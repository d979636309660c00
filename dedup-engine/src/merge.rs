use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Company, Contact, Record};

use crate::record::non_blank;

/// Field-level merge of two records of the same kind.
pub trait Mergeable: Clone {
    /// Combine `secondary` into `primary`. The result keeps the primary's id.
    fn merge(primary: &Self, secondary: &Self) -> Self;

    /// Wire names of the fields that differ between `before` and `after`, in
    /// declaration order. The id is never reported.
    fn changed_fields(before: &Self, after: &Self) -> Vec<&'static str>;
}

/// Merge two contacts into a full record carrying the primary's id. Primary
/// values survive unless blank; timestamps take the latest value. The fields
/// that actually change are reported by [`Mergeable::changed_fields`].
pub fn merge_contacts(primary: &Contact, secondary: &Contact) -> Contact {
    Contact {
        id: primary.id.clone(),
        name: prefer_filled(&primary.name, &secondary.name),
        email: prefer_filled(&primary.email, &secondary.email),
        phone: prefer_filled(&primary.phone, &secondary.phone),
        role: prefer_filled(&primary.role, &secondary.role),
        company_id: prefer_filled(&primary.company_id, &secondary.company_id),
        linkedin: prefer_filled(&primary.linkedin, &secondary.linkedin),
        notes: prefer_filled(&primary.notes, &secondary.notes),
        last_contacted_at: latest(primary.last_contacted_at, secondary.last_contacted_at),
    }
}

/// Merge two companies into a full record carrying the primary's id. Scalars
/// follow the contact rule, tags are unioned, `updatedAt` takes the latest and
/// `createdAt` the earliest known value.
pub fn merge_companies(primary: &Company, secondary: &Company) -> Company {
    Company {
        id: primary.id.clone(),
        name: prefer_filled(&primary.name, &secondary.name),
        industry: prefer_filled(&primary.industry, &secondary.industry),
        website: prefer_filled(&primary.website, &secondary.website),
        email: prefer_filled(&primary.email, &secondary.email),
        domain: prefer_filled(&primary.domain, &secondary.domain),
        region: prefer_filled(&primary.region, &secondary.region),
        logo_url: prefer_filled(&primary.logo_url, &secondary.logo_url),
        tags: union_tags(&primary.tags, &secondary.tags),
        created_at: earliest(primary.created_at, secondary.created_at),
        updated_at: latest(primary.updated_at, secondary.updated_at),
    }
}

impl Mergeable for Contact {
    fn merge(primary: &Self, secondary: &Self) -> Self {
        merge_contacts(primary, secondary)
    }

    fn changed_fields(before: &Self, after: &Self) -> Vec<&'static str> {
        changed([
            ("name", before.name != after.name),
            ("email", before.email != after.email),
            ("phone", before.phone != after.phone),
            ("role", before.role != after.role),
            ("companyId", before.company_id != after.company_id),
            ("linkedin", before.linkedin != after.linkedin),
            ("notes", before.notes != after.notes),
            ("lastContactedAt", before.last_contacted_at != after.last_contacted_at),
        ])
    }
}

impl Mergeable for Company {
    fn merge(primary: &Self, secondary: &Self) -> Self {
        merge_companies(primary, secondary)
    }

    fn changed_fields(before: &Self, after: &Self) -> Vec<&'static str> {
        changed([
            ("name", before.name != after.name),
            ("industry", before.industry != after.industry),
            ("website", before.website != after.website),
            ("email", before.email != after.email),
            ("domain", before.domain != after.domain),
            ("region", before.region != after.region),
            ("logoUrl", before.logo_url != after.logo_url),
            ("tags", before.tags != after.tags),
            ("createdAt", before.created_at != after.created_at),
            ("updatedAt", before.updated_at != after.updated_at),
        ])
    }
}

/// Which record of a pair should survive a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryChoice {
    First,
    Second,
}

/// How complete and how recent a record is, for picking a merge primary
pub trait Completeness {
    fn filled_field_count(&self) -> usize;

    fn last_activity(&self) -> Option<DateTime<Utc>>;
}

impl Completeness for Contact {
    fn filled_field_count(&self) -> usize {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.role,
            &self.company_id,
            &self.linkedin,
            &self.notes,
        ]
        .into_iter()
        .filter(|value| non_blank(value.as_deref()).is_some())
        .count()
    }

    fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_contacted_at
    }
}

impl Completeness for Company {
    fn filled_field_count(&self) -> usize {
        let scalars = [
            &self.name,
            &self.industry,
            &self.website,
            &self.email,
            &self.domain,
            &self.region,
            &self.logo_url,
        ]
        .into_iter()
        .filter(|value| non_blank(value.as_deref()).is_some())
        .count();

        scalars + usize::from(!self.tags.is_empty())
    }

    fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Completeness for Record {
    fn filled_field_count(&self) -> usize {
        match self {
            Record::Contact(contact) => contact.filled_field_count(),
            Record::Company(company) => company.filled_field_count(),
        }
    }

    fn last_activity(&self) -> Option<DateTime<Utc>> {
        match self {
            Record::Contact(contact) => contact.last_activity(),
            Record::Company(company) => company.last_activity(),
        }
    }
}

/// Suggest the merge primary: the more complete record, then the more
/// recently active one, then `first`.
pub fn suggest_primary<R: Completeness>(first: &R, second: &R) -> PrimaryChoice {
    let first_key = (first.filled_field_count(), first.last_activity());
    let second_key = (second.filled_field_count(), second.last_activity());

    if second_key > first_key {
        PrimaryChoice::Second
    } else {
        PrimaryChoice::First
    }
}

fn prefer_filled(primary: &Option<String>, secondary: &Option<String>) -> Option<String> {
    if non_blank(primary.as_deref()).is_none() && non_blank(secondary.as_deref()).is_some() {
        secondary.clone()
    } else {
        primary.clone()
    }
}

fn latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    a.max(b)
}

// Unknown stays unknown; a missing creation date is never synthesized.
fn earliest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn union_tags(primary: &[String], secondary: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(primary.len() + secondary.len());
    for tag in primary.iter().chain(secondary) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

fn changed<const N: usize>(fields: [(&'static str, bool); N]) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter_map(|(field, differs)| differs.then_some(field))
        .collect()
}
