//! Partitions normalized connections by email domain.

use crate::contacts::NormalizedConnection;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// Contacts keyed by email domain, in the order each domain was first seen.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainGroups(Vec<(String, Vec<Contact>)>);

impl DomainGroups {
    pub fn get(&self, domain: &str) -> Option<&[Contact]> {
        self.0
            .iter()
            .find(|(key, _)| key == domain)
            .map(|(_, group)| group.as_slice())
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(domain, _)| domain.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Contact])> {
        self.0
            .iter()
            .map(|(domain, group)| (domain.as_str(), group.as_slice()))
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of contacts across every group.
    pub fn contact_count(&self) -> usize {
        self.0.iter().map(|(_, group)| group.len()).sum()
    }
}

impl Serialize for DomainGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (domain, group) in &self.0 {
            map.serialize_entry(domain, group)?;
        }
        map.end()
    }
}

/// Grouped connections and their counts.
///
/// Both totals equal the number of contacts placed in a group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupedConnections {
    pub connections: DomainGroups,
    pub total_items: usize,
    pub total_people: usize,
}

/// Group connections by `email_domain`.
///
/// Connections without a domain are skipped and left out of both totals.
pub fn group_by_domain(connections: &[NormalizedConnection]) -> GroupedConnections {
    let mut groups: Vec<(String, Vec<Contact>)> = Vec::new();
    for connection in connections {
        let domain = &connection.email_domain;
        if !domain.is_empty() && !groups.iter().any(|(key, _)| key == domain) {
            groups.push((domain.clone(), Vec::new()));
        }
    }

    let mut placed = 0;
    for connection in connections {
        if connection.email_domain.is_empty() {
            continue;
        }
        if let Some((_, group)) = groups
            .iter_mut()
            .find(|(key, _)| *key == connection.email_domain)
        {
            group.push(Contact {
                name: connection.name.clone(),
                email: connection.email.clone(),
            });
            placed += 1;
        }
    }

    GroupedConnections {
        connections: DomainGroups(groups),
        total_items: placed,
        total_people: placed,
    }
}

/// Which connections a listing considers, from the `all` query flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactFilter {
    #[default]
    OnlyWithEmail,
    All,
}

impl ContactFilter {
    pub fn from_all_flag(all: bool) -> Self {
        if all {
            ContactFilter::All
        } else {
            ContactFilter::OnlyWithEmail
        }
    }
}

/// Drop connections the filter excludes. `OnlyWithEmail` drops those with an empty email.
pub fn apply_filter(
    connections: Vec<NormalizedConnection>,
    filter: ContactFilter,
) -> Vec<NormalizedConnection> {
    match filter {
        ContactFilter::All => connections,
        ContactFilter::OnlyWithEmail => connections
            .into_iter()
            .filter(|connection| !connection.email.is_empty())
            .collect(),
    }
}
