use serde::{Deserialize, Serialize};

/// A People API `Person` resource, restricted to the fields this service reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub names: Vec<Name>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub value: String,
    #[serde(default)]
    pub metadata: FieldMetadata,
}

impl EmailAddress {
    pub fn is_primary(&self) -> bool {
        self.metadata.primary
    }
}

/// Per-field metadata. Only `primary` matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
}

/// One page of `people/me/connections`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsPage {
    #[serde(default)]
    pub connections: Vec<Person>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub total_people: Option<u32>,
}

/// Every connection of the signed-in user, collected across pages.
///
/// The counters are the provider's own and are reported as received; consumers that
/// filter or group the list recompute them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connections {
    pub people: Vec<Person>,
    pub total_items: Option<u32>,
    pub total_people: Option<u32>,
}

impl Connections {
    /// Append a page, keeping the most recent counters the provider reported.
    pub fn extend_with(&mut self, page: ConnectionsPage) {
        self.people.extend(page.connections);
        if page.total_items.is_some() {
            self.total_items = page.total_items;
        }
        if page.total_people.is_some() {
            self.total_people = page.total_people;
        }
    }
}
