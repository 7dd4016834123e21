//! Read-side use cases: the signed-in user's profile and their connections.
//!
//! Each call loads the session's credential from the login flow, asks the provider for
//! fresh data and normalizes it. Nothing is cached between requests.

use crate::contacts::{
    normalize_connections, normalize_profile, NormalizedConnection, NormalizedProfile,
};
use crate::error::Error;
use crate::grouping::{apply_filter, group_by_domain, ContactFilter, GroupedConnections};
use crate::login::LoginFlow;
use log::*;
use serde::Serialize;

/// A flat, ungrouped listing of connections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactList {
    pub connections: Vec<NormalizedConnection>,
    pub total_items: usize,
    pub total_people: usize,
}

/// The user's profile alongside their connections grouped by domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryView {
    pub userinfo: NormalizedProfile,
    #[serde(flatten)]
    pub grouped: GroupedConnections,
}

pub async fn profile(flow: &LoginFlow, session_id: &str) -> Result<NormalizedProfile, Error> {
    let credential = flow.fresh_credential(session_id).await?;
    let person = flow.provider().fetch_profile(&credential).await?;
    normalize_profile(&person)
}

/// List the user's connections without grouping.
///
/// With `OnlyWithEmail` the totals describe the filtered list. With `All` they are the
/// counts the provider reported, or the list length when it reported none.
pub async fn contacts(
    flow: &LoginFlow,
    session_id: &str,
    filter: ContactFilter,
) -> Result<ContactList, Error> {
    let credential = flow.fresh_credential(session_id).await?;
    let fetched = flow.provider().fetch_connections(&credential).await?;

    let connections = apply_filter(normalize_connections(&fetched.people)?, filter);

    let (total_items, total_people) = match filter {
        ContactFilter::OnlyWithEmail => (connections.len(), connections.len()),
        ContactFilter::All => (
            fetched
                .total_items
                .map_or(connections.len(), |total| total as usize),
            fetched
                .total_people
                .map_or(connections.len(), |total| total as usize),
        ),
    };

    Ok(ContactList {
        connections,
        total_items,
        total_people,
    })
}

/// The profile and domain-grouped connections, fetched concurrently.
pub async fn connections_by_domain(
    flow: &LoginFlow,
    session_id: &str,
    filter: ContactFilter,
) -> Result<DirectoryView, Error> {
    let credential = flow.fresh_credential(session_id).await?;
    let provider = flow.provider();

    let (person, fetched) = tokio::try_join!(
        provider.fetch_profile(&credential),
        provider.fetch_connections(&credential)
    )?;

    let userinfo = normalize_profile(&person)?;
    let connections = apply_filter(normalize_connections(&fetched.people)?, filter);
    let grouped = group_by_domain(&connections);

    debug!(
        "Grouped {} of {} connections into {} domains",
        grouped.total_items,
        fetched.people.len(),
        grouped.connections.len()
    );

    Ok(DirectoryView { userinfo, grouped })
}
