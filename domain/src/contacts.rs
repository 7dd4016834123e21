//! Maps People API records into the shapes this service returns.

use crate::error::{Error, PayloadErrorKind};
use crate::gateway::{Name, Person};
use serde::Serialize;

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProfile {
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub primary_email: String,
    pub email_addresses: Vec<String>,
    pub photo_url: String,
}

/// One of the user's connections, reduced to what grouping needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedConnection {
    pub name: String,
    pub email: String,
    pub email_domain: String,
}

fn first_name(person: &Person) -> Result<(&Name, String), Error> {
    person
        .names
        .first()
        .and_then(|name| Some((name, name.display_name.clone()?)))
        .ok_or_else(|| Error::payload(PayloadErrorKind::MissingField("names".to_string())))
}

/// Normalize the user's own profile.
///
/// The primary email is required; a profile without one is rejected rather than
/// represented by whichever address happens to come first.
pub fn normalize_profile(person: &Person) -> Result<NormalizedProfile, Error> {
    let (name, display_name) = first_name(person)?;

    let primary_email = person
        .email_addresses
        .iter()
        .find(|email| email.is_primary())
        .map(|email| email.value.clone())
        .ok_or_else(|| Error::payload(PayloadErrorKind::NoPrimaryEmail))?;

    Ok(NormalizedProfile {
        display_name,
        first_name: name.given_name.clone().unwrap_or_default(),
        last_name: name.family_name.clone().unwrap_or_default(),
        primary_email,
        email_addresses: person
            .email_addresses
            .iter()
            .map(|email| email.value.clone())
            .collect(),
        photo_url: person
            .photos
            .first()
            .map(|photo| photo.url.clone())
            .unwrap_or_default(),
    })
}

/// Normalize a connection. A missing email is not an error.
pub fn normalize_connection(person: &Person) -> Result<NormalizedConnection, Error> {
    let (_, name) = first_name(person)?;
    let email = person
        .email_addresses
        .first()
        .map(|email| email.value.clone())
        .unwrap_or_default();

    Ok(NormalizedConnection {
        name,
        email_domain: email_domain(&email).to_string(),
        email,
    })
}

/// The segment after the first `@`, up to any further `@`. "" when there is none.
pub fn email_domain(email: &str) -> &str {
    email.split('@').nth(1).unwrap_or("")
}

pub fn normalize_connections(people: &[Person]) -> Result<Vec<NormalizedConnection>, Error> {
    people.iter().map(normalize_connection).collect()
}
