use std::fmt;

use crate::store::{ProfileKey, ProfileStore, StoreError};

/// The session's user. Every mutation is written through to a [`ProfileStore`].
///
/// Values are expected to be validated by the caller; nothing is checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    username: String,
    preferred_city: String,
}

impl UserProfile {
    /// Build a profile from validated answers and persist both fields.
    pub fn create<S>(
        store: &mut S,
        username: impl Into<String>,
        preferred_city: impl Into<String>,
    ) -> Result<Self, StoreError>
    where
        S: ProfileStore + ?Sized,
    {
        let username = username.into();
        let preferred_city = preferred_city.into();

        store.set(ProfileKey::Username, &username)?;
        store.set(ProfileKey::PreferredCity, &preferred_city)?;

        Ok(Self {
            username,
            preferred_city,
        })
    }

    /// Rebuild the profile from stored values, or `None` if either is missing.
    /// Stored values were validated when written and are trusted as-is.
    pub fn load<S>(store: &S) -> Result<Option<Self>, StoreError>
    where
        S: ProfileStore + ?Sized,
    {
        let username = store.get(ProfileKey::Username)?;
        let preferred_city = store.get(ProfileKey::PreferredCity)?;

        Ok(match (username, preferred_city) {
            (Some(username), Some(preferred_city)) => Some(Self {
                username,
                preferred_city,
            }),
            _ => None,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn preferred_city(&self) -> &str {
        &self.preferred_city
    }

    /// The store is written first; on failure the in-memory value is left
    /// untouched so both sides still agree.
    pub fn set_username<S>(&mut self, store: &mut S, value: impl Into<String>) -> Result<(), StoreError>
    where
        S: ProfileStore + ?Sized,
    {
        let value = value.into();
        store.set(ProfileKey::Username, &value)?;
        self.username = value;
        Ok(())
    }

    pub fn set_preferred_city<S>(
        &mut self,
        store: &mut S,
        value: impl Into<String>,
    ) -> Result<(), StoreError>
    where
        S: ProfileStore + ?Sized,
    {
        let value = value.into();
        store.set(ProfileKey::PreferredCity, &value)?;
        self.preferred_city = value;
        Ok(())
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "👤 Username:       {}", self.username)?;
        write!(f, "🌆 Preferred city: {}", self.preferred_city)
    }
}
