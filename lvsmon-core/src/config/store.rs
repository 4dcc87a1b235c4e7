//! Record store
//!
//! Ordered server lists that refuse a second record for an address/port
//! pair, and the teardown walk that releases a whole configuration.

use crate::config::types::{Configuration, HealthCheckMethod, RealServer, ServerKey, VirtualServer};
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A record identified by its address and port
pub trait Keyed {
    fn key(&self) -> ServerKey;
}

/// Outcome of [`ServerList::insert_unique`]
#[derive(Debug, PartialEq)]
#[must_use]
pub enum Insert<T> {
    /// The record was appended
    Inserted,
    /// A record with the same key already exists; the candidate is handed back
    Duplicate(T),
}

impl<T> Insert<T> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted)
    }
}

/// Insertion-ordered list of servers, unique by [`ServerKey`]
#[derive(Debug, Clone)]
pub struct ServerList<T> {
    entries: IndexMap<ServerKey, T>,
}

impl<T: Keyed> ServerList<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Append `record` unless its key is already present.
    ///
    /// The first record for a key wins; later ones are returned untouched.
    pub fn insert_unique(&mut self, record: T) -> Insert<T> {
        let key = record.key();
        if self.entries.contains_key(&key) {
            return Insert::Duplicate(record);
        }
        self.entries.insert(key, record);
        Insert::Inserted
    }
}

impl<T> ServerList<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ServerKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &ServerKey) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|(_, record)| record)
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServerKey> {
        self.entries.keys()
    }

    pub fn into_records(self) -> impl Iterator<Item = T> {
        self.entries.into_values()
    }
}

impl<T: Keyed> Default for ServerList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Order matters: two lists holding the same servers in a different order
// are different topologies.
impl<T: PartialEq> PartialEq for ServerList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Keyed> FromIterator<T> for ServerList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = ServerList::new();
        for record in iter {
            // first occurrence wins, same as the config reader
            let _ = list.insert_unique(record);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a ServerList<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, ServerKey, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<T: Serialize> Serialize for ServerList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, T: Keyed + Deserialize<'de>> Deserialize<'de> for ServerList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<T>::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}

/// Number of entities of each kind in a configuration tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub emails: usize,
    pub virtual_servers: usize,
    pub sorry_servers: usize,
    pub real_servers: usize,
    pub health_checks: usize,
    pub urls: usize,
}

impl EntityCounts {
    pub fn total(&self) -> usize {
        self.emails
            + self.virtual_servers
            + self.sorry_servers
            + self.real_servers
            + self.health_checks
            + self.urls
    }
}

impl Configuration {
    /// Count every entity owned by this configuration
    pub fn counts(&self) -> EntityCounts {
        let mut counts = EntityCounts {
            emails: self.notification_emails.len(),
            virtual_servers: self.virtual_servers.len(),
            ..EntityCounts::default()
        };

        for vs in self.virtual_servers.iter() {
            counts.sorry_servers += usize::from(vs.sorry_server.is_some());
            counts.real_servers += vs.real_servers.len();
            for rs in vs.real_servers.iter() {
                if let Some(method) = &rs.method {
                    counts.health_checks += 1;
                    counts.urls += method.http_get().map_or(0, |check| check.urls.len());
                }
            }
        }

        counts
    }

    /// Release the whole tree, leaf records first.
    ///
    /// Consumes the configuration, so nothing it owned stays reachable and it
    /// cannot be released a second time. Returns what was released.
    pub fn teardown(self) -> EntityCounts {
        let mut released = EntityCounts::default();
        let Configuration {
            notification_emails,
            virtual_servers,
            ..
        } = self;

        for _email in notification_emails {
            released.emails += 1;
        }
        for vs in virtual_servers.into_records() {
            vs.release(&mut released);
        }

        tracing::debug!(
            virtual_servers = released.virtual_servers,
            real_servers = released.real_servers,
            total = released.total(),
            "Configuration released"
        );
        released
    }
}

impl VirtualServer {
    fn release(self, released: &mut EntityCounts) {
        let VirtualServer {
            sorry_server,
            real_servers,
            ..
        } = self;

        for rs in real_servers.into_records() {
            rs.release(released);
        }
        if sorry_server.is_some() {
            released.sorry_servers += 1;
        }
        released.virtual_servers += 1;
    }
}

impl RealServer {
    fn release(self, released: &mut EntityCounts) {
        if let Some(method) = self.method {
            method.release(released);
        }
        released.real_servers += 1;
    }
}

impl HealthCheckMethod {
    fn release(self, released: &mut EntityCounts) {
        if let HealthCheckMethod::HttpGet { check, .. } = self {
            for _url in check.urls {
                released.urls += 1;
            }
        }
        released.health_checks += 1;
    }
}
