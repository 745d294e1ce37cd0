//! Channel registry: the name to [`Channel`] association.

use crate::error::RegistryError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::Channel;

/// Thread-safe map of channel name to entity.
///
/// Every operation runs under the shard lock for its key, so lookups that
/// create are linearizable: concurrent `get_channel` calls for one name all
/// observe the same instance. Names are compared case-sensitively.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<String, Arc<Channel>>,
    /// Server-advertised CHANNELLEN in bytes. 0 means unbounded.
    max_name_len: AtomicUsize,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a known channel-name limit.
    pub fn with_max_name_len(limit: usize) -> Self {
        let registry = Self::new();
        registry.set_max_name_len(limit);
        registry
    }

    pub fn max_name_len(&self) -> usize {
        self.max_name_len.load(Ordering::Acquire)
    }

    /// Update the channel-name limit. Existing entries are kept.
    pub fn set_max_name_len(&self, limit: usize) {
        self.max_name_len.store(limit, Ordering::Release);
    }

    /// Look up a channel, creating it on first use.
    ///
    /// Fails without inserting when the name is longer than the limit.
    pub fn get_channel(&self, name: &str) -> Result<Arc<Channel>, RegistryError> {
        match self.channels.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let limit = self.max_name_len();
                if limit > 0 && name.len() > limit {
                    return Err(RegistryError::ChannelNameTooLong {
                        name: name.to_string(),
                        len: name.len(),
                        limit,
                    });
                }
                debug!(channel = %name, "Channel created");
                Ok(entry.insert(Arc::new(Channel::new(name))).clone())
            }
        }
    }

    /// Look up without creating.
    pub fn get(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.get(name).map(|r| r.value().clone())
    }

    /// Remove a channel. Absent names are a no-op.
    pub fn remove_channel(&self, name: &str) -> Option<Arc<Channel>> {
        let removed = self.channels.remove(name).map(|(_, channel)| channel);
        if removed.is_some() {
            debug!(channel = %name, "Channel removed");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Point-in-time copy of every entity. Guards are dropped before
    /// returning.
    pub fn snapshot(&self) -> Vec<Arc<Channel>> {
        self.channels.iter().map(|r| r.value().clone()).collect()
    }

    /// Sorted channel names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drop every entry (on disconnect).
    pub fn clear(&self) {
        self.channels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_channel_is_idempotent() {
        let registry = ChannelRegistry::new();
        let first = registry.get_channel("#general").unwrap();
        let second = registry.get_channel("#general").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_too_long_is_rejected_without_insert() {
        let registry = ChannelRegistry::with_max_name_len(5);
        registry.get_channel("#abc").unwrap();

        let err = registry.get_channel("#abcdef").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ChannelNameTooLong { len: 7, limit: 5, .. }
        ));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("#abcdef"));
    }

    #[test]
    fn test_limit_counts_bytes() {
        let registry = ChannelRegistry::with_max_name_len(4);
        // 3 chars, 5 bytes
        assert!(registry.get_channel("#éé").is_err());
        assert!(registry.get_channel("#abc").is_ok());
    }

    #[test]
    fn test_existing_entry_survives_lowered_limit() {
        let registry = ChannelRegistry::new();
        let before = registry.get_channel("#longname").unwrap();
        registry.set_max_name_len(4);
        let after = registry.get_channel("#longname").unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_remove_then_get_creates_new_instance() {
        let registry = ChannelRegistry::new();
        let first = registry.get_channel("#general").unwrap();
        assert!(registry.remove_channel("#general").is_some());
        assert!(registry.remove_channel("#general").is_none());
        let second = registry.get_channel("#general").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_names_sorted() {
        let registry = ChannelRegistry::new();
        registry.get_channel("#b").unwrap();
        registry.get_channel("#a").unwrap();
        assert_eq!(registry.names(), vec!["#a", "#b"]);
        registry.clear();
        assert!(registry.is_empty());
    }
}
