//! Channel entity tracked by the client.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// A channel the client has joined.
///
/// The registry owns only the name-to-entity association; membership and
/// topic live here behind their own locks and are kept current by the
/// reader loop.
#[derive(Debug)]
pub struct Channel {
    name: String,
    created_at: DateTime<Utc>,
    members: RwLock<BTreeSet<String>>,
    topic: RwLock<Option<String>>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            members: RwLock::new(BTreeSet::new()),
            topic: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// When this entity was materialized locally.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Add a member. Returns false if already present.
    pub fn add_member(&self, nick: impl Into<String>) -> bool {
        self.members.write().insert(nick.into())
    }

    /// Remove a member. Returns false if absent.
    pub fn remove_member(&self, nick: &str) -> bool {
        self.members.write().remove(nick)
    }

    /// Rename a member in place. Returns false if `old` was not a member.
    pub fn rename_member(&self, old: &str, new: &str) -> bool {
        let mut members = self.members.write();
        if members.remove(old) {
            members.insert(new.to_string());
            true
        } else {
            false
        }
    }

    pub fn has_member(&self, nick: &str) -> bool {
        self.members.read().contains(nick)
    }

    /// Sorted snapshot of member nicks.
    pub fn members(&self) -> Vec<String> {
        self.members.read().iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.read().len()
    }

    pub fn topic(&self) -> Option<String> {
        self.topic.read().clone()
    }

    /// Set or clear the topic. An empty topic clears it.
    pub fn set_topic(&self, topic: Option<String>) {
        *self.topic.write() = topic.filter(|t| !t.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let channel = Channel::new("#rust");
        assert!(channel.add_member("alice"));
        assert!(!channel.add_member("alice"));
        assert!(channel.add_member("bob"));
        assert_eq!(channel.members(), vec!["alice", "bob"]);

        assert!(channel.rename_member("bob", "carol"));
        assert!(!channel.has_member("bob"));
        assert!(channel.has_member("carol"));

        assert!(channel.remove_member("alice"));
        assert!(!channel.remove_member("alice"));
        assert_eq!(channel.member_count(), 1);
    }

    #[test]
    fn test_topic() {
        let channel = Channel::new("#rust");
        assert_eq!(channel.topic(), None);
        channel.set_topic(Some("Welcome".into()));
        assert_eq!(channel.topic().as_deref(), Some("Welcome"));
        channel.set_topic(Some(String::new()));
        assert_eq!(channel.topic(), None);
    }
}
