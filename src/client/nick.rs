//! Nick tracking: confirmed vs pending.

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Nicks {
    confirmed: Option<String>,
    pending: Option<String>,
}

/// The client's nick as the server sees it (`confirmed`) and any change we
/// asked for but the server has not answered yet (`pending`).
///
/// A rejected change only clears `pending`; no replacement nick is ever
/// picked on the caller's behalf.
#[derive(Debug, Default)]
pub(crate) struct NickTracker {
    inner: Mutex<Nicks>,
}

impl NickTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn confirmed(&self) -> Option<String> {
        self.inner.lock().confirmed.clone()
    }

    pub(crate) fn pending(&self) -> Option<String> {
        self.inner.lock().pending.clone()
    }

    /// Record a requested nick. Returns the previous pending value so a
    /// failed send can put it back.
    pub(crate) fn set_pending(&self, nick: impl Into<String>) -> Option<String> {
        self.inner.lock().pending.replace(nick.into())
    }

    pub(crate) fn restore_pending(&self, previous: Option<String>) {
        self.inner.lock().pending = previous;
    }

    /// `RPL_WELCOME` names the nick we registered with.
    pub(crate) fn on_welcome(&self, nick: &str) {
        let mut nicks = self.inner.lock();
        nicks.confirmed = Some(nick.to_string());
        nicks.pending = None;
    }

    /// Whether `nick` is ours. Nicks compare ASCII case-insensitively.
    pub(crate) fn is_me(&self, nick: &str) -> bool {
        self.inner
            .lock()
            .confirmed
            .as_deref()
            .is_some_and(|me| me.eq_ignore_ascii_case(nick))
    }

    /// Apply a NICK echo. True if it renamed us.
    pub(crate) fn on_nick_change(&self, old: &str, new: &str) -> bool {
        let mut nicks = self.inner.lock();
        let ours = nicks
            .confirmed
            .as_deref()
            .is_some_and(|me| me.eq_ignore_ascii_case(old));
        if !ours {
            return false;
        }
        nicks.confirmed = Some(new.to_string());
        if nicks
            .pending
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(new))
        {
            nicks.pending = None;
        }
        true
    }

    /// The server refused a nick. Returns the pending nick it refused, if
    /// one was outstanding.
    pub(crate) fn on_rejected(&self) -> Option<String> {
        self.inner.lock().pending.take()
    }
}
