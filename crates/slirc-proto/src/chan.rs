//! Channel name utilities.

/// Channel prefixes assumed when the server has not advertised `CHANTYPES`.
pub const DEFAULT_CHANTYPES: &str = "#&+!";

/// Extension trait for checking if a string looks like an IRC channel name.
pub trait ChannelExt {
    /// Check against the default channel prefixes.
    fn is_channel_name(&self) -> bool {
        self.is_channel_name_with(DEFAULT_CHANTYPES)
    }

    /// Check against an explicit set of channel prefixes (ISUPPORT `CHANTYPES`).
    ///
    /// Length is not checked here; servers advertise their own limit.
    fn is_channel_name_with(&self, chantypes: &str) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name_with(&self, chantypes: &str) -> bool {
        let mut chars = self.chars();
        match chars.next() {
            Some(first) if chantypes.contains(first) => {}
            _ => return false,
        }
        chars.all(|c| c != ' ' && c != ',' && c != '\x07' && !c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name_with(&self, chantypes: &str) -> bool {
        self.as_str().is_channel_name_with(chantypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_channels() {
        assert!("#channel".is_channel_name());
        assert!("&local".is_channel_name());
        assert!("!safe12345".is_channel_name());
    }

    #[test]
    fn test_invalid_channels() {
        assert!(!"channel".is_channel_name());
        assert!(!"#chan nel".is_channel_name());
        assert!(!"#chan,nel".is_channel_name());
        assert!(!"".is_channel_name());
    }

    #[test]
    fn test_custom_chantypes() {
        assert!("#rust".is_channel_name_with("#"));
        assert!(!"&rust".is_channel_name_with("#"));
    }
}
