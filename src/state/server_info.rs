//! Server feature info gathered from `RPL_ISUPPORT`.

use slirc_proto::Isupport;
use slirc_proto::chan::DEFAULT_CHANTYPES;

/// What the server advertised about itself. Accumulates across multiple
/// 005 lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    /// Server name from the prefix of `RPL_WELCOME`.
    pub server_name: Option<String>,
    pub network: Option<String>,
    pub casemapping: Option<String>,
    pub chantypes: Option<String>,
    /// CHANNELLEN in bytes. 0 means not advertised.
    pub channel_len: usize,
    pub nick_len: Option<usize>,
}

impl ServerInfo {
    /// Merge tokens from one 005 line.
    pub fn apply(&mut self, isupport: &Isupport<'_>) {
        if let Some(network) = isupport.network() {
            self.network = Some(network.to_string());
        }
        if let Some(casemapping) = isupport.casemapping() {
            self.casemapping = Some(casemapping.to_string());
        }
        if let Some(chantypes) = isupport.chantypes() {
            self.chantypes = Some(chantypes.to_string());
        }
        if let Some(len) = isupport.channellen() {
            self.channel_len = len;
        }
        if let Some(len) = isupport.nicklen() {
            self.nick_len = Some(len);
        }
    }

    /// Channel prefixes in effect.
    pub fn chantypes(&self) -> &str {
        self.chantypes.as_deref().unwrap_or(DEFAULT_CHANTYPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slirc_proto::isupport::parse_params;

    #[test]
    fn test_apply_accumulates() {
        let mut info = ServerInfo::default();
        info.apply(&parse_params(&["NETWORK=TestNet", "CHANNELLEN=32"]));
        info.apply(&parse_params(&["NICKLEN=30", "CHANTYPES=#"]));

        assert_eq!(info.network.as_deref(), Some("TestNet"));
        assert_eq!(info.channel_len, 32);
        assert_eq!(info.nick_len, Some(30));
        assert_eq!(info.chantypes(), "#");
    }

    #[test]
    fn test_defaults() {
        let info = ServerInfo::default();
        assert_eq!(info.channel_len, 0);
        assert_eq!(info.chantypes(), "#&+!");
    }
}
