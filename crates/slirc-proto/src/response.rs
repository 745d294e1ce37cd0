//! IRC numeric reply codes.
//!
//! Only the numerics the client interprets get named constants; every other
//! three-digit code still round-trips through [`Response`].

use std::fmt;
use std::str::FromStr;

/// A three-digit server numeric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Response(u16);

impl Response {
    /// 001 - Welcome to the IRC network. Marks registration as complete.
    pub const RPL_WELCOME: Response = Response(1);
    /// 002 - Your host is running version
    pub const RPL_YOURHOST: Response = Response(2);
    /// 005 - Server supported features (ISUPPORT)
    pub const RPL_ISUPPORT: Response = Response(5);
    /// 332 - Channel topic
    pub const RPL_TOPIC: Response = Response(332);
    /// 353 - Channel member list
    pub const RPL_NAMREPLY: Response = Response(353);
    /// 366 - End of member list
    pub const RPL_ENDOFNAMES: Response = Response(366);
    /// 432 - Erroneous nickname
    pub const ERR_ERRONEUSNICKNAME: Response = Response(432);
    /// 433 - Nickname is already in use
    pub const ERR_NICKNAMEINUSE: Response = Response(433);
    /// 436 - Nickname collision
    pub const ERR_NICKCOLLISION: Response = Response(436);
    /// 437 - Nick/channel is temporarily unavailable
    pub const ERR_UNAVAILRESOURCE: Response = Response(437);
    /// 464 - Password incorrect
    pub const ERR_PASSWDMISMATCH: Response = Response(464);
    /// 465 - You are banned from this server
    pub const ERR_YOUREBANNEDCREEP: Response = Response(465);

    /// Build a response from a raw code. Codes above 999 are rejected.
    pub fn from_code(code: u16) -> Option<Response> {
        (code <= 999).then_some(Response(code))
    }

    /// The numeric value.
    #[inline]
    pub fn code(&self) -> u16 {
        self.0
    }

    /// True for 400-599 error replies.
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.0)
    }

    /// True for replies that reject a NICK change.
    pub fn is_nick_rejection(&self) -> bool {
        matches!(
            *self,
            Response::ERR_ERRONEUSNICKNAME
                | Response::ERR_NICKNAMEINUSE
                | Response::ERR_NICKCOLLISION
                | Response::ERR_UNAVAILRESOURCE
        )
    }
}

/// Error returned when a string is not a three-digit numeric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResponseError;

impl fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a three-digit numeric")
    }
}

impl std::error::Error for ParseResponseError {}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseResponseError);
        }
        s.parse::<u16>()
            .map(Response)
            .map_err(|_| ParseResponseError)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let r: Response = "001".parse().unwrap();
        assert_eq!(r, Response::RPL_WELCOME);
        assert_eq!(r.to_string(), "001");
        assert!("01".parse::<Response>().is_err());
        assert!("abc".parse::<Response>().is_err());
    }

    #[test]
    fn test_classification() {
        assert!(Response::ERR_NICKNAMEINUSE.is_error());
        assert!(Response::ERR_NICKNAMEINUSE.is_nick_rejection());
        assert!(!Response::ERR_PASSWDMISMATCH.is_nick_rejection());
        assert!(!Response::RPL_WELCOME.is_error());
    }
}
