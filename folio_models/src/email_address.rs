use std::{fmt, str::FromStr};

use lettre::message::Mailbox;

/// An email address with an optional display name, e.g.
/// `Ada Lovelace <ada@example.com>` or just `ada@example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddressWithName(pub Mailbox);

impl fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_name() {
        let mailbox = "Ada Lovelace <ada@example.com>"
            .parse::<EmailAddressWithName>()
            .unwrap();

        assert_eq!(mailbox.0.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(mailbox.0.email.to_string(), "ada@example.com");
    }

    #[test]
    fn parse_without_name() {
        let mailbox = "ada@example.com".parse::<EmailAddressWithName>().unwrap();

        assert_eq!(mailbox.0.name, None);
        assert_eq!(mailbox.to_string(), "ada@example.com");
    }

    #[test]
    fn reject_invalid() {
        for input in ["", "ada", "ada@", "@example.com", "ada example.com"] {
            assert!(input.parse::<EmailAddressWithName>().is_err(), "{input}");
        }
    }
}
