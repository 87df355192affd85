use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map($name)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(BookId);
id_newtype!(CommentId);

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&BookId(42)).expect("serialize");
        assert_eq!(json, "42");
        let parsed: UserId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(parsed, UserId(7));
    }

    #[test]
    fn ids_parse_from_route_segments() {
        assert_eq!(" 12 ".parse::<BookId>().expect("parse"), BookId(12));
        assert!("twelve".parse::<BookId>().is_err());
    }
}
