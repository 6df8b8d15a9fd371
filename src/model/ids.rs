use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// Ids are opaque strings on the wire. The ones this crate hands out have the form
// `{prefix}{sequence}`, and we order by that sequence so that listings read naturally
// (`printer-9` before `printer-10`). Foreign ids sort after all sequenced ones.
macro_rules! sequenced_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            const PREFIX: &'static str = $prefix;

            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn from_sequence(sequence: u64) -> Self {
                $name(format!("{}{}", Self::PREFIX, sequence))
            }

            /// The numeric suffix, if this id was minted from a sequence.
            pub fn sequence(&self) -> Option<u64> {
                let digits = self.0.strip_prefix(Self::PREFIX)?;
                if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            fn sort_key(&self) -> (bool, u64, &str) {
                match self.sequence() {
                    Some(sequence) => (false, sequence, &self.0),
                    None => (true, 0, &self.0),
                }
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.sort_key().cmp(&other.sort_key())
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

sequenced_id!(PrinterId, "printer-");
sequenced_id!(JobId, "job-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_round_trip() {
        assert_eq!(PrinterId::from_sequence(7).as_str(), "printer-7");
        assert_eq!(PrinterId::new("printer-7").sequence(), Some(7));
        assert_eq!(JobId::from_sequence(12).sequence(), Some(12));
    }

    #[test]
    fn foreign_ids_have_no_sequence() {
        assert_eq!(PrinterId::new("printer-").sequence(), None);
        assert_eq!(PrinterId::new("printer-07").sequence(), None);
        assert_eq!(PrinterId::new("printer-1a").sequence(), None);
        assert_eq!(PrinterId::new("job-1").sequence(), None);
        assert_eq!(JobId::new("bench").sequence(), None);
    }

    #[test]
    fn ordering_is_numeric_then_lexical() {
        let mut ids = vec![
            PrinterId::new("zeta"),
            PrinterId::from_sequence(10),
            PrinterId::new("alpha"),
            PrinterId::from_sequence(2),
            PrinterId::from_sequence(9),
        ];
        ids.sort();

        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["printer-2", "printer-9", "printer-10", "alpha", "zeta"]);
    }
}
