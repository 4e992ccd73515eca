use crate::error::TrackerError;

macro_rules! positive_id {
    ($name:ident, $kind:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl $name {
            /// Tracker identifiers start at 1; zero is rejected.
            pub fn new(raw: u64) -> Result<Self, TrackerError> {
                if raw == 0 {
                    return Err(TrackerError::InvalidId {
                        kind: $kind,
                        value: raw,
                    });
                }
                Ok(Self(raw))
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl TryFrom<u64> for $name {
            type Error = TrackerError;
            fn try_from(raw: u64) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(CaseId, "case");
positive_id!(SuiteId, "suite");
positive_id!(ProjectId, "project");
positive_id!(RunId, "run");
