/// TestRail's built-in result status codes.
///
/// These values are fixed by the remote system; they are never looked up
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StatusId {
    Passed,
    Blocked,
    Untested,
    Retest,
    Failed,
}

impl StatusId {
    pub fn code(self) -> u8 {
        match self {
            Self::Passed => 1,
            Self::Blocked => 2,
            Self::Untested => 3,
            Self::Retest => 4,
            Self::Failed => 5,
        }
    }
}

impl TryFrom<u8> for StatusId {
    type Error = String;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Passed),
            2 => Ok(Self::Blocked),
            3 => Ok(Self::Untested),
            4 => Ok(Self::Retest),
            5 => Ok(Self::Failed),
            other => Err(format!("unknown status id: {other}")),
        }
    }
}

impl From<StatusId> for u8 {
    fn from(status: StatusId) -> u8 {
        status.code()
    }
}
