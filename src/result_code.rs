use serde::de::{self, Deserializer};
use serde::ser::Serializer;

/// Outcome codes shared by every HMI component on the bus, carried on the wire as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum ResultCode {
    Success = 0,
    UnsupportedRequest = 1,
    UnsupportedResource = 2,
    Disallowed = 3,
    Rejected = 4,
    Aborted = 5,
    Ignored = 6,
    Retry = 7,
    InUse = 8,
    DataNotAvailable = 9,
    TimedOut = 10,
    InvalidData = 11,
    CharLimitExceeded = 12,
    InvalidId = 13,
    DuplicateName = 14,
    ApplicationNotRegistered = 15,
    WrongLanguage = 16,
    OutOfMemory = 17,
    TooManyPendingRequests = 18,
    NoAppsRegistered = 19,
    NoDevicesConnected = 20,
    Warnings = 21,
    GenericError = 22,
    UserDisallowed = 23,
}

impl ResultCode {
    const ALL: [ResultCode; 24] = [
        Self::Success,
        Self::UnsupportedRequest,
        Self::UnsupportedResource,
        Self::Disallowed,
        Self::Rejected,
        Self::Aborted,
        Self::Ignored,
        Self::Retry,
        Self::InUse,
        Self::DataNotAvailable,
        Self::TimedOut,
        Self::InvalidData,
        Self::CharLimitExceeded,
        Self::InvalidId,
        Self::DuplicateName,
        Self::ApplicationNotRegistered,
        Self::WrongLanguage,
        Self::OutOfMemory,
        Self::TooManyPendingRequests,
        Self::NoAppsRegistered,
        Self::NoDevicesConnected,
        Self::Warnings,
        Self::GenericError,
        Self::UserDisallowed,
    ];

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

impl From<ResultCode> for i64 {
    fn from(code: ResultCode) -> Self {
        code.code()
    }
}

impl TryFrom<i64> for ResultCode {
    type Error = i64;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.code() == value)
            .ok_or(value)
    }
}

impl serde::Serialize for ResultCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> serde::Deserialize<'de> for ResultCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        ResultCode::try_from(value)
            .map_err(|v| de::Error::custom(format!("unknown result code {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_value_is_the_integer() {
        assert_eq!(serde_json::to_string(&ResultCode::Success).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ResultCode::GenericError).unwrap(), "22");
        assert_eq!(
            serde_json::from_str::<ResultCode>("4").unwrap(),
            ResultCode::Rejected
        );
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(serde_json::from_str::<ResultCode>("24").is_err());
        assert_eq!(ResultCode::try_from(-1), Err(-1));
    }

    #[test]
    fn table_matches_discriminants() {
        for (index, code) in ResultCode::ALL.iter().enumerate() {
            assert_eq!(code.code(), index as i64);
        }
        assert!(ResultCode::Success.is_success());
        assert!(!ResultCode::Warnings.is_success());
    }
}
