//! Value objects of the chat relay domain.
//!
//! Each value object validates on construction, so every instance held by an
//! entity or usecase is known to be well-formed.

use super::error::DomainError;

/// Display name of a connected client.
///
/// Names are trimmed on construction; an empty or overlong result is
/// rejected. The relay uses the name as the registry key, so equality and
/// ordering are derived for map lookups and sorted presence lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserName(String);

impl UserName {
    /// Maximum length of a display name in characters
    pub const MAX_LEN: usize = 32;

    /// Create a new display name, trimming surrounding whitespace
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyUserName);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::UserNameTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for UserName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a chat message.
///
/// Empty text is allowed (the relay forwards whatever the client typed);
/// only the length is bounded, independently of the frame-size ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Maximum length of a message body in characters
    pub const MAX_LEN: usize = 2048;

    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let text = raw.into();
        if text.chars().count() > Self::MAX_LEN {
            return Err(DomainError::MessageTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for MessageText {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in UTC milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_accepts_valid_name() {
        // given:
        let raw = "Ana";

        // when:
        let name = UserName::new(raw);

        // then:
        assert_eq!(name.unwrap().as_str(), "Ana");
    }

    #[test]
    fn test_user_name_trims_whitespace() {
        // given:
        let raw = "  Bo \t";

        // when:
        let name = UserName::new(raw).unwrap();

        // then:
        assert_eq!(name.as_str(), "Bo");
    }

    #[test]
    fn test_user_name_rejects_empty() {
        // given:
        let raw = "";

        // when:
        let result = UserName::new(raw);

        // then:
        assert_eq!(result.unwrap_err(), DomainError::EmptyUserName);
    }

    #[test]
    fn test_user_name_rejects_whitespace_only() {
        // given:
        let raw = "   \t\n ";

        // when:
        let result = UserName::new(raw);

        // then:
        assert_eq!(result.unwrap_err(), DomainError::EmptyUserName);
    }

    #[test]
    fn test_user_name_rejects_overlong_name() {
        // given:
        let raw = "x".repeat(UserName::MAX_LEN + 1);

        // when:
        let result = UserName::new(raw);

        // then:
        assert_eq!(
            result.unwrap_err(),
            DomainError::UserNameTooLong {
                max: UserName::MAX_LEN
            }
        );
    }

    #[test]
    fn test_user_name_accepts_max_length_name() {
        // given:
        let raw = "x".repeat(UserName::MAX_LEN);

        // when:
        let result = UserName::new(raw);

        // then:
        assert!(result.is_ok());
    }

    #[test]
    fn test_user_name_ordering_is_lexicographic() {
        // given:
        let ana = UserName::new("Ana").unwrap();
        let bo = UserName::new("Bo").unwrap();

        // then:
        assert!(ana < bo);
    }

    #[test]
    fn test_message_text_accepts_empty_text() {
        // given:
        let raw = "";

        // when:
        let result = MessageText::new(raw);

        // then:
        assert!(result.is_ok());
    }

    #[test]
    fn test_message_text_rejects_overlong_text() {
        // given:
        let raw = "y".repeat(MessageText::MAX_LEN + 1);

        // when:
        let result = MessageText::new(raw);

        // then:
        assert_eq!(
            result.unwrap_err(),
            DomainError::MessageTooLong {
                max: MessageText::MAX_LEN
            }
        );
    }

    #[test]
    fn test_timestamp_preserves_value() {
        // given:
        let millis = 1735689600000;

        // when:
        let ts = Timestamp::new(millis);

        // then:
        assert_eq!(ts.value(), millis);
    }
}
