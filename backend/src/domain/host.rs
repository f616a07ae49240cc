//! Host model: a machine registered under exactly one account.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RecordId;

/// Longest accepted hostname, in characters.
pub const HOSTNAME_MAX: usize = 255;

/// Validation errors for host fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HostValidationError {
    #[error("hostname must not be empty")]
    EmptyHostname,
    #[error("hostname must be at most {HOSTNAME_MAX} characters")]
    HostnameTooLong,
}

/// Name of a host, unique per owning account.
///
/// Surrounding whitespace is trimmed before validation.
///
/// # Examples
/// ```
/// use hostwatch::domain::Hostname;
///
/// let name = Hostname::new("  web-01 ").expect("valid hostname");
/// assert_eq!(name.as_ref(), "web-01");
/// assert!(Hostname::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Hostname(String);

impl Hostname {
    pub fn new(raw: &str) -> Result<Self, HostValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HostValidationError::EmptyHostname);
        }
        if trimmed.chars().count() > HOSTNAME_MAX {
            return Err(HostValidationError::HostnameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Hostname> for String {
    fn from(value: Hostname) -> Self {
        value.0
    }
}

/// Operating system descriptor reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct OperatingSystem(String);

impl OperatingSystem {
    /// Wrap a reported name. Blank names carry no information and yield `None`.
    pub fn from_reported(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl From<OperatingSystem> for String {
    fn from(value: OperatingSystem) -> Self {
        value.0
    }
}

/// Host candidate whose owner has already been resolved and confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHost {
    pub owner: RecordId,
    pub hostname: Hostname,
    pub operating_system: Option<OperatingSystem>,
}

/// Persisted host as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    id: RecordId,
    hostname: Hostname,
    owner: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    operating_system_name: Option<OperatingSystem>,
    creation_date: DateTime<Utc>,
}

impl Host {
    pub fn new(id: RecordId, host: NewHost, creation_date: DateTime<Utc>) -> Self {
        let NewHost {
            owner,
            hostname,
            operating_system,
        } = host;
        Self {
            id,
            hostname,
            owner,
            operating_system_name: operating_system,
            creation_date,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn hostname(&self) -> &Hostname {
        &self.hostname
    }

    pub fn owner(&self) -> &RecordId {
        &self.owner
    }

    pub fn operating_system(&self) -> Option<&OperatingSystem> {
        self.operating_system_name.as_ref()
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_hostnames_are_rejected(#[case] raw: &str) {
        assert_eq!(Hostname::new(raw), Err(HostValidationError::EmptyHostname));
    }

    #[rstest]
    fn overlong_hostnames_are_rejected() {
        let raw = "h".repeat(HOSTNAME_MAX + 1);
        assert_eq!(Hostname::new(&raw), Err(HostValidationError::HostnameTooLong));
        assert!(Hostname::new(&"h".repeat(HOSTNAME_MAX)).is_ok());
    }

    #[rstest]
    #[case("Linux", Some("Linux"))]
    #[case("  FreeBSD ", Some("FreeBSD"))]
    #[case("", None)]
    fn operating_system_names_are_normalised(#[case] raw: &str, #[case] expected: Option<&str>) {
        let os = OperatingSystem::from_reported(raw);
        assert_eq!(os.as_ref().map(OperatingSystem::name), expected);
    }

    #[rstest]
    fn host_serialises_with_camel_case_fields() {
        let created = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let host = Host::new(
            RecordId::from(3_i64),
            NewHost {
                owner: RecordId::from(1_i64),
                hostname: Hostname::new("web-01").expect("hostname"),
                operating_system: OperatingSystem::from_reported("Linux"),
            },
            created,
        );

        let value = serde_json::to_value(&host).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": "3",
                "hostname": "web-01",
                "owner": "1",
                "operatingSystemName": "Linux",
                "creationDate": "2024-05-01T12:00:00Z",
            })
        );
    }
}
