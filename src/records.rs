//! Records passed between workflow steps. None of them outlive a request.

use serde::Serialize;
use serde_json::{Map, Value};

/// Candidate attributes read from a Pinpoint application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// The candidate's CV, when one was attached.
    pub resume: Option<Resume>,
}

/// Location of an uploaded CV. URL and file name only exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resume {
    pub url: String,
    pub file_name: String,
}

/// An employee as created in HiBob.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    /// Opaque identifier assigned by HiBob.
    pub employee_id: String,
    /// The address HiBob accepted, which may carry a `-N` suffix.
    pub email: String,
    pub raw_fields: Map<String, Value>,
}

/// Split an address into local part and domain, if it is well-formed.
///
/// Well-formed means exactly one `@`, both sides non-empty and no whitespace.
pub fn split_email(email: &str) -> Option<(&str, &str)> {
    if email.chars().any(char::is_whitespace) {
        return None;
    }
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some((local, domain))
}

pub fn is_valid_email(email: &str) -> bool {
    split_email(email).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_well_formed_address() {
        assert_eq!(split_email("jane@x.com"), Some(("jane", "x.com")));
        assert_eq!(split_email("jane.doe+hr@mail.x.com"), Some(("jane.doe+hr", "mail.x.com")));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "jane", "@x.com", "jane@", "a@b@c", "ja ne@x.com"] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
    }
}
