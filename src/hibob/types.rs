//! Request bodies for the HiBob people and documents APIs.

use chrono::NaiveDate;
use serde::Serialize;

/// Body of `POST /people`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub work: WorkDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetails {
    pub site: String,
    /// Serialized as `YYYY-MM-DD`.
    pub start_date: NaiveDate,
}

/// Body of `POST /docs/people/{id}/shared`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDocumentRequest {
    pub document_name: String,
    pub document_url: String,
    pub tags: Vec<String>,
}

const CONFLICT_MARKERS: &[&str] = &[
    "already exists",
    "already in use",
    "already registered",
    "already taken",
];

/// Whether a rejected create call means "this email is already registered".
pub fn is_email_conflict(status: u16, body: &str) -> bool {
    if !matches!(status, 400 | 409 | 422) {
        return false;
    }
    let lower = body.to_lowercase();
    lower.contains("email") && CONFLICT_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_person_uses_hibob_field_names() {
        let req = CreatePersonRequest {
            first_name: "Jane".into(),
            surname: "Doe".into(),
            email: "jane@x.com".into(),
            work: WorkDetails {
                site: "Headquarters".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            },
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "firstName": "Jane",
                "surname": "Doe",
                "email": "jane@x.com",
                "work": { "site": "Headquarters", "startDate": "2026-10-18" }
            })
        );
    }

    #[test]
    fn shared_document_field_names() {
        let req = SharedDocumentRequest {
            document_name: "cv.pdf".into(),
            document_url: "https://f/cv.pdf".into(),
            tags: vec![],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["documentName"], "cv.pdf");
        assert_eq!(value["documentUrl"], "https://f/cv.pdf");
        assert_eq!(value["tags"], json!([]));
    }

    #[test]
    fn detects_email_conflicts() {
        assert!(is_email_conflict(400, r#"{"error":"Email already exists"}"#));
        assert!(is_email_conflict(409, "The email address is already in use"));
        assert!(is_email_conflict(422, "EMAIL ALREADY REGISTERED"));
    }

    #[test]
    fn other_rejections_are_not_conflicts() {
        assert!(!is_email_conflict(400, "surname is required"));
        assert!(!is_email_conflict(400, "site already exists"));
        assert!(!is_email_conflict(500, "email already exists"));
        assert!(!is_email_conflict(401, "email already exists"));
    }
}
