//! JSON:API documents exchanged with Pinpoint.
//!
//! Pinpoint wraps every resource in a top-level `data` member. Reads are
//! lenient (every field optional) so that shape problems are reported as a
//! single "invalid response format" error instead of a serde message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::records::{ApplicantRecord, Resume, is_valid_email};

/// Attachment `context` that marks a CV.
pub const RESUME_CONTEXT: &str = "pdf_cv";

/// Response of `GET /applications/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationDocument {
    pub data: Option<ApplicationData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationData {
    pub attributes: Option<ApplicationAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Only present when requested through `extra_fields`.
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub context: Option<String>,
    pub url: Option<String>,
    pub filename: Option<String>,
}

impl ApplicationDocument {
    /// Normalize into an [`ApplicantRecord`], or describe what is missing.
    pub fn into_applicant(self) -> Result<ApplicantRecord, String> {
        let attributes = self
            .data
            .and_then(|d| d.attributes)
            .ok_or_else(|| "missing data.attributes".to_string())?;

        let first_name = required(attributes.first_name, "first_name")?;
        let last_name = required(attributes.last_name, "last_name")?;
        let email = required(attributes.email, "email")?;
        if !is_valid_email(&email) {
            return Err(format!("malformed email {email:?}"));
        }

        let resume = attributes
            .attachments
            .unwrap_or_default()
            .into_iter()
            .find(|a| a.context.as_deref() == Some(RESUME_CONTEXT))
            .and_then(|a| match (a.url, a.filename) {
                (Some(url), Some(file_name)) if !url.is_empty() && !file_name.is_empty() => {
                    Some(Resume { url, file_name })
                }
                _ => None,
            });

        Ok(ApplicantRecord {
            first_name,
            last_name,
            email,
            resume,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(format!("missing {field}")),
    }
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDocument {
    pub data: CommentData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentData {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub attributes: CommentAttributes,
    pub relationships: CommentRelationships,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentAttributes {
    pub body_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentRelationships {
    pub commentable: Relationship,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub id: String,
}

impl CommentDocument {
    /// A comment on an application recording the new HiBob employee.
    pub fn hire_confirmation(application_id: &str, employee_id: &str) -> Self {
        Self {
            data: CommentData {
                resource_type: "comments",
                attributes: CommentAttributes {
                    body_text: format!(
                        "Candidate hired. Employee record created in HiBob (employee ID: {employee_id})."
                    ),
                },
                relationships: CommentRelationships {
                    commentable: Relationship {
                        data: ResourceIdentifier {
                            resource_type: "applications",
                            id: application_id.to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// Response of a create call; only the new id is of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedDocument {
    pub data: Option<CreatedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: Option<Value>,
}

impl CreatedDocument {
    pub fn id(&self) -> Option<String> {
        match self.data.as_ref()?.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
