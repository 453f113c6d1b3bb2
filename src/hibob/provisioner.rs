//! Employee provisioning with suffix-based retry on email conflicts.
//!
//! HiBob rejects a new employee whose email is already registered. Instead of
//! failing the hire, the address is disambiguated as `localpart-N@domain`
//! and the create call is repeated, with `N` counting up from 1. The loop is
//! bounded by [`MAX_EMAIL_ATTEMPTS`] total calls.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::client::{CreateAttempt, HibobClient};
use super::types::{CreatePersonRequest, WorkDetails};
use crate::error::OperationError;
use crate::records::{EmployeeRecord, split_email};

/// Total create calls allowed, including the one with the original address.
pub const MAX_EMAIL_ATTEMPTS: u32 = 10;

/// Input for [`provision_employee`].
#[derive(Debug, Clone)]
pub struct NewEmployee<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub site: &'a str,
    pub start_date: NaiveDate,
}

/// New hires start on the calendar day after `today`.
pub fn start_date_after(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(today)
}

/// Address to submit on the given zero-based retry.
///
/// Retry 0 is the original address; retry `n` inserts `-n` before the `@`.
pub fn email_for_retry(email: &str, retry: u32) -> String {
    if retry == 0 {
        return email.to_string();
    }
    match split_email(email) {
        Some((local, domain)) => format!("{local}-{retry}@{domain}"),
        None => format!("{email}-{retry}"),
    }
}

/// Create the employee, retrying with a fresh suffix on every email conflict.
pub async fn provision_employee(
    client: &HibobClient,
    employee: &NewEmployee<'_>,
) -> Result<EmployeeRecord, OperationError> {
    for retry in 0..MAX_EMAIL_ATTEMPTS {
        let email = email_for_retry(employee.email, retry);
        let request = CreatePersonRequest {
            first_name: employee.first_name.to_string(),
            surname: employee.last_name.to_string(),
            email: email.clone(),
            work: WorkDetails {
                site: employee.site.to_string(),
                start_date: employee.start_date,
            },
        };

        match client.create_employee(&request).await? {
            CreateAttempt::Created(record) => {
                info!(
                    employee_id = %record.employee_id,
                    email = %record.email,
                    attempts = retry + 1,
                    "employee created in HiBob"
                );
                return Ok(record);
            }
            CreateAttempt::EmailInUse => {
                warn!(
                    attempt = retry + 1,
                    max = MAX_EMAIL_ATTEMPTS,
                    %email,
                    "email already registered in HiBob, retrying with suffix"
                );
            }
        }
    }

    Err(OperationError::ResourceExhausted {
        attempts: MAX_EMAIL_ATTEMPTS,
    })
}
