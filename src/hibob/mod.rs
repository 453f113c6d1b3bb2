pub mod client;
pub mod provisioner;
pub mod types;

pub use client::{CreateAttempt, HibobClient};
pub use provisioner::{MAX_EMAIL_ATTEMPTS, NewEmployee, provision_employee, start_date_after};
