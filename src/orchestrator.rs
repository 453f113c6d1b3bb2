use chrono::{NaiveDate, Utc};
use tracing::{Instrument, Span, error, field, info, info_span, warn};

use crate::config::HireSyncConfig;
use crate::error::OperationError;
use crate::event::HireEvent;
use crate::hibob::{HibobClient, NewEmployee, provision_employee, start_date_after};
use crate::pinpoint::PinpointClient;
use crate::records::{ApplicantRecord, EmployeeRecord};
use crate::response::{HandlerResponse, WorkflowResult};
use crate::state_machine::{Run, RunSummary, StateMachine, StepOutcome, UploadStatus};

/// Drives one hire event through fetch, provision, upload and acknowledge.
///
/// Holds only read-only clients and settings, so a single instance can be
/// shared by every concurrent webhook delivery.
pub struct HireOrchestrator {
    pinpoint: PinpointClient,
    hibob: HibobClient,
    default_site: String,
}

impl HireOrchestrator {
    pub fn new(pinpoint: PinpointClient, hibob: HibobClient, default_site: impl Into<String>) -> Self {
        Self {
            pinpoint,
            hibob,
            default_site: default_site.into(),
        }
    }

    /// Build both clients from the loaded configuration.
    pub fn from_config(config: &HireSyncConfig) -> Result<Self, reqwest::Error> {
        let timeouts = config.timeouts();
        let pinpoint = PinpointClient::with_base_url(
            config.pinpoint_api_key.clone(),
            config.pinpoint_base_url.clone(),
            timeouts,
        )?;
        let hibob = HibobClient::with_base_url(
            config.hibob_credentials.clone(),
            config.hibob_base_url.clone(),
            timeouts,
        )?;
        Ok(Self::new(pinpoint, hibob, config.default_site.clone()))
    }

    /// Handle a raw webhook body. Never fails: errors become error responses.
    pub async fn handle(&self, payload: &[u8], request_id: &str) -> HandlerResponse {
        self.handle_on(payload, request_id, Utc::now().date_naive())
            .await
    }

    /// Like [`handle`](Self::handle), with `today` fixed for the start-date rule.
    pub async fn handle_on(
        &self,
        payload: &[u8],
        request_id: &str,
        today: NaiveDate,
    ) -> HandlerResponse {
        let span = info_span!("hire_event", %request_id, application_id = field::Empty);
        async {
            let mut run = Run::new(request_id);
            let outcome = self.run_workflow(payload, today, &mut run).await;
            let summary = RunSummary::from_run(&run);

            match outcome {
                Ok(result) => {
                    info!(
                        path = %summary.path(),
                        duration_ms = summary.duration_ms,
                        cv_uploaded = result.cv_uploaded,
                        "hire event completed"
                    );
                    HandlerResponse::success(request_id, &result)
                }
                Err(err) => {
                    if let Some(employee_id) = summary.employee_id.as_deref().filter(|_| summary.left_orphan()) {
                        error!(
                            employee_id,
                            "employee exists in HiBob but the hire workflow failed; manual follow-up required"
                        );
                    }
                    if err.is_client_error() {
                        warn!(path = %summary.path(), error = %err, "hire event rejected");
                    } else {
                        error!(path = %summary.path(), error = %err, "hire event failed");
                    }
                    HandlerResponse::error(request_id, &err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// The workflow proper. Each step's outcome is recorded on `run`.
    pub async fn run_workflow(
        &self,
        payload: &[u8],
        today: NaiveDate,
        run: &mut Run,
    ) -> Result<WorkflowResult, OperationError> {
        // RECEIVED: validate the event.
        let event = record(run, HireEvent::parse(payload))?;
        run.application_id = Some(event.application_id.to_string());
        Span::current().record("application_id", event.application_id.as_str());
        info!(job_id = ?event.job_id, "hire event accepted");

        // VALIDATED: fetch the candidate.
        let applicant = record(run, self.pinpoint.fetch_applicant(&event.application_id).await)?;
        info!(has_cv = applicant.resume.is_some(), "applicant fetched from Pinpoint");

        // FETCHED: create the employee.
        let new_employee = NewEmployee {
            first_name: &applicant.first_name,
            last_name: &applicant.last_name,
            email: &applicant.email,
            site: &self.default_site,
            start_date: start_date_after(today),
        };
        let employee = record(run, provision_employee(&self.hibob, &new_employee).await)?;
        run.employee_id = Some(employee.employee_id.clone());

        // PROVISIONED: best-effort CV upload.
        let upload = self.upload_resume(&applicant, &employee).await;
        let outcome = match upload {
            UploadStatus::Skipped => StepOutcome::Skipped,
            UploadStatus::Uploaded => StepOutcome::Success,
            UploadStatus::Failed(_) => StepOutcome::Failure,
        };
        StateMachine::next(run, outcome);
        run.upload = Some(upload.clone());

        // UPLOAD_*: acknowledge on the application.
        let comment_id = record(
            run,
            self.pinpoint
                .post_hire_comment(&event.application_id, &employee.employee_id)
                .await,
        )?;
        info!(%comment_id, "hire comment posted to Pinpoint");

        // ACKNOWLEDGED: done.
        StateMachine::next(run, StepOutcome::Success);

        Ok(WorkflowResult {
            application_id: event.application_id.to_string(),
            employee_id: employee.employee_id,
            email: employee.email,
            comment_id,
            cv_uploaded: upload == UploadStatus::Uploaded,
            cv_upload_failed: matches!(upload, UploadStatus::Failed(_)),
            timestamp: Utc::now(),
        })
    }

    async fn upload_resume(&self, applicant: &ApplicantRecord, employee: &EmployeeRecord) -> UploadStatus {
        let Some(resume) = &applicant.resume else {
            info!("no CV attached to application, skipping upload");
            return UploadStatus::Skipped;
        };

        match self
            .hibob
            .upload_shared_document(&employee.employee_id, &resume.url, &resume.file_name)
            .await
        {
            Ok(_) => {
                info!(file_name = %resume.file_name, "CV uploaded to HiBob");
                UploadStatus::Uploaded
            }
            Err(err) => {
                warn!(file_name = %resume.file_name, error = %err, "CV upload failed, continuing without it");
                UploadStatus::Failed(err.to_string())
            }
        }
    }
}

// Feed a step's result into the state machine and pass it through.
fn record<T>(run: &mut Run, result: Result<T, OperationError>) -> Result<T, OperationError> {
    let outcome = if result.is_ok() {
        StepOutcome::Success
    } else {
        StepOutcome::Failure
    };
    StateMachine::next(run, outcome);
    result
}
