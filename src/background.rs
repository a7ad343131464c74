use std::sync::Arc;
use std::time::Duration;
use chrono_tz::Tz;
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::job::Job;
use crate::error::AppError;
use crate::state::AppState;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let span = info_span!(
                        "background_job",
                        job_id = %job.id,
                        job_type = %job.job_type,
                        workspace_id = %job.payload.workspace_id
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let booking_id = &job.payload.booking_id;
    let workspace_id = &job.payload.workspace_id;

    let workspace = state.workspace_repo.find_by_id(workspace_id).await?
        .ok_or(AppError::NotFound(format!("Workspace {} not found", workspace_id)))?;

    let booking = state.booking_repo.find_by_id(workspace_id, booking_id).await?
        .ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))?;

    let event_type = state.event_type_repo.find_by_id(workspace_id, &booking.event_type_id).await?
        .ok_or(AppError::NotFound(format!("Event type {} not found", booking.event_type_id)))?;

    let contact_id = match &booking.contact_id {
        Some(id) => id,
        None => {
            warn!("Booking {} has no contact. Skipping notification.", booking.id);
            return Ok(());
        }
    };
    let contact = state.contact_repo.find_by_id(workspace_id, contact_id).await?
        .ok_or(AppError::NotFound(format!("Contact {} not found", contact_id)))?;

    let phone = match &contact.phone {
        Some(phone) => phone,
        None => {
            warn!("Contact {} has no phone number. Skipping notification.", contact.id);
            return Ok(());
        }
    };

    let tz: Tz = event_type.timezone.parse().unwrap_or(chrono_tz::UTC);
    let local_start = booking.start_time.with_timezone(&tz);
    let when = format!("{} ({})", local_start.format("%Y-%m-%d %H:%M"), event_type.timezone);

    let body = match job.job_type.as_str() {
        "BOOKING_CONFIRMATION" => {
            let mut text = format!(
                "Hi {}! Your \"{}\" appointment with {} is confirmed for {}.",
                contact.name, event_type.title, workspace.name, when
            );
            if let Some(url) = &booking.meeting_url {
                text.push_str(&format!(" Join here: {}", url));
            }
            text
        }
        "BOOKING_CANCELLED" => format!(
            "Hi {}, your \"{}\" appointment with {} on {} has been cancelled.",
            contact.name, event_type.title, workspace.name, when
        ),
        other => {
            return Err(AppError::InternalWithMsg(format!("Unknown job type {}", other)));
        }
    };

    info!("Sending WhatsApp notification to contact {}", contact.id);
    state.messenger.send_text(phone, &body).await?;

    Ok(())
}
