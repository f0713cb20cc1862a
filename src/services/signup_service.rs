use thiserror::Error;
use tracing::info;

use crate::database::{Activities, ActivityDirectory};

/// Why a signup or unregister request was refused. The directory is left
/// unchanged in every case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignupError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Email must not be empty")]
    BlankEmail,
    #[error("Student is already signed up for this activity")]
    AlreadySignedUp,
    #[error("Activity is full")]
    ActivityFull,
    #[error("Student is not signed up for this activity")]
    NotSignedUp,
}

pub async fn list_activities(directory: &ActivityDirectory) -> Activities {
    directory.list_activities().await
}

/// Adds `email` to the named activity and returns a confirmation message.
pub async fn signup(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<String, SignupError> {
    directory
        .update_activity(activity_name, |activity| -> Result<_, SignupError> {
            check_email(email)?;
            if activity.has_participant(email) {
                return Err(SignupError::AlreadySignedUp);
            }
            if activity.is_full() {
                return Err(SignupError::ActivityFull);
            }
            activity.participants.push(email.to_string());
            Ok(activity.spots_left())
        })
        .await
        .ok_or(SignupError::ActivityNotFound)?
        .map(|spots_left| {
            info!(
                "Signed up {} for {} ({} spots left)",
                email, activity_name, spots_left
            );
            format!("Signed up {} for {}", email, activity_name)
        })
}

/// Removes `email` from the named activity and returns a confirmation message.
pub async fn unregister(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<String, SignupError> {
    directory
        .update_activity(activity_name, |activity| -> Result<_, SignupError> {
            check_email(email)?;
            let Some(pos) = activity.participants.iter().position(|p| p == email) else {
                return Err(SignupError::NotSignedUp);
            };
            activity.participants.remove(pos);
            Ok(())
        })
        .await
        .ok_or(SignupError::ActivityNotFound)?
        .map(|()| {
            info!("Unregistered {} from {}", email, activity_name);
            format!("Unregistered {} from {}", email, activity_name)
        })
}

// Emails are opaque; only blank values are refused.
fn check_email(email: &str) -> Result<(), SignupError> {
    if email.trim().is_empty() {
        return Err(SignupError::BlankEmail);
    }
    Ok(())
}
