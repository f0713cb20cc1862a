use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::{Activities, ActivityDirectory};
use crate::services::signup_service::{self, SignupError};
use crate::web::response::MessageResponse;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub async fn activities_handler(State(directory): State<ActivityDirectory>) -> Json<Activities> {
    Json(signup_service::list_activities(&directory).await)
}

pub async fn signup_handler(
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
    State(directory): State<ActivityDirectory>,
) -> Result<Json<MessageResponse>, SignupError> {
    let message = signup_service::signup(&directory, &activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}

pub async fn unregister_handler(
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
    State(directory): State<ActivityDirectory>,
) -> Result<Json<MessageResponse>, SignupError> {
    let message = signup_service::unregister(&directory, &activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}
