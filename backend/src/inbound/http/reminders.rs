//! Care reminder HTTP handlers.
//!
//! ```text
//! GET    /api/reminders
//! POST   /api/reminders
//! PUT    /api/reminders/{id}/complete
//! DELETE /api/reminders/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CompletionOutcome, CreateReminderRequest};
use crate::domain::{ReminderId, ReminderView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::posts::MessageResponse;
use crate::inbound::http::schemas::{CompletionSchema, ErrorSchema, ReminderSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_care_type, parse_due_date, parse_id, parse_recurrence,
};

const REMINDER_ID: FieldName = FieldName::new("reminderId");

/// Request payload for scheduling a reminder.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderBody {
    #[schema(example = "Weekly soak")]
    pub title: Option<String>,
    #[schema(example = "Monstera")]
    pub plant_name: Option<String>,
    /// One of `watering`, `fertilizing`, `pruning`.
    #[serde(rename = "type")]
    #[schema(example = "watering")]
    pub care_type: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2024-01-01")]
    pub date: Option<String>,
    /// One of `none`, `daily`, `weekly`, `monthly`; defaults to `none`.
    #[schema(example = "weekly")]
    pub repeat: Option<String>,
}

fn parse_create_body(
    owner: AuthenticatedUser,
    body: CreateReminderBody,
) -> ApiResult<CreateReminderRequest> {
    let plant_name = body
        .plant_name
        .ok_or_else(|| missing_field_error(FieldName::new("plantName")))?;
    let care_type = body
        .care_type
        .ok_or_else(|| missing_field_error(FieldName::new("type")))?;
    let date = body
        .date
        .ok_or_else(|| missing_field_error(FieldName::new("date")))?;

    Ok(CreateReminderRequest {
        owner_id: owner.id(),
        title: body.title.unwrap_or_default(),
        plant_name,
        care_type: parse_care_type(&care_type, FieldName::new("type"))?,
        due_at: parse_due_date(&date, FieldName::new("date"))?,
        recurrence: parse_recurrence(body.repeat.as_deref(), FieldName::new("repeat"))?,
    })
}

/// List the caller's reminders ordered by due date.
#[utoipa::path(
    get,
    path = "/api/reminders",
    responses(
        (status = 200, description = "Reminders, soonest first", body = Vec<ReminderSchema>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "listReminders"
)]
#[get("/reminders")]
pub async fn list_reminders(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<ReminderView>>> {
    let reminders = state.reminders_query.list_reminders(caller.id()).await?;
    Ok(web::Json(reminders))
}

/// Schedule a reminder owned by the caller.
#[utoipa::path(
    post,
    path = "/api/reminders",
    request_body = CreateReminderBody,
    responses(
        (status = 201, description = "Created reminder", body = ReminderSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "createReminder"
)]
#[post("/reminders")]
pub async fn create_reminder(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateReminderBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_body(caller, payload.into_inner())?;
    let reminder = state.reminders.create_reminder(request).await?;
    Ok(HttpResponse::Created().json(reminder))
}

/// Flip completion; completing a recurring reminder also schedules the next one.
#[utoipa::path(
    put,
    path = "/api/reminders/{id}/complete",
    params(("id" = String, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Updated reminder and optional successor", body = CompletionSchema),
        (status = 403, description = "Caller does not own the reminder", body = ErrorSchema),
        (status = 404, description = "Reminder not found", body = ErrorSchema),
        (status = 409, description = "Concurrent update", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "toggleReminderComplete"
)]
#[put("/reminders/{id}/complete")]
pub async fn toggle_complete(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompletionOutcome>> {
    let reminder_id: ReminderId = parse_id(&path, REMINDER_ID)?;
    let outcome = state
        .reminders
        .toggle_complete(reminder_id, caller.id())
        .await?;
    Ok(web::Json(outcome))
}

/// Delete one of the caller's reminders.
#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    params(("id" = String, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder deleted", body = MessageResponse),
        (status = 403, description = "Caller does not own the reminder", body = ErrorSchema),
        (status = 404, description = "Reminder not found", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "deleteReminder"
)]
#[delete("/reminders/{id}")]
pub async fn delete_reminder(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let reminder_id: ReminderId = parse_id(&path, REMINDER_ID)?;
    state
        .reminders
        .delete_reminder(reminder_id, caller.id())
        .await?;
    Ok(web::Json(MessageResponse::new("Reminder deleted")))
}
