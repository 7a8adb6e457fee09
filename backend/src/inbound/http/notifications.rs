//! Notification feed for the authenticated user.

use actix_web::{get, web};

use crate::domain::NotificationView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, NotificationSchema};
use crate::inbound::http::state::HttpState;

/// List notifications addressed to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = Vec<NotificationSchema>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<NotificationView>>> {
    let notifications = state.notifications.list_for_receiver(caller.id()).await?;
    Ok(web::Json(notifications))
}
