//! HTTP inbound adapter exposing the REST API under `/api`.

pub mod auth;
pub mod error;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod reminders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use crate::domain::ApiResult;

use actix_web::web;

/// Register every `/api` handler on `cfg`.
///
/// The caller mounts this inside `web::scope("/api")` and supplies
/// [`state::HttpState`] as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::edit_caption)
        .service(posts::delete_post)
        .service(posts::toggle_like)
        .service(posts::add_comment)
        .service(posts::delete_comment)
        .service(users::toggle_follow)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(reminders::list_reminders)
        .service(reminders::create_reminder)
        .service(reminders::toggle_complete)
        .service(reminders::delete_reminder)
        .service(notifications::list_notifications);
}
