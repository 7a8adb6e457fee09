//! Follow graph and profile behaviour through the HTTP API.

mod support;

use std::collections::BTreeSet;

use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

use support::Harness;

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[rstest]
#[actix_web::test]
async fn follow_updates_both_sides(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");

    let reply = harness
        .post(&ada, &format!("/api/users/follow/{}", bea.id), None)
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "message": "Followed", "following": true }));
    assert_eq!(harness.profile(&ada).following, BTreeSet::from([bea.id]));
    assert_eq!(harness.profile(&bea).followers, BTreeSet::from([ada.id]));
    assert!(harness.profile(&ada).followers.is_empty());
}

#[rstest]
#[actix_web::test]
async fn mutual_follow_is_symmetric(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");

    harness
        .post(&ada, &format!("/api/users/follow/{}", bea.id), None)
        .await;
    harness
        .post(&bea, &format!("/api/users/follow/{}", ada.id), None)
        .await;

    let (a, b) = (harness.profile(&ada), harness.profile(&bea));
    assert_eq!(a.following, BTreeSet::from([bea.id]));
    assert_eq!(a.followers, BTreeSet::from([bea.id]));
    assert_eq!(b.following, BTreeSet::from([ada.id]));
    assert_eq!(b.followers, BTreeSet::from([ada.id]));
}

#[rstest]
#[actix_web::test]
async fn second_toggle_unfollows(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");
    let uri = format!("/api/users/follow/{}", bea.id);

    harness.post(&ada, &uri, None).await;
    let reply = harness.post(&ada, &uri, None).await;

    assert_eq!(reply.body["message"], "Unfollowed");
    assert!(harness.profile(&ada).following.is_empty());
    assert!(harness.profile(&bea).followers.is_empty());
}

#[rstest]
#[actix_web::test]
async fn self_follow_is_rejected_without_changes(harness: Harness) {
    let ada = harness.register("Ada");
    let before = harness.profile(&ada);

    let reply = harness
        .post(&ada, &format!("/api/users/follow/{}", ada.id), None)
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    assert_eq!(harness.profile(&ada), before);
}

#[rstest]
#[actix_web::test]
async fn following_an_unknown_user_is_not_found(harness: Harness) {
    let ada = harness.register("Ada");

    let reply = harness
        .post(
            &ada,
            &format!("/api/users/follow/{}", greencare::domain::UserId::random()),
            None,
        )
        .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(harness.profile(&ada).following.is_empty());
}

#[rstest]
#[actix_web::test]
async fn follow_notifies_the_target(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");

    harness
        .post(&ada, &format!("/api/users/follow/{}", bea.id), None)
        .await;

    let inbox = harness.get(&bea, "/api/notifications").await;
    assert_eq!(inbox.body[0]["kind"], "follow");
    assert_eq!(inbox.body[0]["sender"]["name"], "Ada");
    assert!(inbox.body[0]["relatedPostId"].is_null());
}

#[rstest]
#[actix_web::test]
async fn profile_edits_are_owner_only(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");
    let uri = format!("/api/users/{}", ada.id);

    let denied = harness
        .put(&bea, &uri, Some(json!({ "bio": "not mine" })))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let updated = harness
        .put(
            &ada,
            &uri,
            Some(json!({ "bio": "Fern collector", "interests": ["ferns", "moss"] })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["bio"], "Fern collector");
    assert_eq!(updated.body["interests"], json!(["ferns", "moss"]));
    assert_eq!(updated.body["email"], "ada@example.com");

    let seen_by_bea = harness.get(&bea, &uri).await;
    assert_eq!(seen_by_bea.body["bio"], "Fern collector");
    assert!(seen_by_bea.body.get("email").is_none());
}
