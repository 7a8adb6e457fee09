//! Reminder ledger behaviour through the HTTP API.

mod support;

use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{Account, Harness};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

async fn schedule(harness: &Harness, owner: &Account, date: &str, repeat: &str) -> Value {
    let reply = harness
        .post(
            owner,
            "/api/reminders",
            Some(json!({
                "title": "Soak",
                "plantName": "Monstera",
                "type": "watering",
                "date": date,
                "repeat": repeat,
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.body);
    reply.body
}

#[rstest]
#[actix_web::test]
async fn completing_a_weekly_reminder_schedules_the_next_week(harness: Harness) {
    let ada = harness.register("Ada");
    let reminder = schedule(&harness, &ada, "2024-01-01", "weekly").await;
    let id = reminder["id"].as_str().expect("id");

    let done = harness
        .put(&ada, &format!("/api/reminders/{id}/complete"), None)
        .await;

    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["reminder"]["completed"], true);
    let successor = &done.body["successor"];
    assert_eq!(successor["date"], "2024-01-08T00:00:00Z");
    assert_eq!(successor["completed"], false);
    assert_eq!(successor["repeat"], "weekly");
    assert_eq!(successor["plantName"], "Monstera");

    let listed = harness.get(&ada, "/api/reminders").await;
    let dates: Vec<_> = listed
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["date"].clone())
        .collect();
    assert_eq!(dates, vec![json!("2024-01-01T00:00:00Z"), json!("2024-01-08T00:00:00Z")]);
}

#[rstest]
#[actix_web::test]
async fn reopening_does_not_spawn_another_successor(harness: Harness) {
    let ada = harness.register("Ada");
    let reminder = schedule(&harness, &ada, "2024-01-01", "daily").await;
    let uri = format!(
        "/api/reminders/{}/complete",
        reminder["id"].as_str().expect("id")
    );

    harness.put(&ada, &uri, None).await;
    let reopened = harness.put(&ada, &uri, None).await;

    assert_eq!(reopened.body["reminder"]["completed"], false);
    assert!(reopened.body.get("successor").is_none());
    let listed = harness.get(&ada, "/api/reminders").await;
    assert_eq!(listed.body.as_array().expect("array").len(), 2);
}

#[rstest]
#[actix_web::test]
async fn one_off_reminders_have_no_successor(harness: Harness) {
    let ada = harness.register("Ada");
    let reminder = schedule(&harness, &ada, "2024-01-10T09:30:00Z", "none").await;
    assert_eq!(reminder["overdue"], false);

    let done = harness
        .put(
            &ada,
            &format!(
                "/api/reminders/{}/complete",
                reminder["id"].as_str().expect("id")
            ),
            None,
        )
        .await;

    assert!(done.body.get("successor").is_none());
}

#[rstest]
#[actix_web::test]
async fn past_open_reminders_are_overdue(harness: Harness) {
    let ada = harness.register("Ada");
    schedule(&harness, &ada, "2024-01-01", "none").await;

    let listed = harness.get(&ada, "/api/reminders").await;

    assert_eq!(listed.body[0]["overdue"], true);
}

#[rstest]
#[actix_web::test]
async fn reminders_are_private_to_their_owner(harness: Harness) {
    let ada = harness.register("Ada");
    let bea = harness.register("Bea");
    let reminder = schedule(&harness, &ada, "2024-01-01", "weekly").await;
    let id = reminder["id"].as_str().expect("id");

    let listed = harness.get(&bea, "/api/reminders").await;
    assert_eq!(listed.body, json!([]));

    let toggle = harness
        .put(&bea, &format!("/api/reminders/{id}/complete"), None)
        .await;
    assert_eq!(toggle.status, StatusCode::FORBIDDEN);

    let delete = harness.delete(&bea, &format!("/api/reminders/{id}")).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let own_delete = harness.delete(&ada, &format!("/api/reminders/{id}")).await;
    assert_eq!(own_delete.body, json!({ "message": "Reminder deleted" }));
    assert_eq!(harness.get(&ada, "/api/reminders").await.body, json!([]));
}

#[rstest]
#[case(json!({ "plantName": "Fern", "type": "misting", "date": "2024-01-01" }), "type")]
#[case(json!({ "plantName": "Fern", "type": "watering", "date": "soon" }), "date")]
#[case(json!({ "plantName": "Fern", "type": "watering", "date": "2024-01-01", "repeat": "yearly" }), "repeat")]
#[case(json!({ "type": "watering", "date": "2024-01-01" }), "plantName")]
#[actix_web::test]
async fn invalid_reminder_fields_are_named(
    harness: Harness,
    #[case] body: Value,
    #[case] field: &str,
) {
    let ada = harness.register("Ada");

    let reply = harness.post(&ada, "/api/reminders", Some(body)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], field);
}
