//! Tests for recording and listing notifications.

use std::collections::HashMap;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockNotificationRepository, MockUserRepository};
use crate::test_support::{fixture_clock, fixture_timestamp};

#[rstest]
#[case("follow", NotificationKind::Follow)]
#[case("like", NotificationKind::Like)]
#[case("comment", NotificationKind::Comment)]
fn kind_round_trips_through_wire_name(#[case] wire: &str, #[case] kind: NotificationKind) {
    assert_eq!(wire.parse::<NotificationKind>(), Ok(kind));
    assert_eq!(kind.to_string(), wire);
}

#[rstest]
#[tokio::test]
async fn record_stamps_unread_notification_with_clock_time() {
    let (sender, receiver) = (UserId::random(), UserId::random());
    let mut repo = MockNotificationRepository::new();
    repo.expect_insert().times(1).returning(|_| Ok(()));
    let recorder = NotificationRecorder::new(Arc::new(repo), fixture_clock());

    let recorded = recorder
        .record(NotificationKind::Follow, sender, receiver, None)
        .await
        .expect("recorded")
        .expect("not suppressed");

    assert_eq!(recorded.sender_id, sender);
    assert_eq!(recorded.receiver_id, receiver);
    assert!(!recorded.is_read);
    assert_eq!(recorded.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn self_notifications_are_suppressed() {
    let user = UserId::random();
    let mut repo = MockNotificationRepository::new();
    repo.expect_insert().never();
    let recorder = NotificationRecorder::new(Arc::new(repo), fixture_clock());

    let recorded = recorder
        .record(NotificationKind::Like, user, user, Some(PostId::random()))
        .await
        .expect("no error");

    assert!(recorded.is_none());
}

#[rstest]
#[tokio::test]
async fn best_effort_swallows_repository_failure() {
    let mut repo = MockNotificationRepository::new();
    repo.expect_insert()
        .times(1)
        .returning(|_| Err(NotificationRepositoryError::query("boom")));
    let recorder = NotificationRecorder::new(Arc::new(repo), fixture_clock());

    recorder
        .record_best_effort(
            NotificationKind::Comment,
            UserId::random(),
            UserId::random(),
            None,
        )
        .await;
}

#[rstest]
#[tokio::test]
async fn listing_joins_sender_projections() {
    let receiver = UserId::random();
    let sender = UserId::random();
    let stored = Notification {
        id: NotificationId::random(),
        sender_id: sender,
        receiver_id: receiver,
        kind: NotificationKind::Follow,
        related_post_id: None,
        is_read: false,
        created_at: fixture_timestamp(),
    };
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_list_for_receiver()
        .withf(move |id| *id == receiver)
        .returning(move |_| Ok(vec![stored.clone()]));
    let mut users = MockUserRepository::new();
    users.expect_find_projections().returning(move |ids| {
        Ok(ids
            .iter()
            .map(|id| {
                (
                    *id,
                    AuthorProjection {
                        id: *id,
                        name: "Bo".into(),
                        profile_image_ref: Some("bo.png".into()),
                    },
                )
            })
            .collect::<HashMap<_, _>>())
    });
    let service = NotificationService::new(Arc::new(notifications), Arc::new(users));

    let views = service.list_for_receiver(receiver).await.expect("listed");

    let view = views.first().expect("one notification");
    assert_eq!(view.kind, NotificationKind::Follow);
    assert_eq!(view.sender.as_ref().map(|s| s.name.as_str()), Some("Bo"));
}
