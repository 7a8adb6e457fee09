//! Tests for the follow toggle.

use std::sync::Mutex;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockNotificationRepository, MockUserRepository, UserRepositoryError};
use crate::domain::ErrorCode;
use crate::test_support::{fixture_clock, fixture_timestamp};

fn user(name: &str) -> UserProfile {
    UserProfile::new(
        UserId::random(),
        name,
        format!("{name}@example.com"),
        fixture_timestamp(),
    )
}

/// A user repository mock backed by a shared table, so applied changes are
/// visible to later lookups.
fn table_backed(users: Vec<UserProfile>) -> (MockUserRepository, Arc<Mutex<Vec<UserProfile>>>) {
    let table = Arc::new(Mutex::new(users));
    let mut repo = MockUserRepository::new();
    let read = Arc::clone(&table);
    repo.expect_find_by_id().returning(move |id| {
        Ok(read
            .lock()
            .expect("table lock")
            .iter()
            .find(|u| u.id == *id)
            .cloned())
    });
    let write = Arc::clone(&table);
    repo.expect_apply_follow_change().returning(move |change| {
        for profile in write.lock().expect("table lock").iter_mut() {
            profile.apply_follow_change(change);
        }
        Ok(())
    });
    (repo, table)
}

fn service(
    users: MockUserRepository,
    notifications: MockNotificationRepository,
) -> RelationshipService<MockUserRepository, MockNotificationRepository> {
    RelationshipService::new(
        Arc::new(users),
        NotificationRecorder::new(Arc::new(notifications), fixture_clock()),
        Arc::new(EntityLocks::new()),
    )
}

fn quiet_notifications() -> MockNotificationRepository {
    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().returning(|_| Ok(()));
    notifications
}

fn snapshot(table: &Mutex<Vec<UserProfile>>, id: UserId) -> UserProfile {
    table
        .lock()
        .expect("table lock")
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .expect("user present")
}

#[rstest]
fn between_derives_direction_from_following_set() {
    let mut actor = user("ada");
    let target = user("bo");
    assert_eq!(
        FollowChange::between(&actor, &target).map(|c| c.direction),
        Ok(FollowDirection::Follow)
    );
    actor.following.insert(target.id);
    assert_eq!(
        FollowChange::between(&actor, &target).map(|c| c.direction),
        Ok(FollowDirection::Unfollow)
    );
}

#[rstest]
fn between_rejects_self() {
    let actor = user("ada");
    assert_eq!(
        FollowChange::between(&actor, &actor),
        Err(RelationshipError::SelfFollow)
    );
}

#[rstest]
#[tokio::test]
async fn mutual_follow_is_symmetric() {
    let (a, b) = (user("ada"), user("bo"));
    let (a_id, b_id) = (a.id, b.id);
    let (repo, table) = table_backed(vec![a, b]);
    let service = service(repo, quiet_notifications());

    let first = service.toggle_follow(a_id, b_id).await.expect("a follows b");
    let second = service.toggle_follow(b_id, a_id).await.expect("b follows a");

    assert!(first.following && second.following);
    let (a, b) = (snapshot(&table, a_id), snapshot(&table, b_id));
    assert_eq!(a.following.iter().copied().collect::<Vec<_>>(), vec![b_id]);
    assert_eq!(a.followers.iter().copied().collect::<Vec<_>>(), vec![b_id]);
    assert_eq!(b.following.iter().copied().collect::<Vec<_>>(), vec![a_id]);
    assert_eq!(b.followers.iter().copied().collect::<Vec<_>>(), vec![a_id]);
}

#[rstest]
#[tokio::test]
async fn second_toggle_unfollows_both_sides() {
    let (a, b) = (user("ada"), user("bo"));
    let (a_id, b_id) = (a.id, b.id);
    let (repo, table) = table_backed(vec![a, b]);
    let service = service(repo, quiet_notifications());

    service.toggle_follow(a_id, b_id).await.expect("follow");
    let outcome = service.toggle_follow(a_id, b_id).await.expect("unfollow");

    assert!(!outcome.following);
    assert!(snapshot(&table, a_id).following.is_empty());
    assert!(snapshot(&table, b_id).followers.is_empty());
}

#[rstest]
#[tokio::test]
async fn self_follow_is_rejected_before_any_lookup() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();
    users.expect_apply_follow_change().never();
    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().never();
    let id = UserId::random();

    let err = service(users, notifications)
        .toggle_follow(id, id)
        .await
        .expect_err("self-follow");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn unknown_target_is_not_found() {
    let a = user("ada");
    let a_id = a.id;
    let (repo, _table) = table_backed(vec![a]);

    let err = service(repo, quiet_notifications())
        .toggle_follow(a_id, UserId::random())
        .await
        .expect_err("missing target");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn failed_dual_write_is_reported_and_not_notified() {
    let (a, b) = (user("ada"), user("bo"));
    let (a_id, b_id) = (a.id, b.id);
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(move |id| {
        Ok([a.clone(), b.clone()].into_iter().find(|u| u.id == *id))
    });
    users
        .expect_apply_follow_change()
        .times(1)
        .returning(|_| Err(UserRepositoryError::connection("lost")));
    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().never();

    let err = service(users, notifications)
        .toggle_follow(a_id, b_id)
        .await
        .expect_err("storage failure surfaces");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn follow_notifies_target_but_unfollow_does_not() {
    let (a, b) = (user("ada"), user("bo"));
    let (a_id, b_id) = (a.id, b.id);
    let (repo, _table) = table_backed(vec![a, b]);
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_insert()
        .withf(move |n| {
            n.kind == NotificationKind::Follow && n.sender_id == a_id && n.receiver_id == b_id
        })
        .times(1)
        .returning(|_| Ok(()));
    let service = service(repo, notifications);

    service.toggle_follow(a_id, b_id).await.expect("follow");
    service.toggle_follow(a_id, b_id).await.expect("unfollow");
}
