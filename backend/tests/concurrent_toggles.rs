//! Concurrent toggles through the wired services never lose an update.

mod support;

use std::collections::BTreeSet;

use rstest::{fixture, rstest};

use greencare::domain::UserId;
use greencare::domain::ports::CreatePostRequest;

use support::{Account, Harness};

const FANS: usize = 64;

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn register_fans(harness: &Harness) -> Vec<Account> {
    (0..FANS)
        .map(|i| harness.register(&format!("Fan{i}")))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_likes_are_all_kept(harness: Harness) {
    let author = harness.register("Ada");
    let fans = register_fans(&harness);
    let state = harness.state();
    let post = state
        .posts
        .create_post(CreatePostRequest {
            author_id: author.id,
            caption: "Hello plants".into(),
            image_ref: None,
        })
        .await
        .expect("post created");

    let tasks: Vec<_> = fans
        .iter()
        .map(|fan| {
            let state = state.clone();
            let (post_id, fan_id) = (post.id, fan.id);
            tokio::spawn(async move { state.posts.toggle_like(post_id, fan_id).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("task joined").expect("like applied");
    }

    let feed = state.posts_query.list_posts().await.expect("feed listed");
    let stored = feed.first().expect("post listed");
    let likes: BTreeSet<UserId> = stored.likes.iter().copied().collect();
    let expected: BTreeSet<UserId> = fans.iter().map(|fan| fan.id).collect();
    assert_eq!(likes.len(), FANS);
    assert_eq!(likes, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_follows_keep_both_sets_symmetric(harness: Harness) {
    let star = harness.register("Star");
    let fans = register_fans(&harness);
    let state = harness.state();

    // Every fan follows the star while the star follows every fan back.
    let mut tasks = Vec::with_capacity(FANS * 2);
    for fan in &fans {
        for (actor, target) in [(fan.id, star.id), (star.id, fan.id)] {
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                state.relationships.toggle_follow(actor, target).await
            }));
        }
    }
    for task in tasks {
        let outcome = task.await.expect("task joined").expect("follow applied");
        assert!(outcome.following);
    }

    let everyone: BTreeSet<UserId> = fans.iter().map(|fan| fan.id).collect();
    let star_profile = harness.profile(&star);
    assert_eq!(star_profile.followers, everyone);
    assert_eq!(star_profile.following, everyone);
    for fan in &fans {
        let profile = harness.profile(fan);
        assert_eq!(profile.followers, BTreeSet::from([star.id]));
        assert_eq!(profile.following, BTreeSet::from([star.id]));
    }
}
