//! Builders wiring domain services over the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use greencare::domain::ports::{
    NotificationRepository, PostRepository, ReminderRepository, TokenVerifier, UserRepository,
};
use greencare::domain::{
    EntityLocks, NotificationRecorder, NotificationService, PostService, ProfileService,
    RelationshipService, ReminderService,
};
use greencare::inbound::http::state::HttpState;
use greencare::outbound::memory::MemoryStore;
use greencare::outbound::persistence::{
    DbPool, DieselNotificationRepository, DieselPostRepository, DieselReminderRepository,
    DieselTokenVerifier, DieselUserRepository,
};

/// Where the driven ports are backed.
#[derive(Clone)]
pub enum StoreBackend {
    /// PostgreSQL through the shared pool.
    Postgres(DbPool),
    /// Process-local store; state is lost on restart.
    Memory(Arc<MemoryStore>),
}

/// One adapter per driven port.
struct Repositories<U, P, R, N, T> {
    users: Arc<U>,
    posts: Arc<P>,
    reminders: Arc<R>,
    notifications: Arc<N>,
    tokens: Arc<T>,
}

fn wire<U, P, R, N, T>(
    repos: Repositories<U, P, R, N, T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
    R: ReminderRepository + 'static,
    N: NotificationRepository + 'static,
    T: TokenVerifier + 'static,
{
    let Repositories {
        users,
        posts,
        reminders,
        notifications,
        tokens,
    } = repos;
    // One registry so post, user and reminder guards share a keyspace.
    let locks = Arc::new(EntityLocks::new());
    let recorder = NotificationRecorder::new(Arc::clone(&notifications), Arc::clone(&clock));

    let post_service = Arc::new(PostService::new(
        posts,
        Arc::clone(&users),
        recorder.clone(),
        Arc::clone(&locks),
        Arc::clone(&clock),
    ));
    let relationship_service = Arc::new(RelationshipService::new(
        Arc::clone(&users),
        recorder,
        Arc::clone(&locks),
    ));
    let reminder_service = Arc::new(ReminderService::new(reminders, locks, clock));
    let notification_service = Arc::new(NotificationService::new(
        notifications,
        Arc::clone(&users),
    ));
    let profile_service = Arc::new(ProfileService::new(users));

    HttpState {
        tokens,
        posts: post_service.clone(),
        posts_query: post_service,
        relationships: relationship_service,
        reminders: reminder_service.clone(),
        reminders_query: reminder_service,
        notifications: notification_service,
        profiles: profile_service.clone(),
        profiles_query: profile_service,
    }
}

/// Build the HTTP state with the system clock.
pub fn build_http_state(backend: &StoreBackend) -> web::Data<HttpState> {
    build_http_state_with_clock(backend, Arc::new(DefaultClock))
}

/// Build the HTTP state with an explicit clock, for deterministic tests.
pub fn build_http_state_with_clock(
    backend: &StoreBackend,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let state = match backend {
        StoreBackend::Postgres(pool) => wire(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool.clone())),
                reminders: Arc::new(DieselReminderRepository::new(pool.clone())),
                notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
                tokens: Arc::new(DieselTokenVerifier::new(pool.clone())),
            },
            clock,
        ),
        StoreBackend::Memory(store) => wire(
            Repositories {
                users: Arc::clone(store),
                posts: Arc::clone(store),
                reminders: Arc::clone(store),
                notifications: Arc::clone(store),
                tokens: Arc::clone(store),
            },
            clock,
        ),
    };
    web::Data::new(state)
}
