//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Identity records mirrored from the identity service, including the
    /// redundant follow sets.
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        bio -> Text,
        profile_image_ref -> Nullable<Text>,
        interests -> Array<Text>,
        followers -> Array<Uuid>,
        following -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// SHA-256 fingerprints of issued bearer tokens.
    access_tokens (token_hash) {
        token_hash -> Text,
        user_id -> Uuid,
        created_at -> Timestamptz,
        expires_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Post aggregate roots; likes are stored inline as a UUID set.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        caption -> Text,
        image_ref -> Nullable<Text>,
        likes -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        revision -> Int4,
    }
}

diesel::table! {
    /// Comments owned by a post, ordered by `position`.
    post_comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        position -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reminders (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Text,
        plant_name -> Text,
        care_type -> Text,
        due_at -> Timestamptz,
        recurrence -> Text,
        completed -> Bool,
        created_at -> Timestamptz,
        revision -> Int4,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        kind -> Text,
        related_post_id -> Nullable<Uuid>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(post_comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    access_tokens,
    posts,
    post_comments,
    reminders,
    notifications,
);
