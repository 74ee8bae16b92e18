//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Registered users. `email` is unique and stored lowercased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Varchar,
        pincode -> Varchar,
        address -> Nullable<Text>,
        city -> Nullable<Varchar>,
        state -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Content items. `author_id` cascades on user deletion.
    content_items (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Varchar,
        summary -> Varchar,
        document -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(content_items -> users (author_id));
diesel::allow_tables_to_appear_in_same_query!(content_items, users);
