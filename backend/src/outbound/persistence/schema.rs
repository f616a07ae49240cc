//! Diesel table definitions. Must match `migrations/`.

diesel::table! {
    accounts (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Bytea,
        salt -> Bytea,
        token -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    hosts (id) {
        id -> Int8,
        owner_id -> Int8,
        hostname -> Varchar,
        operating_system_name -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(hosts -> accounts (owner_id));
diesel::allow_tables_to_appear_in_same_query!(accounts, hosts);
