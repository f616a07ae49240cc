//! Insertable rows. Internal to the relational adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{accounts, hosts};

#[derive(Debug, Insertable)]
#[diesel(table_name = accounts)]
pub(super) struct NewAccountRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a [u8],
    pub salt: &'a [u8],
    pub token: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = hosts)]
pub(super) struct NewHostRow<'a> {
    pub owner_id: i64,
    pub hostname: &'a str,
    pub operating_system_name: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
