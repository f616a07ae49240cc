//! BSON document shapes and index definitions.

use bson::spec::BinarySubtype;
use bson::{Binary, DateTime, Document, doc, oid::ObjectId};
use mongodb::IndexModel;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

pub(super) const ACCOUNTS: &str = "accounts";
pub(super) const HOSTS: &str = "hosts";

/// Stored account. Field names follow the relational column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct AccountDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub password_hash: Binary,
    pub salt: Binary,
    pub token: String,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct HostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_name: Option<String>,
    pub created_at: DateTime,
}

pub(super) fn binary(bytes: &[u8]) -> Binary {
    Binary {
        subtype: BinarySubtype::Generic,
        bytes: bytes.to_vec(),
    }
}

fn unique(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(Some(
            IndexOptions::builder()
                .unique(true)
                .name(name.to_owned())
                .build(),
        ))
        .build()
}

/// Unique indexes backing the account uniqueness rules.
pub(super) fn account_indexes() -> Vec<IndexModel> {
    vec![
        unique(doc! { "username": 1 }, "accounts_username_key"),
        unique(doc! { "email": 1 }, "accounts_email_key"),
        unique(doc! { "token": 1 }, "accounts_token_key"),
    ]
}

pub(super) fn host_indexes() -> Vec<IndexModel> {
    vec![unique(
        doc! { "owner_id": 1, "hostname": 1 },
        "hosts_owner_hostname_key",
    )]
}
