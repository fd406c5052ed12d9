use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::merchants)]
#[diesel(belongs_to(crate::models::entities::partner::Partner))]
pub struct Merchant {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub partner_id: Option<Uuid>,
    pub multiplier_bps: Option<i32>,
    pub balance: i64,
    pub billing_enabled: bool,
    #[serde(skip_serializing)]
    pub api_key_hash: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::merchants)]
pub struct NewMerchant<'a> {
    pub name: &'a str,
    pub contact_email: Option<&'a str>,
    pub partner_id: Option<Uuid>,
    pub multiplier_bps: Option<i32>,
    pub billing_enabled: bool,
    pub api_key_hash: Option<&'a str>,
}

/// `Some(None)` clears a nullable column.
#[derive(Debug, Default, PartialEq, AsChangeset)]
#[diesel(table_name = crate::schema::merchants)]
pub struct MerchantChangeset {
    pub name: Option<String>,
    pub contact_email: Option<Option<String>>,
    pub partner_id: Option<Option<Uuid>>,
    pub multiplier_bps: Option<Option<i32>>,
    pub billing_enabled: Option<bool>,
    pub is_active: Option<bool>,
}
