use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::partners)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub commission_bps: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::partners)]
pub struct NewPartner<'a> {
    pub name: &'a str,
    pub contact_email: Option<&'a str>,
    pub commission_bps: i32,
}

#[derive(Debug, Default, PartialEq, AsChangeset)]
#[diesel(table_name = crate::schema::partners)]
pub struct PartnerChangeset {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub commission_bps: Option<i32>,
    pub is_active: Option<bool>,
}
