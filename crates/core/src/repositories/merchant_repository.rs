use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::merchant::{Merchant, MerchantChangeset, NewMerchant};
use reclaim_primitives::schema::merchants;
use uuid::Uuid;

pub struct MerchantRepository;

impl MerchantRepository {
    pub fn create(conn: &mut PgConnection, new_merchant: NewMerchant) -> Result<Merchant, ApiError> {
        diesel::insert_into(merchants::table)
            .values(&new_merchant)
            .get_result::<Merchant>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Merchant>, ApiError> {
        merchants::table
            .find(id)
            .first::<Merchant>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Merchant>, ApiError> {
        merchants::table
            .find(id)
            .for_update()
            .first::<Merchant>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_active_by_api_key_hash(
        conn: &mut PgConnection,
        key_hash: &str,
    ) -> Result<Option<Merchant>, ApiError> {
        merchants::table
            .filter(merchants::api_key_hash.eq(key_hash))
            .filter(merchants::is_active.eq(true))
            .first::<Merchant>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list(conn: &mut PgConnection) -> Result<Vec<Merchant>, ApiError> {
        merchants::table
            .order(merchants::name.asc())
            .load::<Merchant>(conn)
            .map_err(ApiError::from)
    }

    pub fn list_billable_ids(conn: &mut PgConnection) -> Result<Vec<Uuid>, ApiError> {
        merchants::table
            .filter(merchants::is_active.eq(true))
            .filter(merchants::billing_enabled.eq(true))
            .select(merchants::id)
            .load::<Uuid>(conn)
            .map_err(ApiError::from)
    }

    pub fn update(
        conn: &mut PgConnection,
        id: Uuid,
        changes: &MerchantChangeset,
    ) -> Result<Merchant, ApiError> {
        diesel::update(merchants::table.find(id))
            .set(changes)
            .get_result::<Merchant>(conn)
            .map_err(ApiError::from)
    }

    pub fn set_api_key_hash(
        conn: &mut PgConnection,
        id: Uuid,
        key_hash: &str,
    ) -> Result<Merchant, ApiError> {
        diesel::update(merchants::table.find(id))
            .set(merchants::api_key_hash.eq(Some(key_hash)))
            .get_result::<Merchant>(conn)
            .map_err(ApiError::from)
    }

    pub fn adjust_balance(conn: &mut PgConnection, id: Uuid, delta: i64) -> Result<(), ApiError> {
        diesel::update(merchants::table.find(id))
            .set(merchants::balance.eq(merchants::balance + delta))
            .execute(conn)?;
        Ok(())
    }
}
