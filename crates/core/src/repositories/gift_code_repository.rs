use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::GiftCodeStatus;
use reclaim_primitives::models::entities::gift_code::{GiftCode, NewGiftCode};
use reclaim_primitives::schema::gift_codes;
use uuid::Uuid;

pub struct GiftCodeRepository;

impl GiftCodeRepository {
    pub fn create_many(
        conn: &mut PgConnection,
        codes: &[NewGiftCode],
    ) -> Result<Vec<GiftCode>, ApiError> {
        diesel::insert_into(gift_codes::table)
            .values(codes)
            .get_results::<GiftCode>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_code_for_update(
        conn: &mut PgConnection,
        code: &str,
    ) -> Result<Option<GiftCode>, ApiError> {
        gift_codes::table
            .filter(gift_codes::code.eq(code))
            .for_update()
            .first::<GiftCode>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<GiftCode>, ApiError> {
        gift_codes::table
            .find(id)
            .for_update()
            .first::<GiftCode>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list(
        conn: &mut PgConnection,
        status: Option<GiftCodeStatus>,
    ) -> Result<Vec<GiftCode>, ApiError> {
        let mut query = gift_codes::table.into_boxed();

        if let Some(status) = status {
            query = query.filter(gift_codes::status.eq(status));
        }

        query
            .order(gift_codes::created_at.desc())
            .load::<GiftCode>(conn)
            .map_err(ApiError::from)
    }

    pub fn mark_used(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<GiftCode, ApiError> {
        diesel::update(gift_codes::table.find(id))
            .set((
                gift_codes::status.eq(GiftCodeStatus::Used),
                gift_codes::redeemed_by.eq(Some(user_id)),
                gift_codes::redeemed_at.eq(Some(now)),
            ))
            .get_result::<GiftCode>(conn)
            .map_err(ApiError::from)
    }

    pub fn deactivate(conn: &mut PgConnection, id: Uuid) -> Result<GiftCode, ApiError> {
        diesel::update(gift_codes::table.find(id))
            .set(gift_codes::status.eq(GiftCodeStatus::Deactivated))
            .get_result::<GiftCode>(conn)
            .map_err(ApiError::from)
    }
}
