use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::magic_link::{MagicLink, NewMagicLink};
use reclaim_primitives::schema::magic_links;

pub struct MagicLinkRepository;

impl MagicLinkRepository {
    pub fn create(conn: &mut PgConnection, new_link: NewMagicLink) -> Result<MagicLink, ApiError> {
        diesel::insert_into(magic_links::table)
            .values(&new_link)
            .get_result::<MagicLink>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_token_hash_for_update(
        conn: &mut PgConnection,
        token_hash: &str,
    ) -> Result<Option<MagicLink>, ApiError> {
        magic_links::table
            .filter(magic_links::token_hash.eq(token_hash))
            .for_update()
            .first::<MagicLink>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn mark_used(
        conn: &mut PgConnection,
        link: &MagicLink,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        diesel::update(magic_links::table.find(link.id))
            .set((magic_links::used.eq(true), magic_links::used_at.eq(Some(now))))
            .execute(conn)?;
        Ok(())
    }

    /// Removes links that can no longer be redeemed.
    pub fn delete_stale(conn: &mut PgConnection, now: DateTime<Utc>) -> Result<usize, ApiError> {
        diesel::delete(
            magic_links::table.filter(magic_links::expires_at.lt(now).or(magic_links::used.eq(true))),
        )
        .execute(conn)
        .map_err(ApiError::from)
    }
}
