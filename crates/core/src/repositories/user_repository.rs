use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::{CertificationStatus, UserRole};
use reclaim_primitives::models::entities::user::{NewUser, User};
use reclaim_primitives::schema::users;
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_id(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<User>, ApiError> {
        users::table
            .find(user_id)
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<User>, ApiError> {
        users::table
            .find(user_id)
            .for_update()
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_email(
        conn: &mut PgConnection,
        user_email: &str,
    ) -> Result<Option<User>, ApiError> {
        users::table
            .filter(users::email.eq(user_email))
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// Concurrent callers with the same email end up with the same row.
    pub fn find_or_create(
        conn: &mut PgConnection,
        user_email: &str,
        user_name: Option<&str>,
        role: UserRole,
    ) -> Result<User, ApiError> {
        if let Some(user) = Self::find_by_email(conn, user_email)? {
            return Ok(user);
        }

        diesel::insert_into(users::table)
            .values(&NewUser {
                email: user_email,
                name: user_name,
                role,
            })
            .on_conflict(users::email)
            .do_nothing()
            .execute(conn)?;

        users::table
            .filter(users::email.eq(user_email))
            .first::<User>(conn)
            .map_err(ApiError::from)
    }

    pub fn list(conn: &mut PgConnection, limit: i64, offset: i64) -> Result<Vec<User>, ApiError> {
        users::table
            .order(users::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load::<User>(conn)
            .map_err(ApiError::from)
    }

    /// Signed deltas; reversals pass negative values.
    pub fn apply_contribution(
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: i64,
        impact: i64,
        matured: i64,
    ) -> Result<(), ApiError> {
        diesel::update(users::table.find(user_id))
            .set((
                users::total_contributed.eq(users::total_contributed + amount),
                users::total_impact.eq(users::total_impact + impact),
                users::matured_impact.eq(users::matured_impact + matured),
            ))
            .execute(conn)?;
        Ok(())
    }

    pub fn add_matured_impact(
        conn: &mut PgConnection,
        user_id: Uuid,
        delta: i64,
    ) -> Result<(), ApiError> {
        diesel::update(users::table.find(user_id))
            .set(users::matured_impact.eq(users::matured_impact + delta))
            .execute(conn)?;
        Ok(())
    }

    /// Returns true when this call performed the upgrade.
    pub fn certify_if_eligible(
        conn: &mut PgConnection,
        user_id: Uuid,
        threshold: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let updated = diesel::update(
            users::table
                .find(user_id)
                .filter(users::certification_status.eq(CertificationStatus::Uncertified))
                .filter(users::matured_impact.ge(threshold)),
        )
        .set((
            users::certification_status.eq(CertificationStatus::Certified),
            users::certified_at.eq(Some(now)),
        ))
        .execute(conn)?;

        Ok(updated == 1)
    }

    pub fn list_certified(
        conn: &mut PgConnection,
        include_exported: bool,
    ) -> Result<Vec<User>, ApiError> {
        let mut query = users::table
            .filter(users::certification_status.eq(CertificationStatus::Certified))
            .into_boxed();

        if !include_exported {
            query = query.filter(users::corsair_exported_at.is_null());
        }

        query
            .order(users::certified_at.asc())
            .load::<User>(conn)
            .map_err(ApiError::from)
    }

    pub fn mark_exported(
        conn: &mut PgConnection,
        user_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<usize, ApiError> {
        diesel::update(users::table.filter(users::id.eq_any(user_ids)))
            .set(users::corsair_exported_at.eq(Some(now)))
            .execute(conn)
            .map_err(ApiError::from)
    }
}
