use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::partner::{NewPartner, Partner, PartnerChangeset};
use reclaim_primitives::schema::partners;
use uuid::Uuid;

pub struct PartnerRepository;

impl PartnerRepository {
    pub fn create(conn: &mut PgConnection, new_partner: NewPartner) -> Result<Partner, ApiError> {
        diesel::insert_into(partners::table)
            .values(&new_partner)
            .get_result::<Partner>(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ApiError::Conflict("A partner with this name already exists".into()),
                other => ApiError::from(other),
            })
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Partner>, ApiError> {
        partners::table
            .find(id)
            .first::<Partner>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list(conn: &mut PgConnection) -> Result<Vec<Partner>, ApiError> {
        partners::table
            .order(partners::name.asc())
            .load::<Partner>(conn)
            .map_err(ApiError::from)
    }

    pub fn update(
        conn: &mut PgConnection,
        id: Uuid,
        changes: &PartnerChangeset,
    ) -> Result<Partner, ApiError> {
        diesel::update(partners::table.find(id))
            .set(changes)
            .get_result::<Partner>(conn)
            .map_err(ApiError::from)
    }
}
