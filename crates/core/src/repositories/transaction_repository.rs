use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::{PaymentMode, PaymentStatus};
use reclaim_primitives::models::entities::transaction::{NewTransaction, Transaction};
use reclaim_primitives::schema::transactions;
use uuid::Uuid;

pub struct TransactionRepository;

impl TransactionRepository {
    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Transaction>, ApiError> {
        transactions::table
            .find(id)
            .first::<Transaction>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Transaction>, ApiError> {
        transactions::table
            .find(id)
            .for_update()
            .first::<Transaction>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_and_user(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::id.eq(id))
            .filter(transactions::user_id.eq(user_id))
            .first::<Transaction>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_idempotency_key(
        conn: &mut PgConnection,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::idempotency_key.eq(key))
            .first::<Transaction>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// `None` when the idempotency key already exists for this user.
    pub fn create(
        conn: &mut PgConnection,
        new_tx: NewTransaction,
    ) -> Result<Option<Transaction>, ApiError> {
        diesel::insert_into(transactions::table)
            .values(&new_tx)
            .on_conflict((transactions::user_id, transactions::idempotency_key))
            .do_nothing()
            .get_result::<Transaction>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load::<Transaction>(conn)
            .map_err(ApiError::from)
    }

    pub fn list_live_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::payment_status.ne(PaymentStatus::Failed))
            .order(transactions::created_at.desc())
            .load::<Transaction>(conn)
            .map_err(ApiError::from)
    }

    pub fn list(
        conn: &mut PgConnection,
        user_id: Option<Uuid>,
        merchant_id: Option<Uuid>,
        status: Option<PaymentStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ApiError> {
        let mut query = transactions::table.into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(transactions::user_id.eq(user_id));
        }
        if let Some(merchant_id) = merchant_id {
            query = query.filter(transactions::merchant_id.eq(merchant_id));
        }
        if let Some(status) = status {
            query = query.filter(transactions::payment_status.eq(status));
        }

        query
            .order(transactions::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load::<Transaction>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_due_for_maturation(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ApiError> {
        transactions::table
            .filter(transactions::maturation_stage.lt(3i16))
            .filter(transactions::payment_status.ne(PaymentStatus::Failed))
            .filter(transactions::next_maturation_at.le(now))
            .order(transactions::next_maturation_at.asc())
            .select(transactions::id)
            .load::<Uuid>(conn)
            .map_err(ApiError::from)
    }

    pub fn update_maturation(
        conn: &mut PgConnection,
        id: Uuid,
        matured_impact: i64,
        stage: i16,
        next_maturation_at: Option<DateTime<Utc>>,
    ) -> Result<(), ApiError> {
        diesel::update(transactions::table.find(id))
            .set((
                transactions::matured_impact.eq(matured_impact),
                transactions::maturation_stage.eq(stage),
                transactions::next_maturation_at.eq(next_maturation_at),
            ))
            .execute(conn)?;
        Ok(())
    }

    /// Pending merchant transactions not yet attached to an invoice.
    pub fn find_unbilled_for_merchant(
        conn: &mut PgConnection,
        merchant_id: Uuid,
        created_before: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, ApiError> {
        transactions::table
            .filter(transactions::merchant_id.eq(merchant_id))
            .filter(transactions::payment_mode.eq(PaymentMode::Merchant))
            .filter(transactions::payment_status.eq(PaymentStatus::Pending))
            .filter(transactions::invoice_id.is_null())
            .filter(transactions::created_at.lt(created_before))
            .order(transactions::created_at.asc())
            .for_update()
            .load::<Transaction>(conn)
            .map_err(ApiError::from)
    }

    pub fn attach_to_invoice(
        conn: &mut PgConnection,
        ids: &[Uuid],
        invoice_id: Uuid,
    ) -> Result<usize, ApiError> {
        diesel::update(transactions::table.filter(transactions::id.eq_any(ids)))
            .set(transactions::invoice_id.eq(Some(invoice_id)))
            .execute(conn)
            .map_err(ApiError::from)
    }

    /// Returns the ids that moved from pending to paid.
    pub fn mark_paid_by_invoice(
        conn: &mut PgConnection,
        invoice_id: Uuid,
    ) -> Result<Vec<Uuid>, ApiError> {
        diesel::update(
            transactions::table
                .filter(transactions::invoice_id.eq(invoice_id))
                .filter(transactions::payment_status.eq(PaymentStatus::Pending)),
        )
        .set(transactions::payment_status.eq(PaymentStatus::Paid))
        .returning(transactions::id)
        .get_results::<Uuid>(conn)
        .map_err(ApiError::from)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<(), ApiError> {
        diesel::update(transactions::table.find(id))
            .set((
                transactions::payment_status.eq(status),
                transactions::next_maturation_at.eq(None::<DateTime<Utc>>),
            ))
            .execute(conn)?;
        Ok(())
    }
}
