use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::invoice::{Invoice, NewInvoice};
use reclaim_primitives::schema::invoices;
use uuid::Uuid;

pub struct InvoiceRepository;

impl InvoiceRepository {
    pub fn create(conn: &mut PgConnection, new_invoice: NewInvoice) -> Result<Invoice, ApiError> {
        diesel::insert_into(invoices::table)
            .values(&new_invoice)
            .get_result::<Invoice>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Invoice>, ApiError> {
        invoices::table
            .find(id)
            .first::<Invoice>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Invoice>, ApiError> {
        invoices::table
            .find(id)
            .for_update()
            .first::<Invoice>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn exists_for_period(
        conn: &mut PgConnection,
        merchant_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<bool, ApiError> {
        diesel::select(diesel::dsl::exists(
            invoices::table
                .filter(invoices::merchant_id.eq(merchant_id))
                .filter(invoices::period_start.eq(period_start)),
        ))
        .get_result::<bool>(conn)
        .map_err(ApiError::from)
    }

    pub fn list(
        conn: &mut PgConnection,
        merchant_id: Option<Uuid>,
        paid: Option<bool>,
    ) -> Result<Vec<Invoice>, ApiError> {
        let mut query = invoices::table.into_boxed();

        if let Some(merchant_id) = merchant_id {
            query = query.filter(invoices::merchant_id.eq(merchant_id));
        }
        if let Some(paid) = paid {
            query = query.filter(invoices::paid.eq(paid));
        }

        query
            .order((invoices::period_start.desc(), invoices::created_at.desc()))
            .load::<Invoice>(conn)
            .map_err(ApiError::from)
    }

    pub fn remove_transaction(
        conn: &mut PgConnection,
        id: Uuid,
        amount: i64,
        commission_amount: i64,
    ) -> Result<Invoice, ApiError> {
        diesel::update(invoices::table.find(id))
            .set((
                invoices::amount.eq(invoices::amount - amount),
                invoices::commission_amount.eq(commission_amount),
                invoices::transaction_count.eq(invoices::transaction_count - 1),
            ))
            .get_result::<Invoice>(conn)
            .map_err(ApiError::from)
    }

    pub fn mark_paid(
        conn: &mut PgConnection,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Invoice, ApiError> {
        diesel::update(invoices::table.find(id))
            .set((invoices::paid.eq(true), invoices::paid_at.eq(Some(now))))
            .get_result::<Invoice>(conn)
            .map_err(ApiError::from)
    }
}
