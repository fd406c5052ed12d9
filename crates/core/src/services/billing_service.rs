use crate::app_state::AppState;
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::repositories::partner_repository::PartnerRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::services::audit_service::AuditService;
use crate::services::calculation_service::CalculationService;
use crate::services::maturation_service::MaturationService;
use crate::services::settings_service::SettingsService;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::cron_dto::BillingReport;
use reclaim_primitives::models::entities::invoice::{Invoice, NewInvoice};
use reclaim_primitives::models::invoice_dto::{
    InvoiceFilter, InvoicePaidResponse, InvoiceResponse, InvoicesResponse,
};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug)]
pub enum BillingOutcome {
    Invoiced(Invoice),
    AlreadyInvoiced,
    NothingToBill,
}

pub struct BillingService;

impl BillingService {
    /// The calendar month before `reference`, end exclusive.
    pub fn billing_period(reference: DateTime<Utc>) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let date = reference.date_naive();
        let (year, month) = if date.month() == 1 {
            (date.year() - 1, 12)
        } else {
            (date.year(), date.month() - 1)
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1);
        let end = NaiveDate::from_ymd_opt(date.year(), date.month(), 1);

        start
            .zip(end)
            .ok_or_else(|| ApiError::Internal("Invalid billing period".into()))
    }

    pub fn bill_merchant(
        conn: &mut PgConnection,
        merchant_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<BillingOutcome, ApiError> {
        // serializes concurrent runs for the same merchant
        let merchant = MerchantRepository::find_by_id_for_update(conn, merchant_id)?
            .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?;

        if InvoiceRepository::exists_for_period(conn, merchant.id, period_start)? {
            return Ok(BillingOutcome::AlreadyInvoiced);
        }

        let cutoff = period_end
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ApiError::Internal("Invalid billing period".into()))?
            .and_utc();

        let pending = TransactionRepository::find_unbilled_for_merchant(conn, merchant.id, cutoff)?;
        if pending.is_empty() {
            return Ok(BillingOutcome::NothingToBill);
        }

        let amount: i64 = pending.iter().map(|tx| tx.amount).sum();
        let ids: Vec<Uuid> = pending.iter().map(|tx| tx.id).collect();

        let commission_bps = match merchant.partner_id {
            Some(partner_id) => PartnerRepository::find_by_id(conn, partner_id)?
                .map(|p| p.commission_bps)
                .unwrap_or(0),
            None => 0,
        };

        let invoice = InvoiceRepository::create(
            conn,
            NewInvoice {
                merchant_id: merchant.id,
                partner_id: merchant.partner_id,
                period_start,
                period_end,
                amount,
                commission_amount: CalculationService::commission(amount, commission_bps),
                transaction_count: i32::try_from(ids.len())
                    .map_err(|_| ApiError::Internal("Too many transactions".into()))?,
            },
        )?;

        TransactionRepository::attach_to_invoice(conn, &ids, invoice.id)?;
        MerchantRepository::adjust_balance(conn, merchant.id, -amount)?;

        Ok(BillingOutcome::Invoiced(invoice))
    }

    pub async fn run_monthly(
        state: &AppState,
        reference: DateTime<Utc>,
    ) -> Result<BillingReport, ApiError> {
        let (period_start, period_end) = Self::billing_period(reference)?;
        let mut conn = state.db.get()?;
        let merchant_ids = MerchantRepository::list_billable_ids(&mut conn)?;

        let mut report = BillingReport {
            period_start: Some(period_start),
            period_end: Some(period_end),
            merchants_examined: merchant_ids.len(),
            ..Default::default()
        };

        for merchant_id in merchant_ids {
            let result = conn.transaction::<_, ApiError, _>(|conn| {
                Self::bill_merchant(conn, merchant_id, period_start, period_end)
            });

            match result {
                Ok(BillingOutcome::Invoiced(invoice)) => {
                    info!(
                        merchant_id = %merchant_id,
                        invoice_id = %invoice.id,
                        amount = invoice.amount,
                        transactions = invoice.transaction_count,
                        "Invoice created"
                    );
                    report.invoices_created += 1;
                    report.amount_invoiced += invoice.amount;
                    report.invoice_ids.push(invoice.id);
                }
                Ok(BillingOutcome::AlreadyInvoiced) => report.merchants_skipped += 1,
                Ok(BillingOutcome::NothingToBill) => {}
                Err(e) => {
                    error!(merchant_id = %merchant_id, error = %e, "Billing failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            period_start = %period_start,
            invoices = report.invoices_created,
            amount = report.amount_invoiced,
            skipped = report.merchants_skipped,
            failed = report.failed,
            "Monthly billing finished"
        );

        Ok(report)
    }

    /// Marks the invoice and its transactions paid, then matures whatever
    /// became due.
    pub async fn mark_invoice_paid(
        state: &AppState,
        admin_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<InvoicePaidResponse, ApiError> {
        let mut conn = state.db.get()?;
        let now = Utc::now();

        let (invoice, reconciled) = conn.transaction::<_, ApiError, _>(|conn| {
            let invoice = InvoiceRepository::find_by_id_for_update(conn, invoice_id)?
                .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))?;

            if invoice.paid {
                return Err(ApiError::Conflict("Invoice is already paid".into()));
            }

            let invoice = InvoiceRepository::mark_paid(conn, invoice.id, now)?;
            let paid_ids = TransactionRepository::mark_paid_by_invoice(conn, invoice.id)?;

            let settings = SettingsService::load(conn)?;
            for id in &paid_ids {
                MaturationService::advance(conn, *id, &settings, now)?;
            }

            Ok((invoice, paid_ids.len()))
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "invoice.paid",
            Some("invoice"),
            Some(&invoice.id.to_string()),
            serde_json::json!({ "amount": invoice.amount, "transactions": reconciled }),
        )
        .await;

        info!(invoice_id = %invoice.id, transactions = reconciled, "Invoice paid");

        Ok(InvoicePaidResponse {
            invoice: invoice.into(),
            transactions_reconciled: reconciled,
        })
    }

    pub async fn list(state: &AppState, filter: InvoiceFilter) -> Result<InvoicesResponse, ApiError> {
        let mut conn = state.db.get()?;
        let invoices = InvoiceRepository::list(&mut conn, filter.merchant_id, filter.paid)?;

        Ok(InvoicesResponse {
            invoices: invoices.into_iter().map(InvoiceResponse::from).collect(),
        })
    }

    pub async fn get(state: &AppState, invoice_id: Uuid) -> Result<InvoiceResponse, ApiError> {
        let mut conn = state.db.get()?;
        InvoiceRepository::find_by_id(&mut conn, invoice_id)?
            .map(InvoiceResponse::from)
            .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_is_previous_calendar_month() {
        let reference = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();
        assert_eq!(
            BillingService::billing_period(reference).unwrap(),
            (date(2026, 2, 1), date(2026, 3, 1))
        );

        let reference = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        assert_eq!(
            BillingService::billing_period(reference).unwrap(),
            (date(2026, 2, 1), date(2026, 3, 1))
        );
    }

    #[test]
    fn january_bills_december() {
        let reference = Utc.with_ymd_and_hms(2027, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            BillingService::billing_period(reference).unwrap(),
            (date(2026, 12, 1), date(2027, 1, 1))
        );
    }
}
