use crate::app_state::AppState;
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_service::AuditService;
use crate::services::calculation_service::CalculationService;
use crate::services::settings_service::{ImpactSettings, SettingsService};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::{PaymentMode, PaymentStatus, UserRole};
use reclaim_primitives::models::entities::merchant::Merchant;
use reclaim_primitives::models::entities::transaction::{NewTransaction, Transaction};
use reclaim_primitives::models::entities::user::User;
use reclaim_primitives::models::impact_dto::{QuoteQuery, QuoteResponse};
use reclaim_primitives::models::transaction_dto::{
    MerchantContributionRequest, RecordContributionRequest, TransactionResponse,
};
use reclaim_primitives::utility::{mask_email, normalize_email};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Everything needed to book one contribution for an existing user.
pub struct ContributionInput<'a> {
    pub user: &'a User,
    pub amount: i64,
    pub merchant: Option<&'a Merchant>,
    pub multiplier_override: Option<i32>,
    pub payment_mode: PaymentMode,
    pub gift_code_id: Option<Uuid>,
    pub idempotency_key: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug)]
pub struct ContributionOutcome {
    pub transaction: Transaction,
    /// False when the idempotency key was replayed
    pub created: bool,
    pub certified: bool,
}

pub struct ContributionService;

impl ContributionService {
    /// Books a contribution on an open connection. Callers own the
    /// surrounding database transaction.
    pub fn apply(
        conn: &mut PgConnection,
        settings: &ImpactSettings,
        input: ContributionInput<'_>,
        now: DateTime<Utc>,
    ) -> Result<ContributionOutcome, ApiError> {
        let user_id = input.user.id;

        if let Some(existing) =
            TransactionRepository::find_by_idempotency_key(conn, user_id, input.idempotency_key)?
        {
            return Self::replay(existing, &input);
        }

        if input.amount <= 0 {
            return Err(ApiError::BadRequest("amount must be positive".into()));
        }

        if let Some(merchant) = input.merchant {
            if !merchant.is_active {
                return Err(ApiError::BadRequest("Merchant is inactive".into()));
            }
        } else if input.payment_mode == PaymentMode::Merchant {
            return Err(ApiError::BadRequest(
                "merchant payments require a merchant".into(),
            ));
        }

        let multiplier_bps = CalculationService::resolve_multiplier(
            input.multiplier_override,
            input.merchant.and_then(|m| m.multiplier_bps),
            Some(settings.default_multiplier_bps),
        )?;
        let impact =
            CalculationService::amount_to_impact(input.amount, multiplier_bps, settings.grams_per_unit)?;

        let billed_merchant = input
            .merchant
            .filter(|m| input.payment_mode == PaymentMode::Merchant && m.billing_enabled);

        let payment_status = if billed_merchant.is_some() {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Paid
        };

        let breakdown = CalculationService::maturation_breakdown(
            impact,
            now,
            payment_status == PaymentStatus::Paid,
            now,
            &settings.schedule(),
        )?;

        let created = TransactionRepository::create(
            conn,
            NewTransaction {
                user_id,
                merchant_id: input.merchant.map(|m| m.id),
                partner_id: input.merchant.and_then(|m| m.partner_id),
                gift_code_id: input.gift_code_id,
                amount: input.amount,
                impact,
                multiplier_bps,
                payment_mode: input.payment_mode,
                payment_status,
                matured_impact: breakdown.matured,
                maturation_stage: breakdown.stage,
                next_maturation_at: breakdown.next_maturation_at,
                idempotency_key: input.idempotency_key,
                description: input.description,
                created_at: now,
            },
        )?;

        let Some(transaction) = created else {
            // lost an insert race on the same key
            let existing =
                TransactionRepository::find_by_idempotency_key(conn, user_id, input.idempotency_key)?
                    .ok_or_else(|| ApiError::Internal("Idempotent transaction vanished".into()))?;
            return Self::replay(existing, &input);
        };

        UserRepository::apply_contribution(
            conn,
            user_id,
            transaction.amount,
            transaction.impact,
            transaction.matured_impact,
        )?;

        if let Some(merchant) = billed_merchant {
            MerchantRepository::adjust_balance(conn, merchant.id, transaction.amount)?;
        }

        let certified = UserRepository::certify_if_eligible(
            conn,
            user_id,
            settings.certification_threshold_grams,
            now,
        )?;

        Ok(ContributionOutcome {
            transaction,
            created: true,
            certified,
        })
    }

    /// A key replays only for the merchant, mode and gift code that booked it.
    fn replay(
        existing: Transaction,
        input: &ContributionInput<'_>,
    ) -> Result<ContributionOutcome, ApiError> {
        let same_source = existing.merchant_id == input.merchant.map(|m| m.id)
            && existing.payment_mode == input.payment_mode
            && existing.gift_code_id == input.gift_code_id;

        if !same_source {
            return Err(ApiError::Conflict(format!(
                "Idempotency key {} is already used by another contribution for this user",
                input.idempotency_key
            )));
        }

        Ok(ContributionOutcome {
            transaction: existing,
            created: false,
            certified: false,
        })
    }

    pub async fn record(
        state: &AppState,
        admin_id: Uuid,
        req: RecordContributionRequest,
    ) -> Result<ContributionOutcome, ApiError> {
        req.validate()?;

        let payment_mode = req.payment_mode.unwrap_or(PaymentMode::Direct);
        if payment_mode == PaymentMode::GiftCode {
            return Err(ApiError::BadRequest(
                "gift code contributions are created by redeeming a code".into(),
            ));
        }

        let email = normalize_email(&req.user_email);
        let role = Self::role_for(state, &email);
        let mut conn = state.db.get()?;
        let now = Utc::now();

        let outcome = conn.transaction::<_, ApiError, _>(|conn| {
            let settings = SettingsService::load(conn)?;
            let user = UserRepository::find_or_create(conn, &email, req.user_name.as_deref(), role)?;

            let merchant = match req.merchant_id {
                Some(id) => Some(
                    MerchantRepository::find_by_id(conn, id)?
                        .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?,
                ),
                None => None,
            };

            Self::apply(
                conn,
                &settings,
                ContributionInput {
                    user: &user,
                    amount: req.amount,
                    merchant: merchant.as_ref(),
                    multiplier_override: req.multiplier_bps,
                    payment_mode,
                    gift_code_id: None,
                    idempotency_key: &req.idempotency_key,
                    description: req.description.as_deref(),
                },
                now,
            )
        })?;

        if outcome.created {
            AuditService::log_event(
                state,
                Some(admin_id),
                "contribution.record",
                Some("transaction"),
                Some(&outcome.transaction.id.to_string()),
                serde_json::json!({
                    "user_email": email,
                    "amount": outcome.transaction.amount,
                    "impact": outcome.transaction.impact,
                }),
            )
            .await;
        }

        Self::log_outcome(&outcome, &email);
        Ok(outcome)
    }

    pub async fn record_for_merchant(
        state: &AppState,
        merchant: &Merchant,
        req: MerchantContributionRequest,
    ) -> Result<ContributionOutcome, ApiError> {
        req.validate()?;

        let email = normalize_email(&req.customer_email);
        let role = Self::role_for(state, &email);
        let mut conn = state.db.get()?;
        let now = Utc::now();

        let outcome = conn.transaction::<_, ApiError, _>(|conn| {
            let settings = SettingsService::load(conn)?;
            let user =
                UserRepository::find_or_create(conn, &email, req.customer_name.as_deref(), role)?;
            // pick up changes made since the key was checked
            let merchant = MerchantRepository::find_by_id(conn, merchant.id)?
                .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?;

            Self::apply(
                conn,
                &settings,
                ContributionInput {
                    user: &user,
                    amount: req.amount,
                    merchant: Some(&merchant),
                    multiplier_override: None,
                    payment_mode: PaymentMode::Merchant,
                    gift_code_id: None,
                    idempotency_key: &req.idempotency_key,
                    description: req.description.as_deref(),
                },
                now,
            )
        })?;

        Self::log_outcome(&outcome, &email);
        Ok(outcome)
    }

    pub async fn quote(state: &AppState, query: QuoteQuery) -> Result<QuoteResponse, ApiError> {
        if query.amount <= 0 {
            return Err(ApiError::BadRequest("amount must be positive".into()));
        }

        let mut conn = state.db.get()?;
        let settings = SettingsService::load(&mut conn)?;

        let merchant_bps = match query.merchant_id {
            Some(id) => {
                MerchantRepository::find_by_id(&mut conn, id)?
                    .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?
                    .multiplier_bps
            }
            None => None,
        };

        let multiplier_bps = CalculationService::resolve_multiplier(
            None,
            merchant_bps,
            Some(settings.default_multiplier_bps),
        )?;
        let impact =
            CalculationService::amount_to_impact(query.amount, multiplier_bps, settings.grams_per_unit)?;

        Ok(QuoteResponse {
            amount: query.amount,
            currency: state.config.currency.clone(),
            impact,
            multiplier_bps,
            grams_per_unit: settings.grams_per_unit,
        })
    }

    /// Reverses a contribution and takes it off its unpaid invoice.
    /// Certification already granted stays.
    pub async fn fail_transaction(
        state: &AppState,
        admin_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<TransactionResponse, ApiError> {
        let mut conn = state.db.get()?;

        let failed = conn.transaction::<_, ApiError, _>(|conn| {
            let not_found = || ApiError::NotFound("Transaction not found".into());

            // lock order matches billing: merchant, then invoice, then transaction
            let peek = TransactionRepository::find_by_id(conn, transaction_id)?
                .ok_or_else(not_found)?;
            if let Some(merchant_id) = peek.merchant_id {
                MerchantRepository::find_by_id_for_update(conn, merchant_id)?;
            }

            let invoice_id = TransactionRepository::find_by_id(conn, transaction_id)?
                .ok_or_else(not_found)?
                .invoice_id;
            let invoice = match invoice_id {
                Some(id) => InvoiceRepository::find_by_id_for_update(conn, id)?,
                None => None,
            };

            let tx = TransactionRepository::find_by_id_for_update(conn, transaction_id)?
                .ok_or_else(not_found)?;

            if !tx.payment_status.is_live() {
                return Err(ApiError::Conflict(format!(
                    "Transaction is already {}",
                    tx.payment_status
                )));
            }

            if let Some(invoice) = invoice {
                if invoice.paid {
                    return Err(ApiError::Conflict(format!(
                        "Transaction is settled on paid invoice {}",
                        invoice.id
                    )));
                }
                let remaining = invoice.amount - tx.amount;
                let commission = CalculationService::prorate(
                    invoice.commission_amount,
                    remaining,
                    invoice.amount,
                );
                InvoiceRepository::remove_transaction(conn, invoice.id, tx.amount, commission)?;
            }

            UserRepository::apply_contribution(
                conn,
                tx.user_id,
                -tx.amount,
                -tx.impact,
                -tx.matured_impact,
            )?;

            let in_balance = tx.payment_mode == PaymentMode::Merchant
                && tx.payment_status == PaymentStatus::Pending
                && tx.invoice_id.is_none();

            if let (true, Some(merchant_id)) = (in_balance, tx.merchant_id) {
                MerchantRepository::adjust_balance(conn, merchant_id, -tx.amount)?;
            }

            TransactionRepository::update_status(conn, tx.id, PaymentStatus::Failed)?;

            TransactionRepository::find_by_id(conn, tx.id)?
                .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "transaction.fail",
            Some("transaction"),
            Some(&failed.id.to_string()),
            serde_json::json!({ "amount": failed.amount, "impact": failed.impact }),
        )
        .await;

        warn!(transaction_id = %failed.id, user_id = %failed.user_id, "Transaction marked failed");

        Ok(failed.into())
    }

    fn role_for(state: &AppState, email: &str) -> UserRole {
        if state.config.is_admin_email(email) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }

    fn log_outcome(outcome: &ContributionOutcome, email: &str) {
        let tx = &outcome.transaction;
        if outcome.created {
            info!(
                transaction_id = %tx.id,
                user = %mask_email(email),
                amount = tx.amount,
                impact = tx.impact,
                status = %tx.payment_status,
                certified = outcome.certified,
                "Contribution recorded"
            );
        } else {
            info!(transaction_id = %tx.id, "Idempotent replay, returning existing transaction");
        }
    }
}
