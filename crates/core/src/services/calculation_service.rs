use chrono::{DateTime, TimeDelta, Utc};
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::impact_dto::MaturationBreakdown;

pub const BPS_SCALE: i64 = 10_000;
pub const MINOR_PER_MAJOR: i64 = 100;
pub const FINAL_STAGE: i16 = 3;
/// Upper bound for either maturation delay, about ten years.
pub const MAX_STAGE_DAYS: i64 = 3_650;

const INSTANT_PERCENT: i64 = 5;
const FIRST_STAGE_PERCENT: i64 = 45;

/// Vesting delays, counted from the transaction's confirmation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaturationSchedule {
    pub first_stage_days: i64,
    pub final_stage_days: i64,
}

impl Default for MaturationSchedule {
    fn default() -> Self {
        Self {
            first_stage_days: 30,
            final_stage_days: 90,
        }
    }
}

impl MaturationSchedule {
    pub fn first_due(&self, confirmed_at: DateTime<Utc>) -> Result<DateTime<Utc>, ApiError> {
        Self::due(confirmed_at, self.first_stage_days)
    }

    pub fn final_due(&self, confirmed_at: DateTime<Utc>) -> Result<DateTime<Utc>, ApiError> {
        Self::due(confirmed_at, self.final_stage_days)
    }

    fn due(confirmed_at: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, ApiError> {
        TimeDelta::try_days(days)
            .and_then(|delay| confirmed_at.checked_add_signed(delay))
            .ok_or_else(|| {
                ApiError::Internal(format!("Maturation delay of {} days is out of range", days))
            })
    }
}

pub struct CalculationService;

impl CalculationService {
    /// Transaction override, then merchant, then the global default, then 1.0x.
    pub fn resolve_multiplier(
        override_bps: Option<i32>,
        merchant_bps: Option<i32>,
        default_bps: Option<i32>,
    ) -> Result<i32, ApiError> {
        if let Some(bps) = override_bps {
            if bps <= 0 {
                return Err(ApiError::BadRequest(
                    "multiplier_bps must be positive".into(),
                ));
            }
            return Ok(bps);
        }

        Ok([merchant_bps, default_bps]
            .into_iter()
            .flatten()
            .find(|bps| *bps > 0)
            .unwrap_or(BPS_SCALE as i32))
    }

    pub fn amount_to_impact(
        amount: i64,
        multiplier_bps: i32,
        grams_per_unit: i64,
    ) -> Result<i64, ApiError> {
        if amount < 0 || multiplier_bps < 0 || grams_per_unit < 0 {
            return Err(ApiError::BadRequest(
                "Impact inputs must not be negative".into(),
            ));
        }

        let too_large = || ApiError::BadRequest("Amount is too large".into());

        let scaled = (amount as i128)
            .checked_mul(grams_per_unit as i128)
            .and_then(|v| v.checked_mul(multiplier_bps as i128))
            .ok_or_else(too_large)?;

        i64::try_from(scaled / (MINOR_PER_MAJOR * BPS_SCALE) as i128).map_err(|_| too_large())
    }

    /// Smallest amount whose impact reaches `impact`.
    pub fn impact_to_amount(
        impact: i64,
        multiplier_bps: i32,
        grams_per_unit: i64,
    ) -> Result<i64, ApiError> {
        if impact < 0 {
            return Err(ApiError::BadRequest("Impact must not be negative".into()));
        }
        if multiplier_bps <= 0 || grams_per_unit <= 0 {
            return Err(ApiError::BadRequest(
                "Multiplier and grams per unit must be positive".into(),
            ));
        }

        let numerator = (impact as i128) * ((MINOR_PER_MAJOR * BPS_SCALE) as i128);
        let denominator = (grams_per_unit as i128) * (multiplier_bps as i128);
        let amount = (numerator + denominator - 1) / denominator;

        i64::try_from(amount).map_err(|_| ApiError::BadRequest("Impact is too large".into()))
    }

    pub fn split_impact(impact: i64) -> (i64, i64, i64) {
        // each share is at most `impact`, so narrowing back cannot truncate
        let share = |percent: i64| ((impact as i128) * (percent as i128) / 100) as i64;
        let instant = share(INSTANT_PERCENT);
        let first = share(FIRST_STAGE_PERCENT);
        (instant, first, impact - instant - first)
    }

    pub fn maturation_breakdown(
        impact: i64,
        confirmed_at: DateTime<Utc>,
        paid: bool,
        now: DateTime<Utc>,
        schedule: &MaturationSchedule,
    ) -> Result<MaturationBreakdown, ApiError> {
        let (instant, first_stage, final_stage) = Self::split_impact(impact);
        let first_due = schedule.first_due(confirmed_at)?;
        let final_due = schedule.final_due(confirmed_at)?;

        let (matured, stage, next_maturation_at) = if now < confirmed_at {
            (0, 0, Some(confirmed_at))
        } else if now < first_due {
            (instant, 1, Some(first_due))
        } else if !paid || now < final_due {
            // unpaid past final_due waits for the invoice, not the clock
            let next = (now < final_due).then_some(final_due);
            (instant + first_stage, 2, next)
        } else {
            (impact, FINAL_STAGE, None)
        };

        Ok(MaturationBreakdown {
            instant,
            first_stage,
            final_stage,
            matured,
            pending: impact - matured,
            stage,
            next_maturation_at,
        })
    }

    pub fn commission(amount: i64, commission_bps: i32) -> i64 {
        let bps = commission_bps.clamp(0, BPS_SCALE as i32) as i128;
        ((amount as i128) * bps / (BPS_SCALE as i128)) as i64
    }

    /// `value * part / whole`, floored. Zero when `whole` is not positive.
    pub fn prorate(value: i64, part: i64, whole: i64) -> i64 {
        if whole <= 0 || part <= 0 {
            return 0;
        }
        let part = part.min(whole);
        ((value as i128) * (part as i128) / (whole as i128)) as i64
    }
}
