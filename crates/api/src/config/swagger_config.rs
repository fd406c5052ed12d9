use crate::handlers::admin::{
    contributions::__path_record_contribution,
    cron::{__path_run_daily, __path_run_monthly},
    exports::{__path_export_corsair_batch, __path_export_corsair_user},
    gift_codes::{__path_create_gift_codes, __path_deactivate_gift_code, __path_list_gift_codes},
    invoices::{__path_get_invoice, __path_list_invoices, __path_pay_invoice},
    merchants::{
        __path_create_merchant, __path_get_merchant, __path_list_merchants,
        __path_rotate_merchant_key, __path_update_merchant,
    },
    partners::{
        __path_create_partner, __path_get_partner, __path_list_partners, __path_update_partner,
    },
    settings::{__path_list_settings, __path_update_setting},
    transactions::{__path_fail_transaction, __path_get_transaction, __path_list_transactions},
    users::{__path_get_user, __path_list_users},
};
use crate::handlers::{
    auth::{__path_request_magic_link, __path_verify_magic_link},
    gift_codes::__path_redeem_gift_code,
    health::__path_health_check,
    impact::__path_quote_impact,
    me::{__path_current_user, __path_my_impact, __path_my_transaction, __path_my_transactions},
    merchant::{__path_merchant_contribution, __path_merchant_profile},
};
use reclaim_core::security::API_KEY_HEADER;
use reclaim_primitives::error::ApiErrorResponse;
use reclaim_primitives::models::entities::enum_types::{
    CertificationStatus, GiftCodeStatus, PaymentMode, PaymentStatus, UserRole,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "Reclaim API", description = "Plastic-impact contribution ledger"),
    paths(
        health_check, request_magic_link, verify_magic_link, quote_impact,
        current_user, my_impact, my_transactions, my_transaction, redeem_gift_code,
        merchant_contribution, merchant_profile,
        record_contribution, list_transactions, get_transaction, fail_transaction,
        create_partner, list_partners, get_partner, update_partner,
        create_merchant, list_merchants, get_merchant, update_merchant, rotate_merchant_key,
        list_invoices, get_invoice, pay_invoice,
        create_gift_codes, list_gift_codes, deactivate_gift_code,
        list_users, get_user, export_corsair_user, export_corsair_batch,
        list_settings, update_setting, run_daily, run_monthly
    ),
    components(schemas(
        ApiErrorResponse, PaymentMode, PaymentStatus, GiftCodeStatus,
        CertificationStatus, UserRole
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Magic-link sign in"),
        (name = "Impact", description = "Impact quotes"),
        (name = "Me", description = "The signed-in user's impact and history"),
        (name = "Gift codes", description = "Gift code redemption"),
        (name = "Merchant", description = "Merchant API, authenticated by API key"),
        (name = "Admin", description = "Back-office management"),
        (name = "Cron", description = "Scheduled jobs, triggerable by admins")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.security_schemes.insert(
                "merchantApiKey".to_string(),
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_security_schemes() {
        let doc = ApiDoc::openapi();
        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("bearerAuth"));
        assert!(schemes.contains_key("merchantApiKey"));
    }

    #[test]
    fn documents_admin_and_merchant_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/admin/cron/monthly",
            "/api/admin/invoices/{invoice_id}/pay",
            "/api/merchant/contributions",
            "/api/auth/magic-link/verify",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
