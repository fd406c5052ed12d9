use crate::config::swagger_config::ApiDoc;
use crate::handlers::admin::{
    contributions::record_contribution,
    cron::{run_daily, run_monthly},
    exports::{export_corsair_batch, export_corsair_user},
    gift_codes::{create_gift_codes, deactivate_gift_code, list_gift_codes},
    invoices::{get_invoice, list_invoices, pay_invoice},
    merchants::{create_merchant, get_merchant, list_merchants, rotate_merchant_key, update_merchant},
    partners::{create_partner, get_partner, list_partners, update_partner},
    settings::{list_settings, update_setting},
    transactions::{fail_transaction, get_transaction, list_transactions},
    users::{get_user, list_users},
};
use crate::handlers::{
    auth::{request_magic_link, verify_magic_link},
    gift_codes::redeem_gift_code,
    health::health_check,
    impact::quote_impact,
    me::{current_user, my_impact, my_transaction, my_transactions},
    merchant::{merchant_contribution, merchant_profile},
};
use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use reclaim_core::{AppState, SecurityConfig};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new().route(
        "/metrics",
        get(move || async move { metric_handle.render() }),
    );

    let mut router = Router::new()
        .merge(create_public_routers())
        .merge(create_user_routers(&state))
        .merge(create_merchant_routers(&state))
        .merge(create_admin_routers(&state))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024)) // 2MB limit
        .layer(middleware::from_fn(https_redirect_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http()),
        )
        .layer(metric_layer);

    // the peer-ip key extractor needs connect info, which test servers lack
    if std::env::var("APP_ENV").unwrap_or_default() != "test" {
        // 2 requests per second, bursts of 10
        match GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
        {
            Some(conf) => router = router.layer(GovernorLayer::new(Arc::new(conf))),
            None => warn!("Invalid rate limit configuration, rate limiting disabled"),
        }
    }

    router.merge(metrics_router).with_state(state)
}

fn create_public_routers() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health_check))
        .route("/api/auth/magic-link", post(request_magic_link))
        .route("/api/auth/magic-link/verify", post(verify_magic_link))
        .route("/api/impact/quote", get(quote_impact))
}

fn create_user_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(current_user))
        .route("/api/me/impact", get(my_impact))
        .route("/api/me/transactions", get(my_transactions))
        .route("/api/me/transactions/{transaction_id}", get(my_transaction))
        .route("/api/gift-codes/redeem", post(redeem_gift_code))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_merchant_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/merchant/me", get(merchant_profile))
        .route("/api/merchant/contributions", post(merchant_contribution))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::merchant_key_middleware,
        ))
}

fn create_admin_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/contributions", post(record_contribution))
        .route("/api/admin/transactions", get(list_transactions))
        .route("/api/admin/transactions/{transaction_id}", get(get_transaction))
        .route(
            "/api/admin/transactions/{transaction_id}/fail",
            post(fail_transaction),
        )
        .route(
            "/api/admin/partners",
            get(list_partners).post(create_partner),
        )
        .route(
            "/api/admin/partners/{partner_id}",
            get(get_partner).patch(update_partner),
        )
        .route(
            "/api/admin/merchants",
            get(list_merchants).post(create_merchant),
        )
        .route(
            "/api/admin/merchants/{merchant_id}",
            get(get_merchant).patch(update_merchant),
        )
        .route(
            "/api/admin/merchants/{merchant_id}/rotate-key",
            post(rotate_merchant_key),
        )
        .route("/api/admin/invoices", get(list_invoices))
        .route("/api/admin/invoices/{invoice_id}", get(get_invoice))
        .route("/api/admin/invoices/{invoice_id}/pay", post(pay_invoice))
        .route(
            "/api/admin/gift-codes",
            get(list_gift_codes).post(create_gift_codes),
        )
        .route(
            "/api/admin/gift-codes/{gift_code_id}/deactivate",
            post(deactivate_gift_code),
        )
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{user_id}", get(get_user))
        .route("/api/admin/users/{user_id}/export", get(export_corsair_user))
        .route("/api/admin/exports/corsair", get(export_corsair_batch))
        .route("/api/admin/settings", get(list_settings))
        .route("/api/admin/settings/{key}", put(update_setting))
        .route("/api/admin/cron/daily", post(run_daily))
        .route("/api/admin/cron/monthly", post(run_monthly))
        // layers run outermost-last: auth populates claims before the role check
        .route_layer(middleware::from_fn(SecurityConfig::admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

async fn https_redirect_middleware(
    req: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    if env == "production" {
        let headers = req.headers();
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok());

        if let Some("http") = proto {
            let host = headers
                .get("host")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");

            let path_and_query = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("");
            let redirect_url = format!("https://{}{}", host, path_and_query);

            return axum::response::Redirect::permanent(&redirect_url).into_response();
        }
    }

    next.run(req).await
}
