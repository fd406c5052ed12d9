use crate::app_state::AppState;
use crate::repositories::transaction_repository::TransactionRepository;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::PaymentStatus;
use reclaim_primitives::models::pagination::PageQuery;
use reclaim_primitives::models::transaction_dto::{
    TransactionFilter, TransactionResponse, TransactionsResponse,
};
use uuid::Uuid;

pub struct TransactionService;

impl TransactionService {
    pub async fn list_for_user(
        state: &AppState,
        user_id: Uuid,
        page: PageQuery,
    ) -> Result<TransactionsResponse, ApiError> {
        let (limit, offset) = page.limit_offset();
        let mut conn = state.db.get()?;
        let transactions = TransactionRepository::list_by_user(&mut conn, user_id, limit, offset)?;

        Ok(TransactionsResponse {
            transactions: transactions.into_iter().map(TransactionResponse::from).collect(),
            page: page.page(),
            per_page: limit,
        })
    }

    /// Other users' transactions are reported as missing.
    pub async fn get_for_user(
        state: &AppState,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<TransactionResponse, ApiError> {
        let mut conn = state.db.get()?;
        TransactionRepository::find_by_id_and_user(&mut conn, transaction_id, user_id)?
            .map(TransactionResponse::from)
            .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))
    }

    pub async fn list(
        state: &AppState,
        filter: TransactionFilter,
        page: PageQuery,
    ) -> Result<TransactionsResponse, ApiError> {
        let status = filter
            .status
            .as_deref()
            .map(PaymentStatus::parse)
            .transpose()?;
        let (limit, offset) = page.limit_offset();

        let mut conn = state.db.get()?;
        let transactions = TransactionRepository::list(
            &mut conn,
            filter.user_id,
            filter.merchant_id,
            status,
            limit,
            offset,
        )?;

        Ok(TransactionsResponse {
            transactions: transactions.into_iter().map(TransactionResponse::from).collect(),
            page: page.page(),
            per_page: limit,
        })
    }

    pub async fn get(state: &AppState, transaction_id: Uuid) -> Result<TransactionResponse, ApiError> {
        let mut conn = state.db.get()?;
        TransactionRepository::find_by_id(&mut conn, transaction_id)?
            .map(TransactionResponse::from)
            .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))
    }
}
