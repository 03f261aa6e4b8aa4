//! Payment API handlers
//!
//! Full settlement, split-payment plans and the mobile-money checkout
//! flow. Errors carry the reason in the body so the operator UI can
//! choose the right retry strategy.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    parse_settlement_method, CheckoutDto, CheckoutStatusDto, ConfirmOutcomeDto,
    CreateSplitRequest, InitiateMpesaRequest, PayPartRequest, PaymentDto, PaymentFilter,
    QrMpesaRequest, SetPartAmountRequest, SetPartCountRequest, SettlePaymentRequest,
    SettleSessionRequest, SplitPlanDto,
};
use crate::application::ports::CheckoutStatus;
use crate::application::services::{ConfirmOutcome, PaymentReconciler};
use crate::interfaces::http::common::{
    fail, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};

/// Payment handler state
#[derive(Clone)]
pub struct PaymentAppState {
    pub reconciler: Arc<PaymentReconciler>,
}

// ── Queries ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    params(PaymentFilter, PaginationParams),
    responses(
        (status = 200, description = "Payment list", body = PaginatedResponse<PaymentDto>)
    )
)]
pub async fn list_payments(
    State(state): State<PaymentAppState>,
    Query(filter): Query<PaymentFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.reconciler.list().await {
        Ok(payments) => {
            let filtered: Vec<PaymentDto> = payments
                .into_iter()
                .filter(|p| {
                    if let Some(session_id) = filter.session_id {
                        if p.session_id != Some(session_id) {
                            return false;
                        }
                    }
                    if let Some(ref status) = filter.status {
                        if !status.eq_ignore_ascii_case(p.status.as_str()) {
                            return false;
                        }
                    }
                    if let Some(ref method) = filter.method {
                        if !method.eq_ignore_ascii_case(p.method.as_str()) {
                            return false;
                        }
                    }
                    true
                })
                .map(PaymentDto::from_domain)
                .collect();
            Ok(Json(PaginatedResponse::paginate(filtered, &pagination)))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<PaymentDto>>)> {
    match state.reconciler.get(id).await {
        Ok(payment) => Ok(Json(ApiResponse::success(PaymentDto::from_domain(payment)))),
        Err(e) => Err(fail(e)),
    }
}

// ── Settlement ─────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/settle",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = SettlePaymentRequest,
    responses(
        (status = 200, description = "Payment settled", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already settled")
    )
)]
pub async fn settle_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<SettlePaymentRequest>,
) -> Result<Json<ApiResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<PaymentDto>>)> {
    let method = parse_settlement_method(&body.method).map_err(fail)?;
    match state
        .reconciler
        .settle(id, method, body.customer_id, body.reference)
        .await
    {
        Ok(payment) => Ok(Json(ApiResponse::success(PaymentDto::from_domain(payment)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/sessions/{session_id}/settle",
    tag = "Payments",
    params(("session_id" = i32, Path, description = "Session ID")),
    request_body = SettleSessionRequest,
    responses(
        (status = 200, description = "Session charge settled in full", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Session not found")
    )
)]
pub async fn settle_session(
    State(state): State<PaymentAppState>,
    Path(session_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<SettleSessionRequest>,
) -> Result<Json<ApiResponse<PaymentDto>>, (StatusCode, Json<ApiResponse<PaymentDto>>)> {
    let method = parse_settlement_method(&body.method).map_err(fail)?;
    match state
        .reconciler
        .settle_session(session_id, method, body.amount, body.customer_id)
        .await
    {
        Ok(payment) => Ok(Json(ApiResponse::success(PaymentDto::from_domain(payment)))),
        Err(e) => Err(fail(e)),
    }
}

// ── Split plans ────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/payments/splits",
    tag = "Payments",
    request_body = CreateSplitRequest,
    responses(
        (status = 201, description = "Split plan created", body = ApiResponse<SplitPlanDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_split(
    State(state): State<PaymentAppState>,
    ValidatedJson(body): ValidatedJson<CreateSplitRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<SplitPlanDto>>),
    (StatusCode, Json<ApiResponse<SplitPlanDto>>),
> {
    match state
        .reconciler
        .create_split(body.session_id, body.total, body.parts)
        .await
    {
        Ok(plan) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(SplitPlanDto::from_domain(plan))),
        )),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/splits/{plan_id}",
    tag = "Payments",
    params(("plan_id" = String, Path, description = "Split plan ID")),
    responses(
        (status = 200, description = "Split plan", body = ApiResponse<SplitPlanDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_split(
    State(state): State<PaymentAppState>,
    Path(plan_id): Path<String>,
) -> Result<Json<ApiResponse<SplitPlanDto>>, (StatusCode, Json<ApiResponse<SplitPlanDto>>)> {
    match state.reconciler.get_split(&plan_id) {
        Ok(plan) => Ok(Json(ApiResponse::success(SplitPlanDto::from_domain(plan)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/splits/{plan_id}/parts",
    tag = "Payments",
    params(("plan_id" = String, Path, description = "Split plan ID")),
    request_body = SetPartCountRequest,
    responses(
        (status = 200, description = "Plan resized, unpaid parts respread", body = ApiResponse<SplitPlanDto>)
    )
)]
pub async fn set_part_count(
    State(state): State<PaymentAppState>,
    Path(plan_id): Path<String>,
    ValidatedJson(body): ValidatedJson<SetPartCountRequest>,
) -> Result<Json<ApiResponse<SplitPlanDto>>, (StatusCode, Json<ApiResponse<SplitPlanDto>>)> {
    match state.reconciler.set_split_part_count(&plan_id, body.count) {
        Ok(plan) => Ok(Json(ApiResponse::success(SplitPlanDto::from_domain(plan)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/payments/splits/{plan_id}/parts/{index}",
    tag = "Payments",
    params(
        ("plan_id" = String, Path, description = "Split plan ID"),
        ("index" = usize, Path, description = "Part index")
    ),
    responses(
        (status = 200, description = "Part removed, remainder respread", body = ApiResponse<SplitPlanDto>),
        (status = 409, description = "Part already paid")
    )
)]
pub async fn remove_part(
    State(state): State<PaymentAppState>,
    Path((plan_id, index)): Path<(String, usize)>,
) -> Result<Json<ApiResponse<SplitPlanDto>>, (StatusCode, Json<ApiResponse<SplitPlanDto>>)> {
    match state.reconciler.remove_split_part(&plan_id, index) {
        Ok(plan) => Ok(Json(ApiResponse::success(SplitPlanDto::from_domain(plan)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/splits/{plan_id}/parts/{index}",
    tag = "Payments",
    params(
        ("plan_id" = String, Path, description = "Split plan ID"),
        ("index" = usize, Path, description = "Part index")
    ),
    request_body = SetPartAmountRequest,
    responses(
        (status = 200, description = "Part amount set; imbalance is surfaced, not rejected", body = ApiResponse<SplitPlanDto>)
    )
)]
pub async fn set_part_amount(
    State(state): State<PaymentAppState>,
    Path((plan_id, index)): Path<(String, usize)>,
    ValidatedJson(body): ValidatedJson<SetPartAmountRequest>,
) -> Result<Json<ApiResponse<SplitPlanDto>>, (StatusCode, Json<ApiResponse<SplitPlanDto>>)> {
    match state
        .reconciler
        .set_split_part_amount(&plan_id, index, body.amount)
    {
        Ok(plan) => Ok(Json(ApiResponse::success(SplitPlanDto::from_domain(plan)))),
        Err(e) => Err(fail(e)),
    }
}

/// Split part payment result
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct PayPartDto {
    pub plan: SplitPlanDto,
    pub payment: PaymentDto,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/splits/{plan_id}/parts/{index}/pay",
    tag = "Payments",
    params(
        ("plan_id" = String, Path, description = "Split plan ID"),
        ("index" = usize, Path, description = "Part index")
    ),
    request_body = PayPartRequest,
    responses(
        (status = 200, description = "Part paid", body = ApiResponse<PayPartDto>),
        (status = 409, description = "Plan unbalanced or part already paid")
    )
)]
pub async fn pay_part(
    State(state): State<PaymentAppState>,
    Path((plan_id, index)): Path<(String, usize)>,
    ValidatedJson(body): ValidatedJson<PayPartRequest>,
) -> Result<Json<ApiResponse<PayPartDto>>, (StatusCode, Json<ApiResponse<PayPartDto>>)> {
    let method = parse_settlement_method(&body.method).map_err(fail)?;
    match state
        .reconciler
        .pay_split_part(&plan_id, index, method, body.customer_id)
        .await
    {
        Ok((plan, payment)) => Ok(Json(ApiResponse::success(PayPartDto {
            plan: SplitPlanDto::from_domain(plan),
            payment: PaymentDto::from_domain(payment),
        }))),
        Err(e) => Err(fail(e)),
    }
}

// ── Mobile money ───────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/payments/mpesa/initiate",
    tag = "Payments",
    request_body = InitiateMpesaRequest,
    responses(
        (status = 200, description = "Checkout initiated", body = ApiResponse<CheckoutDto>),
        (status = 502, description = "Provider failure; nothing recorded, safe to retry")
    )
)]
pub async fn initiate_mpesa(
    State(state): State<PaymentAppState>,
    ValidatedJson(body): ValidatedJson<InitiateMpesaRequest>,
) -> Result<Json<ApiResponse<CheckoutDto>>, (StatusCode, Json<ApiResponse<CheckoutDto>>)> {
    match state
        .reconciler
        .initiate_mpesa(&body.phone, body.amount, body.session_id, body.customer_id)
        .await
    {
        Ok(checkout) => Ok(Json(ApiResponse::success(CheckoutDto {
            checkout_id: checkout.checkout_id,
            payment_id: checkout.payment_id,
            qr_image: None,
        }))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/mpesa/qr",
    tag = "Payments",
    request_body = QrMpesaRequest,
    responses(
        (status = 200, description = "QR checkout created", body = ApiResponse<CheckoutDto>),
        (status = 502, description = "Provider failure; nothing recorded, safe to retry")
    )
)]
pub async fn generate_qr(
    State(state): State<PaymentAppState>,
    ValidatedJson(body): ValidatedJson<QrMpesaRequest>,
) -> Result<Json<ApiResponse<CheckoutDto>>, (StatusCode, Json<ApiResponse<CheckoutDto>>)> {
    match state
        .reconciler
        .initiate_qr(
            body.amount,
            body.session_id,
            body.customer_id,
            body.reference.as_deref(),
        )
        .await
    {
        Ok(checkout) => Ok(Json(ApiResponse::success(CheckoutDto {
            checkout_id: checkout.request_id,
            payment_id: checkout.payment_id,
            qr_image: Some(checkout.qr_image),
        }))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/mpesa/{checkout_id}/status",
    tag = "Payments",
    params(("checkout_id" = String, Path, description = "Checkout or QR request ID")),
    responses(
        (status = 200, description = "Current checkout status", body = ApiResponse<CheckoutStatusDto>),
        (status = 404, description = "Unknown checkout")
    )
)]
pub async fn check_mpesa_status(
    State(state): State<PaymentAppState>,
    Path(checkout_id): Path<String>,
) -> Result<Json<ApiResponse<CheckoutStatusDto>>, (StatusCode, Json<ApiResponse<CheckoutStatusDto>>)>
{
    match state.reconciler.check_mpesa(&checkout_id).await {
        Ok(status) => Ok(Json(ApiResponse::success(checkout_status_dto(status)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/mpesa/{checkout_id}/confirm",
    tag = "Payments",
    params(("checkout_id" = String, Path, description = "Checkout or QR request ID")),
    responses(
        (status = 200, description = "Confirmation outcome after the bounded wait", body = ApiResponse<ConfirmOutcomeDto>),
        (status = 404, description = "Unknown checkout")
    )
)]
pub async fn confirm_mpesa(
    State(state): State<PaymentAppState>,
    Path(checkout_id): Path<String>,
) -> Result<Json<ApiResponse<ConfirmOutcomeDto>>, (StatusCode, Json<ApiResponse<ConfirmOutcomeDto>>)>
{
    match state.reconciler.await_confirmation(&checkout_id).await {
        Ok(outcome) => {
            let dto = match outcome {
                ConfirmOutcome::Completed(p) => ConfirmOutcomeDto {
                    outcome: "completed".into(),
                    payment: Some(PaymentDto::from_domain(p)),
                },
                ConfirmOutcome::Failed(p) => ConfirmOutcomeDto {
                    outcome: "failed".into(),
                    payment: Some(PaymentDto::from_domain(p)),
                },
                ConfirmOutcome::Indeterminate => ConfirmOutcomeDto {
                    outcome: "indeterminate".into(),
                    payment: None,
                },
            };
            Ok(Json(ApiResponse::success(dto)))
        }
        Err(e) => Err(fail(e)),
    }
}

fn checkout_status_dto(status: CheckoutStatus) -> CheckoutStatusDto {
    match status {
        CheckoutStatus::Pending => CheckoutStatusDto {
            status: "pending".into(),
            receipt: None,
            reason: None,
        },
        CheckoutStatus::Completed { receipt } => CheckoutStatusDto {
            status: "completed".into(),
            receipt: Some(receipt),
            reason: None,
        },
        CheckoutStatus::Failed { reason } => CheckoutStatusDto {
            status: "failed".into(),
            receipt: None,
            reason: Some(reason),
        },
    }
}
