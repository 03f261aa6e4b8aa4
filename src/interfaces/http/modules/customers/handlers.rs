//! Customer API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::dto::{CreateCustomerRequest, CustomerDto, UpdateCustomerRequest};
use crate::domain::{Customer, DomainError, RepositoryProvider};
use crate::interfaces::http::common::{fail, ApiResponse, ValidatedJson};
use crate::notifications::{CustomerEvent, Event, SharedEventBus};

/// Customer handler state
#[derive(Clone)]
pub struct CustomerAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
}

fn customer_event(c: &Customer) -> CustomerEvent {
    CustomerEvent {
        customer_id: c.id,
        name: c.name.clone(),
        timestamp: Utc::now(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Customer list", body = ApiResponse<Vec<CustomerDto>>)
    )
)]
pub async fn list_customers(
    State(state): State<CustomerAppState>,
) -> Result<Json<ApiResponse<Vec<CustomerDto>>>, (StatusCode, Json<ApiResponse<Vec<CustomerDto>>>)>
{
    match state.repos.customers().find_all().await {
        Ok(customers) => Ok(Json(ApiResponse::success(
            customers.into_iter().map(CustomerDto::from_domain).collect(),
        ))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer(
    State(state): State<CustomerAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CustomerDto>>, (StatusCode, Json<ApiResponse<CustomerDto>>)> {
    match state.repos.customers().find_by_id(id).await {
        Ok(Some(customer)) => Ok(Json(ApiResponse::success(CustomerDto::from_domain(
            customer,
        )))),
        Ok(None) => Err(fail(DomainError::not_found("Customer", "id", id))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_customer(
    State(state): State<CustomerAppState>,
    ValidatedJson(body): ValidatedJson<CreateCustomerRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<CustomerDto>>),
    (StatusCode, Json<ApiResponse<CustomerDto>>),
> {
    let mut customer = Customer::new(0, body.name, body.phone);
    customer.email = body.email;

    match state.repos.customers().create(customer).await {
        Ok(customer) => {
            info!("Customer {} registered: {}", customer.id, customer.name);
            state
                .event_bus
                .publish(Event::CustomerCreated(customer_event(&customer)));
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(CustomerDto::from_domain(customer))),
            ))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_customer(
    State(state): State<CustomerAppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<CustomerDto>>, (StatusCode, Json<ApiResponse<CustomerDto>>)> {
    let mut customer = match state.repos.customers().find_by_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => return Err(fail(DomainError::not_found("Customer", "id", id))),
        Err(e) => return Err(fail(e)),
    };

    if let Some(name) = body.name {
        customer.name = name;
    }
    if let Some(phone) = body.phone {
        customer.phone = phone;
    }
    if body.email.is_some() {
        customer.email = body.email;
    }

    match state.repos.customers().update(customer.clone()).await {
        Ok(()) => {
            state
                .event_bus
                .publish(Event::CustomerUpdated(customer_event(&customer)));
            Ok(Json(ApiResponse::success(CustomerDto::from_domain(customer))))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_customer(
    State(state): State<CustomerAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CustomerDto>>, (StatusCode, Json<ApiResponse<CustomerDto>>)> {
    let customer = match state.repos.customers().find_by_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => return Err(fail(DomainError::not_found("Customer", "id", id))),
        Err(e) => return Err(fail(e)),
    };

    match state.repos.customers().delete(id).await {
        Ok(()) => {
            info!("Customer {} deleted", id);
            state
                .event_bus
                .publish(Event::CustomerDeleted(customer_event(&customer)));
            Ok(Json(ApiResponse::success(CustomerDto::from_domain(customer))))
        }
        Err(e) => Err(fail(e)),
    }
}
