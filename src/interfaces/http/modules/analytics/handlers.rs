//! Reporting queries
//!
//! Read-only aggregates consumed by the external report/chart renderers:
//! daily stats, payment-method breakdown, per-game performance and
//! loyalty segments. The rendering itself (PDF, charts) stays outside
//! this service.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, NaiveDate, Utc};

use crate::application::services::DailyStatsService;
use crate::domain::{PaymentStatus, RepositoryProvider, SessionStatus};
use crate::interfaces::http::common::{fail, ApiResponse};

/// Analytics handler state
#[derive(Clone)]
pub struct AnalyticsAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub stats: Arc<DailyStatsService>,
}

/// Date-range query; defaults to the last 7 days.
#[derive(Debug, Default, serde::Deserialize, utoipa::IntoParams)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let to = self.to.unwrap_or_else(|| Utc::now().date_naive());
        let from = self.from.unwrap_or(to - Duration::days(6));
        (from, to)
    }
}

/// Daily aggregate row
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct DailyStatDto {
    pub date: NaiveDate,
    pub active_stations: i32,
    pub active_users: i32,
    pub total_hours: f64,
    pub total_revenue: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/daily",
    tag = "Analytics",
    params(DateRange),
    responses(
        (status = 200, description = "Daily aggregates in range", body = ApiResponse<Vec<DailyStatDto>>)
    )
)]
pub async fn get_daily_stats(
    State(state): State<AnalyticsAppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<ApiResponse<Vec<DailyStatDto>>>, (StatusCode, Json<ApiResponse<Vec<DailyStatDto>>>)>
{
    let (from, to) = range.resolve();
    match state.stats.range(from, to).await {
        Ok(rows) => Ok(Json(ApiResponse::success(
            rows.into_iter()
                .map(|s| DailyStatDto {
                    date: s.date,
                    active_stations: s.active_stations,
                    active_users: s.active_users,
                    total_hours: s.total_hours,
                    total_revenue: s.total_revenue,
                })
                .collect(),
        ))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/analytics/daily/{date}/recompute",
    tag = "Analytics",
    params(("date" = NaiveDate, Path, description = "Date to rebuild (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Row rebuilt from the session table", body = ApiResponse<DailyStatDto>)
    )
)]
pub async fn recompute_daily_stats(
    State(state): State<AnalyticsAppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<ApiResponse<DailyStatDto>>, (StatusCode, Json<ApiResponse<DailyStatDto>>)> {
    match state.stats.recompute(date).await {
        Ok(s) => Ok(Json(ApiResponse::success(DailyStatDto {
            date: s.date,
            active_stations: s.active_stations,
            active_users: s.active_users,
            total_hours: s.total_hours,
            total_revenue: s.total_revenue,
        }))),
        Err(e) => Err(fail(e)),
    }
}

/// One tender method's share of completed payments
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct MethodBreakdownDto {
    pub method: String,
    pub count: u64,
    pub total: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/payment-methods",
    tag = "Analytics",
    params(DateRange),
    responses(
        (status = 200, description = "Completed payments by tender method", body = ApiResponse<Vec<MethodBreakdownDto>>)
    )
)]
pub async fn get_payment_method_breakdown(
    State(state): State<AnalyticsAppState>,
    Query(range): Query<DateRange>,
) -> Result<
    Json<ApiResponse<Vec<MethodBreakdownDto>>>,
    (StatusCode, Json<ApiResponse<Vec<MethodBreakdownDto>>>),
> {
    let (from, to) = range.resolve();
    let payments = match state.repos.payments().find_all().await {
        Ok(p) => p,
        Err(e) => return Err(fail(e)),
    };

    let mut by_method: HashMap<&'static str, (u64, f64)> = HashMap::new();
    for p in payments {
        if p.status != PaymentStatus::Completed {
            continue;
        }
        let date = p.completed_at.unwrap_or(p.created_at).date_naive();
        if date < from || date > to {
            continue;
        }
        let entry = by_method.entry(p.method.as_str()).or_default();
        entry.0 += 1;
        entry.1 += p.amount;
    }

    let mut breakdown: Vec<MethodBreakdownDto> = by_method
        .into_iter()
        .map(|(method, (count, total))| MethodBreakdownDto {
            method: method.to_string(),
            count,
            total,
        })
        .collect();
    breakdown.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Json(ApiResponse::success(breakdown)))
}

/// Per-game performance
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct GamePerformanceDto {
    pub game_id: i32,
    pub title: String,
    pub sessions: u64,
    pub total_minutes: i64,
    pub revenue: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/games",
    tag = "Analytics",
    responses(
        (status = 200, description = "Completed-session performance per game", body = ApiResponse<Vec<GamePerformanceDto>>)
    )
)]
pub async fn get_game_performance(
    State(state): State<AnalyticsAppState>,
) -> Result<
    Json<ApiResponse<Vec<GamePerformanceDto>>>,
    (StatusCode, Json<ApiResponse<Vec<GamePerformanceDto>>>),
> {
    let games = match state.repos.games().find_all().await {
        Ok(g) => g,
        Err(e) => return Err(fail(e)),
    };
    let sessions = match state.repos.sessions().find_all().await {
        Ok(s) => s,
        Err(e) => return Err(fail(e)),
    };

    let mut by_game: HashMap<i32, (u64, i64, f64)> = HashMap::new();
    for s in sessions {
        if s.status != SessionStatus::Completed {
            continue;
        }
        let Some(game_id) = s.game_id else { continue };
        let entry = by_game.entry(game_id).or_default();
        entry.0 += 1;
        entry.1 += i64::from(s.duration_minutes.unwrap_or(0));
        entry.2 += s.total_amount.unwrap_or(0.0);
    }

    let mut performance: Vec<GamePerformanceDto> = games
        .into_iter()
        .map(|g| {
            let (sessions, total_minutes, revenue) =
                by_game.get(&g.id).copied().unwrap_or_default();
            GamePerformanceDto {
                game_id: g.id,
                title: g.title,
                sessions,
                total_minutes,
                revenue,
            }
        })
        .collect();
    performance.sort_by(|a, b| b.sessions.cmp(&a.sessions));

    Ok(Json(ApiResponse::success(performance)))
}

/// One loyalty band and how many customers fall in it
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct LoyaltySegmentDto {
    pub segment: String,
    pub min_points: i64,
    pub customers: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/loyalty-segments",
    tag = "Analytics",
    responses(
        (status = 200, description = "Customers bucketed by loyalty balance", body = ApiResponse<Vec<LoyaltySegmentDto>>)
    )
)]
pub async fn get_loyalty_segments(
    State(state): State<AnalyticsAppState>,
) -> Result<
    Json<ApiResponse<Vec<LoyaltySegmentDto>>>,
    (StatusCode, Json<ApiResponse<Vec<LoyaltySegmentDto>>>),
> {
    let customers = match state.repos.customers().find_all().await {
        Ok(c) => c,
        Err(e) => return Err(fail(e)),
    };

    // Bands mirror the reward tiers the front desk offers.
    let bands: [(&str, i64); 4] = [("new", 0), ("regular", 10), ("frequent", 50), ("vip", 200)];
    let mut segments: Vec<LoyaltySegmentDto> = bands
        .iter()
        .map(|(name, min)| LoyaltySegmentDto {
            segment: name.to_string(),
            min_points: *min,
            customers: 0,
        })
        .collect();

    for customer in customers {
        let idx = bands
            .iter()
            .rposition(|(_, min)| customer.loyalty_points >= *min)
            .unwrap_or(0);
        segments[idx].customers += 1;
    }

    Ok(Json(ApiResponse::success(segments)))
}
