use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cut_planner::config::{CostModel, DEFAULT_SEARCH_BUDGET, PlannerConfig, Strategy};
use cut_planner::error::PlanError;
use cut_planner::ordering::StockOrder;
use cut_planner::planner::Planner;
use cut_planner::render::Totals;
use cut_planner::types::{DemandItem, Plan, StockLot};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum StrategyKind {
    #[default]
    Scrap,
    Weld,
}

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    stock: Vec<StockLot>,
    demand: Vec<DemandItem>,
    #[serde(default)]
    order: StockOrder,
    #[serde(default)]
    strategy: StrategyKind,
    #[serde(default)]
    cost: CostModel,
    #[serde(default = "default_search_budget")]
    search_budget: usize,
}

fn default_search_budget() -> usize {
    DEFAULT_SEARCH_BUDGET
}

/// Planning time and the plan itself grow with every bar drawn, so one
/// request may not offer more than this many bars in total.
const MAX_BARS: u64 = 100_000;

fn check_bar_count(stock: &[StockLot]) -> Result<(), String> {
    let bars: u64 = stock.iter().map(|lot| lot.quantity as u64).sum();
    if bars > MAX_BARS {
        return Err(format!(
            "stock offers {bars} bars, at most {MAX_BARS} are accepted per request"
        ));
    }
    Ok(())
}

#[derive(Serialize)]
struct OptimizeResponse {
    #[serde(flatten)]
    plan: Plan,
    weld_count: usize,
    complete: bool,
    totals: Totals,
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    check_bar_count(&req.stock).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let strategy = match req.strategy {
        StrategyKind::Scrap => Strategy::Scrap,
        StrategyKind::Weld => Strategy::Weld {
            cost: req.cost,
            search_budget: req.search_budget,
        },
    };
    let planner = Planner::new(PlannerConfig::new(req.order, strategy));
    let cost = req.cost;

    let plan = tokio::task::spawn_blocking(move || planner.plan(&req.stock, &req.demand))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| match e {
            PlanError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            PlanError::Invariant(_) => {
                tracing::error!(error = %e, "planner invariant violated");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        })?;

    let totals = Totals::of(&plan, &cost);
    Ok(Json(OptimizeResponse {
        weld_count: plan.weld_count(),
        complete: plan.is_complete(),
        totals,
        plan,
    }))
}

fn main() {
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        ..Default::default()
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_count_limit() {
        let at_limit = [StockLot::new(12000, 60_000), StockLot::new(6000, 40_000)];
        assert!(check_bar_count(&at_limit).is_ok());
        let over = [StockLot::new(12000, 60_000), StockLot::new(6000, 40_001)];
        assert!(check_bar_count(&over).is_err());
        assert!(check_bar_count(&[StockLot::new(12000, u32::MAX)]).is_err());
        assert!(check_bar_count(&[]).is_ok());
    }

    #[test]
    fn test_request_defaults() {
        let req: OptimizeRequest = serde_json::from_str(
            r#"{"stock": [{"length": 12000, "quantity": 2}], "demand": [{"length": 3000, "quantity": 4}]}"#,
        )
        .unwrap();
        assert!(matches!(req.strategy, StrategyKind::Scrap));
        assert_eq!(req.search_budget, DEFAULT_SEARCH_BUDGET);
        assert_eq!(req.cost, CostModel::default());
    }
}
