use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::catalog::{Catalog, Category, CategoryFilter, Program};
use crate::config::Config;
use crate::evaluation::{evaluate, Evaluation, EvaluationRequest};
use crate::geo::{breakdown, ItineraryStatus, Leg};
use crate::lookup::{program_from_lookup, KnowledgeBaseLookup, LookupState, LookupTask};

#[derive(Clone)]
struct ApiState {
    config: Config,
    catalog: Arc<RwLock<Catalog>>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct ProgramsQuery {
    category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DistanceRequest {
    codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LookupRequest {
    name: String,
    #[serde(default)]
    add: bool,
    category: Option<String>,
    manual_value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ProgramsResponse {
    programs: Vec<Program>,
}

#[derive(Debug, Serialize)]
struct DistanceResponse {
    #[serde(flatten)]
    status: ItineraryStatus,
    legs: Vec<Leg>,
}

#[derive(Debug, Serialize)]
struct LookupResponse {
    query: String,
    #[serde(flatten)]
    state: LookupState,
    added: Option<Program>,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let catalog = config.load_catalog()?;
    let app = router(config, catalog);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(config: Config, catalog: Catalog) -> Router {
    let state = ApiState {
        config,
        catalog: Arc::new(RwLock::new(catalog)),
    };

    Router::new()
        .route("/health", get(health))
        .route("/v1/programs", get(programs))
        .route("/v1/evaluate", post(evaluate_redemption))
        .route("/v1/distance", post(distance))
        .route("/v1/lookup", post(lookup))
        .route("/v1/config", get(show_config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn programs(
    State(state): State<ApiState>,
    Query(query): Query<ProgramsQuery>,
) -> ApiResult<ProgramsResponse> {
    let filter = match query.category.as_deref() {
        Some(raw) => {
            CategoryFilter::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))?
        }
        None => CategoryFilter::All,
    };
    let catalog = state.catalog.read().await;
    let programs = catalog
        .programs
        .filter(filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(ok(ProgramsResponse { programs }))
}

async fn evaluate_redemption(
    State(state): State<ApiState>,
    Json(mut request): Json<EvaluationRequest>,
) -> ApiResult<Evaluation> {
    if request.program_id.is_none() {
        request.program_id = Some(state.config.defaults.program.clone());
    }
    let catalog = state.catalog.read().await;
    Ok(ok(evaluate(&catalog, &request, &state.config.thresholds)))
}

async fn distance(
    State(state): State<ApiState>,
    Json(request): Json<DistanceRequest>,
) -> ApiResult<DistanceResponse> {
    let catalog = state.catalog.read().await;
    let (legs, status) = breakdown(&catalog.airports, &request.codes);
    Ok(ok(DistanceResponse { status, legs }))
}

async fn lookup(
    State(state): State<ApiState>,
    Json(request): Json<LookupRequest>,
) -> ApiResult<LookupResponse> {
    let query = request.name.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    let category = match request.category.as_deref() {
        Some(raw) => Category::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => Category::Airline,
    };

    let entries = state.catalog.read().await.knowledge_base.clone();
    let backend = Arc::new(KnowledgeBaseLookup::new(entries, state.config.lookup_delay()));
    let outcome = LookupTask::spawn(backend, query.as_str()).outcome().await;
    debug!("lookup for {query:?} settled as {outcome:?}");

    let mut added = None;
    if request.add {
        if let Some(new) = program_from_lookup(&query, category, outcome, request.manual_value) {
            let mut catalog = state.catalog.write().await;
            let program = catalog
                .programs
                .append(new)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            info!("added program {} ({})", program.name, program.id);
            added = Some(program.clone());
        }
    }

    Ok(ok(LookupResponse {
        query,
        state: outcome,
        added,
    }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::Json;
    use tokio::sync::RwLock;

    use super::{
        distance, evaluate_redemption, lookup, programs, ApiState, DistanceRequest, LookupRequest,
        ProgramsQuery,
    };
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::evaluation::EvaluationRequest;
    use crate::geo::{Itinerary, ItineraryStatus};
    use crate::lookup::LookupState;

    fn state() -> ApiState {
        let mut config = Config::default();
        config.lookup.delay_ms = 0;
        ApiState {
            config,
            catalog: Arc::new(RwLock::new(Catalog::with_defaults())),
        }
    }

    #[tokio::test]
    async fn programs_filter_by_category() {
        let Json(response) = programs(
            State(state()),
            Query(ProgramsQuery {
                category: Some("bank".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.data.programs.len(), 4);

        let rejected = programs(
            State(state()),
            Query(ProgramsQuery {
                category: Some("train".to_string()),
            }),
        )
        .await;
        assert!(rejected.is_err());
    }

    #[tokio::test]
    async fn evaluate_uses_configured_default_program() {
        let request = EvaluationRequest {
            cash: Some(600.0),
            points: Some(30_000.0),
            itinerary: Itinerary::new("JFK", "LHR"),
            ..EvaluationRequest::default()
        };
        let Json(response) = evaluate_redemption(State(state()), Json(request))
            .await
            .unwrap();
        let evaluation = response.data;
        assert_eq!(evaluation.program.unwrap().id, "ua");
        assert_eq!(evaluation.itinerary, ItineraryStatus::Resolved { miles: 3442 });
    }

    #[tokio::test]
    async fn distance_reports_legs_or_invalid_code() {
        let Json(response) = distance(
            State(state()),
            Json(DistanceRequest {
                codes: vec!["SFO".to_string(), "JFK".to_string(), "LHR".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            response.data.status,
            ItineraryStatus::Resolved { miles: 2580 + 3442 }
        );
        assert_eq!(response.data.legs.len(), 2);

        let Json(response) = distance(
            State(state()),
            Json(DistanceRequest {
                codes: vec!["SFO".to_string(), "QQQ".to_string()],
            }),
        )
        .await
        .unwrap();
        assert!(response.data.legs.is_empty());
        assert_eq!(response.data.status.miles(), None);
    }

    #[tokio::test]
    async fn lookup_can_append_found_program() {
        let state = state();
        let before = state.catalog.read().await.programs.len();
        let Json(response) = lookup(
            State(state.clone()),
            Json(LookupRequest {
                name: "Cathay Pacific Asia Miles".to_string(),
                add: true,
                category: None,
                manual_value: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.data.state, LookupState::Found(1.3));
        let added = response.data.added.unwrap();
        assert!(added.id.starts_with("custom-"));
        assert_eq!(state.catalog.read().await.programs.len(), before + 1);

        let Json(response) = lookup(
            State(state.clone()),
            Json(LookupRequest {
                name: "Unknown Club".to_string(),
                add: true,
                category: Some("hotel".to_string()),
                manual_value: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.data.state, LookupState::NotFound);
        assert!(response.data.added.is_none());
        assert_eq!(state.catalog.read().await.programs.len(), before + 1);
    }
}
