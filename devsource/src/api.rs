use {
  crate::campaign::Campaign,
  axum::{
    extract::State,
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json,
    Router,
  },
  parking_lot::RwLock,
  rand::Rng,
  serde_json::json,
  std::sync::Arc,
  tracing::{debug, warn},
};

#[derive(Clone)]
pub struct AppState {
  campaign: Arc<RwLock<Campaign>>,
  failure_rate: f64,
}

impl AppState {
  /// `failure_rate` must lie between 0 and 1.
  pub fn new(campaign: Arc<RwLock<Campaign>>, failure_rate: f64) -> Self {
    Self {
      campaign,
      failure_rate,
    }
  }
}

pub fn routes(state: AppState) -> Router {
  Router::new()
    .route("/api", get(snapshot))
    .route("/api/", get(snapshot))
    .with_state(state)
}

async fn snapshot(State(state): State<AppState>) -> Response {
  if rand::thread_rng().gen_bool(state.failure_rate) {
    warn!("injecting data source failure");
    return (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "error": "No data found" })),
    )
      .into_response();
  }

  let snapshot = state.campaign.read().snapshot();
  debug!(
    "serving campaign at {} of {} with {} donations",
    snapshot.amount,
    snapshot.target,
    snapshot.donations.len()
  );
  ([(ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(snapshot)).into_response()
}

#[cfg(test)]
mod tests {
  use {
    super::{routes, AppState},
    crate::campaign::Campaign,
    axum::{
      body::Body,
      http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, Request, StatusCode},
    },
    kiosk_engine::CampaignSnapshot,
    parking_lot::RwLock,
    rand::{rngs::StdRng, SeedableRng},
    std::sync::Arc,
    tower::ServiceExt,
  };

  fn state(failure_rate: f64) -> AppState {
    let campaign = Campaign::synthetic(5000, 6, StdRng::seed_from_u64(9));
    AppState::new(Arc::new(RwLock::new(campaign)), failure_rate)
  }

  fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
  }

  #[tokio::test]
  async fn serves_current_campaign() -> anyhow::Result<()> {
    let state = state(0.0);
    let expected = state.campaign.read().snapshot();

    let response = routes(state).oneshot(get("/api")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body = hyper::body::to_bytes(response.into_body()).await?;
    let snapshot: CampaignSnapshot = serde_json::from_slice(&body)?;
    assert_eq!(snapshot, expected);
    Ok(())
  }

  #[tokio::test]
  async fn trailing_slash_is_the_same_endpoint() -> anyhow::Result<()> {
    let response = routes(state(0.0)).oneshot(get("/api/")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = routes(state(0.0)).oneshot(get("/index.html")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
  }

  #[tokio::test]
  async fn injected_failures_return_error_body() -> anyhow::Result<()> {
    let response = routes(state(1.0)).oneshot(get("/api")).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = hyper::body::to_bytes(response.into_body()).await?;
    let body: serde_json::Value = serde_json::from_slice(&body)?;
    assert!(body["error"].is_string());
    Ok(())
  }

  #[tokio::test]
  async fn growth_shows_up_in_next_response() -> anyhow::Result<()> {
    let state = state(0.0);
    let app = routes(state.clone());
    state.campaign.write().donate();

    let response = app.oneshot(get("/api")).await?;
    let body = hyper::body::to_bytes(response.into_body()).await?;
    let snapshot: CampaignSnapshot = serde_json::from_slice(&body)?;
    assert_eq!(snapshot.donations.len(), 7);
    Ok(())
  }
}
