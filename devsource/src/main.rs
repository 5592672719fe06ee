use {
  crate::{api::AppState, campaign::Campaign, settings::SystemSettings},
  clap::Parser,
  parking_lot::RwLock,
  rand::{rngs::StdRng, SeedableRng},
  std::sync::Arc,
  tokio::time::{interval, MissedTickBehavior},
  tracing::info,
  tracing_subscriber::EnvFilter,
};

mod api;
mod campaign;
mod settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // configure logging
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");

  // a fixture replays a captured campaign, otherwise make one up
  let campaign = match settings.fixture() {
    Some(path) => Campaign::from_fixture(path)?,
    None => Campaign::synthetic(
      settings.target(),
      settings.initial_donations(),
      StdRng::from_entropy(),
    ),
  };
  let campaign = Arc::new(RwLock::new(campaign));

  if let Some(period) = settings.donation_interval() {
    let campaign = Arc::clone(&campaign);
    tokio::spawn(async move {
      let mut interval = interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      interval.tick().await;

      loop {
        interval.tick().await;
        let mut campaign = campaign.write();
        let donation = campaign.donate().clone();
        info!(
          "received donation of {} from {}, campaign now at {}",
          donation.amount,
          donation.name,
          campaign.amount()
        );
      }
    });
  }

  let state = AppState::new(campaign, settings.failure_rate()?);
  let addr = settings.http_addr();
  info!("serving campaign data on http://{addr}/api");

  axum::Server::bind(&addr)
    .serve(api::routes(state).into_make_service())
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("shutting down");
    })
    .await?;
  Ok(())
}
