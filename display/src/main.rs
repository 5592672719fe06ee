use {
  crate::{settings::CliOptions, terminal::TerminalRenderer},
  clap::Parser,
  kiosk_engine::{HttpSource, SyncController, SyncHandle},
  std::io::IsTerminal,
  tracing::info,
  tracing_subscriber::EnvFilter,
};

mod settings;
mod terminal;

#[cfg(unix)]
async fn wait_for_shutdown<R>(handle: &SyncHandle<R>) -> anyhow::Result<()> {
  use tokio::signal::unix::{signal, SignalKind};

  // SIGUSR1 blanks the kiosk, SIGUSR2 brings it back
  let mut hidden = signal(SignalKind::user_defined1())?;
  let mut visible = signal(SignalKind::user_defined2())?;

  loop {
    tokio::select! {
      Some(()) = hidden.recv() => {
        info!("display hidden");
        handle.on_hidden();
      }
      Some(()) = visible.recv() => {
        info!("display visible");
        handle.on_visible();
      }
      result = tokio::signal::ctrl_c() => return Ok(result?),
    }
  }
}

#[cfg(not(unix))]
async fn wait_for_shutdown<R>(_: &SyncHandle<R>) -> anyhow::Result<()> {
  Ok(tokio::signal::ctrl_c().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // the board owns stdout, logs go to stderr
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let opts = CliOptions::parse();
  info!("kiosk options: {opts:?}");

  let source = HttpSource::new(opts.source(), opts.request_timeout())?;
  info!("polling campaign data from {}", source.url());
  let stdout = std::io::stdout();
  let ansi = stdout.is_terminal();
  let renderer =
    TerminalRenderer::new(stdout, ansi, opts.thousands_separator());

  let handle =
    SyncController::new(opts.engine_config(), source, renderer)?.start();

  wait_for_shutdown(&handle).await?;

  info!("shutting down");
  handle.dispose().await?;
  Ok(())
}
