use {
  crate::model::CampaignSnapshot,
  futures::{future::BoxFuture, FutureExt},
  reqwest::{Client, StatusCode, Url},
  std::time::Duration,
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid data source url {0}")]
  InvalidUrl(String),

  #[error("Data source unreachable: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Data source responded with {0}")]
  Status(StatusCode),

  #[error("Malformed campaign payload: {0}")]
  Malformed(#[from] serde_json::Error),
}

impl Error {
  /// True if the source answered but the payload did not validate.
  pub fn is_malformed(&self) -> bool {
    matches!(self, Error::Malformed(_))
  }
}

/// Something that produces campaign snapshots on demand.
///
/// One call is one poll. Implementations must not retry internally,
/// retrying is the job of the poll schedule.
pub trait DataSource: Send + Sync + 'static {
  fn fetch(&self) -> BoxFuture<'_, Result<CampaignSnapshot, Error>>;
}

/// Polls a campaign JSON endpoint over HTTP.
pub struct HttpSource {
  url: Url,
  client: Client,
}

impl HttpSource {
  pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
    Ok(Self {
      url: url.parse().map_err(|_| Error::InvalidUrl(url.to_owned()))?,
      client: Client::builder().timeout(timeout).build()?,
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

impl DataSource for HttpSource {
  fn fetch(&self) -> BoxFuture<'_, Result<CampaignSnapshot, Error>> {
    async move {
      let response = self.client.get(self.url.clone()).send().await?;

      let status = response.status();
      if !status.is_success() {
        return Err(Error::Status(status));
      }

      // read the body first, so transport failures and
      // payload validation failures stay distinguishable.
      let body = response.text().await?;
      Ok(serde_json::from_str(&body)?)
    }
    .boxed()
  }
}
