use crate::error::{Result, UpdaterError};
use reqwest::blocking::Client;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("maa-updater/", env!("CARGO_PKG_VERSION"));

/// Retrieves a remote resource into a local file.
pub trait Fetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// HTTPS fetcher. The client is built on first use so that a TLS or proxy
/// setup problem is reported as a download failure of the running update.
pub struct Downloader {
    use_system_proxy: bool,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            use_system_proxy: true,
        }
    }

    fn client(&self, url: &str) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>);
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }
        builder
            .build()
            .map_err(|e| UpdaterError::download_error(url, format!("HTTP client setup: {e}")))
    }
}

impl Fetcher for Downloader {
    /// Streams `url` into `destination`, replacing any existing file.
    fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        log::info!("Downloading {url}");

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut response = self
            .client(url)?
            .get(url)
            .send()
            .map_err(|e| UpdaterError::download_error(url, e))?;

        let status = response.status();
        log::debug!("{url} responded with {status}");
        if !status.is_success() {
            return Err(UpdaterError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = File::create(destination).map_err(|e| {
            UpdaterError::download_error(url, format!("{}: {e}", destination.display()))
        })?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| UpdaterError::download_error(url, e))?;

        log::info!("Downloaded {bytes} bytes to {}", destination.display());
        Ok(bytes)
    }
}
