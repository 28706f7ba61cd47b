// src/feed/fetcher.rs
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use async_trait::async_trait;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Status};
use thiserror::Error;

/// Warning feed host. Anonymous access, no credentials.
pub const FEED_HOST: &str = "ftp.bom.gov.au:21";
/// Directory holding the state-wide warning files.
pub const FEED_DIR: &str = "/anon/gen/fwo";
/// Connect and socket-read timeout for one retrieval.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetch failure taxonomy.
///
/// `NotFound` is not an error condition: the server drops the warning file
/// when no warning is current, so a 550 means "nothing issued right now" and
/// callers must treat it differently from infrastructure failures.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed file not found on server")]
    NotFound,
    #[error("network error: {0}")]
    Network(String),
}

/// Source of raw feed documents. The watcher only sees this seam, so tests
/// substitute scripted fetchers for the FTP client.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve the named file fully into memory.
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError>;
    fn name(&self) -> &'static str;
}

/// Anonymous FTP retrieval from the fixed warning-feed host.
#[derive(Debug, Clone)]
pub struct FtpFeedFetcher {
    host: String,
    dir: String,
    timeout: Duration,
}

impl Default for FtpFeedFetcher {
    fn default() -> Self {
        Self {
            host: FEED_HOST.to_string(),
            dir: FEED_DIR.to_string(),
            timeout: FEED_TIMEOUT,
        }
    }
}

impl FtpFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override host/dir, for tools pointed at a mirror.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn resolve(&self) -> Result<SocketAddr, FetchError> {
        self.host
            .to_socket_addrs()
            .map_err(|e| FetchError::Network(format!("resolving {}: {e}", self.host)))?
            .next()
            .ok_or_else(|| FetchError::Network(format!("no address for {}", self.host)))
    }

    /// Blocking retrieval of one file. The connection is a scoped resource:
    /// quit is attempted on every exit path and never held across cycles.
    fn fetch_blocking(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let addr = self.resolve()?;
        let mut ftp = FtpStream::connect_timeout(addr, self.timeout)
            .map_err(|e| FetchError::Network(format!("connecting to {}: {e}", self.host)))?;
        if let Err(e) = ftp.get_ref().set_read_timeout(Some(self.timeout)) {
            let _ = ftp.quit();
            return Err(FetchError::Network(format!("setting read timeout: {e}")));
        }

        let result = retrieve(&mut ftp, &self.dir, file_name);
        let _ = ftp.quit();

        result.map_err(|e| match e {
            // 550: the file does not currently exist, no warning issued.
            FtpError::UnexpectedResponse(ref r) if r.status == Status::FileUnavailable => {
                FetchError::NotFound
            }
            other => FetchError::Network(other.to_string()),
        })
    }
}

fn retrieve(ftp: &mut FtpStream, dir: &str, file_name: &str) -> Result<Vec<u8>, FtpError> {
    ftp.login("anonymous", "anonymous")?;
    ftp.transfer_type(FileType::Binary)?;
    ftp.cwd(dir)?;
    let buf = ftp.retr_as_buffer(file_name)?;
    Ok(buf.into_inner())
}

#[async_trait]
impl FeedFetcher for FtpFeedFetcher {
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let this = self.clone();
        let file = file_name.to_string();
        // suppaftp is a blocking client; keep the poll loop's executor free.
        tokio::task::spawn_blocking(move || this.fetch_blocking(&file))
            .await
            .map_err(|e| FetchError::Network(format!("fetch task join: {e}")))?
    }

    fn name(&self) -> &'static str {
        "bom-ftp"
    }
}
