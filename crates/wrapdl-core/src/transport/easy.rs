//! libcurl Easy transport: one blocking GET per call.

use curl::easy::{Auth, Easy};
use std::io;
use std::time::Duration;

use super::{check_scheme, FetchRequest, TransferError, Transport};
use crate::auth::{self, ChallengeKind};
use crate::config::WrapdlConfig;
use crate::downloader::CHUNK_SIZE;

const MAX_REDIRECTIONS: u32 = 10;

/// Blocking libcurl transport configured once from [`WrapdlConfig`].
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    low_speed: Option<(u32, Duration)>,
    proxy_url: Option<String>,
    buffer_size: usize,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&WrapdlConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &WrapdlConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed: cfg
                .low_speed_limit
                .map(|limit| (limit, Duration::from_secs(cfg.low_speed_time_secs))),
            proxy_url: cfg.proxy.url.clone(),
            buffer_size: CHUNK_SIZE,
        }
    }

    fn prepare(&self, easy: &mut Easy, request: &FetchRequest<'_>) -> Result<(), curl::Error> {
        // Credentials only ever come from the AuthContext, never from URL user-info.
        easy.url(auth::strip_user_info(request.url).as_str())?;
        easy.useragent(request.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        // Error statuses must not end up in the destination file.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some((limit, window)) = self.low_speed {
            easy.low_speed_limit(limit)?;
            easy.low_speed_time(window)?;
        }
        easy.buffer_size(self.buffer_size)?;
        if let Some(proxy) = &self.proxy_url {
            easy.proxy(proxy)?;
        }

        let Some(auth) = request.auth else {
            return Ok(());
        };
        let mut basic = Auth::new();
        basic.basic(true);
        if let Some(server) = auth.challenge(ChallengeKind::Server) {
            easy.username(&server.username)?;
            easy.password(&server.password)?;
            easy.http_auth(&basic)?;
        }
        if let Some(proxy) = auth.challenge(ChallengeKind::Proxy) {
            easy.proxy_username(&proxy.username)?;
            easy.proxy_password(&proxy.password)?;
            easy.proxy_auth(&basic)?;
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn fetch(
        &self,
        request: &FetchRequest<'_>,
        on_chunk: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<(), TransferError> {
        check_scheme(request.url)?;

        let mut easy = Easy::new();
        self.prepare(&mut easy, request)?;

        let mut sink_error: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match on_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if e.is_write_error() {
                if let Some(io_err) = sink_error.take() {
                    return Err(TransferError::Io(io_err));
                }
            }
            if e.is_http_returned_error() {
                return Err(TransferError::Http(easy.response_code()?));
            }
            return Err(TransferError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }
        Ok(())
    }
}
