//! Blocking HTTP GET via libcurl.
//!
//! Both entry points run in the current thread; call them from
//! `spawn_blocking` when used from async code (see `remote::HttpRemote`).

mod classify;

pub use classify::{classify_curl_error, classify_status};

use crate::error::{Error, NetworkError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Transfer limits applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Upper bound for the whole transfer.
    pub timeout: Duration,
    /// Abort when the rate stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(1800),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// GET `url` and return the body as text.
pub fn get_text(url: &str, opts: &HttpOptions) -> Result<String, NetworkError> {
    let mut body = Vec::new();
    get_into(url, opts, &mut body).map_err(|e| match e {
        SinkError::Network(e) => e,
        // Writes into a Vec cannot fail.
        SinkError::Write(_) => NetworkError::Body {
            url: url.to_string(),
        },
    })?;
    String::from_utf8(body).map_err(|_| NetworkError::Body {
        url: url.to_string(),
    })
}

/// GET `url` into a newly created (truncated) file at `dest`, synced to disk
/// before returning. Returns the number of bytes written.
pub fn download_to_path(url: &str, opts: &HttpOptions, dest: &Path) -> Result<u64> {
    let file = File::create(dest).map_err(|e| Error::io("create", dest, e))?;
    let mut writer = BufWriter::new(file);
    let written = get_into(url, opts, &mut writer).map_err(|e| match e {
        SinkError::Network(e) => Error::Network(e),
        SinkError::Write(e) => Error::io("write", dest, e),
    })?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::io("write", dest, e.into_error()))?;
    file.sync_all().map_err(|e| Error::io("sync", dest, e))?;
    Ok(written)
}

enum SinkError {
    Network(NetworkError),
    Write(io::Error),
}

/// GET `url` and stream the body into `sink`.
///
/// The body of an error response is also written; callers discard the sink
/// when this returns `Err`. A failed write aborts the transfer.
fn get_into<W: Write>(url: &str, opts: &HttpOptions, sink: &mut W) -> Result<u64, SinkError> {
    let transport = |e: curl::Error| SinkError::Network(classify_curl_error(url, e));

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(transport)?;
    easy.follow_location(true).map_err(transport)?;
    easy.max_redirections(10).map_err(transport)?;
    easy.connect_timeout(opts.connect_timeout).map_err(transport)?;
    easy.timeout(opts.timeout).map_err(transport)?;
    easy.low_speed_limit(opts.low_speed_limit).map_err(transport)?;
    easy.low_speed_time(opts.low_speed_time).map_err(transport)?;

    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("write of response body failed: {}", e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(transport)?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(SinkError::Write(e));
    }
    performed.map_err(transport)?;

    let code = easy.response_code().map_err(transport)?;
    classify_status(url, code).map_err(SinkError::Network)?;
    Ok(written)
}
