//! Single HTTP GET streamed into a writer.

use std::io::{self, Write};
use std::time::Duration;

use crate::control::CancelFlag;
use crate::retry::TransferError;

/// Curl timeouts for one track transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Abort if throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Hard wall-clock limit for one attempt.
    pub timeout: Duration,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// GETs `url` and writes the body to `out`. Returns the number of bytes written.
/// Runs in the current thread; the transfer is aborted when `cancel` is set.
pub(super) fn get_to_writer<W: Write>(
    url: &str,
    out: &mut W,
    cancel: &CancelFlag,
    opts: &TransferOptions,
) -> Result<u64, TransferError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(TransferError::Curl)?;
    easy.follow_location(true).map_err(TransferError::Curl)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(TransferError::Curl)?;
    easy.low_speed_limit(opts.low_speed_limit)
        .map_err(TransferError::Curl)?;
    easy.low_speed_time(opts.low_speed_time)
        .map_err(TransferError::Curl)?;
    easy.timeout(opts.timeout).map_err(TransferError::Curl)?;
    easy.fail_on_error(true).map_err(TransferError::Curl)?;
    // Enables the progress callback, used only to poll the cancel flag.
    easy.progress(true).map_err(TransferError::Curl)?;

    let mut written = 0u64;
    let mut storage_error: Option<io::Error> = None;
    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    storage_error = Some(e);
                    Ok(0)
                }
            })
            .map_err(TransferError::Curl)?;
        transfer
            .progress_function(|_, _, _, _| !cancel.is_cancelled())
            .map_err(TransferError::Curl)?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if e.is_aborted_by_callback() && cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        if e.is_write_error() {
            if let Some(io_err) = storage_error.take() {
                return Err(TransferError::Storage(io_err));
            }
        }
        if e.is_http_returned_error() {
            let code = easy.response_code().map_err(TransferError::Curl)?;
            return Err(TransferError::Http(code));
        }
        return Err(TransferError::Curl(e));
    }

    let code = easy.response_code().map_err(TransferError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }
    out.flush().map_err(TransferError::Storage)?;
    Ok(written)
}
