use std::path::{Path, PathBuf};

use crate::client::map_reqwest_error;
use crate::persist::AtomicFileWriter;
use crate::{ExportError, RequestError};

/// Fetches the finished job's CSV artifact and writes it atomically under
/// `dest_dir`. Readiness is the server's call: if it is not done
/// persisting, it rejects and we surface that as-is, no polling.
pub async fn download_export(
    client: &reqwest::Client,
    base_url: &str,
    job_id: &str,
    dest_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let response = client
        .get(format!(
            "{}/bulk/download/{job_id}",
            base_url.trim_end_matches('/')
        ))
        .send()
        .await
        .map_err(|err| ExportError::Request(map_reqwest_error(err)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExportError::Request(RequestError::HttpStatus(
            status.as_u16(),
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| ExportError::Request(map_reqwest_error(err)))?;

    let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
    writer
        .write(filename, &bytes)
        .map_err(|err| ExportError::Persist(err.to_string()))
}
