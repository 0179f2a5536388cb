use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::client::map_reqwest_error;
use crate::wire::{ErrorBody, SubmitResponse};
use crate::{AcceptedBatch, RequestError};

/// Uploads a two-column CSV (`Restaurant Name`, `Location`) to the bulk
/// submission gateway. On success the server owns the processing; the
/// caller keeps only the job id and the initial roster. On rejection no
/// job exists at all.
pub async fn submit_batch(
    client: &reqwest::Client,
    base_url: &str,
    path: &Path,
) -> Result<AcceptedBatch, RequestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| RequestError::Io(err.to_string()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("batch.csv")
        .to_string();

    let part = Part::bytes(bytes)
        .file_name(filename)
        .mime_str("text/csv")
        .map_err(|err| RequestError::Decode(err.to_string()))?;
    let form = Form::new().part("file", part);

    let response = client
        .post(format!("{}/bulk/upload", base_url.trim_end_matches('/')))
        .multipart(form)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        // The gateway explains rejects in a `detail` field.
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        return Err(match detail {
            Some(detail) => RequestError::Rejected(detail),
            None => RequestError::HttpStatus(status.as_u16()),
        });
    }

    let accepted: SubmitResponse = response
        .json()
        .await
        .map_err(|err| RequestError::Decode(err.to_string()))?;
    Ok(AcceptedBatch {
        job_id: accepted.job_id,
        items: accepted.items,
    })
}
