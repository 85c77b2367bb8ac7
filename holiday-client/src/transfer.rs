//! File transfer and server-push endpoints

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiClient;
use crate::error::{ClientError, Result};
use crate::events::EventStream;
use crate::reporter::Reporter;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
const DEFAULT_DOWNLOAD_NAME: &str = "download";

/// A file to send as the `file` part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming the part after the file
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, data))
    }
}

/// Rounded percentage of `loaded` over `total`, capped at 100
pub(crate) fn progress_percent(loaded: usize, total: usize) -> u8 {
    let percent = (loaded as f64 * 100.0 / total.max(1) as f64).round();
    percent.min(100.0) as u8
}

/// Flatten extra upload fields into text parts
///
/// `extra` must serialize to an object. Strings are sent as-is, `null`s are
/// skipped and any other value is sent as its JSON text.
pub(crate) fn form_fields<E>(extra: Option<&E>) -> Result<Vec<(String, String)>>
where
    E: Serialize + ?Sized,
{
    let Some(extra) = extra else {
        return Ok(Vec::new());
    };

    match serde_json::to_value(extra)? {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some((key, text)),
                other => Some((key, other.to_string())),
            })
            .collect()),
        serde_json::Value::Null => Ok(Vec::new()),
        _ => Err(ClientError::Validation(
            "extra upload fields must form an object".to_string(),
        )),
    }
}

/// Wrap file bytes in a body that reports progress as chunks are sent
fn progress_body(data: Bytes, reporter: Arc<dyn Reporter>) -> reqwest::Body {
    let total = data.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(total)))
        .collect();

    let mut sent = 0;
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len();
        reporter.on_progress(progress_percent(sent, total));
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}

/// File name to save a download under: the last path component of
/// `requested`, or `download`
pub(crate) fn download_name(requested: Option<&str>) -> String {
    requested
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

/// Stage `data` in a temporary file inside `dir` and move it to `target`
///
/// The temporary file is removed if anything fails before the move completes.
pub(crate) fn save_download(dir: &Path, target: &Path, data: &[u8]) -> Result<PathBuf> {
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.flush()?;

    staged.persist(target).map_err(|e| ClientError::Io(e.error))?;

    Ok(target.to_path_buf())
}

impl ApiClient {
    // =============================================================================
    // Uploads & Downloads
    // =============================================================================

    /// Upload a file as `multipart/form-data`
    ///
    /// # Arguments
    /// * `path` - Endpoint path
    /// * `file` - Sent as the `file` part
    /// * `extra` - Object whose fields are added as text parts
    ///
    /// Progress is reported to the reporter as a rounded percentage.
    pub async fn upload_file<T, E>(
        &self,
        path: &str,
        file: UploadFile,
        extra: Option<&E>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        E: Serialize + ?Sized,
    {
        let fields = form_fields(extra).map_err(|e| self.fail(e))?;

        let total = file.data.len();
        if total == 0 {
            self.reporter.on_progress(100);
        }

        let mut part = Part::stream_with_length(
            progress_body(file.data, Arc::clone(&self.reporter)),
            total as u64,
        )
        .file_name(file.file_name);

        if let Some(mime_type) = &file.mime_type {
            part = part
                .mime_str(mime_type)
                .map_err(|e| self.fail(ClientError::Validation(e.to_string())))?;
        }

        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        self.send(self.request(Method::POST, path).multipart(form)).await
    }

    /// Download binary content from `path` into `dest_dir`
    ///
    /// The file is saved as `filename` (path components stripped), or
    /// `download` when none is given. The content is staged in a temporary
    /// file that is always released, whether or not the final move succeeds.
    ///
    /// # Returns
    /// The path of the saved file
    pub async fn download_file(
        &self,
        path: &str,
        dest_dir: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let response = self.dispatch(self.request(Method::GET, path)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = response.bytes().await.map_err(|e| self.fail(e.into()))?;

        let dest_dir = dest_dir.as_ref();
        let target = dest_dir.join(download_name(filename));
        debug!(
            "Saving {} bytes ({}) to {}",
            data.len(),
            content_type,
            target.display()
        );

        save_download(dest_dir, &target, &data).map_err(|e| self.fail(e))
    }

    // =============================================================================
    // Server Push
    // =============================================================================

    /// Open a server-push stream on `path`
    ///
    /// The current token, if any, is passed as the `token` query parameter.
    /// The stream is not subject to the per-call timeout and is not
    /// reconnected when it ends.
    pub async fn create_event_source(&self, path: &str) -> Result<EventStream> {
        let mut builder = self
            .stamp(self.client.get(self.url(path)))
            .header(ACCEPT, "text/event-stream");

        if let Some(token) = self.state.session.token() {
            builder = builder.query(&[("token", token)]);
        }

        let response = self.dispatch(builder).await?;
        Ok(EventStream::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Extra {
        user_email: String,
        destination: String,
        note: Option<String>,
    }

    #[test]
    fn test_form_fields_flatten_object() {
        let extra = Extra {
            user_email: "x".to_string(),
            destination: "y".to_string(),
            note: None,
        };

        let mut fields = form_fields(Some(&extra)).unwrap();
        fields.sort();
        assert_eq!(
            fields,
            vec![
                ("destination".to_string(), "y".to_string()),
                ("userEmail".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_fields_stringify_scalars() {
        let fields = form_fields(Some(&serde_json::json!({ "days": 3 }))).unwrap();
        assert_eq!(fields, vec![("days".to_string(), "3".to_string())]);

        assert!(form_fields::<serde_json::Value>(None).unwrap().is_empty());
        assert!(form_fields(Some(&[1, 2])).is_err());
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_download_name_strips_directories() {
        assert_eq!(download_name(None), "download");
        assert_eq!(download_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(download_name(Some("plan.xlsx")), "plan.xlsx");
        assert_eq!(download_name(Some("..")), "download");
    }

    #[test]
    fn test_failed_save_releases_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("report.pdf");
        std::fs::create_dir(&blocker).unwrap();

        let result = save_download(dir.path(), &blocker, b"%PDF");
        assert!(matches!(result, Err(ClientError::Io(_))));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("report.pdf")]);
    }
}
