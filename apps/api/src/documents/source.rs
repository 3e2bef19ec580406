use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use super::{DocumentError, DocumentSource};

/// Resolved form of a stored resume location.
#[derive(Debug, PartialEq, Eq)]
enum Location<'a> {
    Http(&'a str),
    Blob { bucket: &'a str, key: &'a str },
}

/// Fetches documents over HTTP(S) or from S3-compatible blob storage.
///
/// - `http://…` / `https://…` → GET
/// - `s3://bucket/key` → GetObject on that bucket
/// - anything else → treated as a key in the configured default bucket
pub struct RemoteDocumentSource {
    http: Client,
    s3: Option<S3Client>,
    default_bucket: Option<String>,
    timeout: Duration,
}

impl RemoteDocumentSource {
    pub fn new(timeout: Duration, s3: Option<S3Client>, default_bucket: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            s3,
            default_bucket,
            timeout,
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<Bytes, DocumentError> {
        let response = self.http.get(url).send().await.map_err(|e| self.transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Status {
                status: status.as_u16(),
                location: url.to_string(),
            });
        }

        response.bytes().await.map_err(|e| self.transport(url, e))
    }

    async fn fetch_blob(&self, location: &str, bucket: &str, key: &str) -> Result<Bytes, DocumentError> {
        let s3 = self
            .s3
            .as_ref()
            .ok_or_else(|| DocumentError::UnsupportedLocation(location.to_string()))?;

        let request = s3.get_object().bucket(bucket).key(key).send();
        let object = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| DocumentError::Timeout {
                location: location.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| DocumentError::Storage {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        let data = object.body.collect().await.map_err(|e| DocumentError::Storage {
            location: location.to_string(),
            message: e.to_string(),
        })?;
        Ok(data.into_bytes())
    }

    fn transport(&self, location: &str, err: reqwest::Error) -> DocumentError {
        if err.is_timeout() {
            DocumentError::Timeout {
                location: location.to_string(),
                timeout: self.timeout,
            }
        } else {
            DocumentError::Transport {
                location: location.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl DocumentSource for RemoteDocumentSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, DocumentError> {
        let resolved = resolve_location(location, self.default_bucket.as_deref())?;
        debug!("Fetching document {location} as {resolved:?}");
        match resolved {
            Location::Http(url) => self.fetch_http(url).await,
            Location::Blob { bucket, key } => self.fetch_blob(location, bucket, key).await,
        }
    }
}

fn resolve_location<'a>(
    location: &'a str,
    default_bucket: Option<&'a str>,
) -> Result<Location<'a>, DocumentError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(Location::Http(location));
    }

    if let Some(rest) = location.strip_prefix("s3://") {
        return match rest.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(Location::Blob { bucket, key })
            }
            _ => Err(DocumentError::UnsupportedLocation(location.to_string())),
        };
    }

    if location.contains("://") {
        return Err(DocumentError::UnsupportedLocation(location.to_string()));
    }

    match default_bucket {
        Some(bucket) => Ok(Location::Blob {
            bucket,
            key: location.trim_start_matches('/'),
        }),
        None => Err(DocumentError::UnsupportedLocation(location.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_locations_pass_through() {
        assert_eq!(
            resolve_location("https://cdn.example.com/cv.pdf", None).unwrap(),
            Location::Http("https://cdn.example.com/cv.pdf")
        );
    }

    #[test]
    fn test_s3_uri_names_bucket_and_key() {
        assert_eq!(
            resolve_location("s3://resumes/2024/ada.pdf", Some("other")).unwrap(),
            Location::Blob {
                bucket: "resumes",
                key: "2024/ada.pdf"
            }
        );
    }

    #[test]
    fn test_bare_key_uses_default_bucket() {
        assert_eq!(
            resolve_location("/uploads/ada.pdf", Some("resumes")).unwrap(),
            Location::Blob {
                bucket: "resumes",
                key: "uploads/ada.pdf"
            }
        );
    }

    #[test]
    fn test_bare_key_without_bucket_is_unsupported() {
        assert!(matches!(
            resolve_location("ada.pdf", None),
            Err(DocumentError::UnsupportedLocation(_))
        ));
    }

    #[test]
    fn test_malformed_s3_uri_and_unknown_schemes_are_unsupported() {
        assert!(resolve_location("s3://bucket-only", Some("b")).is_err());
        assert!(resolve_location("ftp://host/cv.pdf", Some("b")).is_err());
    }

    async fn serve_files() -> String {
        use axum::http::StatusCode;
        use axum::routing::get;
        use axum::Router;

        let app = Router::new()
            .route("/cv.pdf", get(|| async { (StatusCode::OK, b"%PDF-1.4 stub".to_vec()) }))
            .route("/expired.pdf", get(|| async { (StatusCode::FORBIDDEN, "expired") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_http_fetch_returns_body_bytes() {
        let base = serve_files().await;
        let source = RemoteDocumentSource::new(Duration::from_secs(5), None, None);

        let bytes = source.fetch(&format!("{base}/cv.pdf")).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"%PDF-1.4 stub"));
    }

    #[tokio::test]
    async fn test_http_non_success_is_a_status_error() {
        let base = serve_files().await;
        let source = RemoteDocumentSource::new(Duration::from_secs(5), None, None);

        for (path, expected) in [("/expired.pdf", 403), ("/missing.pdf", 404)] {
            let location = format!("{base}{path}");
            let err = source.fetch(&location).await.unwrap_err();
            match err {
                DocumentError::Status { status, location: reported } => {
                    assert_eq!(status, expected);
                    assert_eq!(reported, location);
                }
                other => panic!("expected Status, got {other:?}"),
            }
        }
    }
}
