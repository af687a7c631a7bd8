//! S3 client configuration and the S3-backed object store.

use async_trait::async_trait;
use at_error::{DownloadError, Result, ScanError};
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::types::Object;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{ListPage, ObjectStore};
use crate::ObjectDescriptor;

/// Configuration for S3 access.
///
/// Every field is optional; unset fields fall back to the AWS SDK's default
/// provider chain (environment, shared config files, instance metadata).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack or MinIO)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl S3Config {
    /// Create a configuration that relies entirely on the default chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Create an S3 client from configuration.
///
/// Fails with [`ScanError::Config`] when no region can be resolved.
pub async fn create_s3_client(config: &S3Config) -> Result<Client> {
    use aws_config::Region;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "attrscan");
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;

    let Some(region) = sdk_config.region() else {
        return Err(ScanError::Config(
            "failed to load SDK config: no AWS region configured".to_string(),
        ));
    };
    debug!(region = %region, endpoint = ?config.endpoint, "Loaded AWS configuration");

    let builder = aws_sdk_s3::config::Builder::from(&sdk_config);

    // Path-style addressing for custom endpoints
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Ok(Client::from_conf(s3_config))
}

/// [`ObjectStore`] backed by the AWS S3 API.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an existing S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>) -> Result<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(bucket);

        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ScanError::List(format!("{}", DisplayErrorContext(&e))))?;

        let mut objects = Vec::with_capacity(resp.contents().len());
        for obj in resp.contents() {
            if let Some(descriptor) = descriptor_from_object(obj)? {
                objects.push(descriptor);
            }
        }

        let next_token = next_page_token(&resp)?;

        trace!(
            bucket = bucket,
            objects = objects.len(),
            more = next_token.is_some(),
            "Listed page"
        );

        Ok(ListPage {
            objects,
            next_token,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        debug!(bucket = bucket, key = key, "Downloading object from S3");

        let result = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let source = match e.as_service_error() {
                    Some(service_error) if service_error.is_no_such_key() => {
                        DownloadError::NotFound
                    }
                    _ if e.code() == Some("AccessDenied") => DownloadError::AccessDenied(
                        e.message().unwrap_or("AccessDenied").to_string(),
                    ),
                    _ => DownloadError::Transfer(format!("{}", DisplayErrorContext(&e))),
                };
                ScanError::download(key, source)
            })?;

        let bytes = result.body.collect().await.map_err(|e| {
            ScanError::download(
                key,
                DownloadError::Transfer(format!("failed to read body: {e}")),
            )
        })?;

        let data = bytes.into_bytes();
        trace!(bucket = bucket, key = key, size = data.len(), "Downloaded object");

        Ok(data)
    }
}

/// Continuation token for the page after `resp`, or `None` on the last page.
///
/// A truncated response must carry a token; otherwise the rest of the
/// listing would be silently lost.
fn next_page_token(resp: &ListObjectsV2Output) -> Result<Option<String>> {
    if resp.is_truncated() != Some(true) {
        return Ok(None);
    }

    match resp.next_continuation_token() {
        Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
        _ => Err(ScanError::List(
            "listing truncated without a continuation token".to_string(),
        )),
    }
}

/// Convert a listing entry into a descriptor.
///
/// Entries without a key are skipped. An entry without a last-modified
/// timestamp is rejected so every descriptor carries a valid one.
fn descriptor_from_object(obj: &Object) -> Result<Option<ObjectDescriptor>> {
    let Some(key) = obj.key().filter(|k| !k.is_empty()) else {
        return Ok(None);
    };

    let last_modified = obj
        .last_modified()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
        .ok_or_else(|| {
            ScanError::List(format!("object '{key}' has no valid last-modified timestamp"))
        })?;

    Ok(Some(ObjectDescriptor {
        key: key.to_string(),
        last_modified,
        size: obj.size().unwrap_or(0).max(0) as u64,
    }))
}
