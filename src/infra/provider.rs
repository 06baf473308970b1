use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderName};
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::app::media::{MediaOrigin, ProxiedMedia};
use crate::app::upload::{FormField, HostedMedia, UploadForm, UploadForwarder};
use crate::app::upstream::UpstreamError;

const SERVICE: &str = "provider";

/// Response headers relayed when serving media.
static FORWARDED_HEADERS: [HeaderName; 8] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CACHE_CONTROL,
    header::ETAG,
    header::LAST_MODIFIED,
    header::EXPIRES,
    header::ACCEPT_RANGES,
    header::CONTENT_RANGE,
];

/// Client for the Telegraph media host.
#[derive(Clone)]
pub struct TelegraphClient {
    http: reqwest::Client,
    upload_url: String,
    origin_host: String,
}

#[derive(Debug, Deserialize)]
struct UploadedSource {
    src: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadReply {
    Single(UploadedSource),
    Batch(Vec<UploadedSource>),
}

impl TelegraphClient {
    pub fn new(http: reqwest::Client, upload_url: String, origin_host: String) -> Self {
        Self {
            http,
            upload_url,
            origin_host,
        }
    }

    fn provider_url(&self, path: &str) -> String {
        format!("https://{}{}", self.origin_host, path)
    }
}

#[async_trait]
impl UploadForwarder for TelegraphClient {
    async fn forward(&self, form: &UploadForm) -> Result<HostedMedia, UpstreamError> {
        let multipart = form
            .fields()
            .iter()
            .fold(Form::new(), |multipart, field| {
                multipart.part(field.name.clone(), to_part(field))
            });

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(multipart)
            .send()
            .await
            .map_err(|err| UpstreamError::transport(SERVICE, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(SERVICE, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::transport(SERVICE, err))?;
        let path = parse_upload_reply(&body)?;

        Ok(HostedMedia {
            provider_url: self.provider_url(&path),
            path,
        })
    }
}

#[async_trait]
impl MediaOrigin for TelegraphClient {
    async fn fetch(&self, url: &Url) -> Result<ProxiedMedia, UpstreamError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| UpstreamError::transport(SERVICE, err))?;

        let status = response.status();
        let mut headers = HeaderMap::new();
        for name in FORWARDED_HEADERS.iter() {
            if let Some(value) = response.headers().get(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();

        Ok(ProxiedMedia {
            status,
            headers,
            body,
        })
    }
}

fn to_part(field: &FormField) -> Part {
    let part = || {
        let part = Part::bytes(field.data.to_vec());
        match field.file_name {
            Some(ref file_name) => part.file_name(file_name.clone()),
            None => part,
        }
    };

    match field.content_type.as_deref() {
        // an unparseable content type is dropped rather than failing the upload
        Some(content_type) => part().mime_str(content_type).unwrap_or_else(|_| part()),
        None => part(),
    }
}

/// Extracts the resource path from the provider's upload reply.
pub fn parse_upload_reply(body: &[u8]) -> Result<String, UpstreamError> {
    let reply: UploadReply = serde_json::from_slice(body)
        .map_err(|err| UpstreamError::invalid_response(SERVICE, err.to_string()))?;

    let src = match reply {
        UploadReply::Single(source) => source.src,
        UploadReply::Batch(sources) => sources
            .into_iter()
            .next()
            .map(|source| source.src)
            .ok_or_else(|| UpstreamError::invalid_response(SERVICE, "empty upload reply"))?,
    };

    if !src.starts_with('/') {
        return Err(UpstreamError::invalid_response(
            SERVICE,
            format!("resource path `{}` is not absolute", src),
        ));
    }

    Ok(src)
}
