//! Media store backed by the Cloudinary upload API

// Use 3rd party
use chrono::Utc;
use reqwest::blocking::{
    Client, RequestBuilder, Response,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};

// Use built-in library
use std::collections::BTreeMap;

// Use internal modules
use super::{MediaError, MediaKey, MediaStore};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

// audio is handled as the "video" resource type
const RESOURCE_TYPE: &str = "video";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Hex encoded SHA-256 over the parameters, sorted by name and joined
/// as `a=1&b=2`, immediately followed by the api secret.
pub fn signature(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug)]
pub struct CloudinaryStore {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    pub fn new(
        api_base: Option<String>,
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/{RESOURCE_TYPE}/{action}",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// adds timestamp, api key and signature to the parameters of a call
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = signature(&params, &self.api_secret);

        let mut signed = params.into_iter().collect::<Vec<_>>();
        signed.push(("api_key", self.api_key.clone()));
        signed.push(("signature", signature));
        signed.push(("signature_algorithm", "sha256".to_string()));
        signed
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, MediaError> {
        let response = request.send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(MediaError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl MediaStore for CloudinaryStore {
    fn upload(&self, key: &MediaKey, file_name: &str, data: &[u8]) -> Result<String, MediaError> {
        let params = BTreeMap::from([
            ("overwrite", "true".to_string()),
            ("public_id", key.to_string()),
        ]);

        let form = self
            .signed(params)
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part(
                "file",
                Part::bytes(data.to_vec()).file_name(file_name.to_string()),
            );

        log::debug!("uploading {} bytes to cloudinary as {key}", data.len());

        let response = self.send(self.client.post(self.endpoint("upload")).multipart(form))?;
        let uploaded: UploadResponse = serde_json::from_str(&response.text()?)?;

        Ok(uploaded.secure_url)
    }

    fn delete(&self, key: &MediaKey) -> Result<(), MediaError> {
        let params = BTreeMap::from([("public_id", key.to_string())]);

        log::debug!("deleting {key} from cloudinary");

        let response = self.send(
            self.client
                .post(self.endpoint("destroy"))
                .form(&self.signed(params)),
        )?;
        let destroyed: DestroyResponse = serde_json::from_str(&response.text()?)?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => Err(MediaError::NotFound(key.clone())),
            other => Err(MediaError::Rejected {
                status: 200,
                message: format!("unexpected destroy result '{other}'"),
            }),
        }
    }
}
