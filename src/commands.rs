//! Command layer between the UI and the remote provider.
//!
//! Each function runs one complete user action — encode and/or remote call —
//! and returns an outcome value. Nothing here mutates
//! [`crate::session::SessionState`]; the UI thread applies a successful
//! outcome, and drops a failed one, which is what guarantees "no partial
//! mutation on failure". The worker threads in `app` and the integration
//! tests both drive these functions directly.

use crate::client::{ApiError, ModelClient};
use crate::codec::{self, EncodeError};
use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Outcome of a successful analyze: the encoded snapshot that was sent and
/// the description that came back.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub base64_image: String,
    pub description: String,
}

/// Outcome of a successful enhancement: the hosted URL plus the downloaded
/// image bytes, ready for decoding.
#[derive(Debug, Clone)]
pub struct Enhanced {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Encode the snapshot and ask the provider to describe it. The encode step
/// short-circuits before any network traffic when it fails.
pub fn analyze(client: &ModelClient, snapshot: &RgbaImage) -> Result<Analysis, CommandError> {
    let base64_image = codec::encode_png_base64(snapshot)?;
    let description = client.describe(&codec::data_uri(&base64_image))?;
    Ok(Analysis {
        base64_image,
        description,
    })
}

pub fn create_pack(client: &ModelClient, description: &str) -> Result<String, CommandError> {
    Ok(client.generate_pack(description)?)
}

pub fn create_story(client: &ModelClient, description: &str) -> Result<String, CommandError> {
    Ok(client.generate_story(description)?)
}

/// Request the enhanced rendering, then download it so the UI can show it
/// without a second user action.
pub fn enhance(client: &ModelClient, description: &str) -> Result<Enhanced, CommandError> {
    let url = client.enhance_image(description)?;
    let bytes = client.fetch_image(&url)?;
    Ok(Enhanced { url, bytes })
}
