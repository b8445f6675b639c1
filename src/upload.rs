use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

use crate::error::HealthError;

/// Largest upload accepted for analysis
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Upload formats the analysis form accepts
pub const ALLOWED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// A validated food photo ready to be sent inline to the generation API.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    data: Vec<u8>,
    mime_type: &'static str,
}

impl ImagePayload {
    /// Detect the format from magic bytes, reject anything that is not a
    /// JPEG or PNG within the size limit, and make sure the image decodes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, HealthError> {
        if data.is_empty() {
            return Err(HealthError::InvalidImage("Uploaded file is empty".to_string()));
        }

        if data.len() > MAX_IMAGE_SIZE {
            return Err(HealthError::InvalidImage(format!(
                "Image too large. Max size is {} bytes",
                MAX_IMAGE_SIZE
            )));
        }

        let format = image::guess_format(&data)
            .map_err(|e| HealthError::InvalidImage(format!("Could not detect image format: {}", e)))?;

        if !ALLOWED_FORMATS.contains(&format) {
            return Err(HealthError::InvalidImage(format!(
                "Unsupported image format: {:?}. Allowed: JPEG, PNG",
                format
            )));
        }

        // Truncated or corrupt files can still carry a valid header
        image::load_from_memory_with_format(&data, format)
            .map_err(|e| HealthError::InvalidImage(format!("Failed to decode image: {}", e)))?;

        Ok(Self {
            data,
            mime_type: format.to_mime_type(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// `data:` URI for previewing the upload in the page
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}
