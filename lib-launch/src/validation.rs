//! Pure request validation
//!
//! Username cleaning, handle rules, image constraints and the request-level
//! checks that run before anything touches the network.

use crate::error::{LaunchError, LaunchResult};
use crate::types::{ImageUpload, LaunchRequest};
use once_cell::sync::Lazy;
use regex::Regex;

/// Largest accepted image (15 MiB)
pub const MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

/// Image MIME types accepted by the launch API
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

static PROFILE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[/.])(?:twitter|x)\.com/([A-Za-z0-9_]+)").expect("valid profile URL regex")
});

static PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid protocol regex"));

static HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid handle regex"));

fn trim_handle_noise(s: &str) -> &str {
    s.trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end()
}

/// Reduce user input to a bare handle
///
/// Strips leading `@`s and whitespace, extracts the handle from
/// `twitter.com/<handle>` / `x.com/<handle>` links, and otherwise drops any
/// protocol and path. Idempotent.
pub fn clean_username(input: &str) -> String {
    let cleaned = trim_handle_noise(input);

    if let Some(captures) = PROFILE_URL.captures(cleaned) {
        return captures[1].to_string();
    }

    let without_protocol = PROTOCOL.replace(cleaned, "");
    let head = without_protocol
        .split('/')
        .next()
        .unwrap_or_default();
    trim_handle_noise(head).to_string()
}

/// Validate a cleaned handle
///
/// Handles are 1-15 letters, digits or underscores and not all digits.
/// The empty string is valid and means no fee sharing.
pub fn validate_username(username: &str) -> LaunchResult<()> {
    if username.is_empty() {
        return Ok(());
    }

    if !HANDLE.is_match(username) {
        return Err(LaunchError::Validation(
            "Username must be 1-15 characters and contain only letters, numbers, and underscores"
                .to_string(),
        ));
    }

    if username.chars().all(|c| c.is_ascii_digit()) {
        return Err(LaunchError::Validation(
            "Username cannot be all numbers".to_string(),
        ));
    }

    Ok(())
}

/// Clean and validate a raw handle. `None` means no fee sharing was requested.
pub fn normalize_username(raw: Option<&str>) -> LaunchResult<Option<String>> {
    let cleaned = raw.map(clean_username).unwrap_or_default();
    validate_username(&cleaned)
        .map_err(|e| match e {
            LaunchError::Validation(msg) => {
                LaunchError::Validation(format!("Invalid username: {}", msg))
            }
            other => other,
        })?;
    Ok(if cleaned.is_empty() { None } else { Some(cleaned) })
}

/// Check image size and type
pub fn validate_image(image: &ImageUpload) -> LaunchResult<()> {
    if image.size() > MAX_IMAGE_BYTES {
        return Err(LaunchError::InvalidMedia(format!(
            "File size must be under 15MB ({} is {:.2}MB)",
            image.file_name,
            image.size() as f64 / 1024.0 / 1024.0
        )));
    }

    let mime = image.mime_type.trim().to_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(LaunchError::InvalidMedia(format!(
            "File must be PNG, JPG, JPEG, GIF, or WebP (got {})",
            image.mime_type
        )));
    }

    Ok(())
}

/// Request after validation, with the handle reduced to its cleaned form
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub request: LaunchRequest,
    pub username: Option<String>,
}

/// Run every pre-network check on a launch request
pub fn validate_request(request: LaunchRequest) -> LaunchResult<ValidatedRequest> {
    if request.name.trim().is_empty() || request.symbol.trim().is_empty() {
        return Err(LaunchError::Validation(
            "Token name and symbol are required".to_string(),
        ));
    }

    if request.launch_wallet.trim().is_empty() {
        return Err(LaunchError::Validation(
            "Launch wallet address is required".to_string(),
        ));
    }

    let username = normalize_username(request.social_username.as_deref())?;

    if let Some(image) = &request.image {
        validate_image(image)?;
    }

    Ok(ValidatedRequest { request, username })
}
