use crate::models::{Image, Property};
use reqwest::Url;

/// Shown when a property has no displayable image
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder-property.jpg";

/// Shown in place of an image URL that fails validation
pub const FALLBACK_IMAGE: &str = "/placeholder-property.svg";

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// URL of the primary image: enabled main image, else first enabled, else placeholder
pub fn main_image(property: &Property) -> &str {
    property
        .images
        .iter()
        .find(|img| img.enabled && img.is_main)
        .or_else(|| property.images.iter().find(|img| img.enabled))
        .map(|img| img.url.as_str())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// Gallery images in display order
pub fn enabled_images(property: &Property) -> Vec<&Image> {
    property.images.iter().filter(|img| img.enabled).collect()
}

/// Absolute http(s) URL pointing at a known image extension
pub fn is_valid_image_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let path = parsed.path().to_ascii_lowercase();
    path.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

pub fn image_url(url: Option<&str>) -> &str {
    match url {
        Some(url) if is_valid_image_url(url) => url,
        _ => FALLBACK_IMAGE,
    }
}
