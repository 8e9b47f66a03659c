pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Shown wherever an image path is missing.
pub const NO_IMAGE: &str = "/no-image.png";

/// Poster cards use their own placeholder.
pub const NO_POSTER: &str = "/no-movie.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    W500,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    optional_image_url(path, size).unwrap_or_else(|| NO_IMAGE.to_string())
}

pub fn poster_url(path: Option<&str>) -> String {
    optional_image_url(path, ImageSize::W500).unwrap_or_else(|| NO_POSTER.to_string())
}

/// Like [`image_url`] but leaves the fallback to the caller.
pub fn optional_image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}/{}{p}", size.as_str()))
}
