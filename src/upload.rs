use crate::error::{AppError, AppResult};
use crate::models::MediaKind;
use base64::Engine;
use std::fmt;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

/// Client-side size ceilings per asset class. Oversized input is rejected
/// before any encoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ProfilePhoto,
    Logo,
    Banner,
    EventImage,
    AnnouncementImage,
    GalleryImage,
    ClubMedia,
}

impl AssetKind {
    pub fn limit(&self) -> usize {
        match self {
            AssetKind::ProfilePhoto | AssetKind::Logo => 200 * KB,
            AssetKind::Banner | AssetKind::EventImage => MB,
            AssetKind::AnnouncementImage | AssetKind::GalleryImage => MB,
            AssetKind::ClubMedia => 2 * MB,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::ProfilePhoto => "profile photo",
            AssetKind::Logo => "logo",
            AssetKind::Banner => "banner",
            AssetKind::EventImage => "event image",
            AssetKind::AnnouncementImage => "announcement image",
            AssetKind::GalleryImage => "gallery image",
            AssetKind::ClubMedia => "media",
        };
        write!(f, "{name}")
    }
}

/// Encode a selected blob as a data URL, enforcing the ceiling for its
/// asset class. The MIME type is sniffed from the bytes; unknown content
/// falls back to application/octet-stream.
pub fn encode(kind: AssetKind, bytes: &[u8]) -> AppResult<String> {
    let limit = kind.limit();
    if bytes.len() > limit {
        return Err(AppError::OversizedAsset {
            kind,
            size: bytes.len(),
            limit,
        });
    }
    let mime = infer::get(bytes)
        .map(|t| t.mime_type())
        .unwrap_or("application/octet-stream");
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}

/// Image unless the bytes sniff as video.
pub fn classify(bytes: &[u8]) -> MediaKind {
    if infer::is_video(bytes) {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

/// Club gallery upload: 2MB ceiling, kind sniffed from content.
pub fn encode_media(bytes: &[u8]) -> AppResult<(MediaKind, String)> {
    let url = encode(AssetKind::ClubMedia, bytes)?;
    Ok((classify(bytes), url))
}
