//! 이미지 인코더.
//!
//! 포맷 태그 보존 재인코딩(jpeg/png/webp)과 추출 프레임의
//! JPEG data URL 변환을 담당한다.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use movemirror_core::error::CoreError;
use movemirror_core::models::frame::PixelFrame;
use tracing::debug;

use crate::data_url;
use crate::normalize;

/// JPEG 인코딩 품질
const JPEG_QUALITY: u8 = 85;
/// WebP 인코딩 품질
const WEBP_QUALITY: f32 = 80.0;

/// 이미지를 지정 포맷 태그로 인코딩.
///
/// 지원 태그: jpeg/jpg, png, webp. 그 외 태그는 에러 —
/// 호출 측(data URL 정규화)은 원본 유지로 처리한다.
pub fn encode_image(image: &DynamicImage, format: &str) -> Result<Vec<u8>, CoreError> {
    match format.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => encode_jpeg(image),
        "png" => {
            let mut buffer = Cursor::new(Vec::new());
            image
                .write_to(&mut buffer, ImageFormat::Png)
                .map_err(|e| CoreError::Image(format!("PNG 인코딩 실패: {e}")))?;
            Ok(buffer.into_inner())
        }
        "webp" => {
            let rgba = image.to_rgba8();
            let encoder = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height());
            Ok(encoder.encode(WEBP_QUALITY).to_vec())
        }
        other => Err(CoreError::Image(format!("지원하지 않는 포맷 태그: {other}"))),
    }
}

/// JPEG 인코딩 — 알파 채널 제거 후 인코딩
fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, CoreError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CoreError::Image(format!("JPEG 인코딩 실패: {e}")))?;
    Ok(buffer.into_inner())
}

/// 추출된 픽셀 프레임을 정규화된 JPEG data URL로 인코딩.
///
/// 참조 프레임은 비전 모델 전송 직전 단계에서만 이 경로를 거치므로
/// 항상 전송 한도(max_width/max_height) 이하로 다운스케일된다.
pub fn frame_to_data_url(
    frame: &PixelFrame,
    max_width: u32,
    max_height: u32,
) -> Result<String, CoreError> {
    let rgb = RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| CoreError::Image("픽셀 버퍼 크기 불일치".to_string()))?;
    let image = DynamicImage::ImageRgb8(rgb);

    let normalized = normalize::normalize_image(&image, max_width, max_height)?;
    let encoded = encode_jpeg(&normalized)?;
    let url = data_url::build("jpeg", &encoded);

    debug!(
        "참조 프레임 인코딩: {}x{} → {}자 data URL",
        frame.width,
        frame.height,
        url.len()
    );
    Ok(url)
}
