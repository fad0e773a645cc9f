//! 이미지 정규화.
//!
//! 임의 해상도 이미지를 전송 전 최대 크기(기본 640x480) 이하로
//! 다운스케일한다. fast_image_resize 기반 고속 리사이즈.
//!
//! 규칙:
//! - 두 치수 모두 한도 이내면 입력을 그대로 반환 (재인코딩 없음)
//! - 초과 시 단일 균등 배율 `min(max_w/w, max_h/h)`로 종횡비 보존 축소
//! - 업스케일 금지
//! - data URL 변형은 어떤 실패도 원본 반환 (fail-open) — 호출자는
//!   정규화가 절대 실패하지 않는다고 가정한다

use fast_image_resize::{images::Image as FirImage, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};
use movemirror_core::error::CoreError;
use tracing::debug;

use crate::data_url;
use crate::encoder;

/// 한도 초과 시 목표 크기 계산. 이미 한도 이내면 None (변경 불필요).
///
/// 단일 균등 배율로 종횡비를 보존하며, 결과 치수는 최소 1픽셀.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * scale) as u32).max(1);
    let new_height = ((height as f64 * scale) as u32).max(1);
    Some((new_width, new_height))
}

/// 고속 리사이즈 (bilinear convolution)
pub fn resize_frame(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<DynamicImage, CoreError> {
    let (src_w, src_h) = (image.width(), image.height());

    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Image("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Image("목표 이미지 크기 0".to_string()));
    }
    if src_w == width && src_h == height {
        return Ok(image.clone());
    }

    let src_rgba = image.to_rgba8();
    let src_image = FirImage::from_vec_u8(
        src_w,
        src_h,
        src_rgba.into_raw(),
        fast_image_resize::PixelType::U8x4,
    )
    .map_err(|e| CoreError::Image(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, fast_image_resize::PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Image(format!("리사이즈 실패: {e}")))?;

    let result = RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Image("결과 이미지 생성 실패".to_string()))?;

    debug!("이미지 리사이즈: {}x{} → {}x{}", src_w, src_h, width, height);

    Ok(DynamicImage::ImageRgba8(result))
}

/// 디코딩된 이미지 정규화 — 한도 이내면 그대로 반환
pub fn normalize_image(
    image: &DynamicImage,
    max_width: u32,
    max_height: u32,
) -> Result<DynamicImage, CoreError> {
    match fit_within(image.width(), image.height(), max_width, max_height) {
        Some((w, h)) => resize_frame(image, w, h),
        None => Ok(image.clone()),
    }
}

/// data URL 이미지 정규화.
///
/// 파싱 → 디코딩 → 리사이즈 → 동일 포맷 재인코딩 → data URL 재조립.
/// 래퍼 불일치, 디코딩/인코딩 실패, 이미 한도 이내인 경우 모두
/// 원본 문자열을 그대로 반환한다 (바이트 동일).
pub fn normalize_data_url(url: &str, max_width: u32, max_height: u32) -> String {
    let Some(parsed) = data_url::parse(url) else {
        debug!("data URL 형식 아님 — 원본 유지");
        return url.to_string();
    };

    let Ok(image) = image::load_from_memory(&parsed.bytes) else {
        debug!("data URL 이미지 디코딩 실패 — 원본 유지");
        return url.to_string();
    };

    let Some((new_w, new_h)) = fit_within(image.width(), image.height(), max_width, max_height)
    else {
        debug!("이미지 이미 한도 이내 — 리사이즈 불필요");
        return url.to_string();
    };

    let Ok(resized) = resize_frame(&image, new_w, new_h) else {
        return url.to_string();
    };

    let Ok(encoded) = encoder::encode_image(&resized, &parsed.format) else {
        debug!("리사이즈 이미지 재인코딩 실패 — 원본 유지");
        return url.to_string();
    };

    let normalized = data_url::build(&parsed.format, &encoded);
    debug!(
        "data URL 정규화: {}자 → {}자 ({}x{} → {}x{})",
        url.len(),
        normalized.len(),
        image.width(),
        image.height(),
        new_w,
        new_h
    );
    normalized
}
