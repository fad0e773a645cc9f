//! data URL 코덱.
//!
//! 웹캠 스냅샷과 모델 요청 이미지는 `data:image/<fmt>;base64,<payload>`
//! 문자열로 운반된다. 파싱 실패는 에러가 아니라 None — 호출 측이
//! fail-open(원본 유지)으로 처리할 수 있도록 한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};

/// data URL 접두사
const PREFIX: &str = "data:image/";
/// 포맷 태그와 페이로드의 구분자
const SEPARATOR: &str = ";base64,";

/// 파싱된 data URL — 포맷 태그 + 디코딩된 바이트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// 이미지 포맷 태그 (예: "jpeg", "png", "webp")
    pub format: String,
    /// base64 디코딩된 이미지 바이트
    pub bytes: Vec<u8>,
}

/// data URL 파싱. 래퍼 패턴 불일치 또는 base64 디코딩 실패 시 None.
pub fn parse(data_url: &str) -> Option<DataUrl> {
    let rest = data_url.strip_prefix(PREFIX)?;
    let (format, payload) = rest.split_once(SEPARATOR)?;

    if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let bytes = B64.decode(payload).ok()?;
    Some(DataUrl {
        format: format.to_ascii_lowercase(),
        bytes,
    })
}

/// 포맷 태그와 바이트로 data URL 조립
pub fn build(format: &str, bytes: &[u8]) -> String {
    format!("{PREFIX}{format}{SEPARATOR}{}", B64.encode(bytes))
}
