//! 픽셀 프레임 모델.
//!
//! 프레임 추출기가 반환하는 원시 픽셀 버퍼. RGB8, row-major.

/// 원시 픽셀 프레임 (RGB8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    /// 너비 (픽셀)
    pub width: u32,
    /// 높이 (픽셀)
    pub height: u32,
    /// RGB8 픽셀 데이터 (width * height * 3 바이트)
    pub data: Vec<u8>,
}

impl PixelFrame {
    /// 새 프레임 생성. 버퍼 길이가 크기와 맞지 않으면 None.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// 단색 프레임 생성 (테스트/스텁용)
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }
}
