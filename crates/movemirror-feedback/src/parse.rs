//! 모델 응답의 방어적 JSON 추출.
//!
//! 비전 모델은 JSON만 반환하라는 지시를 무시하고 마크다운 코드펜스나
//! 설명 문장을 덧붙이는 경우가 있다. 엄격 파싱 전 단계로 코드펜스를
//! 제거하고 첫 `{`부터 마지막 `}`까지를 후보 부분문자열로 추출한다.
//! 추출 실패는 None — 호출 측이 휴리스틱 분류기로 넘어간다.

/// 응답 텍스트에서 JSON 오브젝트 후보 부분문자열 추출.
///
/// 코드펜스(```json ... ```) 래핑을 벗기고 첫 `{`와 마지막 `}` 사이를
/// 반환한다. 중괄호 쌍이 없으면 None.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    let cleaned = cleaned.trim();

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&cleaned[start..=end])
}

/// 단어 수 상한 적용 — 초과 시 잘라내고 말줄임표 추가.
///
/// 상한 이내 텍스트는 그대로 반환한다 (공백 재조립 없음).
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        text.to_string()
    }
}
