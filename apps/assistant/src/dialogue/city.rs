use crate::dialogue::intent::Keywords;

/// Pulls a city name out of a weather request, e.g. `查询北京天气` → `北京`,
/// `weather in Tokyo` → `Tokyo`. Pure; returns `None` when nothing is left.
pub fn extract_city_name(text: &str, keywords: &Keywords) -> Option<String> {
    let s = text.trim();
    let marker = keywords.weather_marker.as_str();

    if let Some(before_marker) = s.strip_suffix(marker) {
        if let Some(filler) = keywords
            .query_fillers
            .iter()
            .find(|filler| s.contains(filler.as_str()))
        {
            return non_empty(&s.replace(filler.as_str(), "").replace(marker, ""));
        }
        return non_empty(before_marker);
    }

    // ASCII lowercasing keeps byte offsets, so the remainder keeps its casing.
    let lowered = s.to_ascii_lowercase();
    let phrase = keywords.weather_in_phrase.as_str();
    if let Some(pos) = lowered.find(phrase) {
        return non_empty(&s[pos + phrase.len()..]);
    }

    None
}

fn non_empty(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
