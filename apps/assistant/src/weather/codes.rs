//! WMO weather interpretation codes as reported by Open-Meteo.

/// Maps a weather code to its Chinese description.
/// Missing codes read as `未知`; codes outside the table keep their number.
pub fn code_to_description(code: Option<i64>) -> String {
    let Some(code) = code else {
        return "未知".to_string();
    };

    let description = match code {
        0 => "晴空",
        1 => "多云少",
        2 => "多云",
        3 => "阴",
        45 => "雾",
        48 => "霜雾",
        51 => "毛毛雨：弱",
        53 => "毛毛雨：中",
        55 => "毛毛雨：强",
        56 => "冻毛毛雨：弱",
        57 => "冻毛毛雨：强",
        61 => "小雨",
        63 => "中雨",
        65 => "大雨",
        66 => "冻雨：弱",
        67 => "冻雨：强",
        71 => "小雪",
        73 => "中雪",
        75 => "大雪",
        77 => "冰粒",
        80 => "阵雨：弱",
        81 => "阵雨：中",
        82 => "阵雨：强",
        85 => "阵雪：弱",
        86 => "阵雪：强",
        95 => "雷暴",
        96 => "雷暴伴轻微冰雹",
        99 => "雷暴伴强烈冰雹",
        other => return format!("未知天气({other})"),
    };
    description.to_string()
}
