// Fixed texts for the weather routine.

pub const ASK_CITY: &str = "请告诉我要查询的城市名称，例如：上海天气。";

pub const WEATHER_UNAVAILABLE: &str = "抱歉，我暂时无法获取该城市的实时天气，请稍后再试。";
