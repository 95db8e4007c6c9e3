//! Dialogue Engine — owns the `Session` and decides what each input line does.
//!
//! Routing (first match wins): leave the career flow on an exit word →
//! continue the career flow → start it on a trigger phrase → weather lookup →
//! one-shot model reply. Every branch answers with a `FragmentStream`;
//! upstream failures become apology text and never escape this module.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::career::prompts::{ASK_GOALS, ASK_INTERESTS, ASK_SKILLS, EXIT_ACK, REPORT_RETRY};
use crate::career::report::ReportGenerator;
use crate::errors::AppError;
use crate::llm_client::prompts::SYSTEM_PROMPT;
use crate::llm_client::ChatModel;
use crate::models::conversation::CareerInfo;
use crate::models::weather::WeatherRecord;
use crate::output::{model_fragments, text_fragments, FragmentStream};
use crate::state::AppState;
use crate::weather::WeatherLookup;

pub mod city;
pub mod intent;
pub mod prompts;
pub mod session;

use city::extract_city_name;
use intent::{Intent, Keywords};
use prompts::{ASK_CITY, WEATHER_UNAVAILABLE};
use session::{CareerStep, Session};

pub struct DialogueEngine {
    session: Session,
    keywords: Keywords,
    llm: Arc<dyn ChatModel>,
    weather: Arc<dyn WeatherLookup>,
    reports: ReportGenerator,
    weather_language: String,
}

impl DialogueEngine {
    pub fn new(state: &AppState) -> Self {
        Self {
            session: Session::new(),
            keywords: Keywords::default(),
            llm: state.llm.clone(),
            weather: state.weather.clone(),
            reports: ReportGenerator::new(state.llm.clone()),
            weather_language: state.config.weather_language.clone(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Processes one input line and returns what to show, fragment by fragment.
    pub async fn handle_input(&mut self, text: &str) -> FragmentStream {
        let intent = self.keywords.classify(self.session.mode(), text);
        debug!("Routing input as {:?} (mode {:?})", intent, self.session.mode());

        match intent {
            Intent::ExitCareer => {
                self.session.reset();
                text_fragments(EXIT_ACK)
            }
            Intent::ContinueCareer => self.continue_career(text.trim()).await,
            Intent::StartCareer => {
                self.session.start_career();
                text_fragments(ASK_INTERESTS)
            }
            Intent::Weather => self.answer_weather(text).await,
            Intent::General => self.answer_general(text).await,
        }
    }

    async fn continue_career(&mut self, answer: &str) -> FragmentStream {
        match self.session.advance(answer) {
            Some(CareerStep::AskSkills) => text_fragments(ASK_SKILLS),
            Some(CareerStep::AskGoals) => text_fragments(ASK_GOALS),
            Some(CareerStep::Complete(fields)) => {
                info!("Career slots collected, requesting report");
                match self
                    .reports
                    .generate(&CareerInfo::Fields(fields.clone()))
                    .await
                {
                    Ok(report) => report,
                    Err(e) => {
                        self.session.reopen_goals(fields);
                        let message = AppError::from(e).user_message();
                        text_fragments(&format!("{message}\n{REPORT_RETRY}"))
                    }
                }
            }
            None => {
                warn!("Career answer arrived while idle; replying as a general query");
                self.answer_general(answer).await
            }
        }
    }

    async fn answer_weather(&self, text: &str) -> FragmentStream {
        let Some(city) = extract_city_name(text, &self.keywords) else {
            return text_fragments(ASK_CITY);
        };

        info!("Looking up weather for '{city}'");
        match self.weather.get_weather(&city, &self.weather_language).await {
            Some(record) => text_fragments(&format_weather(&record)),
            None => text_fragments(WEATHER_UNAVAILABLE),
        }
    }

    async fn answer_general(&self, text: &str) -> FragmentStream {
        match self.llm.stream_completion(SYSTEM_PROMPT, text).await {
            Ok(reply) => model_fragments(reply),
            Err(e) => text_fragments(&AppError::from(e).user_message()),
        }
    }
}

pub fn format_weather(record: &WeatherRecord) -> String {
    format!(
        "{} 当前天气：\n- 温度：{}℃\n- 天气：{}\n- 观测时间：{}\n",
        record.city,
        format_temperature(record.temperature_c),
        record.description,
        record.observed_at
    )
}

/// Always shows at least one decimal place: `20.0`, `2.3`, `-4.25`.
fn format_temperature(celsius: f64) -> String {
    if celsius.fract() == 0.0 && celsius.is_finite() {
        format!("{celsius:.1}")
    } else {
        format!("{celsius}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::{Role, Turn};
    use crate::output::collect_text;
    use crate::testing::{beijing, test_state, FixedWeather, ScriptedModel};
    use session::Mode;

    fn engine(llm: Arc<ScriptedModel>, weather: Arc<FixedWeather>) -> DialogueEngine {
        DialogueEngine::new(&test_state(llm, weather))
    }

    async fn say(engine: &mut DialogueEngine, text: &str) -> String {
        collect_text(engine.handle_input(text).await).await
    }

    fn user_text(call: &[Turn]) -> &str {
        call.iter()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_weather_end_to_end() {
        let llm = ScriptedModel::replying(vec![]);
        let weather = FixedWeather::new(Some(beijing()));
        let mut engine = engine(llm.clone(), weather.clone());

        let output = say(&mut engine, "北京天气").await;

        assert!(output.contains(
            "北京 当前天气：\n- 温度：2.3℃\n- 天气：多云\n- 观测时间：2025-12-22T10:00\n"
        ));
        assert_eq!(weather.queries(), vec!["北京".to_string()]);
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_weather_unavailable_apologises_without_model_call() {
        let llm = ScriptedModel::replying(vec!["不应调用"]);
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather.clone());

        let output = say(&mut engine, "查询火星城天气").await;

        assert_eq!(output, format!("{WEATHER_UNAVAILABLE}\n"));
        assert_eq!(weather.queries(), vec!["火星城".to_string()]);
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_weather_without_city_asks_for_one() {
        let llm = ScriptedModel::replying(vec!["不应调用"]);
        let weather = FixedWeather::new(Some(beijing()));
        let mut engine = engine(llm.clone(), weather.clone());

        let output = say(&mut engine, "今天天气怎么样").await;

        assert_eq!(output, format!("{ASK_CITY}\n"));
        assert!(weather.queries().is_empty());
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_career_flow_collects_three_slots_then_reports_once() {
        let llm = ScriptedModel::replying(vec!["## 职业规划报告", "\n内容"]);
        let weather = FixedWeather::new(Some(beijing()));
        let mut engine = engine(llm.clone(), weather.clone());

        let opening = say(&mut engine, "我想做职业规划").await;
        assert_eq!(opening, format!("{ASK_INTERESTS}\n"));
        assert_eq!(engine.session().mode(), Mode::CareerInterest);

        assert_eq!(say(&mut engine, " 数据 ").await, format!("{ASK_SKILLS}\n"));
        assert_eq!(say(&mut engine, "Python、SQL").await, format!("{ASK_GOALS}\n"));
        let report = say(&mut engine, "数据分析师").await;

        assert_eq!(report, "## 职业规划报告\n内容\n");
        assert_eq!(engine.session().mode(), Mode::Idle);

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], Turn::system(SYSTEM_PROMPT));
        let prompt = user_text(&calls[0]);
        assert!(prompt.contains("兴趣：数据\n"));
        assert!(prompt.contains("技能：Python、SQL\n"));
        assert!(prompt.contains("职业目标：数据分析师\n"));

        // a fourth input is routed from the top again
        say(&mut engine, "北京天气").await;
        assert_eq!(weather.queries(), vec!["北京".to_string()]);
        assert_eq!(llm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_career_answers_are_not_routed_elsewhere() {
        let llm = ScriptedModel::replying(vec![]);
        let weather = FixedWeather::new(Some(beijing()));
        let mut engine = engine(llm.clone(), weather.clone());

        say(&mut engine, "职业建议").await;
        let output = say(&mut engine, "北京天气").await;

        assert_eq!(output, format!("{ASK_SKILLS}\n"));
        assert_eq!(engine.session().fields().interests, "北京天气");
        assert!(weather.queries().is_empty());
    }

    #[tokio::test]
    async fn test_exit_word_leaves_career_flow() {
        let llm = ScriptedModel::replying(vec!["你好"]);
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather);

        say(&mut engine, "规划报告").await;
        say(&mut engine, "设计").await;
        let output = say(&mut engine, "退出").await;

        assert_eq!(output, format!("{EXIT_ACK}\n"));
        assert_eq!(engine.session().mode(), Mode::Idle);
        assert_eq!(engine.session().fields().interests, "");
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_exit_word_while_idle_is_a_normal_query() {
        let llm = ScriptedModel::replying(vec!["好的"]);
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather);

        let output = say(&mut engine, "停止").await;

        assert_eq!(output, "好的\n");
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(user_text(&calls[0]), "停止");
    }

    #[tokio::test]
    async fn test_generic_reply_is_one_shot() {
        let llm = ScriptedModel::replying(vec!["你", "好"]);
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather);

        assert_eq!(say(&mut engine, "你好").await, "你好\n");
        say(&mut engine, "再说一次").await;

        let calls = llm.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], vec![Turn::system(SYSTEM_PROMPT), Turn::user("再说一次")]);
    }

    #[tokio::test]
    async fn test_generic_failure_keeps_session_and_apologises() {
        let llm = ScriptedModel::failing();
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm, weather);

        let output = say(&mut engine, "讲个故事").await;

        assert!(output.contains("抱歉"));
        assert_eq!(engine.session().mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn test_report_failure_reopens_goals_slot() {
        let llm = ScriptedModel::failing();
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather);

        say(&mut engine, "职业规划").await;
        say(&mut engine, "教育").await;
        say(&mut engine, "沟通").await;
        let output = say(&mut engine, "讲师").await;

        assert!(output.contains(REPORT_RETRY));
        assert_eq!(engine.session().mode(), Mode::CareerGoals);
        assert_eq!(engine.session().fields().interests, "教育");
        assert_eq!(engine.session().fields().skills, "沟通");

        // resending goals retries the report
        say(&mut engine, "培训讲师").await;
        assert_eq!(llm.calls().len(), 2);
        assert!(user_text(&llm.calls()[1]).contains("职业目标：培训讲师"));
    }

    #[test]
    fn test_format_weather_line_order() {
        let text = format_weather(&beijing());
        let city = text.find("北京").unwrap();
        let temperature = text.find("温度：2.3").unwrap();
        let description = text.find("天气：多云").unwrap();
        let observed = text.find("观测时间：2025-12-22T10:00").unwrap();
        assert!(city < temperature && temperature < description && description < observed);
    }

    #[test]
    fn test_format_weather_keeps_decimal_on_whole_degrees() {
        let record = WeatherRecord {
            temperature_c: 20.0,
            ..beijing()
        };
        assert!(format_weather(&record).contains("- 温度：20.0℃\n"));
        assert_eq!(format_temperature(-4.0), "-4.0");
        assert_eq!(format_temperature(2.3), "2.3");
        assert_eq!(format_temperature(-4.25), "-4.25");
    }

    #[tokio::test]
    async fn test_career_answer_while_idle_falls_back_to_general_reply() {
        let llm = ScriptedModel::replying(vec!["好"]);
        let weather = FixedWeather::new(None);
        let mut engine = engine(llm.clone(), weather);

        let output = collect_text(engine.continue_career("数据").await).await;

        assert_eq!(output, "好\n");
        assert_eq!(engine.session().mode(), Mode::Idle);
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(user_text(&calls[0]), "数据");
    }
}
