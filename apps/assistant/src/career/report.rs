//! Report Generator — turns collected career information into one streamed report.
//!
//! Flow: build prompt from `CareerInfo` → one streaming completion with the
//! system prompt → fragments in order → trailing newline.

use std::sync::Arc;

use tracing::info;

use crate::career::prompts::{FIELDS_REPORT_TEMPLATE, TRANSCRIPT_REPORT_TEMPLATE};
use crate::llm_client::prompts::SYSTEM_PROMPT;
use crate::llm_client::{ChatModel, LlmError};
use crate::models::conversation::{CareerInfo, Role, Turn};
use crate::output::{model_fragments, FragmentStream};

#[derive(Clone)]
pub struct ReportGenerator {
    llm: Arc<dyn ChatModel>,
}

impl ReportGenerator {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Opens the report stream. Errors here mean nothing was produced;
    /// failures after the first fragment end the stream with an apology instead.
    pub async fn generate(&self, info: &CareerInfo) -> Result<FragmentStream, LlmError> {
        let prompt = build_report_prompt(info);
        info!("Requesting career report ({} prompt chars)", prompt.chars().count());

        let text = self.llm.stream_completion(SYSTEM_PROMPT, &prompt).await?;
        Ok(model_fragments(text))
    }
}

pub fn build_report_prompt(info: &CareerInfo) -> String {
    match info {
        CareerInfo::Fields(fields) => FIELDS_REPORT_TEMPLATE
            .replace("{interests}", &fields.interests)
            .replace("{skills}", &fields.skills)
            .replace("{goals}", &fields.goals),
        CareerInfo::Transcript(turns) => {
            TRANSCRIPT_REPORT_TEMPLATE.replace("{transcript}", &format_transcript(turns))
        }
    }
}

/// One line per turn, `用户：…` / `助理：…`. System turns are instructions, not dialogue.
fn format_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .filter_map(|turn| {
            let speaker = match turn.role {
                Role::User => "用户",
                Role::Assistant => "助理",
                Role::System => return None,
            };
            Some(format!("{speaker}：{}", turn.content))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
