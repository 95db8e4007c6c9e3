// Fixed texts for the scripted career-planning flow and the report request.

/// Shown when the flow starts; asks for the first slot.
pub const ASK_INTERESTS: &str =
    "好的，我们先来做一个简短的职业规划。请告诉我你的兴趣方向（例如：数据、设计、金融、教育等）。";

pub const ASK_SKILLS: &str =
    "了解了。接下来，请简要说明你目前具备的技能或学习过的方向（例如：Python、SQL、市场分析、沟通协作等）。";

pub const ASK_GOALS: &str =
    "很好。最后，请告诉我你的职业目标（例如：数据分析师、产品经理、设计师，或你希望的行业/岗位）。";

pub const EXIT_ACK: &str = "好的，已退出职业规划流程。如果需要，随时可以重新开始。";

/// Shown when the report request is rejected before any output arrived.
pub const REPORT_RETRY: &str = "报告暂时无法生成。请重新输入你的职业目标以重试，或输入“退出”取消。";

/// Report prompt for the three-slot form.
/// Replace: {interests}, {skills}, {goals}
pub const FIELDS_REPORT_TEMPLATE: &str = "基于以下信息，为用户生成一份简短的职业规划报告（使用中文）：\n\
兴趣：{interests}\n\
技能：{skills}\n\
职业目标：{goals}\n\
报告内容应包括：\n\
1) 基于兴趣与技能的职业方向建议；\n\
2) 为实现目标需要学习或提升的关键技能；\n\
3) 近 3 个月可实行的行动计划（分步骤）。\n";

/// Report prompt for the dialogue-transcript form.
/// Replace: {transcript}
pub const TRANSCRIPT_REPORT_TEMPLATE: &str = "以下是你与用户关于职业规划的完整对话记录：\n\
{transcript}\n\
请基于这段对话，为用户生成一份简短的职业规划报告（使用中文）。报告内容应包括：\n\
0) 先总结你从对话中推断出的用户兴趣、技能与职业目标；\n\
1) 基于兴趣与技能的职业方向建议；\n\
2) 为实现目标需要学习或提升的关键技能；\n\
3) 近 3 个月可实行的行动计划（分步骤）。\n";
