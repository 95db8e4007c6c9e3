//! Terminal front end: reads one line at a time, hands it to the dialogue
//! engine and renders the reply fragments as they arrive.

use std::future::Future;
use std::io::{self, Write};

use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::dialogue::DialogueEngine;
use crate::errors::AppError;
use crate::output::{text_fragments, FragmentStream};

pub const WELCOME: &str =
    "你好，我是你的个人助理。你可以试试：\n- 查询北京天气\n- 开始职业规划\n(输入 exit/quit 退出)";

pub const MISSING_KEY_WARNING: &str =
    "警告：未检测到 OPENAI_API_KEY，职业规划报告将不可用。请在运行前设置环境变量。";

const FAREWELL: &str = "再见，祝你一切顺利！";
const INTERRUPTED: &str = "\n已中断，欢迎下次继续交流。";
const PROMPT_MARKER: &str = "> ";

/// Writes fragments in order, flushing after each so they appear immediately.
pub async fn render<W: Write>(mut fragments: FragmentStream, out: &mut W) -> io::Result<()> {
    while let Some(fragment) = fragments.next().await {
        out.write_all(fragment.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

fn is_quit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

/// Runs the read-eval-print loop until `exit`/`quit`, end of input, or `interrupt`
/// resolves. Errors inside a turn are shown and the loop carries on.
pub async fn run<R, W, I>(
    engine: &mut DialogueEngine,
    mut input: R,
    out: &mut W,
    interrupt: I,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    render(text_fragments(WELCOME), out).await?;

    loop {
        out.write_all(PROMPT_MARKER.as_bytes())?;
        out.flush()?;

        let mut raw = Vec::new();
        let read = tokio::select! {
            read = input.read_until(b'\n', &mut raw) => Some(read?),
            _ = &mut interrupt => None,
        };
        let Some(read) = read else {
            render(text_fragments(INTERRUPTED), out).await?;
            return Ok(());
        };
        if read == 0 {
            info!("Input closed");
            return Ok(());
        }

        // an undecodable line costs only that line
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("Discarding input line that is not valid UTF-8");
                let error = AppError::from(io::Error::new(io::ErrorKind::InvalidData, e));
                render(text_fragments(&error.user_message()), out).await?;
                continue;
            }
        };

        let input = line.trim();
        if is_quit(input) {
            render(text_fragments(FAREWELL), out).await?;
            return Ok(());
        }
        if input.is_empty() {
            continue;
        }

        let outcome = tokio::select! {
            result = run_turn(engine, input, out) => Some(result),
            _ = &mut interrupt => None,
        };
        match outcome {
            Some(Ok(())) => {}
            Some(Err(e)) => render(text_fragments(&e.user_message()), out).await?,
            None => {
                render(text_fragments(INTERRUPTED), out).await?;
                return Ok(());
            }
        }
    }
}

async fn run_turn<W: Write>(
    engine: &mut DialogueEngine,
    input: &str,
    out: &mut W,
) -> Result<(), AppError> {
    let fragments = engine.handle_input(input).await;
    render(fragments, out).await?;
    Ok(())
}
