//! Output fragments — everything the assistant says is a `FragmentStream`.
//!
//! Fixed texts are cut into short fragments so they render with the same
//! typewriter effect as model output. The terminal side only iterates the
//! stream; nothing here touches stdout.

use futures::stream::{self, BoxStream, StreamExt};

use crate::errors::AppError;
use crate::llm_client::TextStream;

/// Incremental output of one turn. Finite, consumed once, in order.
pub type FragmentStream = BoxStream<'static, String>;

/// Characters per fragment when streaming fixed text.
const CHUNK_CHARS: usize = 8;

/// Splits `text` into fragments of at most `size` characters.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Streams a fixed text followed by a newline fragment.
pub fn text_fragments(text: &str) -> FragmentStream {
    let mut fragments = chunk_text(text, CHUNK_CHARS);
    fragments.push("\n".to_string());
    stream::iter(fragments).boxed()
}

/// Adapts a model stream for display. A failure mid-stream becomes a final
/// apology fragment; a newline fragment always closes the output.
pub fn model_fragments(text: TextStream) -> FragmentStream {
    text.scan(false, |failed, item| {
        let next = if *failed {
            None
        } else {
            match item {
                Ok(fragment) => Some(fragment),
                Err(e) => {
                    *failed = true;
                    Some(format!("\n{}", AppError::from(e).user_message()))
                }
            }
        };
        futures::future::ready(next)
    })
    .chain(stream::once(futures::future::ready("\n".to_string())))
    .boxed()
}

#[cfg(test)]
pub async fn collect_text(stream: FragmentStream) -> String {
    stream.collect::<Vec<_>>().await.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_chunk_text_counts_characters_not_bytes() {
        let chunks = chunk_text("请告诉我要查询的城市名称", 8);
        assert_eq!(chunks, vec!["请告诉我要查询的".to_string(), "城市名称".to_string()]);
    }

    #[test]
    fn test_chunk_text_empty() {
        assert!(chunk_text("", 8).is_empty());
    }

    #[tokio::test]
    async fn test_text_fragments_end_with_newline() {
        let fragments: Vec<String> = text_fragments("abcdefghij").collect().await;
        assert_eq!(fragments, vec!["abcdefgh", "ij", "\n"]);
    }

    #[tokio::test]
    async fn test_model_fragments_passes_text_through() {
        let model: TextStream =
            stream::iter(vec![Ok("一".to_string()), Ok("二".to_string())]).boxed();
        let fragments: Vec<String> = model_fragments(model).collect().await;
        assert_eq!(fragments, vec!["一", "二", "\n"]);
    }

    #[tokio::test]
    async fn test_model_fragments_stops_after_first_error() {
        let model: TextStream = stream::iter(vec![
            Ok("部分".to_string()),
            Err(LlmError::MissingApiKey),
            Ok("不应出现".to_string()),
        ])
        .boxed();
        let text = collect_text(model_fragments(model)).await;
        assert!(text.starts_with("部分\n"));
        assert!(text.contains("OPENAI_API_KEY"));
        assert!(!text.contains("不应出现"));
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_model_fragments_empty_model_output_is_just_newline() {
        let model: TextStream = stream::empty().boxed();
        let fragments: Vec<String> = model_fragments(model).collect().await;
        assert_eq!(fragments, vec!["\n"]);
    }
}
