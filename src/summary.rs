use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::github::{ChangedFile, CommentSink, PostOutcome};
use crate::llm::{ChatModel, ChatRequest};
use crate::pacing::RateLimiter;
use crate::prompts;

const SUMMARY_MAX_TOKENS: u32 = 1500;
const SUMMARY_TEMPERATURE: f32 = 0.1;

/// Extra settle time before the summary call, after the inline review burst.
const PRE_SUMMARY_DELAY: Duration = Duration::from_secs(3);
/// Wait before retrying a rate-limited summary post.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(15);
/// Wait before falling back to the simplified summary.
const FALLBACK_DELAY: Duration = Duration::from_secs(5);

/// Generate and post the architectural summary comment.
///
/// The degradation ladder guarantees some summary is always attempted: a
/// failed model call substitutes the error-naming fallback body; a
/// rate-limited post is retried once after a backoff; a post that still
/// fails is replaced by the minimal file-list summary. Returns whether any
/// post succeeded.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn post_architectural_summary(
    model: &dyn ChatModel,
    sink: &dyn CommentSink,
    limiter: &RateLimiter,
    config: &Config,
    files: &[ChangedFile],
) -> bool {
    info!("generating architectural summary");
    limiter.backoff(PRE_SUMMARY_DELAY).await;

    let prompt = prompts::summary_prompt(files);
    let body = match model
        .complete(ChatRequest {
            model: &config.openai.summary_model,
            system: prompts::SUMMARY_SYSTEM,
            user: &prompt,
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        })
        .await
    {
        Ok(content) => content,
        Err(err) => {
            warn!(%err, "summary generation failed, posting fallback body");
            prompts::fallback_summary(files, &err.to_string())
        }
    };

    let full = prompts::wrap_summary(&body, &config.github.commit_sha);
    if post_with_retry(sink, limiter, &full).await {
        return true;
    }

    warn!("summary post failed, posting simplified summary");
    limiter.backoff(FALLBACK_DELAY).await;
    let simplified = prompts::wrap_summary(
        &prompts::simplified_summary(files),
        &config.github.commit_sha,
    );
    post_with_retry(sink, limiter, &simplified).await
}

/// Post the static notice used when filtering leaves nothing to review.
pub async fn post_no_files_notice(
    sink: &dyn CommentSink,
    limiter: &RateLimiter,
    config: &Config,
) -> bool {
    let body = prompts::wrap_summary(
        prompts::NO_REVIEWABLE_FILES_SUMMARY,
        &config.github.commit_sha,
    );
    post_with_retry(sink, limiter, &body).await
}

/// Post a summary comment, retrying once after a backoff if rate limited.
async fn post_with_retry(sink: &dyn CommentSink, limiter: &RateLimiter, body: &str) -> bool {
    limiter.pause().await;
    match sink.post_summary(body).await {
        Ok(PostOutcome::Created) => true,
        Ok(PostOutcome::RateLimited) => {
            warn!("rate limited posting summary, retrying after backoff");
            limiter.backoff(RATE_LIMIT_BACKOFF).await;
            match sink.post_summary(body).await {
                Ok(PostOutcome::Created) => true,
                Ok(outcome) => {
                    warn!(?outcome, "summary retry failed");
                    false
                }
                Err(err) => {
                    warn!(%err, "summary retry failed");
                    false
                }
            }
        }
        Ok(outcome) => {
            warn!(?outcome, "failed to post summary");
            false
        }
        Err(err) => {
            warn!(%err, "failed to post summary");
            false
        }
    }
}
