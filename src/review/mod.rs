pub mod suggestions;

use tracing::{debug, info, instrument, warn};

use crate::classify;
use crate::config::{Config, ReviewSettings};
use crate::diff;
use crate::github::{ChangedFile, CommentSink, FileStatus};
use crate::llm::{ChatModel, ChatRequest};
use crate::pacing::RateLimiter;
use crate::prompts;

const INLINE_MAX_TOKENS: u32 = 800;
const INLINE_TEMPERATURE: f32 = 0.2;

/// Whether a changed file should get an inline review. Removed files,
/// excluded paths and files without patch content are skipped.
pub fn should_review(settings: &ReviewSettings, file: &ChangedFile) -> bool {
    if file.status == FileStatus::Removed {
        info!(file = %file.filename, "skipping removed file");
        return false;
    }
    if settings.is_excluded(&file.filename) {
        info!(file = %file.filename, "skipping excluded file");
        return false;
    }
    if file.patch.as_deref().map_or(true, str::is_empty) {
        info!(file = %file.filename, "skipping file without patch content");
        return false;
    }
    true
}

/// Per-file review orchestrator: classify, parse the diff, ask the model for
/// suggestions, validate them against the diff and post the survivors.
pub struct FileReviewer<'a> {
    model: &'a dyn ChatModel,
    sink: &'a dyn CommentSink,
    limiter: &'a RateLimiter,
    settings: &'a ReviewSettings,
    inline_model: &'a str,
}

impl<'a> FileReviewer<'a> {
    pub fn new(
        model: &'a dyn ChatModel,
        sink: &'a dyn CommentSink,
        limiter: &'a RateLimiter,
        config: &'a Config,
    ) -> Self {
        Self {
            model,
            sink,
            limiter,
            settings: &config.review,
            inline_model: &config.openai.inline_model,
        }
    }

    /// Review one changed file and post inline comments for the accepted
    /// suggestions. Never fails the run: every error path logs and returns
    /// the number of comments posted so far.
    #[instrument(skip(self, file), fields(file = %file.filename))]
    pub async fn review_file(&self, file: &ChangedFile) -> usize {
        let Some(patch) = file.patch.as_deref() else {
            return 0;
        };

        // The checkout may not contain the file (renames, partial clones);
        // classification then runs on the patch text instead.
        let content = std::fs::read_to_string(&file.filename)
            .unwrap_or_else(|_| patch.to_string());

        let category = classify::classify(&file.filename, &content);
        let context = classify::extract_context(&file.filename, &content);
        let parsed = diff::parse_patch(patch);

        if parsed.is_empty() {
            debug!("no context lines in patch, skipping");
            return 0;
        }
        if !parsed.has_added_lines() {
            debug!("no added lines to review, skipping");
            return 0;
        }

        let valid_lines: Vec<u64> = parsed.valid_comment_lines.iter().copied().collect();
        debug!(
            category = %category,
            valid_lines = valid_lines.len(),
            "requesting inline review"
        );

        let system = prompts::system_message(category);
        let user = prompts::inline_user_message(
            &file.filename,
            category,
            &context,
            &valid_lines,
            &parsed.diff_context(),
            self.settings.max_comments_per_file,
        );

        self.limiter.pause().await;
        let reply = match self
            .model
            .complete(ChatRequest {
                model: self.inline_model,
                system: &system,
                user: &user,
                max_tokens: INLINE_MAX_TOKENS,
                temperature: INLINE_TEMPERATURE,
            })
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, "inline review call failed, skipping file");
                return 0;
            }
        };

        let Some(raw_suggestions) = suggestions::parse_suggestions(&reply) else {
            warn!("unusable model reply, zero comments for this file");
            return 0;
        };
        let accepted = suggestions::validate_suggestions(
            raw_suggestions,
            &parsed.valid_comment_lines,
            self.settings.max_comments_per_file,
        );
        debug!(accepted = accepted.len(), "posting accepted suggestions");

        let mut posted = 0;
        for suggestion in &accepted {
            let body = suggestions::normalize_comment(&suggestion.comment);
            self.limiter.pause().await;
            match self
                .sink
                .post_inline(&file.filename, suggestion.line, &body)
                .await
            {
                Ok(outcome) if outcome.is_created() => posted += 1,
                Ok(_) => {}
                Err(err) => warn!(%err, line = suggestion.line, "failed to post inline comment"),
            }
        }
        posted
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::github::{GithubError, PostOutcome};
    use crate::llm::LlmError;

    /// ChatModel fake replaying a scripted sequence of replies.
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedModel {
        pub fn replying(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, _request: ChatRequest<'_>) -> Result<String, LlmError> {
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(body)) => Err(LlmError::Status { status: 500, body }),
                None => Err(LlmError::EmptyResponse),
            }
        }
    }

    /// CommentSink fake recording posts, with scriptable summary outcomes.
    #[derive(Default)]
    pub struct RecordingSink {
        pub inline: Mutex<Vec<(String, u64, String)>>,
        pub summaries: Mutex<Vec<String>>,
        pub summary_outcomes: Mutex<VecDeque<PostOutcome>>,
    }

    impl RecordingSink {
        pub fn with_summary_outcomes(outcomes: Vec<PostOutcome>) -> Self {
            Self {
                summary_outcomes: Mutex::new(outcomes.into_iter().collect()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl CommentSink for RecordingSink {
        async fn post_inline(
            &self,
            path: &str,
            line: u64,
            body: &str,
        ) -> Result<PostOutcome, GithubError> {
            self.inline
                .lock()
                .unwrap()
                .push((path.to_string(), line, body.to_string()));
            Ok(PostOutcome::Created)
        }

        async fn post_summary(&self, body: &str) -> Result<PostOutcome, GithubError> {
            self.summaries.lock().unwrap().push(body.to_string());
            let outcome = self
                .summary_outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(PostOutcome::Created);
            Ok(outcome)
        }
    }

    pub fn test_changed_file(filename: &str, patch: Option<&str>) -> ChangedFile {
        ChangedFile {
            filename: filename.to_string(),
            status: FileStatus::Modified,
            patch: patch.map(str::to_string),
            additions: 1,
            deletions: 0,
        }
    }

    pub fn test_config() -> Config {
        use crate::config::{GithubSettings, OpenAiSettings};
        Config {
            github: GithubSettings {
                token: "t".to_string(),
                owner: "org".to_string(),
                repo: "app".to_string(),
                pr_number: 7,
                commit_sha: "abc1234def".to_string(),
            },
            openai: OpenAiSettings {
                api_key: "k".to_string(),
                inline_model: "gpt-4o".to_string(),
                summary_model: "gpt-4o-mini".to_string(),
            },
            review: ReviewSettings::for_tests(5),
        }
    }

    const SWIFTUI_PATCH: &str = "@@ -8,3 +10,3 @@\n var body: some View {\n+    Text(name!)\n }";

    #[test]
    fn test_should_review_filters() {
        let settings = ReviewSettings::for_tests(5);
        let mut removed = test_changed_file("Gone.swift", Some("@@ -1 +1 @@\n+x"));
        removed.status = FileStatus::Removed;
        assert!(!should_review(&settings, &removed));

        let excluded = test_changed_file("Assets.xcassets/icon.png", Some("@@ -1 +1 @@\n+x"));
        assert!(!should_review(&settings, &excluded));

        let patchless = test_changed_file("Big.swift", None);
        assert!(!should_review(&settings, &patchless));

        let reviewable = test_changed_file("Sources/View.swift", Some("@@ -1 +1 @@\n+x"));
        assert!(should_review(&settings, &reviewable));
    }

    #[tokio::test]
    async fn test_review_file_posts_valid_suggestion() {
        let config = test_config();
        let model = ScriptedModel::replying(vec![Ok(
            r#"[{"line": 11, "comment": "avoid force unwrap"}]"#,
        )]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file("Sources/Foo.swift", Some(SWIFTUI_PATCH));
        let posted = reviewer.review_file(&file).await;

        assert_eq!(posted, 1);
        let inline = sink.inline.lock().unwrap();
        assert_eq!(inline.len(), 1);
        assert_eq!(inline[0].0, "Sources/Foo.swift");
        assert_eq!(inline[0].1, 11);
        assert_eq!(inline[0].2, "avoid force unwrap.");
    }

    #[tokio::test]
    async fn test_review_file_drops_invalid_lines() {
        let config = test_config();
        let model = ScriptedModel::replying(vec![Ok(
            r#"[{"line": 999, "comment": "nope"}, {"line": 11, "comment": "ok"}]"#,
        )]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file("Sources/Foo.swift", Some(SWIFTUI_PATCH));
        assert_eq!(reviewer.review_file(&file).await, 1);
        assert_eq!(sink.inline.lock().unwrap()[0].1, 11);
    }

    #[tokio::test]
    async fn test_review_file_truncates_to_cap() {
        let mut config = test_config();
        config.review = ReviewSettings::for_tests(2);
        let patch = "@@ -1,0 +1,6 @@\n+a\n+b\n+c\n+d\n+e\n+f";
        let reply = r#"[
            {"line": 1, "comment": "one"},
            {"line": 2, "comment": "two"},
            {"line": 3, "comment": "three"},
            {"line": 4, "comment": "four"}
        ]"#;
        let model = ScriptedModel::replying(vec![Ok(reply)]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file("Sources/Big.swift", Some(patch));
        assert_eq!(reviewer.review_file(&file).await, 2);
        let lines: Vec<u64> = sink.inline.lock().unwrap().iter().map(|p| p.1).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_review_file_model_failure_yields_zero_comments() {
        let config = test_config();
        let model = ScriptedModel::replying(vec![Err("upstream exploded")]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file("Sources/Foo.swift", Some(SWIFTUI_PATCH));
        assert_eq!(reviewer.review_file(&file).await, 0);
        assert!(sink.inline.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_file_prose_reply_yields_zero_comments() {
        let config = test_config();
        let model = ScriptedModel::replying(vec![Ok("The code looks fine overall.")]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file("Sources/Foo.swift", Some(SWIFTUI_PATCH));
        assert_eq!(reviewer.review_file(&file).await, 0);
    }

    #[tokio::test]
    async fn test_review_file_skips_patch_without_added_lines() {
        let config = test_config();
        let model = ScriptedModel::replying(vec![]);
        let sink = RecordingSink::default();
        let limiter = RateLimiter::disabled();
        let reviewer = FileReviewer::new(&model, &sink, &limiter, &config);

        let file = test_changed_file(
            "Sources/Foo.swift",
            Some("@@ -1,2 +1,2 @@\n a\n b"),
        );
        // Model is never called: the scripted queue being empty would error.
        assert_eq!(reviewer.review_file(&file).await, 0);
    }
}
