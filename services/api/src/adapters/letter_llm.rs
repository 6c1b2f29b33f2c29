//! services/api/src/adapters/letter_llm.rs
//!
//! This module contains the adapters for the Letter-Writing LLM.
//! It implements the `LetterService` port from the `core` crate, plus the
//! retry-with-fallback decorator that guarantees a caller always receives
//! usable letter text.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::warn;

use membership_core::{
    domain::MemberRecord,
    ports::{LetterService, PortError, PortResult},
};

use crate::config::OrgProfile;

//=========================================================================================
// Deterministic Template
//=========================================================================================

/// The static appointment-letter body, used whenever generation is
/// unavailable. Interpolates only member fields and the organization name;
/// everything else is fixed text.
pub fn fallback_letter(member: &MemberRecord, org: &OrgProfile) -> String {
    let date = member.details.joining_date.format("%-d %B %Y");
    format!(
        "Dear {name},\n\n\
         On behalf of the {org}, it is with immense pleasure and a deep sense of shared purpose \
         that we officially welcome you to our dedicated team. We are delighted to confirm your \
         appointment as {designation} in the {department} Department, effective from {date}.\n\n\
         Your decision to join us signifies your commitment to a noble cause, the mission of \
         fighting corruption and tirelessly serving our beloved nation. We believe that every \
         individual has a crucial role to play in building a truly corruption-free India, a \
         nation where integrity and justice prevail. As you embark on this journey with us, we \
         expect you to uphold the highest standards of honesty, unwavering integrity, and \
         profound dedication in all your endeavors. Your work will directly contribute to \
         strengthening the moral fabric of our society and realizing the dreams of a stronger, \
         more just Bharat.\n\n\
         For administrative purposes, your official ID Number is {code}. We are confident that \
         your skills and passion will be instrumental in achieving our collective goals and \
         making a tangible, positive impact.\n\n\
         We eagerly anticipate your valuable contributions and look forward to working alongside \
         you as we strive towards a brighter future for India.\n\n\
         Sincerely,",
        name = member.details.full_name,
        org = org.name,
        designation = member.details.designation,
        department = member.details.department,
        date = date,
        code = member.membership_code,
    )
}

//=========================================================================================
// OpenAI-backed Writer
//=========================================================================================

/// An adapter that implements `LetterService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiLetterWriter {
    client: Client<OpenAIConfig>,
    model: String,
    org: OrgProfile,
}

impl OpenAiLetterWriter {
    /// Creates a new `OpenAiLetterWriter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, org: OrgProfile) -> Self {
        Self { client, model, org }
    }
}

#[async_trait]
impl LetterService for OpenAiLetterWriter {
    /// Generates the letter body from the member's appointment details.
    async fn compose_letter(&self, member: &MemberRecord) -> PortResult<String> {
        let date = member.details.joining_date.format("%-d %B %Y").to_string();
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(format!(
                    "You are an HR system for the '{}'. Generate the *body content only* for an \
                     official Appointment/Joining Letter. STRICT INSTRUCTIONS: 1. Do NOT include \
                     a Subject line. 2. Do NOT include the Organization Name/Address header. \
                     3. Start immediately with the salutation \"Dear <member name>,\". 4. Use \
                     four paragraphs: welcome the member on behalf of the mission and confirm \
                     the appointment as the given designation in the given department effective \
                     from the joining date; acknowledge their commitment to fighting corruption \
                     and serving the nation, emphasizing expectations of honesty, integrity, and \
                     dedication; state the official ID Number and express confidence in their \
                     skills; close looking forward to working together. Sign off with \
                     \"Sincerely,\" and nothing after it, the signatory name is pre-printed. \
                     Keep the tone patriotic, formal, and inspiring, with clear paragraph breaks.",
                    self.org.name
                ))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Name: {}\nDesignation: {}\nDepartment: {}\nJoining Date: {}\nID Number: {}",
                    member.details.full_name,
                    member.details.designation,
                    member.details.department,
                    date,
                    member.membership_code
                ))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.3)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Letter LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Letter LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}

//=========================================================================================
// Template-only Writer
//=========================================================================================

/// Implements `LetterService` with the static template. Wired in when no
/// generation credential is configured.
pub struct TemplateLetterWriter {
    org: OrgProfile,
}

impl TemplateLetterWriter {
    pub fn new(org: OrgProfile) -> Self {
        Self { org }
    }
}

#[async_trait]
impl LetterService for TemplateLetterWriter {
    async fn compose_letter(&self, member: &MemberRecord) -> PortResult<String> {
        Ok(fallback_letter(member, &self.org))
    }
}

//=========================================================================================
// Retry-with-Fallback Decorator
//=========================================================================================

/// Wraps any `LetterService` with bounded retries, growing backoff between
/// attempts, and the template as the terminal fallback. Composition never
/// returns an error through this wrapper.
pub struct ResilientLetters<S> {
    inner: S,
    org: OrgProfile,
    attempts: u32,
    backoff_base: Duration,
}

impl<S> ResilientLetters<S> {
    pub fn new(inner: S, org: OrgProfile) -> Self {
        Self {
            inner,
            org,
            attempts: 3,
            backoff_base: Duration::from_millis(1000),
        }
    }

    /// Overrides the retry policy. Attempts must be at least one.
    pub fn with_backoff(mut self, attempts: u32, backoff_base: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.backoff_base = backoff_base;
        self
    }
}

#[async_trait]
impl<S: LetterService> LetterService for ResilientLetters<S> {
    async fn compose_letter(&self, member: &MemberRecord) -> PortResult<String> {
        for attempt in 1..=self.attempts {
            match self.inner.compose_letter(member).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!("Letter generation attempt {attempt} failed: {e}");
                    // Wait 1x, 2x, 3x the base between attempts.
                    if attempt < self.attempts {
                        tokio::time::sleep(self.backoff_base * attempt).await;
                    }
                }
            }
        }
        warn!("Letter generation retries exhausted, falling back to the template text");
        Ok(fallback_letter(member, &self.org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyWriter {
        calls: AtomicUsize,
        failures_before_success: usize,
    }

    impl FlakyWriter {
        fn failing_forever() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures_before_success: usize::MAX,
            }
        }

        fn failing(n: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures_before_success: n,
            }
        }
    }

    #[async_trait]
    impl LetterService for FlakyWriter {
        async fn compose_letter(&self, _member: &MemberRecord) -> PortResult<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(PortError::Unexpected("upstream unavailable".to_string()))
            } else {
                Ok("Generated letter body".to_string())
            }
        }
    }

    #[test]
    fn test_fallback_is_deterministic_and_interpolated() {
        let member = testutil::member();
        let org = testutil::org_profile();

        let first = fallback_letter(&member, &org);
        let second = fallback_letter(&member, &org);
        assert_eq!(first, second);

        assert!(first.starts_with("Dear Asha Verma,"));
        assert!(first.contains("Field Officer"));
        assert!(first.contains("Outreach Department"));
        assert!(first.contains("15 January 2026"));
        assert!(first.contains("CSM-2026-54321"));
        assert!(first.ends_with("Sincerely,"));
    }

    #[tokio::test]
    async fn test_template_writer_matches_fallback_exactly() {
        let member = testutil::member();
        let org = testutil::org_profile();
        let writer = TemplateLetterWriter::new(org.clone());

        let body = writer.compose_letter(&member).await.unwrap();
        assert_eq!(body, fallback_letter(&member, &org));
    }

    #[tokio::test]
    async fn test_exhausted_retries_fall_back_to_template() {
        let member = testutil::member();
        let org = testutil::org_profile();
        let inner = FlakyWriter::failing_forever();
        let resilient = ResilientLetters::new(inner, org.clone())
            .with_backoff(3, Duration::from_millis(0));

        let body = resilient.compose_letter(&member).await.unwrap();
        assert_eq!(body, fallback_letter(&member, &org));
        assert_eq!(resilient.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_mid_run_success_skips_fallback() {
        let member = testutil::member();
        let resilient = ResilientLetters::new(FlakyWriter::failing(1), testutil::org_profile())
            .with_backoff(3, Duration::from_millis(0));

        let body = resilient.compose_letter(&member).await.unwrap();
        assert_eq!(body, "Generated letter body");
        assert_eq!(resilient.inner.calls.load(Ordering::SeqCst), 2);
    }
}
