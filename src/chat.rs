use crate::models::{ChatMessage, ChatRole};
use crate::store::AppState;
use async_trait::async_trait;
use itertools::Itertools;
use nanoid::nanoid;
use tracing::warn;

pub const GREETING: &str =
    "Hi! I am the VIT Clubs AI. Ask me anything about clubs or events!";
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting to the network. Please try again later.";
pub const EMPTY_REPLY: &str = "I didn't catch that. Could you rephrase?";

/// Seam to the third-party text-generation service: text in, text out.
/// Callers never see a failure; the fallback string is substituted instead.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_instruction: &str, user_message: &str)
        -> anyhow::Result<String>;
}

/// Canned assistant prompt assembled from the live catalog.
pub fn system_instruction(state: &AppState) -> String {
    let clubs_info = state
        .clubs
        .values()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .map(|c| format!("- {} ({:?}): {}", c.name, c.category, c.description))
        .join("\n");
    let events_info = state
        .events
        .values()
        .sorted_by(|a, b| a.id.cmp(&b.id))
        .map(|e| {
            format!(
                "- {} by Club ID {} on {}",
                e.title,
                e.club_id,
                e.date.format("%d/%m/%Y")
            )
        })
        .join("\n");

    format!(
        "You are the AI Assistant for 'VIT Clubs Hub', a mobile app for \
         Vishwakarma Institute of Technology (VIT) Pune.\n\n\
         Your role is to help students find clubs, understand upcoming events, \
         and navigate student life at VIT.\n\n\
         Here is the current data about clubs:\n{clubs_info}\n\n\
         Here are upcoming events:\n{events_info}\n\n\
         Rules:\n\
         1. Be helpful, enthusiastic, and concise.\n\
         2. If asked about a specific club, provide details from the data.\n\
         3. If asked for recommendations (e.g., \"coding clubs\"), suggest relevant Technical clubs.\n\
         4. Always maintain a polite and academic tone suitable for a college environment.\n\
         5. If you don't know something, suggest they contact the Student Council."
    )
}

/// Append the user's message to the transcript, ask the generator, and
/// append whatever comes back. Failures degrade to the fallback string; an
/// empty reply degrades to the rephrase prompt. Returns the reply text.
pub async fn send_message(
    state: &mut AppState,
    generator: &dyn TextGenerator,
    text: &str,
) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    state.chat.push(ChatMessage {
        id: format!("msg_{}", nanoid!(8)),
        role: ChatRole::User,
        text: text.to_owned(),
    });

    let instruction = system_instruction(state);
    let reply = match generator.generate(&instruction, text).await {
        Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY.to_owned(),
        Ok(reply) => reply,
        Err(e) => {
            warn!("text generation failed: {e}");
            FALLBACK_REPLY.to_owned()
        }
    };

    state.chat.push(ChatMessage {
        id: format!("msg_{}", nanoid!(8)),
        role: ChatRole::Model,
        text: reply.clone(),
    });
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _system: &str, _msg: &str) -> anyhow::Result<String> {
            Ok(self.0.to_owned())
        }
    }

    struct Down;

    #[async_trait]
    impl TextGenerator for Down {
        async fn generate(&self, _system: &str, _msg: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn transcript_records_both_sides() {
        let mut state = seed::demo_state();
        assert_eq!(state.chat.len(), 1); // greeting
        let reply = send_message(&mut state, &Canned("Try GDSC!"), "coding clubs?").await;
        assert_eq!(reply, "Try GDSC!");
        assert_eq!(state.chat.len(), 3);
        assert_eq!(state.chat[1].role, ChatRole::User);
        assert_eq!(state.chat[2].role, ChatRole::Model);
    }

    #[tokio::test]
    async fn generator_failure_substitutes_fallback() {
        let mut state = seed::demo_state();
        let reply = send_message(&mut state, &Down, "hello").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut state = seed::demo_state();
        let reply = send_message(&mut state, &Canned("unused"), "   ").await;
        assert!(reply.is_empty());
        assert_eq!(state.chat.len(), 1);
    }

    #[tokio::test]
    async fn empty_reply_degrades_to_rephrase_prompt() {
        let mut state = seed::demo_state();
        let reply = send_message(&mut state, &Canned(""), "hm").await;
        assert_eq!(reply, EMPTY_REPLY);
    }

    #[test]
    fn prompt_carries_the_catalog() {
        let state = seed::demo_state();
        let prompt = system_instruction(&state);
        assert!(prompt.contains("Robotics Forum"));
        assert!(prompt.contains("RoboWars 2023"));
        assert!(prompt.contains("Student Council"));
    }
}
