//! Chat-completion driven play.
//!
//! The agent keeps the message history, asks a [`ChatCompletion`] backend for
//! the next tool call and feeds each tool result back as a function message.
//! No network client lives here; backends plug in through the trait.

use crate::board::{BoardRenderer, TileRenderer};
use crate::policy::{GuessPolicy, Observation};
use crate::session::{AttemptView, GameStatus, GameView, Session};
use crate::tools::{GUESS, GameTools, HINT, ToolCall, ToolCallWire, available_tools};
use crate::vision::{BoardEncoder, TileMeanEncoder};
use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};
use serde_json::json;

const NO_TOOL_NUDGE: &str = "Please respond by calling one of the available tools.";
const TURNS_PER_ATTEMPT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_call: Option<ToolCallWire>,
}

impl ChatReply {
    /// Reads a chat-completion shaped response body.
    #[must_use]
    pub fn from_response(response: &serde_json::Value) -> Self {
        let content = response
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        Self {
            content,
            tool_call: parse_response(response),
        }
    }
}

/// Extracts the first tool call from `choices[0].message`, accepting both the
/// `tool_calls` list and the older single `function_call` field.
#[must_use]
pub fn parse_response(response: &serde_json::Value) -> Option<ToolCallWire> {
    let message = response.pointer("/choices/0/message")?;
    let function = message
        .pointer("/tool_calls/0/function")
        .or_else(|| message.get("function_call"))?;
    let name = function.get("name")?.as_str()?.to_string();
    let arguments = function
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    Some(ToolCallWire { name, arguments })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    Backend(String),
    Serialization(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::Backend(msg) => write!(f, "chat backend failed: {msg}"),
            ChatError::Serialization(msg) => write!(f, "tool result encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

pub trait ChatCompletion {
    fn complete(
        &mut self,
        messages: &[ChatMessage],
        tools: &serde_json::Value,
    ) -> Result<ChatReply, ChatError>;
}

#[must_use]
pub fn system_prompt(session: &Session) -> String {
    format!(
        "Instructions:\n{}\n\nTips:\n{}",
        session.instructions(),
        session.tips()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub status: GameStatus,
    pub turns: usize,
}

pub struct ChatAgent<C: ChatCompletion> {
    client: C,
    messages: Vec<ChatMessage>,
    max_turns: usize,
}

impl<C: ChatCompletion> ChatAgent<C> {
    pub fn new(client: C, session: &Session) -> Self {
        Self {
            client,
            messages: vec![ChatMessage::system(system_prompt(session))],
            max_turns: session.max_attempts() * TURNS_PER_ATTEMPT,
        }
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Asks the backend for tool calls until the game ends or the turn limit is hit.
    pub fn run<R: BoardRenderer + ?Sized>(
        &mut self,
        tools: &mut GameTools<'_, R>,
    ) -> Result<ChatOutcome, ChatError> {
        let schemas = available_tools();
        let mut turns = 0;

        while !tools.session().is_over() && turns < self.max_turns {
            turns += 1;
            let reply = self.client.complete(&self.messages, &schemas)?;

            if let Some(content) = reply.content.filter(|c| !c.is_empty()) {
                self.messages.push(ChatMessage::assistant(content));
            }

            let Some(wire) = reply.tool_call else {
                debug_log!("turn {} - no tool call in reply", turns);
                self.messages.push(ChatMessage::user(NO_TOOL_NUDGE));
                continue;
            };

            let name = wire.name.clone();
            match ToolCall::try_from(wire) {
                Ok(call) => {
                    let output = tools.dispatch(call);
                    let content = output
                        .to_message_content()
                        .map_err(|e| ChatError::Serialization(e.to_string()))?;
                    info_log!("turn {} - {} -> {}", turns, name, content);
                    self.messages.push(ChatMessage::function(name, content));
                }
                Err(e) => {
                    log::warn!("turn {turns}: rejected tool call: {e}");
                    let content = json!({ "error": e.to_string() }).to_string();
                    self.messages.push(ChatMessage::function(name, content));
                }
            }
        }

        Ok(ChatOutcome {
            status: tools.session().status(),
            turns,
        })
    }
}

/// Offline backend that plays through the tool surface with a [`GuessPolicy`].
///
/// Asks for the hint once, then issues `guess` calls. The game view is rebuilt
/// from earlier `guess` results in the message history.
pub struct PolicyChatClient<P: GuessPolicy> {
    policy: P,
    word_length: usize,
    max_attempts: usize,
}

impl<P: GuessPolicy> PolicyChatClient<P> {
    pub fn new(policy: P, word_length: usize, max_attempts: usize) -> Self {
        Self {
            policy,
            word_length,
            max_attempts,
        }
    }

    fn view_from(&self, messages: &[ChatMessage]) -> GameView {
        let attempts: Vec<AttemptView> = messages
            .iter()
            .filter(|m| m.role == Role::Function && m.name.as_deref() == Some(GUESS))
            .filter_map(|m| serde_json::from_str::<GuessResult>(&m.content).ok())
            .map(|r| AttemptView {
                guess: r.guess,
                feedback: r.feedback,
                correct: r.correct,
            })
            .collect();
        GameView {
            attempts_left: self.max_attempts.saturating_sub(attempts.len()),
            attempts,
            word_length: self.word_length,
        }
    }
}

#[derive(Deserialize)]
struct GuessResult {
    guess: String,
    feedback: String,
    correct: bool,
}

impl<P: GuessPolicy> ChatCompletion for PolicyChatClient<P> {
    fn complete(
        &mut self,
        messages: &[ChatMessage],
        _tools: &serde_json::Value,
    ) -> Result<ChatReply, ChatError> {
        let asked_hint = messages
            .iter()
            .any(|m| m.role == Role::Function && m.name.as_deref() == Some(HINT));
        if !asked_hint {
            return Ok(ChatReply {
                content: None,
                tool_call: Some(ToolCallWire {
                    name: HINT.to_string(),
                    arguments: json!({}),
                }),
            });
        }

        let view = self.view_from(messages);
        let feedbacks: Vec<&str> = view.attempts.iter().map(|a| a.feedback.as_str()).collect();
        let board = TileRenderer.render(&feedbacks, view.word_length);
        let observation = Observation {
            embedding: TileMeanEncoder.encode(&board),
            view,
        };
        let guess = self.policy.decide_next_guess(&observation);
        Ok(ChatReply {
            content: None,
            tool_call: Some(ToolCallWire {
                name: GUESS.to_string(),
                arguments: json!({ "guess": guess }).to_string().into(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ConsistentGuessPolicy;
    use crate::wordbank::default_words;

    struct Scripted {
        replies: Vec<ChatReply>,
        seen: Vec<usize>,
    }

    impl ChatCompletion for Scripted {
        fn complete(
            &mut self,
            messages: &[ChatMessage],
            _tools: &serde_json::Value,
        ) -> Result<ChatReply, ChatError> {
            self.seen.push(messages.len());
            if self.replies.is_empty() {
                return Err(ChatError::Backend("script exhausted".to_string()));
            }
            Ok(self.replies.remove(0))
        }
    }

    fn call(name: &str, arguments: serde_json::Value) -> ChatReply {
        ChatReply {
            content: None,
            tool_call: Some(ToolCallWire {
                name: name.to_string(),
                arguments,
            }),
        }
    }

    #[test]
    fn test_parse_response_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "type": "function",
                        "function": {"name": "guess", "arguments": "{\"guess\":\"honda\"}"}
                    }]
                }
            }]
        });
        let wire = parse_response(&body).unwrap();
        assert_eq!(wire.name, "guess");
        assert_eq!(wire.arguments, json!("{\"guess\":\"honda\"}"));
        assert_eq!(ChatReply::from_response(&body).content, None);
    }

    #[test]
    fn test_parse_response_function_call() {
        let body = json!({
            "choices": [{"message": {"content": "thinking", "function_call": {"name": "hint"}}}]
        });
        let reply = ChatReply::from_response(&body);
        assert_eq!(reply.content.as_deref(), Some("thinking"));
        assert_eq!(reply.tool_call.unwrap().arguments, serde_json::Value::Null);
    }

    #[test]
    fn test_parse_response_without_call() {
        let body = json!({"choices": [{"message": {"content": "hello"}}]});
        assert!(parse_response(&body).is_none());
        assert!(parse_response(&json!({})).is_none());
    }

    #[test]
    fn test_agent_plays_scripted_game() {
        let mut session = Session::new("honda", "Japanese car brand.", 6);
        let client = Scripted {
            replies: vec![
                call("hint", json!({})),
                ChatReply {
                    content: Some("no tool this time".to_string()),
                    tool_call: None,
                },
                call("reveal_letter", json!({"index": 1})),
                call("guess", json!({"guess": "hello"})),
                call("show_board_image", json!({})),
                call("guess", json!("{\"guess\":\"HONDA\"}")),
            ],
            seen: Vec::new(),
        };
        let mut agent = ChatAgent::new(client, &session);
        let mut tools = GameTools::new(&mut session, &TileRenderer);
        let outcome = agent.run(&mut tools).unwrap();

        assert_eq!(outcome, ChatOutcome { status: GameStatus::Won, turns: 6 });
        let messages = agent.messages();
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Tips:"));
        assert_eq!(messages[1].content, "Hint: Japanese car brand.");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].content, NO_TOOL_NUDGE);
        assert!(messages[4].content.contains("unsupported tool name"));
        assert!(messages[5].content.contains("\"feedback\":\"H???o\""));
        assert!(messages[6].content.contains("1 attempts made on a word of length 5."));
        assert!(messages[7].content.contains("\"correct\":true"));
        assert_eq!(agent.client.seen, vec![1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn test_agent_stops_at_turn_limit() {
        let mut session = Session::new("honda", "", 6);
        let client = Scripted {
            replies: vec![call("hint", json!({})); 10],
            seen: Vec::new(),
        };
        let mut agent = ChatAgent::new(client, &session).with_max_turns(4);
        let mut tools = GameTools::new(&mut session, &TileRenderer);
        let outcome = agent.run(&mut tools).unwrap();
        assert_eq!(outcome.turns, 4);
        assert_eq!(outcome.status, GameStatus::InProgress);
    }

    #[test]
    fn test_agent_propagates_backend_error() {
        let mut session = Session::new("honda", "", 6);
        let client = Scripted {
            replies: Vec::new(),
            seen: Vec::new(),
        };
        let mut agent = ChatAgent::new(client, &session);
        let mut tools = GameTools::new(&mut session, &TileRenderer);
        let err = agent.run(&mut tools).unwrap_err();
        assert_eq!(err, ChatError::Backend("script exhausted".to_string()));
    }

    #[test]
    fn test_policy_client_wins_through_tools() {
        let mut session = Session::new("datsun", "Old Nissan badge.", 8);
        let policy = ConsistentGuessPolicy::with_seed(default_words(), 5);
        let client = PolicyChatClient::new(policy, session.word_length(), session.max_attempts());
        let mut agent = ChatAgent::new(client, &session);
        let mut tools = GameTools::new(&mut session, &TileRenderer);
        let outcome = agent.run(&mut tools).unwrap();

        assert_eq!(outcome.status, GameStatus::Won);
        assert_eq!(agent.messages()[1].name.as_deref(), Some(HINT));
    }
}
