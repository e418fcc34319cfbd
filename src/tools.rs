//! Function-calling surface over a [`Session`].
//!
//! A chat model names a tool and passes JSON arguments; the name is parsed
//! into a [`ToolCall`] and dispatched statically by [`GameTools`].

use crate::board::{BoardImage, BoardRenderer};
use crate::game_state::render_session;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const GUESS: &str = "guess";
pub const HINT: &str = "hint";
pub const SHOW_BOARD_IMAGE: &str = "show_board_image";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolCallWire {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolParseError {
    UnsupportedToolName(String),
    InvalidArguments(String),
}

impl std::fmt::Display for ToolParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolParseError::UnsupportedToolName(name) => {
                write!(f, "unsupported tool name: {name}")
            }
            ToolParseError::InvalidArguments(msg) => write!(f, "invalid tool arguments: {msg}"),
        }
    }
}

impl std::error::Error for ToolParseError {}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GuessArgs {
    pub guess: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Guess(GuessArgs),
    Hint,
    ShowBoardImage,
}

impl ToolCall {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Guess(_) => GUESS,
            ToolCall::Hint => HINT,
            ToolCall::ShowBoardImage => SHOW_BOARD_IMAGE,
        }
    }
}

// Chat APIs usually ship arguments as a JSON-encoded string.
fn parse_args<T: for<'de> Deserialize<'de>>(
    val: serde_json::Value,
    tool_name: &'static str,
) -> Result<T, ToolParseError> {
    let val = match val {
        serde_json::Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|e| ToolParseError::InvalidArguments(format!("{tool_name}: {e}")))?,
        other => other,
    };
    serde_json::from_value::<T>(val)
        .map_err(|e| ToolParseError::InvalidArguments(format!("{tool_name}: {e}")))
}

impl TryFrom<ToolCallWire> for ToolCall {
    type Error = ToolParseError;

    fn try_from(wire: ToolCallWire) -> Result<Self, Self::Error> {
        let name = wire.name.trim().to_ascii_lowercase();
        match name.as_str() {
            GUESS => Ok(ToolCall::Guess(parse_args(wire.arguments, GUESS)?)),
            HINT => Ok(ToolCall::Hint),
            SHOW_BOARD_IMAGE => Ok(ToolCall::ShowBoardImage),
            other => Err(ToolParseError::UnsupportedToolName(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GuessReport {
    pub guess: String,
    pub feedback: String,
    pub score: u8,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BoardReport {
    pub image: BoardImage,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ToolOutput {
    Guess(GuessReport),
    Hint(String),
    Board(BoardReport),
}

impl ToolOutput {
    /// Text handed back to the chat model: hints verbatim, everything else as JSON.
    pub fn to_message_content(&self) -> serde_json::Result<String> {
        match self {
            ToolOutput::Hint(text) => Ok(text.clone()),
            other => serde_json::to_string(other),
        }
    }
}

/// Binds a session and a renderer for tool dispatch.
pub struct GameTools<'a, R: BoardRenderer + ?Sized> {
    session: &'a mut Session,
    renderer: &'a R,
}

impl<'a, R: BoardRenderer + ?Sized> GameTools<'a, R> {
    pub fn new(session: &'a mut Session, renderer: &'a R) -> Self {
        Self { session, renderer }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn dispatch(&mut self, call: ToolCall) -> ToolOutput {
        crate::debug_log!("dispatching tool '{}'", call.name());
        match call {
            ToolCall::Guess(args) => ToolOutput::Guess(self.guess(&args.guess)),
            ToolCall::Hint => ToolOutput::Hint(self.hint()),
            ToolCall::ShowBoardImage => ToolOutput::Board(self.show_board_image()),
        }
    }

    pub fn guess(&mut self, text: &str) -> GuessReport {
        let attempt = self.session.guess(text);
        GuessReport {
            guess: attempt.guess().to_string(),
            feedback: attempt.feedback().to_string(),
            score: attempt.score(),
            correct: attempt.is_correct(),
        }
    }

    #[must_use]
    pub fn hint(&self) -> String {
        let hint = self.session.hint();
        if hint.is_empty() {
            "No hint available.".to_string()
        } else {
            format!("Hint: {hint}")
        }
    }

    #[must_use]
    pub fn show_board_image(&self) -> BoardReport {
        BoardReport {
            image: render_session(self.renderer, self.session),
            description: format!(
                "{} attempts made on a word of length {}.",
                self.session.attempts().len(),
                self.session.word_length()
            ),
        }
    }
}

/// Function schemas advertised to the chat model.
#[must_use]
pub fn available_tools() -> serde_json::Value {
    json!([
        {
            "name": GUESS,
            "description": "Make a guess in the LeWord game by providing a guess word.",
            "parameters": {
                "type": "object",
                "properties": {
                    "guess": {"type": "string", "description": "The guessed word"}
                },
                "required": ["guess"]
            }
        },
        {
            "name": HINT,
            "description": "Get a hint for the current LeWord game.",
            "parameters": {"type": "object", "properties": {}}
        },
        {
            "name": SHOW_BOARD_IMAGE,
            "description": "Return a visual rendering of the current game board.",
            "parameters": {"type": "object", "properties": {}}
        }
    ])
}
