// Library interface for leword
// The binary and the integration tests both build on these modules

pub mod board;
pub mod chat;
pub mod cli;
pub mod game_state;
pub mod logging;
pub mod policy;
pub mod scorer;
pub mod session;
pub mod tools;
pub mod tui;
pub mod vision;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use board::{BoardImage, BoardRenderer, TileRenderer};
pub use game_state::{GameInterface, GameSummary, game_loop};
pub use policy::{ConsistentGuessPolicy, GuessPolicy, Observation, RandomGuessPolicy};
pub use scorer::{Evaluation, LetterState, evaluate, score};
pub use session::{Attempt, GameStatus, GameView, Session};
pub use tools::{GameTools, ToolCall, ToolCallWire, available_tools};
pub use vision::{BoardEncoder, Embedding, TileMeanEncoder};
pub use wordbank::{default_words, load_words_from_file, load_words_from_str};
