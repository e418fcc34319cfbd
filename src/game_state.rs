use crate::board::{BoardImage, BoardRenderer};
use crate::info_log;
use crate::policy::{GuessPolicy, Observation};
use crate::session::{Attempt, GameStatus, Session};
use crate::vision::BoardEncoder;
use chrono::{DateTime, Local};

/// Shown once before the first turn.
#[derive(Debug, Clone)]
pub struct GameIntro {
    pub word_length: usize,
    pub max_attempts: usize,
    pub hint: String,
}

#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn: usize,
    pub attempt: Attempt,
    pub attempts_left: usize,
    pub board: BoardImage,
}

#[derive(Debug, Clone)]
pub struct GameSummary {
    pub status: GameStatus,
    pub secret: String,
    pub attempts: Vec<Attempt>,
    pub final_score: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl GameSummary {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            status: session.status(),
            secret: session.secret().to_string(),
            attempts: session.attempts().to_vec(),
            final_score: session.final_score(),
            started_at: session.started_at(),
            finished_at: Local::now(),
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Front-end the game loop reports to.
pub trait GameInterface {
    fn display_intro(&mut self, intro: &GameIntro);
    fn display_turn(&mut self, turn: &TurnReport);
    fn display_game_over(&mut self, summary: &GameSummary);

    /// Checked before every turn; lets a front-end abort the game.
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Renders the board for the current history, or one blank row before the first guess.
pub fn render_session<R: BoardRenderer + ?Sized>(renderer: &R, session: &Session) -> BoardImage {
    renderer.render(&session.feedback_history(), session.word_length())
}

/// Plays `session` to the end with the given collaborators.
///
/// Each turn renders the board, encodes it, asks the policy for a word and
/// submits it. Stops as soon as the session is over or the interface asks to.
pub fn game_loop<P, R, E, I>(
    session: &mut Session,
    policy: &mut P,
    renderer: &R,
    encoder: &E,
    interface: &mut I,
) -> GameSummary
where
    P: GuessPolicy + ?Sized,
    R: BoardRenderer + ?Sized,
    E: BoardEncoder + ?Sized,
    I: GameInterface + ?Sized,
{
    interface.display_intro(&GameIntro {
        word_length: session.word_length(),
        max_attempts: session.max_attempts(),
        hint: session.hint().to_string(),
    });

    let mut turn = 0;
    while !session.is_over() {
        if interface.should_stop() {
            info_log!("game_loop() - interface requested stop after {} turns", turn);
            break;
        }
        turn += 1;

        let board = render_session(renderer, session);
        let observation = Observation {
            view: session.view(),
            embedding: encoder.encode(&board),
        };
        let guess = policy.decide_next_guess(&observation);
        let attempt = session.guess(&guess).clone();
        log::info!(
            "turn {}: guess '{}' -> '{}' (score {}, correct {})",
            turn,
            attempt.guess(),
            attempt.feedback(),
            attempt.score(),
            attempt.is_correct()
        );

        interface.display_turn(&TurnReport {
            turn,
            attempt,
            attempts_left: session.attempts_left(),
            board: render_session(renderer, session),
        });
    }

    let summary = GameSummary::from_session(session);
    log::info!(
        "game finished: {:?} after {} attempts, final score {}",
        summary.status,
        summary.attempts.len(),
        summary.final_score
    );
    interface.display_game_over(&summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileRenderer;
    use crate::vision::TileMeanEncoder;

    struct Scripted(Vec<&'static str>);

    impl GuessPolicy for Scripted {
        fn decide_next_guess(&mut self, _observation: &Observation) -> String {
            self.0.remove(0).to_string()
        }
    }

    #[derive(Default)]
    struct Recorder {
        intro: Option<usize>,
        turns: Vec<(usize, String, usize)>,
        over: Option<GameStatus>,
        stop_after: Option<usize>,
    }

    impl GameInterface for Recorder {
        fn display_intro(&mut self, intro: &GameIntro) {
            self.intro = Some(intro.word_length);
        }

        fn display_turn(&mut self, turn: &TurnReport) {
            self.turns
                .push((turn.turn, turn.attempt.feedback().to_string(), turn.board.row_count()));
        }

        fn display_game_over(&mut self, summary: &GameSummary) {
            self.over = Some(summary.status);
        }

        fn should_stop(&mut self) -> bool {
            self.stop_after.is_some_and(|n| self.turns.len() >= n)
        }
    }

    #[test]
    fn test_game_loop_win() {
        let mut session = Session::new("honda", "car", 10);
        let mut policy = Scripted(vec!["hello", "mazda", "honda"]);
        let mut ui = Recorder::default();
        let summary = game_loop(&mut session, &mut policy, &TileRenderer, &TileMeanEncoder, &mut ui);

        assert_eq!(summary.status, GameStatus::Won);
        assert_eq!(summary.final_score, 70);
        assert_eq!(ui.intro, Some(5));
        assert_eq!(ui.turns.len(), 3);
        assert_eq!(ui.turns[0], (1, "H???o".to_string(), 1));
        assert_eq!(ui.turns[2], (3, "HONDA".to_string(), 3));
        assert_eq!(ui.over, Some(GameStatus::Won));
    }

    #[test]
    fn test_game_loop_loss_stops_at_budget() {
        let mut session = Session::new("honda", "", 2);
        let mut policy = Scripted(vec!["lexus", "toyota", "honda"]);
        let mut ui = Recorder::default();
        let summary = game_loop(&mut session, &mut policy, &TileRenderer, &TileMeanEncoder, &mut ui);

        assert_eq!(summary.status, GameStatus::Lost);
        assert_eq!(summary.attempts.len(), 2);
        assert_eq!(policy.0, vec!["honda"]);
        assert!(summary.elapsed_ms() >= 0);
    }

    #[test]
    fn test_game_loop_honours_stop_request() {
        let mut session = Session::new("honda", "", 6);
        let mut policy = Scripted(vec!["lexus", "mazda", "honda"]);
        let mut ui = Recorder {
            stop_after: Some(1),
            ..Recorder::default()
        };
        let summary = game_loop(&mut session, &mut policy, &TileRenderer, &TileMeanEncoder, &mut ui);

        assert_eq!(summary.status, GameStatus::InProgress);
        assert_eq!(ui.turns.len(), 1);
    }
}
