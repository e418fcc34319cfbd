use leword::board::TileRenderer;
use leword::chat::{ChatAgent, PolicyChatClient};
use leword::cli::{CliInterface, DriverKind, build_policy, outcome_line, parse_cli, resolve_words};
use leword::game_state::{GameInterface, GameSummary, game_loop};
use leword::logging::init_logging;
use leword::session::Session;
use leword::tools::GameTools;
use leword::tui::TuiInterface;
use leword::vision::TileMeanEncoder;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Err(e) = init_logging(cli.log_file.as_deref(), cli.tui) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    let words = match resolve_words(&cli) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("Failed to load word list: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("loaded {} candidate words", words.len());

    let mut session = Session::new(&cli.word, &cli.hint, cli.max_attempts);
    let policy = build_policy(cli.policy, words, cli.seed);

    match cli.driver {
        DriverKind::Loop => {
            let mut interface: Box<dyn GameInterface> = if cli.tui {
                match TuiInterface::new() {
                    Ok(tui) => Box::new(tui),
                    Err(e) => {
                        eprintln!("Failed to start terminal UI: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                Box::new(CliInterface::new(io::stdout()))
            };
            let mut policy = policy;
            game_loop(
                &mut session,
                &mut policy,
                &TileRenderer,
                &TileMeanEncoder,
                interface.as_mut(),
            );
        }
        DriverKind::Tools => {
            let client = PolicyChatClient::new(policy, session.word_length(), session.max_attempts());
            let mut agent = ChatAgent::new(client, &session);
            let mut tools = GameTools::new(&mut session, &TileRenderer);
            let result = agent.run(&mut tools);
            for message in agent.messages().iter().skip(1) {
                println!("{:?}: {}", message.role, message.content);
            }
            if let Err(e) = result {
                eprintln!("Chat agent failed: {e}");
                return ExitCode::FAILURE;
            }
            println!("{}", outcome_line(&GameSummary::from_session(&session)));
        }
    }

    ExitCode::SUCCESS
}
