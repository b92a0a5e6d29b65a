use flag_games::{games, logging, records};
use std::env;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    if matches!(command.as_deref(), None | Some("pairs") | Some("quiz")) {
        start_logging();
    }
    match command.as_deref() {
        None => interactive_menu(),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("pairs") => run_game("pairs", &rest),
        Some("quiz") => run_game("quiz", &rest),
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

fn start_logging()
{
    if let Err(err) = logging::init(&records::data_dir()) {
        eprintln!("Warning: {err}. Continuing without a log file.");
    }
}

fn run_game(name: &str, args: &[String]) -> Result<(), String>
{
    match name {
        "pairs" => {
            let config = games::pairs::PairsConfig::from_args(args)?;
            games::pairs::run_with_config(config)
        }
        "quiz" => {
            let config = games::quiz::QuizConfig::from_args(args)?;
            games::quiz::run_with_config(config)
        }
        _ => Err(format!("Unknown game '{name}'. Run with --help.")),
    }
}

/// The landing page: leaving a game comes back here.
fn interactive_menu() -> Result<(), String>
{
    let registry = games::registry();
    loop {
        println!("Flag Games");
        println!();
        println!("Select a game:");
        for (idx, game) in registry.iter().enumerate() {
            println!("  {}. {} - {}", idx + 1, game.name, game.description);
        }
        println!();
        print!("Enter number or name (default 1, q to quit): ");
        std::io::Write::flush(&mut std::io::stdout())
            .map_err(|err| format!("Failed to flush stdout: {err}"))?;

        let mut input = String::new();
        let read = std::io::stdin()
            .read_line(&mut input)
            .map_err(|err| format!("Failed to read input: {err}"))?;
        if read == 0 {
            return Ok(());
        }
        let choice = input.trim();

        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let selected = if choice.is_empty() {
            Some(registry[0].name)
        } else if let Ok(index) = choice.parse::<usize>() {
            registry.get(index.wrapping_sub(1)).map(|game| game.name)
        } else {
            registry
                .iter()
                .find(|game| game.name.eq_ignore_ascii_case(choice))
                .map(|game| game.name)
        };

        match selected {
            Some(name) => run_game(name, &[])?,
            None => println!("Invalid selection.\n"),
        }
    }
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}

fn print_help()
{
    println!("flag-games");
    println!("\nUsage:");
    println!("  flag-games list");
    println!("  flag-games pairs [--size=4] [--name=NAME]");
    println!("  flag-games quiz [--touch] [--touch-score] [--name=NAME]");
    println!("\nNotes:");
    println!("  Best pairs records are kept in $FLAG_GAMES_DATA_DIR (default ~/.flag-games).");
    println!("  Logs go to flag-games.log in the same directory; RUST_LOG sets the level.");
}
