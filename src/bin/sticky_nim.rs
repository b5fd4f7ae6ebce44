use std::io;

use anyhow::{bail, Result};
use clap::{self, Parser, Subcommand};
use sticky_nim::{
    analysis::Report,
    canonicalize,
    game::{Game, Settings},
    player::{Computer, Human, Player},
    Advisor, Evaluator,
};

/// Play and analyse Sticky-Nim, where whoever takes the last stick loses.
#[derive(Parser, Debug)]
struct Args {
    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write debug logs to this file
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Play(PlayArgs),
    Analyze(AnalyzeArgs),
    Advise(AdviseArgs),
}

/// Play against the computer on standard input/output.
#[derive(Parser, Debug)]
struct PlayArgs {
    /// Sticks in the starting row
    #[arg(long, default_value_t = 10)]
    sticks: usize,

    /// Most sticks a player may take per turn
    #[arg(long, default_value_t = 3)]
    max_take: usize,

    /// Let the computer move first
    #[arg(long)]
    computer_first: bool,

    /// Seed for the computer's choices
    #[arg(long)]
    seed: Option<u64>,
}

/// List the losing configurations up to some stick count.
#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Largest stick count to analyse
    #[arg(long, default_value_t = 10)]
    up_to: usize,

    #[arg(long, default_value_t = 3)]
    max_take: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Classify a configuration and suggest a move.
#[derive(Parser, Debug)]
struct AdviseArgs {
    #[arg(long, default_value_t = 3)]
    max_take: usize,

    /// Group sizes, comma separated
    #[arg(num_args = 1.., value_delimiter = ',', allow_negative_numbers = true, required = true)]
    groups: Vec<i64>,
}

fn setup_logging(verbose: u8, log_file: Option<&str>) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    let log_dispatcher = log_dispatcher.chain(fern::Dispatch::new().level(level).chain(io::stderr()));
    let log_dispatcher = match log_file {
        Some(log_file) => log_dispatcher.chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Debug)
                .chain(fern::log_file(log_file)?),
        ),
        None => log_dispatcher,
    };
    log_dispatcher.apply()?;
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let settings = Settings::new(args.sticks, args.max_take)?;
    let evaluator = Evaluator::global().clone();
    evaluator.check_sticks(settings.board_size)?;
    let advisor = match args.seed {
        Some(seed) => Advisor::seeded(evaluator.clone(), seed),
        None => Advisor::new(evaluator.clone()),
    };
    let mut computer = Computer::new("computer", advisor);
    let mut human = Human::stdio("you").with_hints(evaluator);

    println!(
        "{} sticks, take 1 to {} adjacent sticks per turn, whoever takes the last one loses.",
        settings.board_size, settings.max_take
    );
    println!("Type 4 or 4-6 to take sticks, hint for help, quit to stop.");

    let (first, second): (&mut dyn Player, &mut dyn Player) = if args.computer_first {
        (&mut computer as &mut dyn Player, &mut human as &mut dyn Player)
    } else {
        (&mut human as &mut dyn Player, &mut computer as &mut dyn Player)
    };
    let mut game = Game::new(settings, first, second);
    let winner = match game.play() {
        Ok(winner) => winner,
        Err(sticky_nim::Error::Aborted) => {
            println!("Bye.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let moves: Vec<String> = game.history().iter().map(|m| m.to_string()).collect();
    println!("Moves: {}", moves.join(" "));
    println!("{} wins.", game.player_name(winner));
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let report: Report = Evaluator::global().analyze(args.up_to, args.max_take)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Losing configurations, K = {}:", report.max_take);
    for config in &report.losing {
        println!("{}", config);
    }
    println!("Principal losing configurations:");
    for config in &report.principal {
        println!("{}", config);
    }
    let share = report.losing.len() as f64 / report.configurations as f64 * 100.0;
    println!(
        "{} configurations up to {} sticks, {} losing ({:.2} %), {} principal",
        report.configurations,
        report.up_to,
        report.losing.len(),
        share,
        report.principal.len()
    );
    Ok(())
}

fn advise(args: AdviseArgs) -> Result<()> {
    let config = canonicalize(args.groups)?;
    if config.is_terminal() {
        bail!("no sticks left");
    }
    let evaluator = Evaluator::global();
    let losing = evaluator.is_losing(&config, args.max_take)?;
    let reply = evaluator.choose_move(&config, args.max_take)?;
    if losing {
        println!("{} is losing with K = {}, try {}", config, args.max_take, reply);
    } else {
        println!("{} is winning with K = {}, move to {}", config, args.max_take, reply);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.log_file.as_deref())?;
    match args.command {
        Command::Play(args) => play(args),
        Command::Analyze(args) => analyze(args),
        Command::Advise(args) => advise(args),
    }
}
