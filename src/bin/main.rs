use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::{stdin, stdout, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use suggest_core::persistence::load_or_build;
use suggest_core::{Backend, SuggestConfig, SuggestEngine};

const LOG_PATH: &str = "target/suggest_repl.log";
const TABLES_DIR: &str = "target/lev_tables";

const SAMPLE_DICTIONARY: &[(&str, u64)] = &[
    ("apple", 6),
    ("apple juice", 36),
    ("apple pie", 42),
    ("applesauce", 24),
    ("strawberry", 9001),
    ("food", 10),
];

fn init_logging() -> Result<(), Box<dyn Error>> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {l} {t} - {m}{n}")))
        .append(false)
        .build(LOG_PATH)?;
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(LevelFilter::Debug))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// A dictionary snapshot is a JSON object of `"keyword": weight` pairs.
fn load_dictionary(path: &Path) -> Result<BTreeMap<String, u64>, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn build_engine(args: &[String]) -> Result<SuggestEngine, Box<dyn Error>> {
    let config = match args.get(2) {
        Some(path) => SuggestConfig::load(Path::new(path))?,
        None => SuggestConfig::default(),
    };
    let tables = PathBuf::from(TABLES_DIR).join(format!("lev{}.bin", config.max_distance));
    let factory = Arc::new(load_or_build(&tables, config.max_distance)?);

    let engine = match args.get(1) {
        Some(path) => SuggestEngine::with_factory(load_dictionary(Path::new(path))?, config, factory)?,
        None => SuggestEngine::with_factory(SAMPLE_DICTIONARY.iter().copied(), config, factory)?,
    };
    Ok(engine)
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = init_logging() {
        eprintln!("[WARN] file logging disabled: {}", e);
    }

    let args: Vec<String> = std::env::args().collect();
    let mut engine = build_engine(&args)?;
    let mut input = String::new();

    loop {
        print_ui(&input, &engine)?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            break;
        }
        let cmd = line.trim_end_matches(['\r', '\n']);

        match cmd {
            "exit" => break,
            ":bk" => engine.set_backend(Backend::BkTree),
            ":automaton" => engine.set_backend(Backend::Automaton),
            s if s.starts_with(":add ") => {
                let mut parts = s[5..].rsplitn(2, ' ');
                let weight = parts.next().and_then(|w| w.parse::<u64>().ok());
                match (parts.next(), weight) {
                    (Some(keyword), Some(weight)) => {
                        if let Err(e) = engine.add_keyword(keyword, weight) {
                            log::warn!("rejected :add {:?}: {}", s, e);
                        }
                    }
                    _ => log::warn!("usage: :add <keyword> <weight>"),
                }
            }
            s => input = s.to_string(),
        }
    }
    Ok(())
}

fn print_ui(input: &str, engine: &SuggestEngine) -> Result<(), Box<dyn Error>> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Fuzzy Suggest".bold());
    println!("---------------------------------------------------------------");
    println!("Type a prefix or a misspelled word. ':bk' / ':automaton' switch backends,");
    println!("':add <keyword> <weight>' adds weight, 'exit' quits.\n");
    println!(
        "Dictionary: {} keywords, backend {:?}, max distance {}",
        engine.len(),
        engine.config().backend,
        engine.config().max_distance
    );
    println!("\nInput: [{}]", input.cyan());

    let top_n = engine.config().default_top_n;
    let completions = engine.top_n_entries(input, top_n);
    if completions.is_empty() {
        println!("\nNo completions.");
    } else {
        println!("\n{}", "Completions:".green());
        for (i, entry) in completions.iter().enumerate() {
            println!("  {}. {} (weight: {})", i + 1, entry.text, entry.weight);
        }
    }

    let suggestions = engine.suggestions(input, top_n);
    if suggestions.is_empty() {
        println!("\nNo suggestions within distance {}.", engine.config().max_distance);
    } else {
        println!("\n{}", "Did you mean:".yellow());
        for (i, s) in suggestions.iter().enumerate() {
            println!("  {}. {} (distance: {}, weight: {})", i + 1, s.keyword, s.distance, s.weight);
        }
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
