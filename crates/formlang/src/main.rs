//! Command-line front end for the DFA and grammar engines.
//!
//! Loads a JSON model definition, echoes it, runs the requested simulation,
//! and prints the trace and verdict. Each error kind maps to its own exit
//! code so scripts can tell a broken definition from a bad input.

use clap::{ArgGroup, Parser, Subcommand};
use formlang::{Dfa, DfaDef, GrammarDef, Outcome, RegularGrammar};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Unreadable or unparsable definition file.
const EXIT_DEFINITION: u8 = 65;
/// Structurally inconsistent model.
const EXIT_CONFIG: u8 = 66;
/// Input or target outside the declared alphabet.
const EXIT_ALPHABET: u8 = 67;
/// Generation failed (step limit or exhausted sample space).
const EXIT_GENERATE: u8 = 68;

#[derive(Parser, Debug)]
#[command(name = "formlang")]
#[command(about = "Simulate DFA acceptors and regular grammars", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an input string through a DFA definition
    Dfa {
        /// Path to the JSON definition file
        #[arg(short, long)]
        file: PathBuf,
        /// Input string to check
        #[arg(short, long)]
        input: String,
    },
    /// Test a string against a regular grammar, or sample its language
    #[command(group(ArgGroup::new("mode").required(true).args(["input", "sample"])))]
    Grammar {
        /// Path to the JSON definition file
        #[arg(short, long)]
        file: PathBuf,
        /// Target string to derive
        #[arg(short, long)]
        input: Option<String>,
        /// Number of distinct strings to generate
        #[arg(short, long)]
        sample: Option<usize>,
        /// RNG seed for reproducible sampling
        #[arg(long, requires = "sample")]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::Dfa { file, input } => run_dfa(&file, &input),
        Command::Grammar {
            file,
            input,
            sample,
            seed,
        } => match (input, sample) {
            (Some(target), _) => run_grammar_test(&file, &target),
            (None, Some(count)) => run_grammar_sample(&file, count, seed),
            // The arg group requires one of the two.
            (None, None) => ExitCode::from(2),
        },
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ExitCode> {
    let raw = fs::read_to_string(path).map_err(|err| {
        eprintln!("error: cannot read {}: {err}", path.display());
        ExitCode::from(EXIT_DEFINITION)
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        eprintln!("error: {} is not a valid definition: {err}", path.display());
        ExitCode::from(EXIT_DEFINITION)
    })
}

fn print_definition<T: Serialize>(label: &str, def: &T) {
    println!("{label}:");
    if let Ok(pretty) = serde_json::to_string_pretty(def) {
        println!("{pretty}");
    }
}

fn fail(code: u8, err: &dyn std::error::Error) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(code)
}

fn run_dfa(file: &Path, input: &str) -> ExitCode {
    let def: DfaDef = match load(file) {
        Ok(def) => def,
        Err(code) => return code,
    };
    print_definition("DFA", &def);

    let dfa = match Dfa::try_from(def) {
        Ok(dfa) => dfa,
        Err(err) => return fail(EXIT_CONFIG, &err),
    };
    let run = match dfa.check(input) {
        Ok(run) => run,
        Err(err) => return fail(EXIT_ALPHABET, &err),
    };

    println!("Input:\n{input}");
    println!("Path:");
    println!("{}", run.path);
    let verdict = if run.accepted { "accepted" } else { "rejected" };
    println!("Conclusion: {verdict}");
    ExitCode::SUCCESS
}

fn run_grammar_test(file: &Path, target: &str) -> ExitCode {
    let def: GrammarDef = match load(file) {
        Ok(def) => def,
        Err(code) => return code,
    };
    print_definition("Grammar", &def);

    let grammar = match RegularGrammar::try_from(def) {
        Ok(grammar) => grammar,
        Err(err) => return fail(EXIT_CONFIG, &err),
    };
    let derivation = match grammar.test(target) {
        Ok(derivation) => derivation,
        Err(err) => return fail(EXIT_ALPHABET, &err),
    };

    println!("Input:\n{target}");
    println!("Path:");
    println!("{derivation}");
    let verdict = match derivation.outcome {
        Outcome::Accepted => "accepted",
        Outcome::Stuck => "rejected",
        Outcome::StepLimit => "rejected (derivation step limit reached)",
    };
    println!("Conclusion: {verdict}");
    ExitCode::SUCCESS
}

fn run_grammar_sample(file: &Path, count: usize, seed: Option<u64>) -> ExitCode {
    let def: GrammarDef = match load(file) {
        Ok(def) => def,
        Err(code) => return code,
    };
    print_definition("Grammar", &def);

    let grammar = match RegularGrammar::try_from(def) {
        Ok(grammar) => grammar,
        Err(err) => return fail(EXIT_CONFIG, &err),
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match grammar.sample(&mut rng, count) {
        Ok(strings) => {
            println!("{count} sample strings:");
            for string in &strings {
                println!("{string}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => fail(EXIT_GENERATE, &err),
    }
}
