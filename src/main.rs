use std::collections::BTreeSet;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use amf_quiz::{
    AppState, Choice, ExamBlueprint, FilterCriteria, QuestionBank, QuizApp, QuizMode,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file to load the questions from
    #[arg(short, long)]
    questions: PathBuf,

    /// Chapters to draw from (default: all)
    #[arg(short, long, value_delimiter = ',')]
    themes: Vec<String>,

    /// Sub-themes to restrict to (default: unconstrained)
    #[arg(short = 'u', long, value_delimiter = ',')]
    sub_themes: Vec<String>,

    /// Question types to draw from (default: all)
    #[arg(short, long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Number of questions to draw in training mode
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// JSON exam blueprint; switches from training to exam mode
    #[arg(long)]
    exam: Option<PathBuf>,

    /// Directory for the score log and detail files
    #[arg(long, default_value = ".")]
    results_dir: PathBuf,

    /// Session snapshot file for resume-after-interruption
    #[arg(long, default_value = "session_backup.json")]
    snapshot: PathBuf,

    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let bank = QuestionBank::load(&args.questions).expect("Failed to load questions");

    if let Err(e) = run(args, bank) {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args, bank: QuestionBank) -> Result<(), Box<dyn Error>> {
    let mut app = QuizApp::new(bank);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let resumed = app.resume_from_snapshot(&args.snapshot)?;
    if resumed {
        println!(
            "Session interrompue reprise ({} questions restantes).",
            app.session().map(|s| s.total() - s.cursor()).unwrap_or(0)
        );
    } else {
        let mode = build_mode(&args, &app)?;
        app.start(&mode, &mut rng)?;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while app.state() == AppState::InProgress {
        app.save_snapshot(&args.snapshot)?;
        ask_question(&mut app, &mut lines)?;
    }

    print_report(&app)?;

    if prompt(&mut lines, "Enregistrer le score ? (o/n) ")?.eq_ignore_ascii_case("o") {
        std::fs::create_dir_all(&args.results_dir)?;
        let detail_path = app.save_results(&args.results_dir)?;
        println!("Détails enregistrés dans {}", detail_path.display());
    }
    amf_quiz::remove_snapshot(&args.snapshot)?;

    Ok(())
}

fn build_mode(args: &Args, app: &QuizApp) -> Result<QuizMode, Box<dyn Error>> {
    if let Some(path) = &args.exam {
        let blueprint: ExamBlueprint = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        return Ok(QuizMode::Exam { blueprint });
    }

    // Empty CLI sets mean "everything the bank offers"; the engine itself
    // treats an empty set as matching nothing.
    let themes: BTreeSet<String> = if args.themes.is_empty() {
        app.bank().themes().into_iter().collect()
    } else {
        args.themes.iter().cloned().collect()
    };
    let categories: BTreeSet<String> = if args.categories.is_empty() {
        app.bank().categories().into_iter().collect()
    } else {
        args.categories.iter().cloned().collect()
    };

    Ok(QuizMode::Training {
        criteria: FilterCriteria {
            themes,
            sub_themes: args.sub_themes.iter().cloned().collect(),
            categories,
        },
        sample_size: args.count,
    })
}

fn ask_question<I>(app: &mut QuizApp, lines: &mut I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let session = app.session().expect("in-progress state implies a session");
    let number = session.cursor() + 1;
    let total = session.total();
    let question = session
        .current_question()
        .expect("in-progress state implies a current question")
        .clone();

    println!();
    println!(
        "Question {}/{} — Chapitre {} – {} – Type {}",
        number, total, question.theme, question.sub_theme, question.category
    );
    println!("{}", question.text);
    for choice in Choice::ALL {
        println!("  {}", question.labeled_choice(choice));
    }

    loop {
        let input = prompt(lines, "Votre réponse (A/B/C) : ")?;
        let Ok(choice) = input.parse::<Choice>() else {
            println!("Réponse invalide, tapez A, B ou C.");
            continue;
        };

        let feedback = app.submit_answer(choice)?.clone();
        println!("{}", feedback.message());
        if let Some(justification) = feedback.justification() {
            println!("ℹ {}", justification);
        }

        // "o" commits; anything else lets the user re-answer, and the last
        // answer is the one that counts.
        if prompt(lines, "Question suivante ? (o/n) ")?.eq_ignore_ascii_case("o") {
            app.advance()?;
            return Ok(());
        }
    }
}

fn print_report(app: &QuizApp) -> Result<(), Box<dyn Error>> {
    let report = app.report()?;

    println!();
    println!("=== Résultat final ===");
    println!("Score : {} / {}", report.score, report.total);
    println!("Temps : {}", report.elapsed_display());

    println!();
    for row in &report.rows {
        println!(
            "[{}] {} — votre réponse : {} — bonne réponse : {}",
            if row.is_correct { "✓" } else { "✗" },
            row.question,
            row.your_answer,
            row.correct_answer
        );
    }

    println!();
    println!("Par catégorie / sous-thème :");
    for stat in &report.by_group {
        println!("  {} : {}/{}", stat.key, stat.correct, stat.total);
    }
    println!("Par chapitre :");
    for stat in &report.by_theme {
        println!("  {} : {}/{}", stat.key, stat.correct, stat.total);
    }

    Ok(())
}

fn prompt<I>(lines: &mut I, message: &str) -> Result<String, Box<dyn Error>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{}", message);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Err("stdin closed".into()),
    }
}
