use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use study_notes::catalog;
use study_notes::history::{self, FileStorage};
use study_notes::{NoteCapture, Settings, Subject, Summarizer, UploadFile};

#[derive(Parser)]
#[command(name = "study-notes", version, about = "Turn images and PDFs into short study notes")]
struct Cli {
    /// Print notes, tests and leaderboard entries as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from an image or PDF and save a short note
    Upload {
        /// Path to an image or PDF
        file: PathBuf,
    },
    /// Show saved notes, newest first
    Notes,
    /// Ask the AI tutor a question
    Tutor {
        #[arg(long, default_value = "mathematics")]
        subject: Subject,
        question: String,
    },
    /// List the available mock tests
    Tests,
    /// Show the leaderboard
    Leaderboard {
        /// Only show students of this subject
        #[arg(long)]
        subject: Option<Subject>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Upload { file } => {
            let settings = Settings::load()?;
            debug!("{:?}", settings.storage);
            let orchestrator = NoteCapture::builder().settings(settings).build()?;

            orchestrator.select_file(UploadFile::from_path(&file).await?);
            let note = orchestrator.upload().await?;
            println!("{}", note.text);
        }
        Command::Notes => {
            let settings = Settings::load()?;
            let storage = FileStorage::new(settings.storage.resolve_dir());
            let notes = history::load(&storage);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
                return Ok(());
            }
            if notes.is_empty() {
                println!("No notes generated yet. Try uploading a file!");
            }
            for note in notes {
                println!("[{}] {}", note.id, note.text);
            }
        }
        Command::Tutor { subject, question } => {
            let settings = Settings::load()?;
            let summarizer = Summarizer::from_settings(&settings)?;
            println!("{}", summarizer.tutor(subject, &question).await?);
        }
        Command::Tests => {
            let tests = catalog::mock_tests();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tests)?);
                return Ok(());
            }
            for test in tests {
                println!(
                    "{:<12} {:<26} {:>3} mins {:>3} questions  {}",
                    test.subject.to_string(),
                    test.title,
                    test.duration_minutes,
                    test.questions,
                    test.difficulty
                );
            }
        }
        Command::Leaderboard { subject } => {
            let entries = catalog::leaderboard(subject);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            for entry in entries {
                println!(
                    "#{:<2} {:<18} {:>4}  {}",
                    entry.rank, entry.name, entry.score, entry.subject
                );
            }
        }
    }

    Ok(())
}
