use chrono::{DateTime, Utc};
use clap::Parser;
use portal_core::model::{BookCode, ChapterId, QuestionId, QuestionRecord};
use storage::repository::Storage;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Fill a SQLite question store with a sample book")]
struct Args {
    #[arg(long, help = "SQLite URL (default: $PORTAL_DB_URL or sqlite:dev.sqlite3)")]
    db: Option<String>,

    #[arg(long, default_value = "sample-book")]
    book: String,

    #[arg(long, default_value_t = 3)]
    chapters: u32,

    #[arg(long, default_value_t = 10)]
    per_chapter: u32,

    #[arg(long, help = "Fixed created_at for deterministic seeding (RFC3339)")]
    now: Option<DateTime<Utc>>,
}

fn sample_question(
    book: &BookCode,
    chapter: u32,
    position: u32,
    number: u32,
    now: DateTime<Utc>,
) -> QuestionRecord {
    QuestionRecord {
        id: QuestionId::new(format!("{book}-c{chapter}-q{position}")),
        book_code: book.clone(),
        chapter: ChapterId::new(chapter.to_string()),
        question_number_in_book: number,
        prompt: format!("Chapter {chapter}, question {position}"),
        options: serde_json::json!(["A", "B", "C", "D"]),
        answer: Some(["A", "B", "C", "D"][(number % 4) as usize].to_string()),
        explanation: None,
        created_at: now,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let db_url = args
        .db
        .or_else(|| std::env::var("PORTAL_DB_URL").ok())
        .unwrap_or_else(|| "sqlite:dev.sqlite3?mode=rwc".into());

    let storage = Storage::sqlite(&db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let book: BookCode = args.book.parse()?;

    let mut number = 0_u32;
    for chapter in 1..=args.chapters {
        for position in 1..=args.per_chapter {
            number += 1;
            let record = sample_question(&book, chapter, position, number, now);
            storage.questions.upsert_question(&record).await?;
        }
    }

    println!(
        "Seeded {number} questions across {} chapters of {book} into {db_url}",
        args.chapters
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
