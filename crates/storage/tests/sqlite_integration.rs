use portal_core::model::{BookCode, CatalogEntry, ChapterId, QuestionId, QuestionRecord};
use portal_core::time::fixed_now;
use storage::repository::QuestionRepository;
use storage::sqlite::SqliteRepository;

fn question(id: &str, chapter: &str, number: u32) -> QuestionRecord {
    QuestionRecord {
        id: QuestionId::new(id),
        book_code: BookCode::new("chem-11"),
        chapter: ChapterId::new(chapter),
        question_number_in_book: number,
        prompt: format!("Prompt {id}"),
        options: serde_json::json!({ "a": "1", "b": "2" }),
        answer: Some("a".into()),
        explanation: Some("because".into()),
        created_at: fixed_now(),
    }
}

async fn repo(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_find_by_ids_orders_by_book_number() {
    let repo = repo("memdb_find_by_ids").await;
    repo.upsert_question(&question("q1", "1", 10)).await.unwrap();
    repo.upsert_question(&question("q3", "2", 2)).await.unwrap();

    let ids = [QuestionId::new("q1"), QuestionId::new("q2"), QuestionId::new("q3")];
    let found = repo.find_by_ids(&ids).await.expect("fetch");

    let got: Vec<_> = found.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(got, vec!["q3", "q1"]);
    assert_eq!(found[1].options, serde_json::json!({ "a": "1", "b": "2" }));
    assert_eq!(found[1].explanation.as_deref(), Some("because"));
    assert_eq!(found[1].created_at, fixed_now());
}

#[tokio::test]
async fn sqlite_duplicates_and_unknown_ids() {
    let repo = repo("memdb_duplicates").await;
    repo.upsert_question(&question("q1", "1", 1)).await.unwrap();

    let found = repo
        .find_by_ids(&[QuestionId::new("q1"), QuestionId::new("q1")])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let none = repo.find_by_ids(&[QuestionId::new("missing")]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn sqlite_upsert_replaces_content_and_catalog_is_scoped() {
    let repo = repo("memdb_catalog").await;
    repo.upsert_question(&question("a", "1", 5)).await.unwrap();
    repo.upsert_question(&question("b", "1", 4)).await.unwrap();
    repo.upsert_question(&question("c", "2", 1)).await.unwrap();

    let mut moved = question("a", "1", 3);
    moved.prompt = "rewritten".into();
    repo.upsert_question(&moved).await.unwrap();

    let catalog = repo
        .chapter_catalog(&BookCode::new("chem-11"), &ChapterId::new("1"))
        .await
        .unwrap();
    assert_eq!(
        catalog,
        vec![
            CatalogEntry::new(QuestionId::new("a"), 3),
            CatalogEntry::new(QuestionId::new("b"), 4),
        ]
    );

    let found = repo.find_by_ids(&[QuestionId::new("a")]).await.unwrap();
    assert_eq!(found[0].prompt, "rewritten");
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_find_by_ids_accepts_more_ids_than_bind_slots() {
    let repo = repo("memdb_many_ids").await;
    repo.upsert_question(&question("q-39999", "1", 2)).await.unwrap();
    repo.upsert_question(&question("q-7", "1", 1)).await.unwrap();

    let ids: Vec<QuestionId> = (0..40_000).map(|i| QuestionId::new(format!("q-{i}"))).collect();
    let found = repo.find_by_ids(&ids).await.expect("fetch");

    let got: Vec<_> = found.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(got, vec!["q-7", "q-39999"]);
}
