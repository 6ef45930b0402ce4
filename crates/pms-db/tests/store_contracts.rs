//! Snapshot import and the store contracts over a file-backed database.

use pms_core::entities::{Metric, Panel, Question, Student};
use pms_core::snapshot::PanelSnapshot;
use pms_core::store::{MetricStore, PanelStore, QuestionStore, StudentStore};
use pms_db::PmsDb;
use pms_db::error::DatabaseError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn snapshot() -> PanelSnapshot {
    let panel_id = "p-1";
    let students: Vec<Student> = ["u-1", "u-2", "u-3"]
        .into_iter()
        .map(|id| Student {
            id: id.into(),
            panel_id: panel_id.into(),
        })
        .collect();
    let questions = vec![
        Question::new("q-1", "u-1", panel_id, "What is a lifetime?")
            .unwrap()
            .with_likes(["u-2"])
            .with_similar(["q-2"]),
        Question::new("q-2", "u-2", panel_id, "How do lifetimes work?").unwrap(),
        Question::new("q-3", "u-3", panel_id, "Why Send?")
            .unwrap()
            .with_flags(["u-1"]),
    ];
    let metrics = students
        .iter()
        .map(|s| Metric::new(s.id.clone(), panel_id))
        .collect();
    PanelSnapshot {
        panel: Panel {
            id: panel_id.into(),
            questions_required: 1,
        },
        students,
        questions,
        metrics,
    }
}

#[tokio::test]
async fn imported_snapshot_is_visible_through_store_traits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pms.db");
    let db = PmsDb::open_local(path.to_str().unwrap()).await.unwrap();

    let summary = db.import_snapshot(&snapshot()).await.unwrap();
    assert_eq!(summary.questions, 3);

    assert_eq!(db.get_required_question_count("p-1").await.unwrap(), Some(1));
    assert_eq!(db.get_required_question_count("p-9").await.unwrap(), None);
    assert_eq!(
        db.list_student_ids("p-1").await.unwrap(),
        vec!["u-1", "u-2", "u-3"]
    );

    let questions = db.list_questions_by_panel("p-1").await.unwrap();
    assert_eq!(questions, snapshot().questions);

    let mine = db.list_my_questions("p-1", "u-3").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine[0].is_flagged());

    assert_eq!(db.list_metrics_by_panel("p-1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn reopened_database_keeps_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pms.db");
    let path = path.to_str().unwrap();

    {
        let db = PmsDb::open_local(path).await.unwrap();
        db.import_snapshot(&snapshot()).await.unwrap();
        let mut question = db.get_question("q-2").await.unwrap().unwrap();
        question.final_score = Some(dec!(9.5));
        QuestionStore::upsert_question(&db, &question).await.unwrap();
    }

    let db = PmsDb::open_local(path).await.unwrap();
    let question = db.get_question("q-2").await.unwrap().unwrap();
    assert_eq!(question.final_score, Some(dec!(9.5)));

    let mut metric = db.get_metric("u-1", "p-1").await.unwrap().unwrap();
    metric.final_total_score = Some(dec!(40));
    MetricStore::upsert_metric(&db, &metric).await.unwrap();
    assert_eq!(
        db.get_metric("u-1", "p-1").await.unwrap().unwrap().final_total_score,
        Some(dec!(40))
    );
}

#[tokio::test]
async fn invalid_snapshot_writes_nothing() {
    let db = PmsDb::open_local(":memory:").await.unwrap();
    let mut bad = snapshot();
    bad.questions[2].panel_id = "p-2".into();

    let err = db.import_snapshot(&bad).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Invalid(_)));
    assert!(db.get_panel("p-1").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_write_rolls_back_the_whole_import() {
    let db = PmsDb::open_local(":memory:").await.unwrap();
    db.import_snapshot(&snapshot()).await.unwrap();
    db.conn()
        .execute(
            "CREATE TRIGGER reject_late BEFORE INSERT ON questions
             WHEN NEW.id = 'q-4' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
            (),
        )
        .await
        .unwrap();

    let mut second = snapshot();
    second.questions[0].text = "rewritten".into();
    second
        .questions
        .push(Question::new("q-4", "u-1", "p-1", "late").unwrap());

    assert!(db.import_snapshot(&second).await.is_err());
    let first = db.get_question("q-1").await.unwrap().unwrap();
    assert_eq!(first.text, "What is a lifetime?");
    assert!(db.get_question("q-4").await.unwrap().is_none());
}
