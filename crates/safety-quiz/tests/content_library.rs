use safety_quiz::assessment::{ConfigurationError, Difficulty};
use safety_quiz::content::{ContentError, ContentLibrary};
use std::fs;
use std::path::PathBuf;

const MINIMAL_BANK: &str = r#"{
    "key": "manual-handling",
    "title": "Manual Handling",
    "exam": {
        "examId": "manual-handling",
        "examTitle": "Manual Handling Mock Exam",
        "totalQuestions": 2,
        "timeLimit": 600,
        "passThreshold": 50
    },
    "questions": [
        { "id": 1, "question": "Bend at the knees?", "options": ["Yes", "No"], "correctAnswer": 0 },
        { "id": 2, "question": "Twist while lifting?", "options": ["Yes", "No"], "correctAnswer": 1 }
    ]
}"#;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("safety-quiz-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir created");
    dir
}

#[test]
fn standard_library_holds_every_course() {
    let library = ContentLibrary::standard().expect("embedded content loads");
    assert_eq!(
        library.keys(),
        vec![
            "cdm-regulations",
            "coshh-awareness",
            "cscs-card",
            "scaffolding-awareness"
        ]
    );

    for entry in library.entries() {
        assert_eq!(entry.bank.len(), 30, "{} bank size", entry.key);
        assert_eq!(entry.bank.categories().len(), 5, "{} categories", entry.key);
        assert_eq!(entry.bank.count_by_difficulty(Difficulty::Basic), 10);
        assert_eq!(entry.exam.total_questions, 20);
        assert_eq!(entry.inline_check_count(), 3);
    }
}

#[test]
fn documents_load_in_the_order_given() {
    let library = ContentLibrary::from_documents([("manual.json", MINIMAL_BANK)])
        .expect("minimal bank loads");
    let entry = library.get("manual-handling").expect("entry present");
    assert_eq!(entry.title, "Manual Handling");
    assert_eq!(entry.inline_check_count(), 0);
    assert!(entry.exam.categories.is_empty());
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = ContentLibrary::from_documents([("a.json", MINIMAL_BANK), ("b.json", MINIMAL_BANK)])
        .expect_err("keys collide");
    assert!(matches!(err, ContentError::DuplicateKey(key) if key == "manual-handling"));
}

#[test]
fn invalid_question_names_its_document() {
    let broken = MINIMAL_BANK.replace("\"correctAnswer\": 1", "\"correctAnswer\": 5");
    let err = ContentLibrary::from_documents([("broken.json", broken.as_str())])
        .expect_err("correct index out of range");
    match err {
        ContentError::Invalid { name, source } => {
            assert_eq!(name, "broken.json");
            assert!(matches!(
                source,
                ConfigurationError::CorrectIndexOutOfRange { index: 5, .. }
            ));
        }
        other => panic!("expected invalid content, got {other:?}"),
    }
}

#[test]
fn exam_asking_for_more_questions_than_the_bank_is_invalid() {
    let oversized = MINIMAL_BANK.replace("\"totalQuestions\": 2", "\"totalQuestions\": 3");
    let err = ContentLibrary::from_documents([("oversized.json", oversized.as_str())])
        .expect_err("exam is larger than its bank");
    assert!(matches!(
        err,
        ContentError::Invalid {
            source: ConfigurationError::InvalidExam { .. },
            ..
        }
    ));
}

#[test]
fn directory_loading_reads_json_files_only() {
    let dir = scratch_dir("dir-load");
    fs::write(dir.join("manual.json"), MINIMAL_BANK).expect("bank written");
    fs::write(dir.join("notes.txt"), "not a bank").expect("notes written");

    let library = ContentLibrary::from_dir(&dir).expect("directory loads");
    assert_eq!(library.keys(), vec!["manual-handling"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn directory_without_banks_is_an_error() {
    let dir = scratch_dir("empty");
    let err = ContentLibrary::from_dir(&dir).expect_err("no banks present");
    assert!(matches!(err, ContentError::Empty(_)));

    let missing = dir.join("missing");
    assert!(matches!(
        ContentLibrary::from_dir(&missing),
        Err(ContentError::Io { .. })
    ));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = ContentLibrary::from_documents([("bad.json", "{ \"key\": ")])
        .expect_err("truncated document");
    assert!(matches!(err, ContentError::Parse { name, .. } if name == "bad.json"));
}
