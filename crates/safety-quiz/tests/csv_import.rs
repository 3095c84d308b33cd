use safety_quiz::assessment::{ConfigurationError, Difficulty, QuestionId};
use safety_quiz::content::{ImportError, QuestionBankImporter};

const HEADER: &str = "ID,Question,Option A,Option B,Option C,Option D,Option E,Option F,Correct,Explanation,Category,Difficulty\n";

#[test]
fn importer_builds_a_validated_bank() {
    let csv = format!(
        "{HEADER}\
1,What does COSHH stand for?,Control of Substances Hazardous to Health,Care of Site Health and Hygiene,,,,,A,COSHH is the 2002 regulation.,Understanding COSHH,basic\n\
2,Which is the last resort?,Elimination,Substitution,Engineering controls,PPE,,,D,PPE sits at the bottom of the hierarchy.,Control Measures & PPE,intermediate\n"
    );

    let bank = QuestionBankImporter::from_reader(csv.as_bytes()).expect("import succeeds");
    assert_eq!(bank.len(), 2);

    let first = bank.get(&QuestionId::from(1)).expect("first question present");
    assert_eq!(first.options().len(), 2);
    assert_eq!(first.correct_index(), 0);
    assert_eq!(first.difficulty(), Some(Difficulty::Basic));

    let second = bank.get(&QuestionId::from(2)).expect("second question present");
    assert_eq!(second.correct_index(), 3);
    assert_eq!(second.category(), Some("Control Measures & PPE"));
}

#[test]
fn importer_rejects_correct_answer_beyond_options() {
    let csv = format!("{HEADER}1,Prompt,Yes,No,,,,,C,,,\n");
    let err = QuestionBankImporter::from_reader(csv.as_bytes()).expect_err("C is not an option");
    assert!(matches!(
        err,
        ImportError::Bank(ConfigurationError::CorrectIndexOutOfRange { index: 2, options: 2, .. })
    ));
}

#[test]
fn importer_reports_row_line_numbers() {
    let csv = format!("{HEADER}1,Prompt,Yes,No,,,,,A,,,\n,Missing id,Yes,No,,,,,A,,,\n");
    match QuestionBankImporter::from_reader(csv.as_bytes()) {
        Err(ImportError::Row(problem)) => {
            assert_eq!(problem.line, 3);
            assert!(problem.reason.contains("ID"));
        }
        other => panic!("expected row problem, got {other:?}"),
    }
}

#[test]
fn importer_surfaces_duplicate_ids() {
    let csv = format!("{HEADER}7,First,Yes,No,,,,,A,,,\n7,Second,Yes,No,,,,,B,,,\n");
    let err = QuestionBankImporter::from_reader(csv.as_bytes()).expect_err("ids collide");
    assert!(err.to_string().contains("appears more than once"));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("safety-quiz-no-such-export.csv");
    assert!(matches!(
        QuestionBankImporter::from_path(path),
        Err(ImportError::Io(_))
    ));
}

#[test]
fn importer_rejects_blank_option_before_filled_one() {
    let csv = format!(
        "{HEADER}1,Which is keyed?,Alpha,,Gamma,Delta,,,C,Gamma is the answer.,,\n"
    );
    match QuestionBankImporter::from_reader(csv.as_bytes()) {
        Err(ImportError::Row(problem)) => {
            assert_eq!(problem.line, 2);
            assert!(problem.reason.contains("Option B"));
        }
        other => panic!("expected row problem, got {other:?}"),
    }
}
