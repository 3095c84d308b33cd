use safety_quiz::assessment::ReviewFilter;
use safety_quiz::config::ContentConfig;
use safety_quiz::content::ContentLibrary;
use safety_quiz::error::AppError;
use tracing::info;

/// Answers supplied on the command line, one entry per question in paper
/// order. `None` leaves the question unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnswerScript(pub(crate) Vec<Option<usize>>);

/// Course library honouring `QUIZ_CONTENT_DIR` when it is set.
pub(crate) fn load_library(config: &ContentConfig) -> Result<ContentLibrary, AppError> {
    match &config.directory {
        Some(dir) => {
            info!(directory = %dir.display(), "loading question banks from directory");
            Ok(ContentLibrary::from_dir(dir)?)
        }
        None => Ok(ContentLibrary::standard()?),
    }
}

/// Zero-based option index from an option letter (`b`) or a 1-based number (`2`).
pub(crate) fn parse_choice(raw: &str) -> Option<usize> {
    let token = raw.trim();
    if let Ok(number) = token.parse::<usize>() {
        return number.checked_sub(1);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Some(usize::from(letter.to_ascii_lowercase() as u8 - b'a'))
        }
        _ => None,
    }
}

pub(crate) fn parse_answers(raw: &str) -> Result<AnswerScript, String> {
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            if token.is_empty() || token == "-" {
                return Ok(None);
            }
            parse_choice(token)
                .map(Some)
                .ok_or_else(|| format!("'{token}' is not an option letter or number"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AnswerScript)
}

pub(crate) fn parse_review_filter(raw: &str) -> Result<ReviewFilter, String> {
    ReviewFilter::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not one of all, correct, incorrect, unanswered, flagged")
    })
}

pub(crate) fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|offset| *offset < 26)
        .map_or('?', |offset| char::from(b'A' + offset))
}
