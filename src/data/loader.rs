use std::fmt;
use std::io;
use std::path::Path;

use csv::StringRecord;

use crate::models::{Choice, Question};

/// Columns the question table must provide. `justification` is tolerated
/// missing (older exports do not carry it).
const REQUIRED_COLUMNS: [&str; 8] = [
    "theme",
    "sous_theme",
    "categorie",
    "question",
    "Choix_A",
    "Choix_B",
    "Choix_C",
    "bonne_reponse",
];

/// Error loading the question table.
#[derive(Debug)]
pub enum LoadError {
    /// Could not read the file.
    Io(io::Error),
    /// Malformed CSV (ragged row, bad encoding, ...).
    Csv(csv::Error),
    /// A required column is absent from the header row.
    MissingColumn(&'static str),
    /// `bonne_reponse` is not one of A, B, C.
    InvalidCorrectChoice { row: usize, value: String },
    /// The option text named by `bonne_reponse` is blank.
    EmptyChoiceText { row: usize, choice: Choice },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read question table: {}", e),
            LoadError::Csv(e) => write!(f, "malformed question table: {}", e),
            LoadError::MissingColumn(name) => {
                write!(f, "question table is missing column '{}'", name)
            }
            LoadError::InvalidCorrectChoice { row, value } => write!(
                f,
                "row {}: bonne_reponse is '{}', expected A, B or C",
                row, value
            ),
            LoadError::EmptyChoiceText { row, choice } => write!(
                f,
                "row {}: bonne_reponse is {} but Choix_{} is empty",
                row, choice, choice
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

/// Load questions from a CSV file with the AMF bank's column layout.
pub fn load_questions_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let file = std::fs::File::open(path.as_ref())?;
    load_questions_from_reader(file)
}

/// Load questions from any CSV source. Header row is mandatory.
pub fn load_questions_from_reader<R: io::Read>(reader: R) -> Result<Vec<Question>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut questions = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        questions.push(columns.parse_row(&record, i + 1)?);
    }

    Ok(questions)
}

/// Resolved column indices for one table.
struct Columns {
    theme: usize,
    sub_theme: usize,
    category: usize,
    question: usize,
    choice_a: usize,
    choice_b: usize,
    choice_c: usize,
    correct: usize,
    justification: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        for name in REQUIRED_COLUMNS {
            position(name)?;
        }

        Ok(Self {
            theme: position("theme")?,
            sub_theme: position("sous_theme")?,
            category: position("categorie")?,
            question: position("question")?,
            choice_a: position("Choix_A")?,
            choice_b: position("Choix_B")?,
            choice_c: position("Choix_C")?,
            correct: position("bonne_reponse")?,
            justification: headers.iter().position(|h| h == "justification"),
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<Question, LoadError> {
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let raw_correct = field(self.correct);
        let correct_choice =
            raw_correct
                .parse::<Choice>()
                .map_err(|_| LoadError::InvalidCorrectChoice {
                    row,
                    value: raw_correct.clone(),
                })?;

        let question = Question {
            theme: field(self.theme),
            sub_theme: field(self.sub_theme),
            category: field(self.category),
            text: field(self.question),
            choice_a: field(self.choice_a),
            choice_b: field(self.choice_b),
            choice_c: field(self.choice_c),
            correct_choice,
            justification: self.justification.map(field).filter(|j| !j.is_empty()),
        };

        if question.choice_text(correct_choice).is_empty() {
            return Err(LoadError::EmptyChoiceText {
                row,
                choice: correct_choice,
            });
        }

        Ok(question)
    }
}
