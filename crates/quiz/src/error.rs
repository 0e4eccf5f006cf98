use foundation::geometry::GeometryError;
use foundation::ids::CountryId;

#[derive(Debug, Clone, PartialEq)]
pub enum QuizError {
    NotEnoughCountries { requested: usize, available: usize },
    AlreadyAnswered(CountryId),
    UnknownCountry(CountryId),
    Geometry(GeometryError),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::NotEnoughCountries {
                requested,
                available,
            } => write!(
                f,
                "cannot draw {requested} questions from a pool of {available} countries"
            ),
            QuizError::AlreadyAnswered(id) => write!(f, "question for country {id} was already answered"),
            QuizError::UnknownCountry(id) => write!(f, "country {id} is not in the dataset"),
            QuizError::Geometry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for QuizError {
    fn from(e: GeometryError) -> Self {
        QuizError::Geometry(e)
    }
}
