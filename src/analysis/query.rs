//! Request validation — turns a raw concept list into a `ConceptQuery`.

use thiserror::Error;

/// Minimum number of concepts per request.
pub const MIN_CONCEPTS: usize = 1;
/// Maximum number of concepts per request.
pub const MAX_CONCEPTS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least 1 concept is required")]
    TooFewConcepts,

    #[error("Maximum 5 concepts are allowed")]
    TooManyConcepts,

    #[error("All concepts must be non-empty")]
    EmptyConcept,

    #[error("All concepts must be unique")]
    DuplicateConcept,
}

/// Validated, immutable concept list: 1–5 trimmed, non-empty,
/// case-insensitively unique entries, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptQuery {
    concepts: Vec<String>,
}

impl ConceptQuery {
    /// Validate a raw concept list. Rules apply in order: count bounds,
    /// blank-after-trim, case-insensitive duplicates.
    pub fn parse(raw: &[String]) -> Result<Self, ValidationError> {
        if raw.len() < MIN_CONCEPTS {
            return Err(ValidationError::TooFewConcepts);
        }
        if raw.len() > MAX_CONCEPTS {
            return Err(ValidationError::TooManyConcepts);
        }

        let mut concepts = Vec::with_capacity(raw.len());
        for entry in raw {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyConcept);
            }
            concepts.push(trimmed.to_string());
        }

        let mut folded: Vec<String> = concepts.iter().map(|c| c.to_lowercase()).collect();
        folded.sort();
        if folded.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ValidationError::DuplicateConcept);
        }

        Ok(Self { concepts })
    }

    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// True when the query holds exactly one concept.
    pub fn is_single(&self) -> bool {
        self.concepts.len() == 1
    }
}
