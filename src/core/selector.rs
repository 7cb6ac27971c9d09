use crate::core::parser::ParseFailure;
use crate::domain::model::CandidateSet;
use crate::utils::error::{Result, WordWolfError};
use rand::Rng;

/// Largest distance between the two picked indices.
pub const MAX_OFFSET: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPair {
    pub first_index: usize,
    pub second_index: usize,
    pub first_word: String,
    pub first_explanation: String,
    pub second_word: String,
    pub second_explanation: String,
}

/// Picks two distinct index positions `offset` apart, wrapping around.
///
/// Neighbouring positions are used because the prompt asks the model to
/// order related terms together; whether they really are related is up to
/// the model.
pub fn select_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let first = rng.gen_range(0..len);
    let offset = rng.gen_range(1..=MAX_OFFSET.min(len - 1));
    Some((first, (first + offset) % len))
}

pub fn select<R: Rng + ?Sized>(candidates: &CandidateSet, rng: &mut R) -> Result<SelectedPair> {
    let (first, second) = select_indices(candidates.len(), rng).ok_or_else(|| {
        WordWolfError::InvalidResponse(ParseFailure::WordCountMismatch {
            expected: 2,
            actual: candidates.len(),
        })
    })?;

    Ok(SelectedPair {
        first_index: first,
        second_index: second,
        first_word: candidates.words[first].clone(),
        first_explanation: candidates.explanations[first].clone(),
        second_word: candidates.words[second].clone(),
        second_explanation: candidates.explanations[second].clone(),
    })
}
