//! Per-answer feedback state

use crate::conversation::TurnId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A 1..=5 rating, the range the feedback backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Thumbs up
    pub const HELPFUL: Rating = Rating(5);
    /// Thumbs down
    pub const NOT_HELPFUL: Rating = Rating(1);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct RatingOutOfRange(pub u8);

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or(RatingOutOfRange(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feedback status of one answer. `NotRated -> Rated` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackState {
    #[default]
    NotRated,
    Rated(Rating),
}

impl FeedbackState {
    pub fn is_rated(self) -> bool {
        matches!(self, FeedbackState::Rated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("turn {0} is already rated")]
pub struct AlreadyRated(pub TurnId);

/// Ratings keyed by turn. Entries are only ever inserted.
#[derive(Debug, Default)]
pub struct FeedbackLedger {
    ratings: HashMap<TurnId, Rating>,
}

impl FeedbackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, turn: TurnId) -> FeedbackState {
        self.ratings
            .get(&turn)
            .copied()
            .map_or(FeedbackState::NotRated, FeedbackState::Rated)
    }

    /// Commit a rating. A second rating for the same turn is refused and the
    /// first one stays.
    pub fn record(&mut self, turn: TurnId, rating: Rating) -> Result<(), AlreadyRated> {
        if self.ratings.contains_key(&turn) {
            return Err(AlreadyRated(turn));
        }
        self.ratings.insert(turn, rating);
        Ok(())
    }
}
