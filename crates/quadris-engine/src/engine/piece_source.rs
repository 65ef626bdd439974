use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seedable source of piece kinds.
///
/// Kinds are drawn uniformly and independently; the sequence is fully
/// determined by the seed, so two sources built from the same
/// [`PieceSeed`] produce the same game.
#[derive(Debug, Clone)]
pub struct PieceSource {
    rng: Pcg32,
    seed: PieceSeed,
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource {
    /// Creates a source with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic
    /// piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            seed,
        }
    }

    /// The seed this source was built from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value written as 32 hex characters in its string, serde, and
/// command-line forms. The same seed always yields the same piece
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid seed: expected 32 hex characters")]
pub struct ParseSeedError;

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
