//! # Encoding
//!
//! A [`Genome`] is a fixed-length bit string read most-significant bit first.
//! [`decode`] rescales the unsigned integer it spells linearly onto `[min, max]`:
//! the all-zero pattern maps to `min` and the all-one pattern maps to `max`.
//!
//! Genomes are only ever produced at random or by the genetic operators, so
//! there is no inverse `encode`.
//!
//! ```rust
//! use gamin::encoding::Genome;
//!
//! let genome: Genome = "1111".parse().unwrap();
//! assert_eq!(genome.decode(-2.0, 2.0), 2.0);
//! assert_eq!(genome.as_uint(), 15);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Longest bit string whose value still fits in a `u64`.
pub const MAX_REPRESENTATION_SIZE: usize = 64;

/// Decodes a most-significant-bit-first bit string onto `[min, max]`.
///
/// An empty bit string decodes to `min`.
pub fn decode(bits: &[bool], min: f64, max: f64) -> f64 {
    if bits.is_empty() {
        return min;
    }
    let value = unsigned_value(bits) as f64;
    min + (max - min) * (value / all_ones(bits.len()) as f64)
}

fn unsigned_value(bits: &[bool]) -> u64 {
    bits.iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

fn all_ones(len: usize) -> u64 {
    if len >= MAX_REPRESENTATION_SIZE {
        u64::MAX
    } else {
        (1u64 << len) - 1
    }
}

/// An ordered, fixed-length sequence of bits encoding one decision variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Creates a genome of `len` bits, each set with probability one half.
    pub fn random(len: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new(rng.fetch_bits(len))
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// The unsigned integer spelled by the bits, most significant first.
    pub fn as_uint(&self) -> u64 {
        unsigned_value(&self.bits)
    }

    pub fn decode(&self, min: f64, max: f64) -> f64 {
        decode(&self.bits, min, max)
    }

    /// Flips every bit whose position is set in `mask`.
    ///
    /// Positions past the shorter of the two are left untouched.
    pub fn flip_masked(&mut self, mask: &[bool]) {
        self.bits
            .iter_mut()
            .zip(mask)
            .for_each(|(bit, &flip)| *bit ^= flip);
    }

    /// Splits both genomes at `point` and swaps their tails.
    ///
    /// The first child carries `self`'s prefix and `other`'s suffix, the second
    /// child carries `other`'s prefix and `self`'s suffix. Both genomes must have
    /// the same length and `point` must not exceed it.
    pub fn splice(&self, other: &Genome, point: usize) -> (Genome, Genome) {
        let mut first = Vec::with_capacity(self.len());
        first.extend_from_slice(&self.bits[..point]);
        first.extend_from_slice(&other.bits[point..]);

        let mut second = Vec::with_capacity(other.len());
        second.extend_from_slice(&other.bits[..point]);
        second.extend_from_slice(&self.bits[point..]);

        (Genome::new(first), Genome::new(second))
    }
}

impl From<Vec<bool>> for Genome {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl FromStr for Genome {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(GeneticError::Configuration(format!(
                    "Invalid bit '{}' in genome literal",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Genome::new)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
