//! Dice notation: `D6`, `2D6`, `4D6+2`, `D3-1`, or a flat count like `7`.
//!
//! Notation is parsed once into a [`DiceExpr`] and evaluated as many times as
//! needed. Parsing never fails. The first dice notation found anywhere in the
//! text is used, so `2D6+` reads as `2D6`. Otherwise the whole text must be an
//! integer; anything else becomes [`DiceExpr::Invalid`], which always
//! evaluates to 1.

use std::fmt;

use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::dice::roller::DieRoller;

/// A parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiceExpr {
    /// Roll `count` dice of `sides` faces, sum, add `modifier`
    Roll { count: u32, sides: u32, modifier: i32 },
    /// A fixed value, no randomness
    Flat(u32),
    /// Unparsable notation
    Invalid,
}

/// Outcome of a damage roll, kept split so the log can show both parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub dice_total: u32,
    pub modifier: i32,
}

impl DamageRoll {
    /// Damage inflicted, never less than 1
    pub fn total(&self) -> u32 {
        clamp_total(self.dice_total as i64 + self.modifier as i64)
    }
}

impl DiceExpr {
    /// Parse notation. Whitespace is ignored and `d`/`D` are equivalent.
    pub fn parse(text: &str) -> Self {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        match find_roll(&compact) {
            Some(DiceExpr::Roll { sides: 0, .. }) => DiceExpr::Invalid,
            Some(expr) => expr,
            None => whole_flat(&compact).unwrap_or(DiceExpr::Invalid),
        }
    }

    /// Does evaluating this expression consume dice?
    pub fn is_random(&self) -> bool {
        matches!(self, DiceExpr::Roll { .. })
    }

    /// Smallest and largest value `evaluate` can return
    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            DiceExpr::Roll {
                count,
                sides,
                modifier,
            } => {
                let low = clamp_total(count as i64 + modifier as i64);
                let high = clamp_total(
                    (count as i64)
                        .saturating_mul(sides as i64)
                        .saturating_add(modifier as i64),
                );
                (low, high)
            }
            DiceExpr::Flat(n) => (n, n),
            DiceExpr::Invalid => (1, 1),
        }
    }

    /// Evaluate to a single number
    ///
    /// Rolled totals are clamped to at least 1. Flat values are returned as
    /// written, so `"0"` evaluates to 0.
    pub fn evaluate(&self, dice: &mut impl DieRoller) -> u32 {
        match *self {
            DiceExpr::Roll {
                count,
                sides,
                modifier,
            } => {
                let rolled = (0..count).fold(0i64, |sum, _| {
                    sum.saturating_add(dice.roll_die(sides) as i64)
                });
                clamp_total(rolled.saturating_add(modifier as i64))
            }
            DiceExpr::Flat(n) => n,
            DiceExpr::Invalid => 1,
        }
    }

    /// Roll damage, reporting each die to `on_die(index, face)` as it lands
    pub fn roll_damage(
        &self,
        dice: &mut impl DieRoller,
        mut on_die: impl FnMut(u32, u32),
    ) -> DamageRoll {
        match *self {
            DiceExpr::Roll {
                count,
                sides,
                modifier,
            } => {
                let mut dice_total: u32 = 0;
                for index in 1..=count {
                    let face = dice.roll_die(sides);
                    on_die(index, face);
                    dice_total = dice_total.saturating_add(face);
                }
                DamageRoll {
                    dice_total,
                    modifier,
                }
            }
            DiceExpr::Flat(n) => DamageRoll {
                dice_total: n,
                modifier: 0,
            },
            DiceExpr::Invalid => DamageRoll {
                dice_total: 1,
                modifier: 0,
            },
        }
    }
}

impl Default for DiceExpr {
    fn default() -> Self {
        DiceExpr::Flat(1)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DiceExpr::Roll {
                count,
                sides,
                modifier,
            } => {
                if count != 1 {
                    write!(f, "{}", count)?;
                }
                write!(f, "D{}", sides)?;
                if modifier != 0 {
                    write!(f, "{:+}", modifier)?;
                }
                Ok(())
            }
            DiceExpr::Flat(n) => write!(f, "{}", n),
            DiceExpr::Invalid => write!(f, "?"),
        }
    }
}

/// Rolled totals are at least 1 and saturate at `u32::MAX`
fn clamp_total(total: i64) -> u32 {
    total.clamp(1, u32::MAX as i64) as u32
}

/// Leftmost dice notation in `input`, ignoring whatever surrounds it
fn find_roll(input: &str) -> Option<DiceExpr> {
    input
        .char_indices()
        .find_map(|(at, _)| roll(&input[at..]).ok().map(|(_, expr)| expr))
}

fn whole_flat(input: &str) -> Option<DiceExpr> {
    all_consuming(flat).parse(input).ok().map(|(_, expr)| expr)
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>).parse(input)
}

fn modifier(input: &str) -> IResult<&str, i32> {
    map_res(recognize((one_of("+-"), digit1)), str::parse::<i32>).parse(input)
}

fn roll(input: &str) -> IResult<&str, DiceExpr> {
    map(
        (opt(number), one_of("dD"), number, opt(modifier)),
        |(count, _, sides, modifier)| DiceExpr::Roll {
            count: count.unwrap_or(1),
            sides,
            modifier: modifier.unwrap_or(0),
        },
    )
    .parse(input)
}

fn flat(input: &str) -> IResult<&str, DiceExpr> {
    map(
        map_res(recognize((opt(char('-')), digit1)), str::parse::<i64>),
        |n| DiceExpr::Flat(n.clamp(0, u32::MAX as i64) as u32),
    )
    .parse(input)
}
