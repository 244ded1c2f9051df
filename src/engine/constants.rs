//! Resolution constants

/// Natural hit roll that counts as a critical hit (top face of a D6)
pub const CRITICAL_HIT: u32 = 6;

/// Hit roll face that REROLL ONES rolls again
pub const REROLLABLE_FACE: u32 = 1;

/// Mortal wounds inflicted by a DEVASTATING WOUNDS critical hit
pub const DEVASTATING_MORTAL_WOUNDS: u32 = 1;
