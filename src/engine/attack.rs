//! Attack resolution for one weapon volley
//!
//! attack count -> per attack: hit roll -> wound roll -> damage roll,
//! with ability modifiers applied along the way. Every roll is written to
//! the battle log in the order it is made.

use std::fmt;

use crate::abilities::AbilityModifiers;
use crate::catalog::{UnitProfile, WeaponProfile};
use crate::dice::DieRoller;
use crate::engine::constants::{CRITICAL_HIT, DEVASTATING_MORTAL_WOUNDS, REROLLABLE_FACE};
use crate::engine::log::{BattleLog, LogEntryKind};
use crate::engine::wound::wound_threshold;

/// What the attack pipeline needs to know about the side being shot at
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub name: &'a str,
    pub toughness: u32,
    pub is_vehicle: bool,
}

impl<'a> Target<'a> {
    pub fn of(profile: &'a UnitProfile) -> Self {
        Self {
            name: &profile.unit_name,
            toughness: profile.toughness(),
            is_vehicle: profile.is_vehicle(),
        }
    }
}

/// Counters from one weapon volley
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacks: u32,
    pub hits: u32,
    pub wounds: u32,
    pub damage: u32,
    pub mortal_wounds: u32,
}

impl AttackOutcome {
    /// Damage to apply to the target's wound pool
    pub fn total_damage(&self) -> u32 {
        self.damage.saturating_add(self.mortal_wounds)
    }
}

/// A hit roll, remembering a rerolled 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRoll {
    pub first: u32,
    pub reroll: Option<u32>,
}

impl HitRoll {
    pub fn roll(dice: &mut impl DieRoller, reroll_ones: bool) -> Self {
        let first = dice.d6();
        let reroll = if reroll_ones && first == REROLLABLE_FACE {
            Some(dice.d6())
        } else {
            None
        };
        Self { first, reroll }
    }

    /// The face that counts
    pub fn face(&self) -> u32 {
        self.reroll.unwrap_or(self.first)
    }

    pub fn hits(&self, skill: u32) -> bool {
        self.face() >= skill
    }

    pub fn is_critical(&self) -> bool {
        self.face() == CRITICAL_HIT
    }
}

impl fmt::Display for HitRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reroll {
            Some(reroll) => write!(f, "rolled a {}, rerolled a {}", self.first, reroll),
            None => write!(f, "rolled a {}", self.first),
        }
    }
}

/// Number of attacks a weapon makes this volley
///
/// Base attacks times models; HEAVY in melee drops one attack per model
/// (only when that leaves something); BLAST multiplies.
pub fn attack_count(
    weapon: &WeaponProfile,
    modifiers: &AbilityModifiers,
    model_count: u32,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
) -> u32 {
    let mut attacks = weapon.attacks.evaluate(dice).saturating_mul(model_count);

    if modifiers.heavy && weapon.is_melee() && attacks > model_count {
        attacks -= model_count;
        log.push(
            LogEntryKind::AbilityTriggered,
            format!(
                "  (HEAVY ability active: attacks reduced by {} to {})",
                model_count, attacks
            ),
        );
    }

    if modifiers.is_blast() {
        attacks = attacks.saturating_mul(modifiers.blast_multiplier);
        log.push(
            LogEntryKind::AbilityTriggered,
            format!("  (BLAST ability active: attacks tripled to {})", attacks),
        );
    }

    attacks
}

/// Resolve one weapon firing at a target
///
/// Does not touch any wound pool; the caller applies
/// [`AttackOutcome::total_damage`].
pub fn resolve_weapon(
    weapon: &WeaponProfile,
    attacker_name: &str,
    model_count: u32,
    target: &Target<'_>,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
) -> AttackOutcome {
    let modifiers = weapon.modifiers();

    let attacks = attack_count(weapon, &modifiers, model_count, dice, log);
    log.push(
        LogEntryKind::WeaponDeclared,
        format!(
            "💥 {} attacks {} with {}",
            attacker_name, target.name, weapon.name
        ),
    );
    log.push(
        LogEntryKind::WeaponDeclared,
        format!(
            "🎲 Rolling {} attacks. Need {}+ to hit",
            attacks, weapon.skill
        ),
    );

    let mut outcome = AttackOutcome {
        attacks,
        ..Default::default()
    };

    for index in 1..=attacks {
        let roll = HitRoll::roll(dice, modifiers.reroll_ones);
        if !roll.hits(weapon.skill) {
            log.push(
                LogEntryKind::HitRoll,
                format!("  🎯 Attack {} {} — MISS", index, roll),
            );
            continue;
        }

        outcome.hits = outcome.hits.saturating_add(1);
        log.push(
            LogEntryKind::HitRoll,
            format!("  🎯 Attack {} {} — HIT!", index, roll),
        );

        // Compounds with the wound roll below rather than replacing it
        if modifiers.devastating_wounds && roll.is_critical() {
            outcome.mortal_wounds = outcome
                .mortal_wounds
                .saturating_add(DEVASTATING_MORTAL_WOUNDS);
            log.push(
                LogEntryKind::AbilityTriggered,
                format!(
                    "      💥 Critical Hit! Devastating Wounds inflicted (+{} mortal wound)",
                    DEVASTATING_MORTAL_WOUNDS
                ),
            );
        }

        if resolve_wound(weapon, target, index, dice, log, &mut outcome) {
            apply_rolled_damage(weapon, &modifiers, target, dice, log, &mut outcome);
            apply_mortal_wounds(&modifiers, log, &mut outcome);
        }

        for extra in 1..=modifiers.sustained_hits {
            let roll = HitRoll::roll(dice, modifiers.reroll_ones);
            if roll.hits(weapon.skill) {
                outcome.hits = outcome.hits.saturating_add(1);
                log.push(
                    LogEntryKind::HitRoll,
                    format!("    🔄 Sustained Hit {} {} — HIT!", extra, roll),
                );
                if resolve_wound(weapon, target, index, dice, log, &mut outcome) {
                    apply_sustained_damage(weapon, dice, log, &mut outcome);
                    apply_mortal_wounds(&modifiers, log, &mut outcome);
                }
            } else {
                log.push(
                    LogEntryKind::HitRoll,
                    format!("    🔄 Sustained Hit {} {} — MISS", extra, roll),
                );
            }
        }
    }

    tracing::debug!(
        weapon = %weapon.name,
        attacker = attacker_name,
        target = target.name,
        attacks = outcome.attacks,
        hits = outcome.hits,
        wounds = outcome.wounds,
        damage = outcome.damage,
        mortal_wounds = outcome.mortal_wounds,
        "Volley resolved"
    );

    outcome
}

/// Wound roll for one hit; true when it wounds
fn resolve_wound(
    weapon: &WeaponProfile,
    target: &Target<'_>,
    attack_index: u32,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
    outcome: &mut AttackOutcome,
) -> bool {
    let needed = wound_threshold(weapon.strength, target.toughness);
    let roll = dice.d6();
    log.push(
        LogEntryKind::WoundRoll,
        format!(
            "      🎲 Wound Roll {}: {} vs Toughness {} (need {}+)",
            attack_index, roll, target.toughness, needed
        ),
    );

    if roll < needed {
        log.push(LogEntryKind::WoundRoll, "      ❌ Failed to wound");
        return false;
    }
    outcome.wounds = outcome.wounds.saturating_add(1);
    true
}

/// Damage for a wounding hit from the attack roll itself: every die is
/// logged and ANTI-VEHICLE adds its bonus
fn apply_rolled_damage(
    weapon: &WeaponProfile,
    modifiers: &AbilityModifiers,
    target: &Target<'_>,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
    outcome: &mut AttackOutcome,
) {
    let damage = weapon.damage.roll_damage(dice, |index, face| {
        log.push(
            LogEntryKind::DamageRoll,
            format!("      🎲 Damage dice roll {}: {}", index, face),
        );
    });

    let mut total = damage.total();
    if modifiers.anti_vehicle_applies(weapon.strength, target.is_vehicle) {
        total = total.saturating_add(modifiers.anti_vehicle_bonus());
        log.push(
            LogEntryKind::AbilityTriggered,
            format!(
                "      (ANTI-VEHICLE active: +{} damage)",
                modifiers.anti_vehicle_bonus()
            ),
        );
    }

    outcome.damage = outcome.damage.saturating_add(total);
    log.push(
        LogEntryKind::DamageRoll,
        format!(
            "      💥 Total damage dealt: {} (Dice total {} + Modifier {})",
            total, damage.dice_total, damage.modifier
        ),
    );
}

/// Damage for a wounding sustained hit: the plain damage value, no bonus
fn apply_sustained_damage(
    weapon: &WeaponProfile,
    dice: &mut impl DieRoller,
    log: &mut BattleLog,
    outcome: &mut AttackOutcome,
) {
    let dealt = weapon.damage.evaluate(dice);
    outcome.damage = outcome.damage.saturating_add(dealt);
    log.push(
        LogEntryKind::DamageRoll,
        format!("      💥 Dealt {} damage", dealt),
    );
}

fn apply_mortal_wounds(
    modifiers: &AbilityModifiers,
    log: &mut BattleLog,
    outcome: &mut AttackOutcome,
) {
    if modifiers.mortal_wounds_per_hit == 0 {
        return;
    }
    outcome.mortal_wounds = outcome
        .mortal_wounds
        .saturating_add(modifiers.mortal_wounds_per_hit);
    log.push(
        LogEntryKind::AbilityTriggered,
        format!(
            "      💀 Inflicted {} mortal wounds (ignores armor)",
            modifiers.mortal_wounds_per_hit
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StatLine;
    use crate::dice::LoadedDice;

    fn target(toughness: u32, is_vehicle: bool) -> Target<'static> {
        Target {
            name: "Target",
            toughness,
            is_vehicle,
        }
    }

    fn bolter() -> WeaponProfile {
        WeaponProfile::from_text("Bolter", "24\"", "2", "3+", "4", "1")
    }

    #[test]
    fn test_all_hits_and_wounds() {
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&bolter(), "Marines", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(
            outcome,
            AttackOutcome {
                attacks: 2,
                hits: 2,
                wounds: 2,
                damage: 2,
                mortal_wounds: 0
            }
        );
        assert_eq!(outcome.total_damage(), 2);
    }

    #[test]
    fn test_misses_roll_no_wounds() {
        let mut dice = LoadedDice::always(2);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&bolter(), "Marines", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.hits, 0);
        assert_eq!(outcome.wounds, 0);
        assert!(log.filter_by_kind(LogEntryKind::WoundRoll).is_empty());
        // Two hit rolls, nothing else
        assert_eq!(dice.rolls_made(), 2);
    }

    #[test]
    fn test_failed_wound_deals_nothing() {
        // hit on 3, wound roll 3 vs needed 4
        let mut dice = LoadedDice::new(vec![3, 3]);
        let mut log = BattleLog::new();
        let weapon = WeaponProfile::from_text("Bolter", "24\"", "1", "3+", "4", "1");
        let outcome = resolve_weapon(&weapon, "Marines", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.hits, 1);
        assert_eq!(outcome.wounds, 0);
        assert_eq!(outcome.damage, 0);
        assert!(log.render().contains("Failed to wound"));
    }

    #[test]
    fn test_attacks_scale_with_models() {
        let mut dice = LoadedDice::always(1);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&bolter(), "Marines", 5, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.attacks, 10);
    }

    #[test]
    fn test_zero_attacks_still_logs_header() {
        let weapon = WeaponProfile::from_text("Broken", "Melee", "0", "3+", "4", "1");
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Marines", 3, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome, AttackOutcome::default());
        assert_eq!(log.filter_by_kind(LogEntryKind::WeaponDeclared).len(), 2);
        assert_eq!(dice.rolls_made(), 0);
    }

    #[test]
    fn test_heavy_melee_drops_one_attack_per_model() {
        let weapon = WeaponProfile::from_text("Klaw", "Melee", "3", "3+", "9", "2").with_tags(&["HEAVY"]);
        let mut dice = LoadedDice::always(1);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Nobz", 2, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.attacks, 4);
        assert_eq!(log.filter_by_kind(LogEntryKind::AbilityTriggered).len(), 1);

        // Ability lines come before the weapon header
        let entries = log.entries();
        assert_eq!(entries[0].kind, LogEntryKind::AbilityTriggered);
        assert_eq!(entries[0].text, "  (HEAVY ability active: attacks reduced by 2 to 4)");
        assert_eq!(entries[1].text, "💥 Nobz attacks Target with Klaw");
        assert_eq!(entries[2].text, "🎲 Rolling 4 attacks. Need 3+ to hit");
    }

    #[test]
    fn test_heavy_never_removes_last_attacks() {
        let weapon = WeaponProfile::from_text("Klaw", "Melee", "1", "3+", "9", "2").with_tags(&["HEAVY"]);
        let mut dice = LoadedDice::always(1);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Nobz", 3, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.attacks, 3);
    }

    #[test]
    fn test_heavy_ignored_at_range() {
        let weapon = WeaponProfile::from_text("Cannon", "48\"", "3", "3+", "9", "2").with_tags(&["HEAVY"]);
        let mut dice = LoadedDice::always(1);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Tank", 2, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.attacks, 6);
    }

    #[test]
    fn test_blast_triples_attacks() {
        let weapon = WeaponProfile::from_text("Frag", "24\"", "2", "4+", "4", "1").with_tags(&["BLAST"]);
        let mut dice = LoadedDice::always(1);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 2, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.attacks, 12);
    }

    #[test]
    fn test_sustained_hits_add_hit_attempts() {
        let weapon =
            WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "1").with_tags(&["SUSTAINED HITS 2"]);
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.hits, 3);
        assert_eq!(outcome.wounds, 3);
        assert_eq!(log.filter_by_kind(LogEntryKind::HitRoll).len(), 3);
        assert_eq!(log.filter_by_kind(LogEntryKind::WoundRoll).len(), 3);
    }

    #[test]
    fn test_sustained_hits_need_a_first_hit() {
        let weapon =
            WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "1").with_tags(&["SUSTAINED HITS 2"]);
        let mut dice = LoadedDice::always(2);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.hits, 0);
        assert_eq!(log.filter_by_kind(LogEntryKind::HitRoll).len(), 1);
    }

    #[test]
    fn test_reroll_ones() {
        let weapon =
            WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "1").with_tags(&["REROLL ONES"]);
        // first hit roll 1, reroll 5, wound 6
        let mut dice = LoadedDice::new(vec![1, 5, 6]);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.hits, 1);
        assert_eq!(outcome.wounds, 1);
        assert!(log.render().contains("rolled a 1, rerolled a 5"));
    }

    #[test]
    fn test_no_reroll_without_ability() {
        let mut dice = LoadedDice::new(vec![1, 5]);
        let roll = HitRoll::roll(&mut dice, false);
        assert_eq!(roll.face(), 1);
        assert_eq!(dice.rolls_made(), 1);
    }

    #[test]
    fn test_devastating_wounds_compound_with_wound_roll() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "2")
            .with_tags(&["DEVASTATING WOUNDS"]);
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.mortal_wounds, 1);
        assert_eq!(outcome.wounds, 1);
        assert_eq!(outcome.damage, 2);
        assert_eq!(outcome.total_damage(), 3);
    }

    #[test]
    fn test_devastating_wounds_still_count_on_failed_wound() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "1")
            .with_tags(&["DEVASTATING WOUNDS"]);
        // crit hit, wound roll of 1
        let mut dice = LoadedDice::new(vec![6, 1]);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.wounds, 0);
        assert_eq!(outcome.total_damage(), 1);
    }

    #[test]
    fn test_mortal_wounds_per_wound() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "2", "3+", "4", "1")
            .with_tags(&["MORTAL WOUNDS 2"]);
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.mortal_wounds, 4);
        assert_eq!(outcome.total_damage(), 6);
    }

    #[test]
    fn test_anti_vehicle_bonus_only_against_vehicles() {
        let weapon = WeaponProfile::from_text("Melta", "12\"", "1", "3+", "9", "D6")
            .with_tags(&["ANTI-VEHICLE 4+"]);
        let tank = UnitProfile::new("Imperium", "Rhino", StatLine { toughness: 9, wounds: 10, save: 3 })
            .with_keyword("Vehicle");

        let mut dice = LoadedDice::new(vec![6, 6, 3]);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &Target::of(&tank), &mut dice, &mut log);
        assert_eq!(outcome.damage, 3 + 4);

        let mut dice = LoadedDice::new(vec![6, 6, 3]);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(9, false), &mut dice, &mut log);
        assert_eq!(outcome.damage, 3);
    }

    #[test]
    fn test_sustained_hits_skip_anti_vehicle_bonus() {
        let weapon = WeaponProfile::from_text("Melta", "12\"", "1", "3+", "9", "1")
            .with_tags(&["ANTI-VEHICLE 4+", "SUSTAINED HITS 1"]);
        let tank = UnitProfile::new("Imperium", "Rhino", StatLine { toughness: 9, wounds: 10, save: 3 })
            .with_keyword("Vehicle");

        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &Target::of(&tank), &mut dice, &mut log);
        assert_eq!(outcome.hits, 2);
        assert_eq!(outcome.wounds, 2);
        // 1 + 4 from the attack, 1 from the sustained hit
        assert_eq!(outcome.damage, 6);

        let texts: Vec<&str> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "💥 Squad attacks Rhino with Melta",
                "🎲 Rolling 1 attacks. Need 3+ to hit",
                "  🎯 Attack 1 rolled a 6 — HIT!",
                "      🎲 Wound Roll 1: 6 vs Toughness 9 (need 4+)",
                "      (ANTI-VEHICLE active: +4 damage)",
                "      💥 Total damage dealt: 5 (Dice total 1 + Modifier 0)",
                "    🔄 Sustained Hit 1 rolled a 6 — HIT!",
                "      🎲 Wound Roll 1: 6 vs Toughness 9 (need 4+)",
                "      💥 Dealt 1 damage",
            ]
        );
    }

    #[test]
    fn test_sustained_damage_rolls_without_per_die_lines() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "D3")
            .with_tags(&["SUSTAINED HITS 1", "MORTAL WOUNDS 1"]);
        // hit, wound, damage 2 | sustained hit, wound, damage 3
        let mut dice = LoadedDice::new(vec![5, 5, 2, 4, 6, 3]);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.damage, 5);
        assert_eq!(outcome.mortal_wounds, 2);
        assert_eq!(dice.rolls_made(), 6);

        let damage: Vec<&str> = log
            .filter_by_kind(LogEntryKind::DamageRoll)
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(
            damage,
            vec![
                "      🎲 Damage dice roll 1: 2",
                "      💥 Total damage dealt: 2 (Dice total 2 + Modifier 0)",
                "      💥 Dealt 3 damage",
            ]
        );
    }

    #[test]
    fn test_huge_mortal_wounds_saturate() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "2", "3+", "4", "1")
            .with_tags(&["MORTAL WOUNDS 3000000000"]);
        let mut dice = LoadedDice::always(6);
        let mut log = BattleLog::new();
        let outcome = resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        assert_eq!(outcome.mortal_wounds, u32::MAX);
        assert_eq!(outcome.total_damage(), u32::MAX);
    }

    #[test]
    fn test_log_order_for_one_attack() {
        let weapon = WeaponProfile::from_text("Gun", "24\"", "1", "3+", "4", "D3")
            .with_tags(&["MORTAL WOUNDS 1"]);
        let mut dice = LoadedDice::new(vec![4, 5, 2]);
        let mut log = BattleLog::new();
        resolve_weapon(&weapon, "Squad", 1, &target(4, false), &mut dice, &mut log);
        let kinds: Vec<LogEntryKind> = log.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LogEntryKind::WeaponDeclared,
                LogEntryKind::WeaponDeclared,
                LogEntryKind::HitRoll,
                LogEntryKind::WoundRoll,
                LogEntryKind::DamageRoll,
                LogEntryKind::DamageRoll,
                LogEntryKind::AbilityTriggered,
            ]
        );
    }
}
