//! Hit resolution for melee attacks.
//!
//! Anything that can be struck implements [`Hittable`]. A hit lands only when
//! the attacker's level meets the target's requirement; damage may be boosted
//! by a critical roll.

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AttackConfig;

/// Capability of entities that can take melee damage.
pub trait Hittable {
    /// Level an attacker needs to damage this entity.
    fn current_level(&self) -> i32;

    /// Applies damage.
    fn on_hit(&mut self, damage: f32);
}

/// Damage tuning for one attacker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    /// Damage of a normal hit
    pub base_damage: f32,
    /// Critical chance in percent (0-100)
    pub critical_chance: f32,
    /// Extra damage on a critical, as a fraction of base damage
    pub critical_rate: f32,
}

impl From<&AttackConfig> for DamageProfile {
    fn from(config: &AttackConfig) -> Self {
        Self {
            base_damage: config.base_damage,
            critical_chance: config.critical_chance,
            critical_rate: config.critical_rate,
        }
    }
}

impl DamageProfile {
    /// Damage dealt by a critical hit.
    #[must_use]
    pub fn critical_damage(&self) -> f32 {
        self.base_damage + self.critical_rate * self.base_damage
    }

    /// Average damage per hit.
    #[must_use]
    pub fn expected_damage(&self) -> f32 {
        let chance = (self.critical_chance / 100.0).clamp(0.0, 1.0);
        self.base_damage + chance * self.critical_rate * self.base_damage
    }

    /// Rolls the damage for one hit.
    pub fn roll(&self, rng: &mut Rng) -> DamageRoll {
        let critical = rng.f32() * 100.0 < self.critical_chance;
        let amount = if critical {
            self.critical_damage()
        } else {
            self.base_damage
        };
        DamageRoll { amount, critical }
    }
}

/// Damage rolled for a single hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Damage applied
    pub amount: f32,
    /// Whether the roll was critical
    pub critical: bool,
}

/// What happened when the attack volume touched something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// The attack volume was not active
    Inactive,
    /// The overlapped entity cannot be hit
    NotATarget,
    /// The target requires a higher level; no damage was applied
    LevelTooLow {
        /// Attacker's level
        attacker_level: i32,
        /// Level the target requires
        required_level: i32,
    },
    /// Damage was applied
    Hit(DamageRoll),
}

impl HitOutcome {
    /// Whether damage was applied.
    #[must_use]
    pub fn landed(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Applies a hit to `target` if the level gate allows it.
pub fn resolve_hit(
    attacker_level: i32,
    damage: &DamageProfile,
    rng: &mut Rng,
    target: Option<&mut dyn Hittable>,
) -> HitOutcome {
    let Some(target) = target else {
        return HitOutcome::NotATarget;
    };

    let required_level = target.current_level();
    if attacker_level < required_level {
        // TODO: surface a "level required" notice once the HUD exists.
        debug!(attacker_level, required_level, "hit rejected by level gate");
        return HitOutcome::LevelTooLow {
            attacker_level,
            required_level,
        };
    }

    let roll = damage.roll(rng);
    target.on_hit(roll.amount);
    debug!(damage = roll.amount, critical = roll.critical, "hit landed");
    HitOutcome::Hit(roll)
}

/// Static description of a destructible item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemSpec {
    /// Level needed to damage the item
    pub level_required: i32,
    /// Starting health
    pub max_health: f32,
}

impl Default for ItemSpec {
    fn default() -> Self {
        Self {
            level_required: 1,
            max_health: 30.0,
        }
    }
}

/// World item that breaks after taking enough damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destructible {
    /// Item description
    spec: ItemSpec,
    /// Health left
    current_health: f32,
    /// Whether health has run out
    destroyed: bool,
}

impl Destructible {
    /// Creates an item at full health.
    #[must_use]
    pub fn new(spec: ItemSpec) -> Self {
        Self {
            spec,
            current_health: spec.max_health,
            destroyed: false,
        }
    }

    /// Restores full health.
    pub fn reset(&mut self) {
        self.current_health = self.spec.max_health;
        self.destroyed = false;
    }

    /// Health left.
    #[must_use]
    pub fn current_health(&self) -> f32 {
        self.current_health
    }

    /// Whether the item has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Item description.
    #[must_use]
    pub fn spec(&self) -> &ItemSpec {
        &self.spec
    }
}

impl Hittable for Destructible {
    fn current_level(&self) -> i32 {
        self.spec.level_required
    }

    fn on_hit(&mut self, damage: f32) {
        if self.destroyed {
            return;
        }

        self.current_health -= damage;
        if self.current_health <= 0.0 {
            self.destroyed = true;
            info!(max_health = self.spec.max_health, "item destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Dummy {
        level: i32,
        hits: Vec<f32>,
    }

    impl Hittable for Dummy {
        fn current_level(&self) -> i32 {
            self.level
        }

        fn on_hit(&mut self, damage: f32) {
            self.hits.push(damage);
        }
    }

    fn profile() -> DamageProfile {
        DamageProfile::from(&AttackConfig::default())
    }

    #[test]
    fn test_level_gate_blocks_low_level() {
        let mut rng = Rng::with_seed(1);
        let mut target = Dummy {
            level: 5,
            ..Default::default()
        };

        let outcome = resolve_hit(3, &profile(), &mut rng, Some(&mut target));

        assert_eq!(
            outcome,
            HitOutcome::LevelTooLow {
                attacker_level: 3,
                required_level: 5
            }
        );
        assert!(target.hits.is_empty());
    }

    #[test]
    fn test_level_gate_allows_equal_level() {
        let mut rng = Rng::with_seed(1);
        let mut target = Dummy {
            level: 5,
            ..Default::default()
        };

        let outcome = resolve_hit(5, &profile(), &mut rng, Some(&mut target));

        let HitOutcome::Hit(roll) = outcome else {
            panic!("expected a hit, got {outcome:?}");
        };
        assert_eq!(target.hits, vec![roll.amount]);
        let expected = if roll.critical { 14.0 } else { 10.0 };
        assert!((roll.amount - expected).abs() < 1e-5);
    }

    #[test]
    fn test_missing_capability_is_not_a_target() {
        let mut rng = Rng::with_seed(1);
        let outcome = resolve_hit(10, &profile(), &mut rng, None);
        assert_eq!(outcome, HitOutcome::NotATarget);
        assert!(!outcome.landed());
    }

    #[test]
    fn test_critical_mean_matches_configured_chance() {
        let profile = DamageProfile {
            base_damage: 10.0,
            critical_chance: 70.0,
            critical_rate: 0.4,
        };
        let mut rng = Rng::with_seed(0x5eed);

        let n = 10_000;
        let total: f32 = (0..n).map(|_| profile.roll(&mut rng).amount).sum();
        let mean = total / n as f32;

        assert!((profile.expected_damage() - 12.8).abs() < 1e-4);
        assert!((mean - 12.8).abs() < 0.1, "mean damage was {mean}");
    }

    #[test]
    fn test_critical_chance_bounds() {
        let mut rng = Rng::with_seed(3);
        let never = DamageProfile {
            critical_chance: 0.0,
            ..profile()
        };
        let always = DamageProfile {
            critical_chance: 100.0,
            ..profile()
        };

        for _ in 0..100 {
            assert!(!never.roll(&mut rng).critical);
            assert!(always.roll(&mut rng).critical);
        }
    }

    #[test]
    fn test_destructible_breaks_once() {
        let mut item = Destructible::new(ItemSpec {
            level_required: 2,
            max_health: 15.0,
        });
        assert_eq!(item.current_level(), 2);

        item.on_hit(10.0);
        assert!(!item.is_destroyed());
        item.on_hit(10.0);
        assert!(item.is_destroyed());

        let health = item.current_health();
        item.on_hit(10.0);
        assert_eq!(item.current_health(), health);

        item.reset();
        assert_eq!(item.current_health(), 15.0);
        assert!(!item.is_destroyed());
    }
}
