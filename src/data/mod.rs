//! Closed kind set shared by tiles and entities, and the per-entity-kind
//! membership tables that drive collision and death rules.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Floor,
    PassageFloor,
    Death,
    Finish,
    Player,
    PatrolEnemy,
    ChasingEnemy,
}

impl Kind {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Small bitset over [`Kind`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KindSet(u16);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub const fn of(kinds: &[Kind]) -> Self {
        let mut bits = 0;
        let mut idx = 0;
        while idx < kinds.len() {
            bits |= kinds[idx].bit();
            idx += 1;
        }
        KindSet(bits)
    }

    pub const fn contains(&self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn contains_any<I>(&self, kinds: I) -> bool
    where
        I: IntoIterator<Item = Kind>,
    {
        kinds.into_iter().any(|kind| self.contains(kind))
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    PatrolEnemy,
    ChasingEnemy,
}

/// Kinds an enemy may be rolled as during population.
pub const ENEMY_ROSTER: [EntityKind; 2] = [EntityKind::PatrolEnemy, EntityKind::ChasingEnemy];

impl EntityKind {
    pub fn kind(self) -> Kind {
        match self {
            EntityKind::Player => Kind::Player,
            EntityKind::PatrolEnemy => Kind::PatrolEnemy,
            EntityKind::ChasingEnemy => Kind::ChasingEnemy,
        }
    }

    pub fn rules(self) -> &'static KindRules {
        match self {
            EntityKind::Player => &PLAYER_RULES,
            EntityKind::PatrolEnemy | EntityKind::ChasingEnemy => &ENEMY_RULES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct KindRules {
    /// Destination must hold at least one of these.
    pub walkable: KindSet,
    /// Destination must hold none of these.
    pub blocking: KindSet,
    /// Sharing a cell with any of these is fatal.
    pub lethal: KindSet,
}

const GROUND: [Kind; 3] = [Kind::Floor, Kind::PassageFloor, Kind::Finish];
const HAZARDS: [Kind; 3] = [Kind::Death, Kind::PatrolEnemy, Kind::ChasingEnemy];

pub static PLAYER_RULES: KindRules = KindRules {
    walkable: KindSet::of(&GROUND),
    blocking: KindSet::of(&HAZARDS),
    lethal: KindSet::of(&HAZARDS),
};

// Enemies walk onto the player freely; that contact is what kills it.
pub static ENEMY_RULES: KindRules = KindRules {
    walkable: KindSet::of(&GROUND),
    blocking: KindSet::of(&HAZARDS),
    lethal: KindSet::EMPTY,
};
