use serde::{Deserialize, Serialize};

/// Every crop the farm can grow. Item names are derived from the variant, so
/// no text label ever selects behaviour on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Potato,
    Kale,
    Berry,
}

impl Species {
    pub fn all() -> &'static [Species] {
        &[Species::Potato, Species::Kale, Species::Berry]
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Potato => "Potato",
            Species::Kale => "Kale",
            Species::Berry => "Berry",
        }
    }

    pub fn seed_item(self) -> &'static str {
        match self {
            Species::Potato => "Potato Seed",
            Species::Kale => "Kale Seed",
            Species::Berry => "Berry Seed",
        }
    }

    /// Item produced by harvesting.
    pub fn crop_item(self) -> &'static str {
        self.name()
    }

    pub fn from_seed_item(item: &str) -> Option<Species> {
        Species::all().iter().copied().find(|s| s.seed_item() == item)
    }

    /// Case-insensitive species name, as typed in commands.
    pub fn parse(s: &str) -> Option<Species> {
        Species::all()
            .iter()
            .copied()
            .find(|sp| sp.name().eq_ignore_ascii_case(s))
    }

    pub fn default_profile(self) -> CropProfile {
        match self {
            Species::Potato => CropProfile {
                days_to_maturity: 3,
                yield_quantity: 1,
                regrows: false,
            },
            Species::Kale => CropProfile {
                days_to_maturity: 4,
                yield_quantity: 1,
                regrows: false,
            },
            Species::Berry => CropProfile {
                days_to_maturity: 5,
                yield_quantity: 2,
                regrows: true,
            },
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-species growth constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropProfile {
    pub days_to_maturity: u32,
    pub yield_quantity: u32,
    /// Harvesting resets growth instead of removing the plant.
    #[serde(default)]
    pub regrows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "stage")]
pub enum GrowthStage {
    Planted,
    Growing(u32),
    Mature,
}

/// What a successful harvest hands to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropYield {
    pub item: &'static str,
    pub quantity: u32,
    /// Whether the plant stays in the ground.
    pub regrows: bool,
}

/// A crop instance in the ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plant {
    species: Species,
    days_since_planted: u32,
    profile: CropProfile,
}

impl Plant {
    pub fn new(species: Species, profile: CropProfile) -> Self {
        Plant {
            species,
            days_since_planted: 0,
            profile,
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn days_since_planted(&self) -> u32 {
        self.days_since_planted
    }

    pub fn profile(&self) -> &CropProfile {
        &self.profile
    }

    /// Growth saturates at maturity.
    pub fn advance_one_day(&mut self) {
        if self.days_since_planted < self.profile.days_to_maturity {
            self.days_since_planted += 1;
        }
    }

    pub fn is_mature(&self) -> bool {
        self.days_since_planted >= self.profile.days_to_maturity
    }

    pub fn stage(&self) -> GrowthStage {
        if self.is_mature() {
            GrowthStage::Mature
        } else if self.days_since_planted == 0 {
            GrowthStage::Planted
        } else {
            GrowthStage::Growing(self.days_since_planted)
        }
    }

    /// Take the yield from a mature plant. Regrowing species restart from
    /// `Planted`; for the rest the caller removes the plant.
    ///
    /// Returns `None` (and changes nothing) while the plant is immature.
    pub fn harvest(&mut self) -> Option<CropYield> {
        if !self.is_mature() {
            return None;
        }
        if self.profile.regrows {
            self.days_since_planted = 0;
        }
        Some(CropYield {
            item: self.species.crop_item(),
            quantity: self.profile.yield_quantity,
            regrows: self.profile.regrows,
        })
    }
}
