use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::simulation::plant::{CropProfile, Species};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Seed,
    Crop,
    Tool,
}

/// One tradeable or usable item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub kind: ItemKind,
    /// Required for seeds and crops.
    #[serde(default)]
    pub species: Option<Species>,
    #[serde(default)]
    pub buy_price: Option<u32>,
    #[serde(default)]
    pub sell_price: Option<u32>,
}

/// Item prices, kinds, and crop growth profiles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    items: Vec<ItemEntry>,
    crops: BTreeMap<Species, CropProfile>,
}

impl Default for Catalog {
    fn default() -> Self {
        let priced = |species: Species, seed_buy: u32, seed_sell: u32, crop_sell: u32| {
            [
                ItemEntry {
                    name: species.seed_item().to_string(),
                    kind: ItemKind::Seed,
                    species: Some(species),
                    buy_price: Some(seed_buy),
                    sell_price: Some(seed_sell),
                },
                ItemEntry {
                    name: species.crop_item().to_string(),
                    kind: ItemKind::Crop,
                    species: Some(species),
                    buy_price: None,
                    sell_price: Some(crop_sell),
                },
            ]
        };

        let mut items = Vec::new();
        items.extend(priced(Species::Potato, 5, 2, 3));
        items.extend(priced(Species::Kale, 8, 4, 6));
        items.extend(priced(Species::Berry, 6, 3, 4));
        items.push(ItemEntry {
            name: "Hoe".to_string(),
            kind: ItemKind::Tool,
            species: None,
            buy_price: None,
            sell_price: None,
        });

        let crops = Species::all()
            .iter()
            .map(|s| (*s, s.default_profile()))
            .collect();

        Catalog { items, crops }
    }
}

impl Catalog {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let catalog: Catalog =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for item in &self.items {
            if !seen.insert(item.name.as_str()) {
                errors.push(format!("duplicate item '{}'", item.name));
            }
            match (item.kind, item.species) {
                (ItemKind::Seed | ItemKind::Crop, None) => errors.push(format!(
                    "item '{}' must name a species. Example: species = \"potato\"",
                    item.name
                )),
                (ItemKind::Seed, Some(s)) if item.name != s.seed_item() => errors.push(format!(
                    "seed for {} must be named '{}', got '{}'",
                    s,
                    s.seed_item(),
                    item.name
                )),
                (ItemKind::Crop, Some(s)) if item.name != s.crop_item() => errors.push(format!(
                    "crop for {} must be named '{}', got '{}'",
                    s,
                    s.crop_item(),
                    item.name
                )),
                (ItemKind::Seed | ItemKind::Crop, Some(s)) if !self.crops.contains_key(&s) => {
                    errors.push(format!(
                        "item '{}' refers to {} which has no [crops.{}] profile",
                        item.name,
                        s,
                        s.name().to_lowercase()
                    ))
                }
                (ItemKind::Tool, _) if item.buy_price.is_some() => {
                    errors.push(format!("tool '{}' cannot have a buy_price", item.name))
                }
                _ => {}
            }
        }

        for species in Species::all() {
            match self.crops.get(species) {
                None => errors.push(format!(
                    "missing [crops.{}] profile",
                    species.name().to_lowercase()
                )),
                Some(profile) => {
                    if profile.days_to_maturity == 0 {
                        errors.push(format!(
                            "crops.{}.days_to_maturity must be > 0. Example: days_to_maturity = 3",
                            species.name().to_lowercase()
                        ));
                    }
                    if profile.yield_quantity == 0 {
                        errors.push(format!(
                            "crops.{}.yield_quantity must be > 0. Example: yield_quantity = 1",
                            species.name().to_lowercase()
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn item(&self, name: &str) -> Option<&ItemEntry> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn items(&self) -> &[ItemEntry] {
        &self.items
    }

    pub fn crop_profile(&self, species: Species) -> Option<CropProfile> {
        self.crops.get(&species).copied()
    }

    /// Seeds and tools can be held as the selected item.
    pub fn is_selectable(&self, name: &str) -> bool {
        self.item(name)
            .is_some_and(|i| matches!(i.kind, ItemKind::Seed | ItemKind::Tool))
    }
}
