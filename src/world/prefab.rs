//! Item prefabs - the templates items are instantiated from
//!
//! Loaded from JSON definition files, the same shape worldgen emits.

use crate::core::error::Result;
use crate::core::types::{EquipSlot, Ident, PrefabId};
use crate::world::item::{Component, Storage};
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_stack() -> u32 {
    1
}

fn default_condition() -> f32 {
    100.0
}

/// Component template carried by a prefab
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentSpec {
    Pickable,
    MeleeWeapon {
        combat_rating: f32,
        lethal_damage: f32,
    },
    RangedWeapon {
        combat_rating: f32,
        lethal_damage: f32,
        #[serde(default = "default_true")]
        loaded: bool,
    },
    Storage {
        slots: usize,
        #[serde(default)]
        required_access: Option<Ident>,
        #[serde(default)]
        no_take: bool,
    },
}

impl ComponentSpec {
    pub fn instantiate(&self) -> Component {
        match self {
            ComponentSpec::Pickable => Component::Pickable,
            ComponentSpec::MeleeWeapon {
                combat_rating,
                lethal_damage,
            } => Component::MeleeWeapon {
                combat_rating: *combat_rating,
                lethal_damage: *lethal_damage,
            },
            ComponentSpec::RangedWeapon {
                combat_rating,
                lethal_damage,
                loaded,
            } => Component::RangedWeapon {
                combat_rating: *combat_rating,
                lethal_damage: *lethal_damage,
                loaded: *loaded,
            },
            ComponentSpec::Storage {
                slots,
                required_access,
                no_take,
            } => Component::Storage(Storage {
                inventory: crate::entity::inventory::Inventory::new(*slots),
                required_access: required_access.clone(),
                no_take: *no_take,
            }),
        }
    }
}

/// Template an item is spawned from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPrefab {
    pub identifier: Ident,
    #[serde(default)]
    pub tags: Vec<Ident>,
    #[serde(default)]
    pub variant_of: Option<Ident>,
    /// Store price; prefabs without one never win the spawn fallback
    #[serde(default)]
    pub price: Option<u32>,
    #[serde(default = "default_true")]
    pub can_buy: bool,
    #[serde(default = "default_stack")]
    pub max_stack: u32,
    #[serde(default = "default_condition")]
    pub max_condition: f32,
    #[serde(default)]
    pub preferred_slot: Option<EquipSlot>,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

impl ItemPrefab {
    pub fn new(identifier: impl Into<Ident>) -> Self {
        Self {
            identifier: identifier.into(),
            tags: Vec::new(),
            variant_of: None,
            price: None,
            can_buy: true,
            max_stack: 1,
            max_condition: 100.0,
            preferred_slot: None,
            components: vec![ComponentSpec::Pickable],
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| Ident::new(t)).collect();
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_component(mut self, spec: ComponentSpec) -> Self {
        self.components.push(spec);
        self
    }

    /// Whether this prefab matches any of the given identifiers or tags
    pub fn matches_any(&self, wanted: &[Ident]) -> bool {
        wanted
            .iter()
            .any(|id| *id == self.identifier || self.tags.contains(id))
    }
}

/// Catalog of all known prefabs
pub struct PrefabCatalog {
    prefabs: Vec<ItemPrefab>,
    by_identifier: AHashMap<Ident, PrefabId>,
}

impl PrefabCatalog {
    pub fn new() -> Self {
        Self {
            prefabs: Vec::new(),
            by_identifier: AHashMap::new(),
        }
    }

    pub fn add(&mut self, prefab: ItemPrefab) -> PrefabId {
        let id = PrefabId(self.prefabs.len() as u32);
        self.by_identifier.insert(prefab.identifier.clone(), id);
        self.prefabs.push(prefab);
        id
    }

    pub fn get(&self, id: PrefabId) -> Option<&ItemPrefab> {
        self.prefabs.get(id.0 as usize)
    }

    pub fn id_by_identifier(&self, identifier: &Ident) -> Option<PrefabId> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Load prefab definitions from a JSON array, returning how many were added
    pub fn load_from_json(&mut self, json: &str) -> Result<usize> {
        let prefabs: Vec<ItemPrefab> = serde_json::from_str(json)?;
        let count = prefabs.len();
        for prefab in prefabs {
            self.add(prefab);
        }
        Ok(count)
    }

    /// Load prefab definitions from a JSON file on disk
    pub fn load_from_file(&mut self, path: &std::path::Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)?;
        self.load_from_json(&json)
    }

    /// Cheapest prefab matching any wanted identifier or tag
    ///
    /// "Cheapest" is store price, which in practice selects the most basic
    /// variant. Unbuyable and unpriced prefabs rank as infinitely expensive;
    /// ties keep the first-encountered prefab.
    pub fn cheapest_matching(&self, wanted: &[Ident]) -> Option<PrefabId> {
        let mut best: Option<(PrefabId, OrderedFloat<f32>)> = None;
        for (index, prefab) in self.prefabs.iter().enumerate() {
            if !prefab.matches_any(wanted) {
                continue;
            }
            let cost = if prefab.can_buy {
                prefab.price.map(|p| p as f32).unwrap_or(f32::INFINITY)
            } else {
                f32::INFINITY
            };
            let cost = OrderedFloat(cost);
            match best {
                Some((_, lowest)) if cost >= lowest => {}
                _ => best = Some((PrefabId(index as u32), cost)),
            }
        }
        best.map(|(id, _)| id)
    }
}

impl Default for PrefabCatalog {
    fn default() -> Self {
        Self::new()
    }
}
