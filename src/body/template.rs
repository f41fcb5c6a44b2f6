//! Body templates and the registry that builds them
//!
//! Definitions arrive already parsed (TOML through serde). Each body type
//! gets a dictionary of named part templates and an assembled full-health
//! tree; spawning a creature clones that tree.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Deserialize;
use tracing::info;

use crate::body::instance::{Body, HealingProfile};
use crate::body::part::BodyPart;
use crate::body::tree::{BodyTree, NodeId};
use crate::capacity::CapacityInfo;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::Seconds;
use crate::health::{simplify_multipliers, DamageMultiplier, HpSystem};

const DEFAULT_DEFINITIONS: &str = include_str!("../../data/bodies.toml");

// === DEFINITIONS (input format) ===

/// Parsed contents of a body definitions file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodyDefinitions {
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDef>,
    #[serde(default)]
    pub bodies: BTreeMap<String, BodyDef>,
}

impl BodyDefinitions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Damage multipliers of one material
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialDef {
    #[serde(default)]
    pub multipliers: Vec<DamageMultiplier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodyDef {
    #[serde(default)]
    pub healing_rate: f32,
    #[serde(default = "default_healing_period")]
    pub healing_period: Seconds,
    /// Part placed on the root container; `None` leaves the root part-less
    #[serde(default)]
    pub root: Option<String>,
    /// Full replacement for the baseline capacity vector
    #[serde(default)]
    pub base_capacity: Option<CapacityInfo>,
    #[serde(default)]
    pub parts: BTreeMap<String, PartDef>,
    #[serde(default)]
    pub inclusions: Vec<InclusionDef>,
}

fn default_healing_period() -> Seconds {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartDef {
    pub hp_base: u32,
    pub size_weight: f32,
    #[serde(default)]
    pub materials: Vec<MaterialRef>,
    /// Extra multipliers on top of the material-derived ones
    #[serde(default)]
    pub multipliers: Vec<DamageMultiplier>,
    #[serde(default)]
    pub capacity: CapacityInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRef {
    pub name: String,
    #[serde(default = "default_material_weight")]
    pub weight: f32,
}

fn default_material_weight() -> f32 {
    1.0
}

/// Places one instance of `part` under the already placed `parent`
#[derive(Debug, Clone, Deserialize)]
pub struct InclusionDef {
    /// Instance name of the container; `None` for the root
    #[serde(default)]
    pub parent: Option<String>,
    pub part: String,
    /// Instance name when the definition is reused
    #[serde(default)]
    pub name: Option<String>,
}

// === TEMPLATES ===

/// Immutable definition of one named part
#[derive(Debug, Clone, PartialEq)]
pub struct PartTemplate {
    pub name: String,
    pub hp_base: u32,
    pub size_weight: f32,
    /// Simplified: at most one entry per damage type
    pub multipliers: Vec<DamageMultiplier>,
    pub capacity_contribution: CapacityInfo,
}

impl PartTemplate {
    /// Resolve a part definition against the material table
    fn resolve(name: &str, def: &PartDef, materials: &BTreeMap<String, MaterialDef>) -> Result<Self> {
        let mut raw = Vec::new();
        for material_ref in &def.materials {
            let material = materials.get(&material_ref.name).ok_or_else(|| {
                AnatomyError::MaterialNotFound {
                    part: name.to_string(),
                    material: material_ref.name.clone(),
                }
            })?;
            raw.extend(material.multipliers.iter().map(|m| {
                DamageMultiplier::weighted(m.damage_type, m.amount, material_ref.weight)
            }));
        }
        raw.extend(def.multipliers.iter().copied());

        Ok(Self {
            name: name.to_string(),
            hp_base: def.hp_base,
            size_weight: def.size_weight.max(0.0),
            multipliers: simplify_multipliers(&raw),
            capacity_contribution: def.capacity,
        })
    }

    /// Fresh full-health part
    pub fn instantiate(&self, custom_name: Option<String>) -> BodyPart {
        BodyPart {
            name: self.name.clone(),
            custom_name,
            size_weight: self.size_weight,
            hp: HpSystem::new(self.hp_base, self.multipliers.clone()),
            capacity_contribution: self.capacity_contribution,
        }
    }
}

/// Immutable template for one body type
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTemplate {
    body_type: String,
    parts: AHashMap<String, PartTemplate>,
    tree: BodyTree,
    healing: HealingProfile,
    base_capacity: CapacityInfo,
}

impl BodyTemplate {
    /// Assemble a template from its definition
    pub fn build(
        body_type: &str,
        def: &BodyDef,
        materials: &BTreeMap<String, MaterialDef>,
    ) -> Result<Self> {
        let mut parts = AHashMap::with_capacity(def.parts.len());
        for (name, part_def) in &def.parts {
            parts.insert(name.clone(), PartTemplate::resolve(name, part_def, materials)?);
        }

        let mut tree = BodyTree::new();
        let mut placed: AHashMap<String, NodeId> = AHashMap::new();

        if let Some(root) = &def.root {
            tree.set_root_part(lookup(&parts, body_type, root)?.instantiate(None))?;
            placed.insert(root.clone(), tree.root());
        }

        for inclusion in &def.inclusions {
            let parent = match &inclusion.parent {
                None => tree.root(),
                Some(parent) => *placed.get(parent).ok_or_else(|| {
                    AnatomyError::InvalidDefinition(format!(
                        "{}: parent '{}' of '{}' is not placed yet",
                        body_type, parent, inclusion.part
                    ))
                })?,
            };

            let instance_name = inclusion.name.clone().unwrap_or_else(|| inclusion.part.clone());
            if placed.contains_key(&instance_name) {
                return Err(AnatomyError::InvalidDefinition(format!(
                    "{}: duplicate part instance '{}'",
                    body_type, instance_name
                )));
            }

            let part = lookup(&parts, body_type, &inclusion.part)?.instantiate(inclusion.name.clone());
            let node = tree.try_insert(parent, part)?;
            placed.insert(instance_name, node);
        }

        Ok(Self {
            body_type: body_type.to_string(),
            parts,
            tree,
            healing: HealingProfile {
                rate: def.healing_rate.max(0.0),
                period: def.healing_period,
            },
            base_capacity: def.base_capacity.unwrap_or_else(CapacityInfo::baseline),
        })
    }

    pub fn body_type(&self) -> &str {
        &self.body_type
    }

    pub fn part(&self, name: &str) -> Result<&PartTemplate> {
        lookup(&self.parts, &self.body_type, name)
    }

    pub fn part_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Part tree at full health
    pub fn tree(&self) -> &BodyTree {
        &self.tree
    }

    pub fn healing(&self) -> HealingProfile {
        self.healing
    }

    /// Deep copy for a new creature
    pub fn instantiate(&self) -> Body {
        Body::new(
            self.body_type.clone(),
            self.tree.clone(),
            self.healing,
            self.base_capacity,
        )
    }
}

fn lookup<'a>(
    parts: &'a AHashMap<String, PartTemplate>,
    body_type: &str,
    name: &str,
) -> Result<&'a PartTemplate> {
    parts.get(name).ok_or_else(|| AnatomyError::PartNotFound {
        body_type: body_type.to_string(),
        part: name.to_string(),
    })
}

// === REGISTRY ===

/// Every known body template, keyed by body type
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: AHashMap<String, BodyTemplate>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled humanoid and quadruped bodies
    pub fn with_defaults() -> Result<Self> {
        Self::from_toml_str(DEFAULT_DEFINITIONS)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_definitions(&BodyDefinitions::from_toml_str(content)?)
    }

    /// Build a template for every body type in `defs`
    pub fn from_definitions(defs: &BodyDefinitions) -> Result<Self> {
        let mut registry = Self::new();
        for (body_type, body_def) in &defs.bodies {
            let template = BodyTemplate::build(body_type, body_def, &defs.materials)?;
            info!(
                body_type = %body_type,
                parts = template.tree().part_count(),
                "Built body template"
            );
            registry.register(template);
        }
        Ok(registry)
    }

    /// Add or replace a template
    pub fn register(&mut self, template: BodyTemplate) {
        self.templates.insert(template.body_type.clone(), template);
    }

    pub fn template(&self, body_type: &str) -> Result<&BodyTemplate> {
        self.templates
            .get(body_type)
            .ok_or_else(|| AnatomyError::BodyTypeNotFound(body_type.to_string()))
    }

    pub fn part(&self, body_type: &str, part: &str) -> Result<&PartTemplate> {
        self.template(body_type)?.part(part)
    }

    /// Fresh body of the given type
    pub fn instantiate(&self, body_type: &str) -> Result<Body> {
        Ok(self.template(body_type)?.instantiate())
    }

    pub fn body_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
