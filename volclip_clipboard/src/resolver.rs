//! Sub-level references of a pasted batch.
//!
//! Loading happens for the whole batch before anything is spawned, and
//! relinking after everything is spawned. Loading a level in the middle of a
//! spawn can re-enter the paste through the loaded level's own references.

use indexmap::IndexSet;
use log::{debug, info, warn};
use std::collections::HashMap;

use volclip_ids::{ActorID, LevelID};
use volclip_project::MissingLevelPolicy;
use volclip_reflect::Reflect;
use volclip_snapshot::VolumeRecord;
use volclip_variant::{FieldType, FieldValue, import_text};
use volclip_world::{Actor, STREAMING_LEVEL_NAMES, World, names_package};

use crate::Result;

/// Answer to "load this missing sub-level?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Yes,
    No,
    /// Yes, and for every later level in this batch.
    YesAll,
    /// No, and for every later level in this batch.
    NoAll,
}

/// Asks the operator about one missing sub-level.
pub trait LevelPrompt {
    fn ask(&mut self, package: &str) -> PromptAnswer;
}

impl<F: FnMut(&str) -> PromptAnswer> LevelPrompt for F {
    fn ask(&mut self, package: &str) -> PromptAnswer {
        self(package)
    }
}

/// Per-batch memory of load decisions, so each missing level is asked about
/// at most once and "to all" answers stick.
#[derive(Debug, Clone)]
pub struct DecisionMemo {
    policy: MissingLevelPolicy,
    sticky: Option<bool>,
    decided: HashMap<String, bool>,
    prompts: usize,
}

impl DecisionMemo {
    pub fn new(policy: MissingLevelPolicy) -> Self {
        Self {
            policy,
            sticky: None,
            decided: HashMap::new(),
            prompts: 0,
        }
    }

    /// Times the prompt was actually shown.
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    pub fn should_load(&mut self, package: &str, prompt: &mut dyn LevelPrompt) -> bool {
        match self.policy {
            MissingLevelPolicy::Always => return true,
            MissingLevelPolicy::Never => return false,
            MissingLevelPolicy::Ask => {}
        }
        if let Some(all) = self.sticky {
            return all;
        }
        if let Some(&load) = self.decided.get(package) {
            return load;
        }

        self.prompts += 1;
        let load = match prompt.ask(package) {
            PromptAnswer::Yes => true,
            PromptAnswer::No => false,
            PromptAnswer::YesAll => {
                self.sticky = Some(true);
                true
            }
            PromptAnswer::NoAll => {
                self.sticky = Some(false);
                false
            }
        };
        self.decided.insert(package.to_string(), load);
        load
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub loaded: Vec<String>,
    pub declined: Vec<String>,
    pub failed: Vec<String>,
}

/// Splits a streaming-level list in canonical form `("/Game/A","/Game/B")`,
/// falling back to a plain comma split when that does not parse.
pub fn parse_level_names(text: &str) -> Vec<String> {
    let ty = FieldType::array(FieldType::Name);
    if let Ok(FieldValue::Array(items)) = import_text(&ty, text) {
        return items
            .iter()
            .filter_map(FieldValue::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    text.chars()
        .filter(|c| !matches!(c, '(' | ')' | '"' | '\''))
        .collect::<String>()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sub-levels a record refers to, from its streaming-level property and its
/// stream links.
pub fn record_references(record: &VolumeRecord) -> Vec<String> {
    let mut out: IndexSet<String> = IndexSet::new();
    if let Some(text) = record.properties.get(STREAMING_LEVEL_NAMES) {
        out.extend(parse_level_names(text));
    }
    out.extend(record.linked_packages().map(str::to_string));
    out.into_iter().collect()
}

/// Sub-levels a live volume names in its streaming-level field.
pub fn volume_references(actor: &Actor) -> Vec<String> {
    actor
        .get_field(STREAMING_LEVEL_NAMES)
        .and_then(FieldValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(FieldValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Deduplicated sub-levels referenced by every record whose class is a
/// volume, in first-seen order.
pub fn scan(world: &dyn World, records: &[VolumeRecord]) -> Vec<String> {
    let mut required: IndexSet<String> = IndexSet::new();
    for record in records {
        let is_volume = world
            .resolve_class(&record.class_path)
            .is_some_and(|c| c.is_volume());
        if is_volume {
            required.extend(record_references(record));
        }
    }
    required.into_iter().collect()
}

fn is_present(world: &dyn World, name: &str, primary: LevelID) -> bool {
    if world
        .level_package(primary)
        .is_some_and(|p| names_package(name, p))
    {
        return true;
    }
    world.streaming_levels().iter().any(|s| s.matches(name))
        || world
            .levels()
            .into_iter()
            .filter_map(|l| world.level_package(l))
            .any(|p| names_package(name, p))
}

/// Loads every required sub-level that is not already present, as `memo`
/// decides. The current level is put back to `primary` after each load.
pub fn load_missing(
    world: &mut dyn World,
    required: &[String],
    primary: LevelID,
    memo: &mut DecisionMemo,
    prompt: &mut dyn LevelPrompt,
) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for name in required {
        if is_present(world, name, primary) {
            debug!("sub-level {} already present", name);
            continue;
        }
        if !memo.should_load(name, prompt) {
            info!("sub-level {} not loaded (declined)", name);
            outcome.declined.push(name.clone());
            continue;
        }

        world.select_none();
        let loaded = world.load_sub_level(name);
        world.set_current_level(primary)?;
        match loaded {
            Ok(_) => outcome.loaded.push(name.clone()),
            Err(err) => {
                warn!("could not load sub-level {}: {}", name, err);
                outcome.failed.push(name.clone());
            }
        }
    }
    Ok(outcome)
}

/// Adds each volume to the gate list of every streaming level matching a
/// name it carries. Links that already exist are left alone. Returns the number of new links.
pub fn relink(world: &mut dyn World, pending: &[(ActorID, Vec<String>)]) -> Result<usize> {
    let mut made = 0;
    for (volume, names) in pending {
        for name in names {
            let slots: Vec<usize> = world
                .streaming_levels()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.matches(name))
                .map(|(slot, _)| slot)
                .collect();
            if slots.is_empty() {
                debug!("no streaming level for {}; not linked", name);
            }
            for slot in slots {
                if world.add_streaming_gate(slot, *volume)? {
                    made += 1;
                }
            }
        }
    }
    Ok(made)
}
