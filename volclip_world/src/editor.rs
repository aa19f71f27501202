use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use volclip_ids::{ActorID, LevelID};
use volclip_reflect::ClassDescriptor;

use crate::{
    Actor, ActorArena, ClassCatalog, Journal, Level, Result, StreamingLevel, World, WorldError,
    WorldEvent, names_package, standard_catalog,
};

/// In-memory editor world: one persistent level plus streamed sub-levels.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorWorld {
    levels: Vec<Level>,
    current: LevelID,
    actors: ActorArena,
    #[serde(default)]
    streaming: Vec<StreamingLevel>,
    /// Packages that can be loaded as sub-levels.
    #[serde(default)]
    library: Vec<String>,
    #[serde(default)]
    selection: Vec<ActorID>,
    #[serde(skip)]
    open_transaction: Option<String>,
    #[serde(skip, default = "standard_catalog")]
    catalog: ClassCatalog,
    #[serde(skip)]
    journal: Journal,
    #[serde(skip)]
    redraws: u32,
    #[serde(skip)]
    geometry_rebuilds: u32,
}

impl EditorWorld {
    /// A world whose persistent level is `package`, using the standard catalog.
    pub fn new(package: &str) -> Self {
        Self::with_catalog(package, standard_catalog())
    }

    pub fn with_catalog(package: &str, catalog: ClassCatalog) -> Self {
        let persistent = LevelID::new(1, 0);
        Self {
            levels: vec![Level {
                id: persistent,
                package: package.to_string(),
            }],
            current: persistent,
            actors: ActorArena::new(),
            streaming: Vec::new(),
            library: Vec::new(),
            selection: Vec::new(),
            open_transaction: None,
            catalog,
            journal: Journal::default(),
            redraws: 0,
            geometry_rebuilds: 0,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WorldError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WorldError::Json(e.to_string()))
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }

    pub fn geometry_rebuild_count(&self) -> u32 {
        self.geometry_rebuilds
    }

    pub fn is_transaction_open(&self) -> bool {
        self.open_transaction.is_some()
    }

    /// Makes `package` loadable as a sub-level.
    pub fn add_library_package(&mut self, package: &str) {
        if !self.library.iter().any(|p| p == package) {
            self.library.push(package.to_string());
        }
    }

    /// Registers a streaming entry without loading it.
    pub fn add_streaming_level(&mut self, package: &str) -> usize {
        if let Some(i) = self.streaming.iter().position(|s| s.package == package) {
            return i;
        }
        self.streaming.push(StreamingLevel::new(package));
        self.streaming.len() - 1
    }

    pub fn level(&self, id: LevelID) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn level_by_package(&self, name: &str) -> Option<LevelID> {
        self.levels
            .iter()
            .find(|l| names_package(name, &l.package))
            .map(|l| l.id)
    }

    pub fn actor(&self, id: ActorID) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actors(&self) -> impl Iterator<Item = (ActorID, &Actor)> {
        self.actors.iter()
    }

    /// Spawns any catalog class, volume or not, in the current level.
    pub fn spawn_actor(&mut self, class: &Arc<ClassDescriptor>, name: Option<&str>) -> Result<ActorID> {
        let level = self.current;
        let level_name = self.level_display(level);
        let name = match name {
            Some(n) => {
                if self.find_actor(level, n).is_some() {
                    return Err(WorldError::NameCollision {
                        name: n.to_string(),
                        level: level_name,
                    });
                }
                n.to_string()
            }
            None => self.unique_name(level, &class.name),
        };

        let id = self.actors.insert(Actor::new(class.clone(), &name, level));
        debug!("spawned {} ({}) in {}", name, class.name, level_name);
        self.journal.record(WorldEvent::Spawn {
            name,
            level: level_name,
        });
        Ok(id)
    }

    fn unique_name(&self, level: LevelID, base: &str) -> String {
        (0u32..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| self.find_actor(level, candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    fn level_display(&self, level: LevelID) -> String {
        self.level(level)
            .map(|l| l.package.clone())
            .unwrap_or_else(|| level.to_string())
    }

    fn actor_name(&self, id: ActorID) -> String {
        self.actors
            .get(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

impl World for EditorWorld {
    fn resolve_class(&self, path: &str) -> Option<Arc<ClassDescriptor>> {
        self.catalog.resolve(path)
    }

    fn persistent_level(&self) -> LevelID {
        self.levels.first().map(|l| l.id).unwrap_or_default()
    }

    fn current_level(&self) -> LevelID {
        self.current
    }

    fn set_current_level(&mut self, level: LevelID) -> Result<()> {
        let package = self
            .level(level)
            .map(|l| l.package.clone())
            .ok_or(WorldError::UnknownLevel(level))?;
        if self.current != level {
            self.current = level;
            self.journal.record(WorldEvent::SetCurrentLevel(package));
        }
        Ok(())
    }

    fn levels(&self) -> Vec<LevelID> {
        self.levels.iter().map(|l| l.id).collect()
    }

    fn level_package(&self, level: LevelID) -> Option<&str> {
        self.level(level).map(|l| l.package.as_str())
    }

    fn find_actor(&self, level: LevelID, name: &str) -> Option<ActorID> {
        self.actors
            .iter()
            .find(|(_, a)| a.level == level && a.name == name)
            .map(|(id, _)| id)
    }

    fn rename_actor(&mut self, id: ActorID, new_name: &str) -> Result<()> {
        let level = self.actors.get(id).ok_or(WorldError::UnknownActor(id))?.level;
        if let Some(other) = self.find_actor(level, new_name) {
            if other != id {
                return Err(WorldError::NameCollision {
                    name: new_name.to_string(),
                    level: self.level_display(level),
                });
            }
        }
        let actor = self.actors.get_mut(id).ok_or(WorldError::UnknownActor(id))?;
        let from = std::mem::replace(&mut actor.name, new_name.to_string());
        self.journal.record(WorldEvent::Rename {
            from,
            to: new_name.to_string(),
        });
        Ok(())
    }

    fn destroy_actor(&mut self, id: ActorID) -> Result<()> {
        let actor = self.actors.remove(id).ok_or(WorldError::UnknownActor(id))?;
        for streaming in &mut self.streaming {
            streaming.gates.retain(|g| *g != id);
        }
        self.selection.retain(|s| *s != id);
        self.journal.record(WorldEvent::Destroy(actor.name));
        Ok(())
    }

    fn spawn_volume(&mut self, class: &Arc<ClassDescriptor>, name: Option<&str>) -> Result<ActorID> {
        if !class.is_volume() {
            return Err(WorldError::NotAVolume(class.path.to_string()));
        }
        self.spawn_actor(class, name)
    }

    fn volume(&self, id: ActorID) -> Option<&Actor> {
        self.actors.get(id).filter(|a| a.is_volume())
    }

    fn volume_mut(&mut self, id: ActorID) -> Option<&mut Actor> {
        self.actors.get_mut(id).filter(|a| a.is_volume())
    }

    fn streaming_levels(&self) -> &[StreamingLevel] {
        &self.streaming
    }

    fn add_streaming_gate(&mut self, streaming: usize, volume: ActorID) -> Result<bool> {
        if self.volume(volume).is_none() {
            return Err(WorldError::UnknownActor(volume));
        }
        let volume_name = self.actor_name(volume);
        let entry = self
            .streaming
            .get_mut(streaming)
            .ok_or(WorldError::UnknownStreamingLevel(streaming))?;
        if entry.gates.contains(&volume) {
            return Ok(false);
        }
        entry.gates.push(volume);
        let package = entry.package.clone();
        self.journal.record(WorldEvent::Relink {
            volume: volume_name,
            package,
        });
        Ok(true)
    }

    fn load_sub_level(&mut self, package: &str) -> Result<LevelID> {
        let package = self
            .library
            .iter()
            .find(|p| names_package(package, p))
            .cloned()
            .ok_or_else(|| WorldError::PackageNotFound(package.to_string()))?;

        let id = match self.level_by_package(&package) {
            Some(existing) => existing,
            None => {
                let next = self
                    .levels
                    .iter()
                    .map(|l| l.id.slot())
                    .max()
                    .unwrap_or(0)
                    + 1;
                let id = LevelID::new(next, 0);
                self.levels.push(Level {
                    id,
                    package: package.clone(),
                });
                id
            }
        };
        let slot = self.add_streaming_level(&package);
        self.streaming[slot].loaded = Some(id);

        info!("loaded sub-level {}", package);
        self.journal.record(WorldEvent::LoadLevel(package));
        // the new level becomes current, as in the editor
        self.set_current_level(id)?;
        Ok(id)
    }

    fn select_none(&mut self) {
        self.selection.clear();
        self.journal.record(WorldEvent::SelectNone);
    }

    fn select_actor(&mut self, id: ActorID) {
        if self.actors.contains_key(id) && !self.selection.contains(&id) {
            self.selection.push(id);
            let name = self.actor_name(id);
            self.journal.record(WorldEvent::Select(name));
        }
    }

    fn selected_actors(&self) -> Vec<ActorID> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.actors.contains_key(*id))
            .collect()
    }

    fn begin_transaction(&mut self, label: &str) -> Result<()> {
        if let Some(open) = &self.open_transaction {
            return Err(WorldError::TransactionOpen(open.clone()));
        }
        self.open_transaction = Some(label.to_string());
        self.journal
            .record(WorldEvent::BeginTransaction(label.to_string()));
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<()> {
        let label = self
            .open_transaction
            .take()
            .ok_or(WorldError::NoTransaction)?;
        self.journal.record(WorldEvent::EndTransaction(label));
        Ok(())
    }

    fn redraw_viewports(&mut self) {
        self.redraws += 1;
        self.journal.record(WorldEvent::RedrawViewports);
    }

    fn rebuild_altered_geometry(&mut self) {
        self.geometry_rebuilds += 1;
        self.journal.record(WorldEvent::RebuildGeometry);
    }
}
