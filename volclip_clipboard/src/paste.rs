use log::{debug, info, warn};
use uuid::Uuid;

use volclip_ids::{ActorID, LevelID};
use volclip_model::BspOptions;
use volclip_project::{ClipboardConfig, PasteOptions};
use volclip_reflect::{ClassKind, decode};
use volclip_snapshot::{VolumeRecord, decode_snapshot};
use volclip_world::{BrushType, Mobility, SpawnMethod, World, names_package};

use crate::{
    DecisionMemo, LevelPrompt, Result, Transport, decode_geometry, load_missing, record_references,
    relink, scan, volume_references,
};

pub const PASTE_TRANSACTION: &str = "Paste Volumes";
pub const RELINK_TRANSACTION: &str = "Relink Streaming Volumes";

/// What one paste did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteReport {
    /// New volumes, in record order.
    pub spawned: Vec<ActorID>,
    /// Records whose class is unknown or not a volume, or whose spawn failed.
    pub skipped_records: usize,
    /// Same-named volumes destroyed to make room.
    pub replaced: usize,
    pub loaded_levels: Vec<String>,
    pub declined_levels: Vec<String>,
    pub failed_levels: Vec<String>,
    pub prompts: usize,
    pub relinks: usize,
}

/// Runs a paste in three phases: load missing sub-levels for the whole
/// batch, spawn and restore every volume, then relink streaming gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasteOrchestrator {
    pub options: PasteOptions,
    pub bsp: BspOptions,
}

impl PasteOrchestrator {
    pub fn new(config: &ClipboardConfig) -> Self {
        Self {
            options: config.paste,
            bsp: config.bsp,
        }
    }

    /// Reads the transport and pastes it. A payload that does not decode
    /// fails before the world is touched.
    pub fn paste_from(
        &self,
        world: &mut dyn World,
        transport: &mut dyn Transport,
        prompt: &mut dyn LevelPrompt,
    ) -> Result<PasteReport> {
        let text = transport.read()?;
        self.paste_text(world, &text, prompt)
    }

    pub fn paste_text(
        &self,
        world: &mut dyn World,
        text: &str,
        prompt: &mut dyn LevelPrompt,
    ) -> Result<PasteReport> {
        let records = decode_snapshot(text)?;
        self.paste_records(world, &records, prompt)
    }

    pub fn paste_records(
        &self,
        world: &mut dyn World,
        records: &[VolumeRecord],
        prompt: &mut dyn LevelPrompt,
    ) -> Result<PasteReport> {
        let mut report = PasteReport::default();
        if records.is_empty() {
            return Ok(report);
        }
        let original = world.current_level();

        // Phase 1: sub-levels, outside any transaction.
        let required = scan(world, records);
        let mut memo = DecisionMemo::new(self.options.missing_levels);
        let outcome = load_missing(world, &required, original, &mut memo, prompt)?;
        report.loaded_levels = outcome.loaded;
        report.declined_levels = outcome.declined;
        report.failed_levels = outcome.failed;
        report.prompts = memo.prompts();

        // Phase 2: spawn and restore.
        let mut pending = Vec::new();
        world.begin_transaction(PASTE_TRANSACTION)?;
        world.select_none();
        for record in records {
            match self.spawn_record(world, record, original, &mut report) {
                Ok(Some((id, links))) => {
                    if !links.is_empty() {
                        pending.push((id, links));
                    }
                    world.select_actor(id);
                    report.spawned.push(id);
                }
                Ok(None) => report.skipped_records += 1,
                Err(err) => {
                    warn!("{}: not pasted: {}", record.internal_name, err);
                    report.skipped_records += 1;
                }
            }
        }
        let restored = world.set_current_level(original);
        world.end_transaction()?;
        restored?;
        world.redraw_viewports();

        // Phase 3: relink.
        if !pending.is_empty() {
            world.begin_transaction(RELINK_TRANSACTION)?;
            let relinked = relink(world, &pending);
            world.end_transaction()?;
            report.relinks = relinked?;
        }
        world.rebuild_altered_geometry();

        info!(
            "pasted {} volume(s), skipped {}, loaded {} level(s), {} relink(s)",
            report.spawned.len(),
            report.skipped_records,
            report.loaded_levels.len(),
            report.relinks
        );
        Ok(report)
    }

    /// Level a record goes into: its origin level when that is loaded and
    /// pasting to origin is on, else `fallback`.
    fn target_level(&self, world: &dyn World, record: &VolumeRecord, fallback: LevelID) -> LevelID {
        if !self.options.to_origin_level {
            return fallback;
        }
        let Some(origin) = &record.origin else {
            return fallback;
        };
        let levels = world.levels();
        let by_path = levels
            .iter()
            .copied()
            .find(|l| !origin.package.is_empty() && world.level_package(*l) == Some(origin.package.as_str()));
        let by_name = || {
            levels.iter().copied().find(|l| {
                world
                    .level_package(*l)
                    .is_some_and(|p| names_package(&origin.name, p))
            })
        };
        by_path.or_else(by_name).unwrap_or(fallback)
    }

    /// Spawns and restores one record. `Ok(None)` means the record was
    /// skipped; on success returns the volume and the sub-levels it gates.
    fn spawn_record(
        &self,
        world: &mut dyn World,
        record: &VolumeRecord,
        original: LevelID,
        report: &mut PasteReport,
    ) -> Result<Option<(ActorID, Vec<String>)>> {
        let Some(class) = world
            .resolve_class(&record.class_path)
            .filter(|c| c.is_volume())
        else {
            warn!(
                "{}: class `{}` is not a known volume; skipped",
                record.internal_name, record.class_path
            );
            return Ok(None);
        };

        let target = self.target_level(world, record, original);
        world.set_current_level(target)?;

        // The recorded name is kept whenever it is free; replacing clears it first.
        let replace = self.options.delete_original && !record.internal_name.is_empty();
        let mut name = None;
        if !record.internal_name.is_empty() {
            match world.find_actor(target, &record.internal_name) {
                Some(existing) if replace => {
                    let trash =
                        format!("{}_TRASH_{}", record.internal_name, Uuid::new_v4().simple());
                    world.rename_actor(existing, &trash)?;
                    world.destroy_actor(existing)?;
                    report.replaced += 1;
                    name = Some(record.internal_name.as_str());
                }
                Some(_) => {}
                None => name = Some(record.internal_name.as_str()),
            }
        }
        let id = world.spawn_volume(&class, name)?;

        let bsp = self.bsp;
        let Some(volume) = world.volume_mut(id) else {
            return Ok(None);
        };

        if let Some(raw) = record.spawn_method {
            match SpawnMethod::from_i64(raw) {
                Some(m) => volume.spawn_method = m,
                None => warn!("{}: unknown spawn method {}", record.internal_name, raw),
            }
        }
        if let Some(raw) = record.brush_type {
            match BrushType::from_i64(raw) {
                Some(b) => volume.brush_type = b,
                None => warn!("{}: unknown brush type {}", record.internal_name, raw),
            }
        }
        if let Some(raw) = record.mobility {
            match Mobility::from_i64(raw) {
                Some(m) => volume.set_mobility(m),
                None => warn!("{}: unknown mobility {}", record.internal_name, raw),
            }
        }

        let kept = decode_geometry(volume, &record.raw_polys, &bsp);
        debug!("{}: {} polygon(s) rebuilt", volume.name, kept);

        decode(volume, &record.properties);
        for component in &record.components {
            match volume.component_by_class_mut(&component.class_name) {
                Some(live) => {
                    decode(live, &component.properties);
                }
                None => warn!(
                    "{}: no {} component to restore",
                    record.internal_name, component.class_name
                ),
            }
        }

        if replace {
            volume.label = record.internal_name.clone();
        }

        let mut links = Vec::new();
        if volume.class_descriptor().kind == ClassKind::StreamingVolume {
            links = volume_references(volume);
            for name in record_references(record) {
                if !links.contains(&name) {
                    links.push(name);
                }
            }
        }

        volume.transform = record.transform;
        Ok(Some((id, links)))
    }
}
