use std::sync::Arc;

use volclip_ids::{ActorID, LevelID};
use volclip_reflect::ClassDescriptor;

use crate::{Actor, Result, StreamingLevel};

/// Everything the clipboard needs from the editor hosting it.
///
/// Spawning happens in the current level. Loading a sub-level may move the
/// current level to the new one; callers that care put it back.
pub trait World {
    fn resolve_class(&self, path: &str) -> Option<Arc<ClassDescriptor>>;

    fn persistent_level(&self) -> LevelID;
    fn current_level(&self) -> LevelID;
    fn set_current_level(&mut self, level: LevelID) -> Result<()>;

    /// Loaded levels, persistent first.
    fn levels(&self) -> Vec<LevelID>;
    fn level_package(&self, level: LevelID) -> Option<&str>;

    fn find_actor(&self, level: LevelID, name: &str) -> Option<ActorID>;
    fn rename_actor(&mut self, id: ActorID, new_name: &str) -> Result<()>;
    fn destroy_actor(&mut self, id: ActorID) -> Result<()>;

    /// Spawns `class` in the current level. With `name`, the name must be
    /// free; without, the level picks a unique one.
    fn spawn_volume(&mut self, class: &Arc<ClassDescriptor>, name: Option<&str>) -> Result<ActorID>;

    /// The actor, if it exists and is a volume.
    fn volume(&self, id: ActorID) -> Option<&Actor>;
    fn volume_mut(&mut self, id: ActorID) -> Option<&mut Actor>;

    fn streaming_levels(&self) -> &[StreamingLevel];
    /// Adds `volume` to a streaming level's gate list. Returns `false` when
    /// it was already there.
    fn add_streaming_gate(&mut self, streaming: usize, volume: ActorID) -> Result<bool>;

    /// Loads a sub-level package and registers it for streaming.
    fn load_sub_level(&mut self, package: &str) -> Result<LevelID>;

    fn select_none(&mut self);
    fn select_actor(&mut self, id: ActorID);
    fn selected_actors(&self) -> Vec<ActorID>;

    fn begin_transaction(&mut self, label: &str) -> Result<()>;
    fn end_transaction(&mut self) -> Result<()>;

    fn redraw_viewports(&mut self);
    fn rebuild_altered_geometry(&mut self);
}
