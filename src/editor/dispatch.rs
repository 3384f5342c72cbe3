//! Command dispatcher
//!
//! Owns the grids and the entity registry. Nothing else holds a mutable
//! reference to either: console commands are drained from the
//! [`CommandSlot`] once per tick, pointer edits are passed straight to
//! [`Dispatcher::apply`], and both take the same path.

use log::{debug, error, info, warn};

use crate::command::{CommandPayload, CommandSlot, EntityEdit};
use crate::storage::{Storage, StorageError};
use crate::world::{EntityRegistry, WorldGrids};

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing was pending
    Idle,
    /// A payload was handled (successfully or not)
    Handled,
    /// The editor should shut down
    Quit,
}

/// The editable world plus everything needed to change it
pub struct Dispatcher {
    grids: WorldGrids,
    entities: EntityRegistry,
    storage: Storage,
    /// Side of the square view the map is fitted into
    view_size: f32,
    /// Pixel size of one cell, derived from `view_size` and the map size
    cell_size: (f32, f32),
}

impl Dispatcher {
    pub fn new(grids: WorldGrids, storage: Storage, view_size: f32) -> Self {
        let cell_size = grids.cell_size(view_size);
        Self {
            grids,
            entities: EntityRegistry::new(),
            storage,
            view_size,
            cell_size,
        }
    }

    /// Start from a map file, or from an empty map if it can't be loaded.
    ///
    /// A failed startup load is not fatal; the editor opens a fresh map of
    /// the fallback size instead.
    pub fn open(storage: Storage, map_file: &str, fallback: (i32, i32), view_size: f32) -> Self {
        let (width, height) = fallback;
        let grids = if !storage.exists(map_file) {
            info!("No map at {}, starting a new {}x{} map", map_file, width, height);
            WorldGrids::new_clamped(width, height)
        } else {
            match storage.load_grids(map_file) {
                Ok(grids) => {
                    info!("Loaded {} ({}x{})", map_file, grids.width(), grids.height());
                    grids
                }
                Err(e) => {
                    warn!("Could not load {}: {}, starting a new {}x{} map", map_file, e, width, height);
                    WorldGrids::new_clamped(width, height)
                }
            }
        };
        Self::new(grids, storage, view_size)
    }

    pub fn grids(&self) -> &WorldGrids {
        &self.grids
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Pixel size of one cell (width, height)
    pub fn cell_size(&self) -> (f32, f32) {
        self.cell_size
    }

    /// Drain at most one console command and apply it
    pub fn tick(&mut self, slot: &CommandSlot) -> Dispatch {
        match slot.try_drain() {
            Some(payload) => {
                info!("Command received: {}", payload.name());
                self.apply(payload)
            }
            None => Dispatch::Idle,
        }
    }

    /// Apply one payload to the world
    pub fn apply(&mut self, payload: CommandPayload) -> Dispatch {
        match payload {
            CommandPayload::None => {}
            CommandPayload::Quit => return Dispatch::Quit,
            CommandPayload::Load { file_name } => match self.storage.load_grids(&file_name) {
                Ok(grids) => {
                    info!("Loaded {} ({}x{})", file_name, grids.width(), grids.height());
                    self.replace_grids(grids);
                }
                Err(e) => error!("Failed to load {}: {}", file_name, e),
            },
            CommandPayload::Unload { width, height } => match WorldGrids::new(width, height) {
                Some(grids) => {
                    info!("New {}x{} map", width, height);
                    self.replace_grids(grids);
                }
                None => warn!("Refusing to create a {}x{} map", width, height),
            },
            CommandPayload::Save { file_name } => {
                if let Err(e) = self.save_grids(&file_name) {
                    error!("Failed to save {}: {}", file_name, e);
                }
            }
            CommandPayload::SaveEntities { file_name } => {
                if self.entities.is_empty() {
                    debug!("No entities placed, {} will hold an empty list", file_name);
                }
                match self.storage.save_entities(&file_name, self.entities.as_slice()) {
                    Ok(()) => info!("Saved {} entities to {}", self.entities.len(), file_name),
                    Err(e) => error!("Failed to save {}: {}", file_name, e),
                }
            }
            CommandPayload::LoadEntities { file_name } => match self.storage.load_entities(&file_name) {
                Ok(loaded) => {
                    self.entities.clear();
                    for entity in loaded {
                        self.entities.insert_loaded(entity);
                    }
                    info!("Loaded {} entities from {}", self.entities.len(), file_name);
                }
                Err(e) => error!("Failed to load {}: {}", file_name, e),
            },
            CommandPayload::EditEntity(edit) => self.edit_entity(edit),
            CommandPayload::PaintCell { layer, x, y, value } => {
                if !self.grids.set_cell(layer, x, y, value) {
                    debug!("Paint outside map at {},{}", x, y);
                }
            }
            CommandPayload::PlaceEntity { kind, x, y } => {
                let id = self.entities.place(kind, x, y);
                debug!("Placed {} {} at {},{}", kind.label(), id, x, y);
            }
            CommandPayload::RemoveEntitiesNear { x, y, radius } => {
                let removed = self.entities.remove_near(x, y, radius);
                if removed > 0 {
                    debug!("Removed {} entities near {},{}", removed, x, y);
                }
            }
        }
        Dispatch::Handled
    }

    /// Write the current grids to a map file
    pub fn save_grids(&self, file_name: &str) -> Result<(), StorageError> {
        self.storage.save_grids(file_name, &self.grids)?;
        info!("Saved {} ({}x{})", file_name, self.grids.width(), self.grids.height());
        Ok(())
    }

    fn replace_grids(&mut self, grids: WorldGrids) {
        self.grids = grids;
        self.cell_size = self.grids.cell_size(self.view_size);
    }

    fn edit_entity(&mut self, edit: EntityEdit) {
        // Identifiers are unique, but if two ever collide the later one wins
        let Some(index) = self.entities.find_last(&edit.identifier) else {
            debug!("No entity {}", edit.identifier);
            return;
        };

        if edit.delete {
            self.entities.remove_index(index);
            return;
        }

        let health = edit.health_change();
        let direction = edit.direction_change();
        if let Some(entity) = self.entities.get_index_mut(index) {
            entity.scale.x = edit.scale_x;
            entity.scale.y = edit.scale_y;
            entity.position.z = edit.z;
            if let Some(health) = health {
                entity.health = Some(health);
            }
            if let Some(direction) = direction {
                entity.direction = Some(direction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Entity, EntityKind, GridLayer};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Dispatcher) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_base_dir(dir.path());
        let dispatcher = Dispatcher::new(WorldGrids::new(10, 10).unwrap(), storage, 700.0);
        (dir, dispatcher)
    }

    fn edit(identifier: &str) -> EntityEdit {
        EntityEdit {
            identifier: identifier.into(),
            delete: false,
            scale_x: 2.0,
            scale_y: 3.0,
            z: 12.0,
            health: -1,
            direction: -1.0,
        }
    }

    fn entity<'a>(d: &'a Dispatcher, identifier: &str) -> &'a Entity {
        let index = d.entities().find_last(identifier).unwrap();
        &d.entities().as_slice()[index]
    }

    fn place_five(d: &mut Dispatcher) {
        for (i, kind) in EntityKind::ALL.iter().take(5).enumerate() {
            d.apply(CommandPayload::PlaceEntity { kind: *kind, x: i as f32 * 64.0, y: 0.0 });
        }
    }

    #[test]
    fn test_tick_drains_one() {
        let (_dir, mut d) = setup();
        let slot = CommandSlot::new();

        assert_eq!(d.tick(&slot), Dispatch::Idle);

        slot.write(CommandPayload::Unload { width: 3, height: 2 });
        assert_eq!(d.tick(&slot), Dispatch::Handled);
        assert_eq!(d.grids().cell_count(), 6);
        assert!(!slot.is_pending());
        assert_eq!(d.tick(&slot), Dispatch::Idle);
    }

    #[test]
    fn test_quit() {
        let (_dir, mut d) = setup();
        let slot = CommandSlot::new();
        slot.write(CommandPayload::Quit);
        assert_eq!(d.tick(&slot), Dispatch::Quit);
    }

    #[test]
    fn test_unload_sizes() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Wall, x: 0, y: 0, value: 3 });

        for (w, h) in [(1, 1), (5, 5), (100, 50)] {
            d.apply(CommandPayload::Unload { width: w, height: h });
            for layer in GridLayer::ALL {
                let cells = d.grids().layer(layer);
                assert_eq!(cells.len(), (w * h) as usize);
                assert!(cells.iter().all(|&v| v == 0));
            }
            assert_eq!(d.cell_size(), (700.0 / w as f32, 700.0 / h as f32));
        }
    }

    #[test]
    fn test_unload_rejects_bad_size() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::Unload { width: 0, height: 5 });
        d.apply(CommandPayload::Unload { width: 5000, height: 5000 });
        assert_eq!((d.grids().width(), d.grids().height()), (10, 10));
    }

    #[test]
    fn test_wide_map_save_and_load() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::Unload { width: 2000, height: 1 });
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Floor, x: 1500, y: 0, value: 2 });
        d.apply(CommandPayload::Save { file_name: "wide.dat".into() });
        let saved = d.grids().clone();

        d.apply(CommandPayload::Unload { width: 4, height: 4 });
        d.apply(CommandPayload::Load { file_name: "wide.dat".into() });
        assert_eq!(d.grids(), &saved);
        assert_eq!((d.grids().width(), d.grids().height()), (2000, 1));
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Floor, x: 4, y: 7, value: 10 });
        d.apply(CommandPayload::Save { file_name: "level.dat".into() });
        let saved = d.grids().clone();

        d.apply(CommandPayload::Unload { width: 2, height: 2 });
        d.apply(CommandPayload::Load { file_name: "level.dat".into() });

        assert_eq!(d.grids(), &saved);
        assert_eq!(d.cell_size(), (70.0, 70.0));
    }

    #[test]
    fn test_failed_load_keeps_grids() {
        let (dir, mut d) = setup();
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Wall, x: 1, y: 1, value: 2 });
        let before = d.grids().clone();

        d.apply(CommandPayload::Load { file_name: "missing.dat".into() });
        assert_eq!(d.grids(), &before);

        std::fs::write(dir.path().join("short.dat"), [4u8, 0, 0]).unwrap();
        d.apply(CommandPayload::Load { file_name: "short.dat".into() });
        assert_eq!(d.grids(), &before);
    }

    #[test]
    fn test_open_falls_back() {
        let dir = TempDir::new().unwrap();
        let d = Dispatcher::open(Storage::with_base_dir(dir.path()), "map.dat", (8, 6), 700.0);
        assert_eq!((d.grids().width(), d.grids().height()), (8, 6));

        std::fs::write(dir.path().join("broken.dat"), [9u8; 5]).unwrap();
        let d = Dispatcher::open(Storage::with_base_dir(dir.path()), "broken.dat", (3, 2), 700.0);
        assert_eq!((d.grids().width(), d.grids().height()), (3, 2));
    }

    #[test]
    fn test_open_loads_existing() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_base_dir(dir.path());
        let mut grids = WorldGrids::new(3, 3).unwrap();
        grids.set_cell(GridLayer::Ceiling, 2, 2, 14);
        storage.save_grids("map.dat", &grids).unwrap();

        let d = Dispatcher::open(storage, "map.dat", (8, 6), 700.0);
        assert_eq!(d.grids(), &grids);
    }

    #[test]
    fn test_edit_sentinels_keep_optional_fields() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::PlaceEntity { kind: EntityKind::Enemy, x: 0.0, y: 0.0 });
        d.apply(CommandPayload::EditEntity(EntityEdit { health: 4, direction: 45.0, ..edit("1") }));

        d.apply(CommandPayload::EditEntity(edit("1")));
        let e = entity(&d, "1");
        assert_eq!(e.health, Some(4.0));
        assert_eq!(e.direction, Some(45.0));
        assert_eq!((e.scale.x, e.scale.y, e.position.z), (2.0, 3.0, 12.0));

        d.apply(CommandPayload::EditEntity(EntityEdit { health: 5, ..edit("1") }));
        let e = entity(&d, "1");
        assert_eq!(e.health, Some(5.0));
        assert_eq!(e.direction, Some(45.0));
    }

    #[test]
    fn test_edit_sentinels_on_unset_fields() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::PlaceEntity { kind: EntityKind::Coin, x: 0.0, y: 0.0 });
        d.apply(CommandPayload::EditEntity(edit("1")));
        let e = entity(&d, "1");
        assert_eq!(e.health, None);
        assert_eq!(e.direction, None);
    }

    #[test]
    fn test_delete_third_of_five() {
        let (_dir, mut d) = setup();
        place_five(&mut d);
        let before: Vec<Entity> = d.entities().iter().cloned().collect();

        d.apply(CommandPayload::EditEntity(EntityEdit { delete: true, ..edit("3") }));

        let after: Vec<Entity> = d.entities().iter().cloned().collect();
        assert_eq!(after.len(), 4);
        assert_eq!(after[..2], before[..2]);
        assert_eq!(after[2..], before[3..]);
    }

    #[test]
    fn test_edit_unknown_identifier() {
        let (_dir, mut d) = setup();
        place_five(&mut d);
        let before: Vec<Entity> = d.entities().iter().cloned().collect();

        assert_eq!(d.apply(CommandPayload::EditEntity(edit("42"))), Dispatch::Handled);
        d.apply(CommandPayload::EditEntity(EntityEdit { delete: true, ..edit("42") }));

        let after: Vec<Entity> = d.entities().iter().cloned().collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_entities_save_and_reload() {
        let (_dir, mut d) = setup();
        place_five(&mut d);
        d.apply(CommandPayload::EditEntity(EntityEdit { health: 9, ..edit("2") }));
        d.apply(CommandPayload::SaveEntities { file_name: "sprites.dat".into() });
        let saved: Vec<Entity> = d.entities().iter().cloned().collect();

        d.apply(CommandPayload::LoadEntities { file_name: "sprites.dat".into() });

        let loaded: Vec<Entity> = d.entities().iter().cloned().collect();
        assert_eq!(loaded.len(), 5);
        for (old, new) in saved.iter().zip(&loaded) {
            assert_eq!(old.kind, new.kind);
            assert_eq!(old.position, new.position);
            assert_eq!(old.scale, new.scale);
            assert_eq!(old.health, new.health);
            // Fresh identifiers, never reused
            assert_ne!(old.identifier, new.identifier);
        }
        assert_eq!(loaded[0].identifier, "6");
    }

    #[test]
    fn test_failed_entity_load_keeps_registry() {
        let (_dir, mut d) = setup();
        place_five(&mut d);
        d.apply(CommandPayload::LoadEntities { file_name: "missing.dat".into() });
        assert_eq!(d.entities().len(), 5);
    }

    #[test]
    fn test_pointer_edits() {
        let (_dir, mut d) = setup();
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Ceiling, x: 9, y: 9, value: 13 });
        d.apply(CommandPayload::PaintCell { layer: GridLayer::Ceiling, x: 10, y: 0, value: 13 });
        assert_eq!(d.grids().cell(GridLayer::Ceiling, 9, 9), Some(13));
        assert_eq!(d.grids().layer(GridLayer::Ceiling).iter().filter(|&&v| v != 0).count(), 1);

        d.apply(CommandPayload::PlaceEntity { kind: EntityKind::Bomb, x: 100.0, y: 100.0 });
        d.apply(CommandPayload::RemoveEntitiesNear { x: 104.0, y: 103.0, radius: 10.0 });
        assert!(d.entities().is_empty());
    }
}
