//! Placed entities and their registry
//!
//! Entities are identified by a string handed out by [`IdAllocator`].
//! Numbers are never reused, even after a delete or a wholesale reload, so
//! an identifier typed into the console can only ever refer to one entity.

/// Entity kinds understood by the engine.
///
/// The discriminant is the value written to entity save files. It starts at
/// 1: the engine picks the sprite texture with `value - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Key = 1,
    Bomb = 2,
    Enemy = 3,
    ShooterEnemy = 4,
    Bullet = 5,
    EnemyBullet = 6,
    Coin = 7,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Key,
        EntityKind::Bomb,
        EntityKind::Enemy,
        EntityKind::ShooterEnemy,
        EntityKind::Bullet,
        EntityKind::EnemyBullet,
        EntityKind::Coin,
    ];

    /// Convert a save-file value (1..=7) back into a kind
    pub fn from_wire(value: i32) -> Option<EntityKind> {
        let slot = usize::try_from(value.checked_sub(1)?).ok()?;
        Self::ALL.get(slot).copied()
    }

    /// Value written to save files
    pub fn wire(&self) -> i32 {
        *self as i32
    }

    /// Position in the entity texture list
    pub fn texture_slot(&self) -> usize {
        *self as usize - 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Key => "Key",
            EntityKind::Bomb => "Bomb",
            EntityKind::Enemy => "Enemy",
            EntityKind::ShooterEnemy => "ShooterEnemy",
            EntityKind::Bullet => "Bullet",
            EntityKind::EnemyBullet => "EnemyBullet",
            EntityKind::Coin => "Coin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// A placed object in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub identifier: String,
    pub kind: EntityKind,
    /// World units (64 per cell)
    pub position: Position,
    pub scale: Scale,
    pub active: bool,
    pub health: Option<f32>,
    pub direction: Option<f32>,
}

impl Entity {
    /// A freshly placed entity: active, unit scale, no gameplay attributes
    pub fn new(identifier: String, kind: EntityKind, x: f32, y: f32) -> Self {
        Self {
            identifier,
            kind,
            position: Position { x, y, z: 0.0 },
            scale: Scale::default(),
            active: true,
            health: None,
            direction: None,
        }
    }
}

/// Hands out entity identifiers.
///
/// Monotonic counter starting at 1; a number is never handed out twice.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered collection of placed entities
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    ids: IdAllocator,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Place a new entity and return its identifier
    pub fn place(&mut self, kind: EntityKind, x: f32, y: f32) -> String {
        let identifier = self.ids.allocate();
        self.entities.push(Entity::new(identifier.clone(), kind, x, y));
        identifier
    }

    /// Append an entity read from a save file, giving it a fresh identifier.
    ///
    /// Whatever identifier the entity carried is replaced.
    pub fn insert_loaded(&mut self, mut entity: Entity) -> String {
        entity.identifier = self.ids.allocate();
        let identifier = entity.identifier.clone();
        self.entities.push(entity);
        identifier
    }

    /// Index of the last entity with this identifier
    pub fn find_last(&self, identifier: &str) -> Option<usize> {
        self.entities.iter().rposition(|e| e.identifier == identifier)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// Remove the entity at `index`, preserving the order of the rest
    pub fn remove_index(&mut self, index: usize) -> Option<Entity> {
        if index < self.entities.len() {
            Some(self.entities.remove(index))
        } else {
            None
        }
    }

    /// Remove every entity within `radius` world units of `(x, y)`.
    /// Returns how many were removed.
    pub fn remove_near(&mut self, x: f32, y: f32, radius: f32) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| {
            let dx = e.position.x - x;
            let dy = e.position.y - y;
            (dx * dx + dy * dy).sqrt() >= radius
        });
        before - self.entities.len()
    }

    /// Drop all entities. The identifier counter keeps running.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut registry = EntityRegistry::new();
        let a = registry.place(EntityKind::Key, 0.0, 0.0);
        let b = registry.place(EntityKind::Coin, 64.0, 0.0);
        assert_eq!(a, "1");
        assert_eq!(b, "2");

        registry.remove_index(1);
        let c = registry.place(EntityKind::Bomb, 0.0, 64.0);
        assert_eq!(c, "3");
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut registry = EntityRegistry::new();
        registry.place(EntityKind::Key, 0.0, 0.0);
        registry.clear();
        assert!(registry.is_empty());

        let id = registry.insert_loaded(Entity::new("1".into(), EntityKind::Enemy, 1.0, 2.0));
        assert_eq!(id, "2");
    }

    #[test]
    fn test_remove_near() {
        let mut registry = EntityRegistry::new();
        registry.place(EntityKind::Key, 100.0, 100.0);
        registry.place(EntityKind::Key, 105.0, 100.0);
        registry.place(EntityKind::Key, 300.0, 300.0);

        assert_eq!(registry.remove_near(100.0, 100.0, 10.0), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.as_slice()[0].position.x, 300.0);
    }

    #[test]
    fn test_kind_wire_values() {
        assert_eq!(EntityKind::from_wire(1), Some(EntityKind::Key));
        assert_eq!(EntityKind::from_wire(7), Some(EntityKind::Coin));
        assert_eq!(EntityKind::from_wire(0), None);
        assert_eq!(EntityKind::from_wire(8), None);
        assert_eq!(EntityKind::from_wire(-1), None);
        assert_eq!(EntityKind::from_wire(i32::MIN), None);
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_wire(kind.wire()), Some(kind));
        }
        assert_eq!(EntityKind::Key.texture_slot(), 0);
        assert_eq!(EntityKind::Coin.texture_slot(), 6);
    }

    #[test]
    fn test_new_entity_defaults() {
        let e = Entity::new("9".into(), EntityKind::Enemy, 3.0, 4.0);
        assert_eq!(e.scale, Scale { x: 1.0, y: 1.0 });
        assert!(e.active);
        assert_eq!(e.position.z, 0.0);
        assert!(e.health.is_none() && e.direction.is_none());
    }
}
