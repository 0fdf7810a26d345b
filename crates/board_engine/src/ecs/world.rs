//! ECS World implementation

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{Component, Entity};
use crate::events::{Controller, ControllerId, Event, EventBus, Notifier};

struct EntityRecord {
    name: String,
    components: HashMap<String, Rc<dyn Any>>,
    controllers: Vec<ControllerId>,
}

/// World containing all entities, their components and controllers
///
/// Every method takes `&self` so controllers can reshape the world (attach,
/// detach, publish) while a notification is being delivered.
pub struct World {
    next_entity_id: Cell<u32>,
    entities: RefCell<HashMap<Entity, EntityRecord>>,
    bus: EventBus,
    delta: Cell<f32>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: Cell::new(0),
            entities: RefCell::new(HashMap::new()),
            bus: EventBus::new(),
            delta: Cell::new(0.0),
        }
    }

    /// Create a new named entity
    pub fn create_entity(&self, name: impl Into<String>) -> Entity {
        let entity = Entity::new(self.next_entity_id.get());
        self.next_entity_id.set(entity.id() + 1);
        let name = name.into();
        log::trace!("Created entity {} ({name})", entity.id());
        self.entities.borrow_mut().insert(
            entity,
            EntityRecord {
                name,
                components: HashMap::new(),
                controllers: Vec::new(),
            },
        );
        entity
    }

    /// Destroy an entity and detach all of its controllers
    pub fn destroy_entity(&self, entity: Entity) -> bool {
        let Some(record) = self.entities.borrow_mut().remove(&entity) else {
            return false;
        };
        for id in record.controllers {
            self.bus.unsubscribe(id);
        }
        true
    }

    /// Name given to the entity at creation
    pub fn entity_name(&self, entity: Entity) -> Option<String> {
        self.entities.borrow().get(&entity).map(|record| record.name.clone())
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.borrow().len()
    }

    /// Add a named component to an entity, replacing any previous one
    ///
    /// Returns the shared handle, or `None` if the entity does not exist.
    pub fn add_component<T: Component>(&self, entity: Entity, name: &str, component: T) -> Option<Rc<T>> {
        let component = Rc::new(component);
        let mut entities = self.entities.borrow_mut();
        let record = entities.get_mut(&entity)?;
        let stored: Rc<dyn Any> = Rc::clone(&component) as Rc<dyn Any>;
        record.components.insert(name.to_owned(), stored);
        Some(component)
    }

    /// Look up a previously added component by name
    pub fn component<T: Component>(&self, entity: Entity, name: &str) -> Option<Rc<T>> {
        let entities = self.entities.borrow();
        let stored = entities.get(&entity)?.components.get(name)?;
        Rc::clone(stored).downcast::<T>().ok()
    }

    /// Remove a component; returns false if it was not present
    pub fn remove_component(&self, entity: Entity, name: &str) -> bool {
        self.entities
            .borrow_mut()
            .get_mut(&entity)
            .is_some_and(|record| record.components.remove(name).is_some())
    }

    /// Attach a controller to an entity and subscribe it to its channels
    ///
    /// Controllers attached during dispatch only hear later notifications.
    pub fn attach_controller(&self, entity: Entity, controller: Rc<dyn Controller>) -> ControllerId {
        let id = self.bus.subscribe(controller);
        if let Some(record) = self.entities.borrow_mut().get_mut(&entity) {
            record.controllers.push(id);
        } else {
            log::warn!("Controller attached to unknown entity {}", entity.id());
        }
        id
    }

    /// Detach a controller; returns false if it was not attached
    ///
    /// A controller detached during dispatch still receives the notification
    /// currently being delivered.
    pub fn detach_controller(&self, id: ControllerId) -> bool {
        for record in self.entities.borrow_mut().values_mut() {
            record.controllers.retain(|other| *other != id);
        }
        self.bus.unsubscribe(id)
    }

    /// Whether a controller is still attached
    pub fn is_attached(&self, id: ControllerId) -> bool {
        self.bus.is_subscribed(id)
    }

    /// Controllers attached to an entity, in attachment order
    pub fn controllers_of(&self, entity: Entity) -> Vec<ControllerId> {
        self.entities
            .borrow()
            .get(&entity)
            .map(|record| record.controllers.clone())
            .unwrap_or_default()
    }

    /// Deliver an event synchronously to every interested controller
    pub fn publish(&self, event: &Event) {
        log::trace!("publish {}", event.channel);
        self.bus.dispatch(self, event, self.delta.get());
    }

    /// Run one simulation step of `delta` seconds
    pub fn tick(&self, delta: f32) {
        self.delta.set(delta);
        self.publish(&Event::tick(delta));
    }

    /// Elapsed time of the current tick
    pub fn delta(&self) -> f32 {
        self.delta.get()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for World {
    fn notify(&self, event: Event) {
        self.publish(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TransformComponent;
    use crate::events::Channel;
    use crate::foundation::math::{Transform, Vec3};

    struct Gauge {
        level: Cell<f32>,
    }

    impl Component for Gauge {}

    struct Echo {
        hits: Cell<u32>,
    }

    impl Controller for Echo {
        fn channels(&self) -> &[Channel] {
            &[Channel::StartPower]
        }

        fn on_event(&self, world: &World, _event: &Event, _delta: f32) {
            self.hits.set(self.hits.get() + 1);
            // Nested publish is delivered before this handler returns
            if self.hits.get() == 1 {
                world.publish(&Event::start_power());
            }
        }
    }

    #[test]
    fn test_component_lookup_by_name_and_type() {
        let world = World::new();
        let player = world.create_entity("player");
        world.add_component(player, TransformComponent::NAME, TransformComponent::default());
        world.add_component(player, "gauge", Gauge { level: Cell::new(1.0) });

        let transform = world.component::<TransformComponent>(player, "transform").unwrap();
        transform.set(Transform::from_position(Vec3::new(4.0, 5.0, 0.0)));
        let again = world.component::<TransformComponent>(player, "transform").unwrap();
        assert_eq!(again.get().position, Vec3::new(4.0, 5.0, 0.0));

        // Wrong type under an existing name
        assert!(world.component::<Gauge>(player, "transform").is_none());
        let gauge = world.component::<Gauge>(player, "gauge").unwrap();
        assert!((gauge.level.get() - 1.0).abs() < f32::EPSILON);
        assert!(world.remove_component(player, "gauge"));
        assert!(world.component::<Gauge>(player, "gauge").is_none());
    }

    #[test]
    fn test_entities_have_names() {
        let world = World::new();
        let board = world.create_entity("board");
        let camera = world.create_entity("camera");
        assert_ne!(board, camera);
        assert_eq!(world.entity_name(camera).as_deref(), Some("camera"));
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_destroy_detaches_controllers() {
        let world = World::new();
        let entity = world.create_entity("echo");
        let echo = Rc::new(Echo { hits: Cell::new(0) });
        let id = world.attach_controller(entity, echo.clone());
        assert!(world.is_attached(id));

        assert!(world.destroy_entity(entity));
        assert!(!world.is_attached(id));
        world.publish(&Event::start_power());
        assert_eq!(echo.hits.get(), 0);
    }

    #[test]
    fn test_nested_publish_is_synchronous() {
        let world = World::new();
        let entity = world.create_entity("echo");
        let echo = Rc::new(Echo { hits: Cell::new(0) });
        world.attach_controller(entity, echo.clone());

        world.publish(&Event::start_power());
        assert_eq!(echo.hits.get(), 2);
    }

    #[test]
    fn test_tick_records_delta() {
        let world = World::new();
        world.tick(0.25);
        assert!((world.delta() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_detach_updates_entity_controllers() {
        let world = World::new();
        let entity = world.create_entity("echo");
        let id = world.attach_controller(entity, Rc::new(Echo { hits: Cell::new(0) }));
        assert_eq!(world.controllers_of(entity), vec![id]);
        assert!(world.detach_controller(id));
        assert!(world.controllers_of(entity).is_empty());
        assert!(!world.detach_controller(id));
    }
}
