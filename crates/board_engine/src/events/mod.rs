//! Notification bus
//!
//! Key principles:
//! - Named channels with key-value arguments (no order dependency)
//! - Registration system (only notify interested controllers)
//! - Synchronous, in-process fan-out in registration order
//! - Subscriber list is snapshotted per publish, so controllers may attach
//!   or detach (themselves included) while a notification is in flight

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::ecs::World;
use crate::foundation::math::{Rect, Vec3};

new_key_type! {
    /// Handle of an attached controller
    pub struct ControllerId;
}

/// Channel identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// One simulation step, carries `delta`
    Tick,
    /// Player input asking the body to move
    MovePlayer,
    /// The body moved from `old` to `new`
    PlayerMoved,
    /// Playfield rectangle became known
    BoardSize,
    /// Power gauge starts charging
    StartPower,
    /// Power gauge released
    StopPower,
    /// A board zone changed the friction factor
    SetBoardFriction,
}

impl Channel {
    /// Wire name of the channel
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::MovePlayer => "move-player",
            Self::PlayerMoved => "player-moved",
            Self::BoardSize => "board-size",
            Self::StartPower => "start-power",
            Self::StopPower => "stop-power",
            Self::SetBoardFriction => "set-board-friction",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Negative x
    Left,
    /// Positive x
    Right,
    /// Negative y (screen up)
    Up,
    /// Positive y (screen down)
    Down,
}

impl Direction {
    /// Unit vector for this direction
    pub fn unit(self) -> Vec3 {
        match self {
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Up => Vec3::new(0.0, -1.0, 0.0),
            Self::Down => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Parse a direction key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Plain number
    Scalar(f32),
    /// Position or direction in world space
    Vector(Vec3),
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Direction key
    Direction(Direction),
}

/// Notification on a channel with key-value arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Channel the event is published on
    pub channel: Channel,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event without arguments
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    #[must_use]
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get a scalar argument if present
    pub fn get_scalar(&self, key: &str) -> Option<f32> {
        match self.get_arg(key) {
            Some(EventArg::Scalar(value)) => Some(*value),
            _ => None,
        }
    }

    /// Get a vector argument if present
    pub fn get_vector(&self, key: &str) -> Option<Vec3> {
        match self.get_arg(key) {
            Some(EventArg::Vector(value)) => Some(*value),
            _ => None,
        }
    }

    /// Get a rectangle argument if present
    pub fn get_rect(&self, key: &str) -> Option<Rect> {
        match self.get_arg(key) {
            Some(EventArg::Rect(value)) => Some(*value),
            _ => None,
        }
    }

    /// Get a direction argument if present
    pub fn get_direction(&self, key: &str) -> Option<Direction> {
        match self.get_arg(key) {
            Some(EventArg::Direction(value)) => Some(*value),
            _ => None,
        }
    }

    /// `tick(delta)`
    pub fn tick(delta: f32) -> Self {
        Self::new(Channel::Tick).with_arg("delta", EventArg::Scalar(delta))
    }

    /// `player-moved(old, new)`
    pub fn player_moved(old: Vec3, new: Vec3) -> Self {
        Self::new(Channel::PlayerMoved)
            .with_arg("old", EventArg::Vector(old))
            .with_arg("new", EventArg::Vector(new))
    }

    /// `board-size(rectangle)`
    pub fn board_size(rect: Rect) -> Self {
        Self::new(Channel::BoardSize).with_arg("board_size", EventArg::Rect(rect))
    }

    /// `set-board-friction(value)`
    pub fn set_board_friction(friction: f32) -> Self {
        Self::new(Channel::SetBoardFriction).with_arg("friction", EventArg::Scalar(friction))
    }

    /// `move-player(targetPosition, power)`
    pub fn move_player_to(target: Vec3, power: f32) -> Self {
        Self::new(Channel::MovePlayer)
            .with_arg("pos", EventArg::Vector(target))
            .with_arg("power", EventArg::Scalar(power))
    }

    /// `move-player(direction-key)`
    pub fn move_player_key(direction: Direction) -> Self {
        Self::new(Channel::MovePlayer).with_arg("direction", EventArg::Direction(direction))
    }

    /// `start-power()`
    pub fn start_power() -> Self {
        Self::new(Channel::StartPower)
    }

    /// `stop-power()`
    pub fn stop_power() -> Self {
        Self::new(Channel::StopPower)
    }
}

/// Listener invoked for every event on the channels it declares
///
/// Controllers are shared (`Rc`) and take `&self`; state that changes while
/// handling events lives behind `Cell`/`RefCell`, which lets a controller
/// receive a nested notification raised from inside its own handler.
pub trait Controller {
    /// Channels this controller wants to hear about
    fn channels(&self) -> &[Channel];

    /// Handle one event; `delta` is the elapsed time of the current tick
    fn on_event(&self, world: &World, event: &Event, delta: f32);
}

/// Anything that can receive a notification
pub trait Notifier {
    /// Deliver `event` synchronously
    fn notify(&self, event: Event);
}

/// Collects notifications instead of dispatching them
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<Event>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Events received on one channel
    pub fn on_channel(&self, channel: Channel) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.channel == channel)
            .cloned()
            .collect()
    }
}

impl Notifier for EventLog {
    fn notify(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

struct Subscription {
    channels: Vec<Channel>,
    controller: Rc<dyn Controller>,
}

/// Subscriber registry with snapshot-then-dispatch delivery
#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<SlotMap<ControllerId, Subscription>>,
    order: RefCell<Vec<ControllerId>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller for the channels it declares
    pub fn subscribe(&self, controller: Rc<dyn Controller>) -> ControllerId {
        let channels = controller.channels().to_vec();
        let id = self
            .subscriptions
            .borrow_mut()
            .insert(Subscription { channels, controller });
        self.order.borrow_mut().push(id);
        id
    }

    /// Remove a controller; returns false if it was not registered
    pub fn unsubscribe(&self, id: ControllerId) -> bool {
        let removed = self.subscriptions.borrow_mut().remove(id).is_some();
        if removed {
            self.order.borrow_mut().retain(|other| *other != id);
        }
        removed
    }

    /// Whether `id` is currently registered
    pub fn is_subscribed(&self, id: ControllerId) -> bool {
        self.subscriptions.borrow().contains_key(id)
    }

    /// Number of registered controllers
    pub fn len(&self) -> usize {
        self.order.borrow().len()
    }

    /// Whether no controller is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Controllers listening to `channel`, in registration order
    ///
    /// The returned list is independent of the registry, so it stays valid
    /// while controllers subscribe or unsubscribe.
    pub fn snapshot(&self, channel: Channel) -> Vec<Rc<dyn Controller>> {
        let subscriptions = self.subscriptions.borrow();
        self.order
            .borrow()
            .iter()
            .filter_map(|id| subscriptions.get(*id))
            .filter(|subscription| subscription.channels.contains(&channel))
            .map(|subscription| Rc::clone(&subscription.controller))
            .collect()
    }

    /// Deliver `event` to every interested controller
    pub fn dispatch(&self, world: &World, event: &Event, delta: f32) {
        for controller in self.snapshot(event.channel) {
            controller.on_event(world, event, delta);
        }
    }
}
