//! Cell behavior dispatch and tile collision
//!
//! On every `player-moved` the manager recomputes the overlapped tiles from
//! scratch, runs the behaviors of each one, restores the tiles the body left,
//! then resolves the body against every solid tile it touches.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::behavior::{BehaviorTable, CellBehavior};
use super::grid::{TileCoord, TileGrid};
use crate::config::CollisionConfig;
use crate::ecs::World;
use crate::events::{Channel, Controller, Event, EventLog, Notifier};
use crate::foundation::math::{colors, Vec3};
use crate::physics::{resolve_tile, Body, Contact};
use crate::spatial::overlapping_tiles;

/// Per-cell behaviors plus the overlap state of the previous move
#[derive(Debug, Clone)]
pub struct CellManager {
    cells: BTreeMap<TileCoord, Vec<CellBehavior>>,
    current_tiles: BTreeSet<TileCoord>,
    colliding: Vec<TileCoord>,
    collision: CollisionConfig,
}

impl CellManager {
    /// Scan the grid once and paint every cell's resting state
    pub fn new(grid: &mut TileGrid, table: &BehaviorTable, collision: CollisionConfig) -> Self {
        let mut cells = BTreeMap::new();
        let occupied: Vec<_> = grid.occupied().collect();
        for (tile, ch) in occupied {
            let Some(behaviors) = table.get(ch) else {
                continue;
            };
            for behavior in behaviors {
                behavior.prepare(grid, tile);
            }
            cells.insert(tile, behaviors.to_vec());
        }
        log::debug!("Cell manager tracks {} cells", cells.len());

        Self {
            cells,
            current_tiles: BTreeSet::new(),
            colliding: Vec::new(),
            collision,
        }
    }

    /// Handle one body move from `old` to `new`
    ///
    /// Mutates the body in place. Notifications raised by behaviors go to
    /// `notifier`. Returns the union of contacts over all solid tiles.
    pub fn on_player_moved(
        &mut self,
        grid: &mut TileGrid,
        body: &mut Body,
        old: Vec3,
        new: Vec3,
        notifier: &dyn Notifier,
    ) -> Contact {
        body.position = new;
        let tiles = overlapping_tiles(grid, &new, body.radius);
        body.force = Vec3::zeros();

        let mut colliding = Vec::new();
        for tile in &tiles {
            if let Some(behaviors) = self.cells.get(tile) {
                for behavior in behaviors {
                    behavior.on_enter(grid, *tile, body, &mut colliding, notifier);
                }
            }
        }

        for tile in self.current_tiles.difference(&tiles) {
            self.restore(grid, *tile);
        }
        self.current_tiles = tiles;

        // Overlap set is ordered, so walls resolve row-major
        let mut contact = Contact::empty();
        for tile in &colliding {
            grid.set_color(*tile, colors::contact());
            let rect = grid.tile_rect(*tile);
            let hit = resolve_tile(body, &old, &rect, &self.collision);
            if !hit.is_empty() {
                log::trace!("Contact {hit:?} with tile {tile} at {:?}", body.position);
            }
            contact |= hit;
        }
        self.colliding = colliding;
        contact
    }

    fn restore(&self, grid: &mut TileGrid, tile: TileCoord) {
        grid.reset_color(tile);
        if let Some(behaviors) = self.cells.get(&tile) {
            for behavior in behaviors {
                behavior.prepare(grid, tile);
            }
        }
    }

    /// Behaviors registered for `tile`
    pub fn behaviors(&self, tile: TileCoord) -> &[CellBehavior] {
        self.cells.get(&tile).map(Vec::as_slice).unwrap_or_default()
    }

    /// Tiles overlapped by the last move
    pub const fn current_tiles(&self) -> &BTreeSet<TileCoord> {
        &self.current_tiles
    }

    /// Solid tiles hit by the last move, in resolution order
    pub fn colliding(&self) -> &[TileCoord] {
        &self.colliding
    }
}

/// Controller feeding `player-moved` into a [`CellManager`]
pub struct BoardController {
    manager: RefCell<CellManager>,
    grid: Rc<RefCell<TileGrid>>,
    body: Rc<RefCell<Body>>,
}

impl BoardController {
    /// Wrap a manager for the given grid and body
    pub fn new(manager: CellManager, grid: Rc<RefCell<TileGrid>>, body: Rc<RefCell<Body>>) -> Self {
        Self {
            manager: RefCell::new(manager),
            grid,
            body,
        }
    }

    /// Solid tiles hit by the last move
    pub fn colliding(&self) -> Vec<TileCoord> {
        self.manager.borrow().colliding().to_vec()
    }
}

impl Controller for BoardController {
    fn channels(&self) -> &[Channel] {
        &[Channel::PlayerMoved]
    }

    fn on_event(&self, world: &World, event: &Event, _delta: f32) {
        let (Some(old), Some(new)) = (event.get_vector("old"), event.get_vector("new")) else {
            log::warn!("player-moved without positions");
            return;
        };

        // Behavior notifications are published once the body and grid are
        // released, still inside the current move
        let pending = EventLog::new();
        self.manager.borrow_mut().on_player_moved(
            &mut self.grid.borrow_mut(),
            &mut self.body.borrow_mut(),
            old,
            new,
            &pending,
        );
        for event in pending.events() {
            world.notify(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn setup(text: &str) -> (TileGrid, CellManager) {
        // 100x100 tiles starting at (0, 0)
        let rows = text.lines().count() as f32;
        let cols = text.lines().map(str::len).max().unwrap_or(0) as f32;
        let layout = BoardLayout::new(0.0, Vec2::new(cols * 100.0, rows * 100.0));
        let table = BehaviorTable::default();
        let mut grid = TileGrid::parse(text, &table, &layout).unwrap();
        let manager = CellManager::new(&mut grid, &table, CollisionConfig::default());
        (grid, manager)
    }

    struct FrictionProbe {
        body: Rc<RefCell<Body>>,
        seen: Cell<Option<f32>>,
    }

    impl Controller for FrictionProbe {
        fn channels(&self) -> &[Channel] {
            &[Channel::SetBoardFriction]
        }

        fn on_event(&self, _world: &World, event: &Event, _delta: f32) {
            // Panics if the board still holds the body
            drop(self.body.borrow_mut());
            self.seen.set(event.get_scalar("friction"));
        }
    }

    fn body_at(position: Vec3) -> Body {
        Body::new(position, 20.0, Vec3::new(0.0, 500.0, 0.0))
    }

    #[test]
    fn test_construction_paints_resting_colors() {
        let (grid, manager) = setup(" @#x");
        assert_eq!(grid.color(TileCoord::new(0, 0)), colors::ground());
        assert_eq!(grid.color(TileCoord::new(1, 0)), colors::red());
        assert_eq!(grid.color(TileCoord::new(2, 0)), colors::white());
        assert_eq!(grid.color(TileCoord::new(3, 0)), colors::friction_blue());
        assert!(manager.behaviors(TileCoord::new(0, 0)).is_empty());
        assert_eq!(manager.behaviors(TileCoord::new(2, 0)).len(), 2);
    }

    #[test]
    fn test_wall_contact_is_painted_and_restored() {
        let (mut grid, mut manager) = setup("  \n #");
        let log = EventLog::new();
        let wall = TileCoord::new(1, 1);

        let mut body = body_at(Vec3::new(150.0, 70.0, 0.0));
        body.velocity.y = 30.0;
        let contact = manager.on_player_moved(
            &mut grid,
            &mut body,
            Vec3::new(150.0, 60.0, 0.0),
            Vec3::new(150.0, 85.0, 0.0),
            &log,
        );
        assert!(contact.contains(Contact::FLOOR | Contact::RESTING));
        assert_eq!(manager.colliding(), &[wall]);
        assert_eq!(grid.color(wall), colors::contact());
        assert_relative_eq!(body.position.y, 80.0);

        let from = body.position;
        manager.on_player_moved(&mut grid, &mut body, from, Vec3::new(150.0, 50.0, 0.0), &log);
        assert!(manager.colliding().is_empty());
        assert_eq!(grid.color(wall), colors::white());
    }

    #[test]
    fn test_inner_corner_resolves_row_major() {
        let (mut grid, mut manager) = setup("   \n  #\n###");
        let wall = TileCoord::new(2, 1);
        let floor = TileCoord::new(1, 2);
        let corner = TileCoord::new(2, 2);

        // Falling right into the wall while touching the floor
        let mut body = body_at(Vec3::new(175.0, 175.0, 0.0));
        body.velocity = Vec3::new(100.0, 60.0, 0.0);
        let contact = manager.on_player_moved(
            &mut grid,
            &mut body,
            Vec3::new(175.0, 175.0, 0.0),
            Vec3::new(185.0, 185.0, 0.0),
            &EventLog::new(),
        );

        assert_eq!(manager.colliding(), &[wall, floor, corner]);
        assert!(contact.contains(Contact::FLOOR | Contact::WALL | Contact::RESTING));
        assert!(!contact.contains(Contact::CEILING));

        // The wall pushed the body back before the floor was resolved
        assert_relative_eq!(body.position.x, 180.0);
        assert_relative_eq!(body.position.y, 180.0);
        assert_relative_eq!(body.velocity.x, -81.0, epsilon = 1e-4);
        assert_relative_eq!(body.velocity.y, 0.0);
        for tile in [wall, floor, corner] {
            let rect = grid.tile_rect(tile);
            assert!(body.position.x + body.radius <= rect.x || body.position.y + body.radius <= rect.y);
            assert_eq!(grid.color(tile), colors::contact());
        }
    }

    #[test]
    fn test_force_is_reset_each_move() {
        let (mut grid, mut manager) = setup("  \n  ");
        let mut body = body_at(Vec3::new(50.0, 50.0, 0.0));
        body.force = Vec3::new(1.0, 2.0, 0.0);
        let from = body.position;
        manager.on_player_moved(&mut grid, &mut body, from, Vec3::new(50.0, 55.0, 0.0), &EventLog::new());
        assert_eq!(body.force, Vec3::zeros());
        assert_eq!(body.position, Vec3::new(50.0, 55.0, 0.0));
    }

    #[test]
    fn test_friction_zone_notifies_every_move_inside() {
        let (mut grid, mut manager) = setup("x ");
        let log = EventLog::new();
        let mut body = body_at(Vec3::new(50.0, 50.0, 0.0));
        manager.on_player_moved(&mut grid, &mut body, Vec3::new(50.0, 50.0, 0.0), Vec3::new(51.0, 50.0, 0.0), &log);
        manager.on_player_moved(&mut grid, &mut body, Vec3::new(51.0, 50.0, 0.0), Vec3::new(52.0, 50.0, 0.0), &log);
        let events = log.on_channel(Channel::SetBoardFriction);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].get_scalar("friction"), Some(5.0));
        assert!(manager.colliding().is_empty());
    }

    #[test]
    fn test_marked_tile_never_blocks() {
        let (mut grid, mut manager) = setup("  \n @");
        let mut body = body_at(Vec3::new(150.0, 85.0, 0.0));
        body.velocity.y = 300.0;
        let contact = manager.on_player_moved(
            &mut grid,
            &mut body,
            Vec3::new(150.0, 70.0, 0.0),
            Vec3::new(150.0, 85.0, 0.0),
            &EventLog::new(),
        );
        assert!(contact.is_empty());
        assert!(manager.current_tiles().contains(&TileCoord::new(1, 1)));
        assert_relative_eq!(body.velocity.y, 300.0);
        assert_relative_eq!(body.position.y, 85.0);
    }

    #[test]
    fn test_board_controller_publishes_friction_after_move() {
        let world = World::new();
        let (grid, manager) = setup("x ");
        let grid = Rc::new(RefCell::new(grid));
        let body = Rc::new(RefCell::new(body_at(Vec3::new(50.0, 50.0, 0.0))));
        let board = world.create_entity("board");
        world.attach_controller(board, Rc::new(BoardController::new(manager, grid, body.clone())));

        let probe = Rc::new(FrictionProbe {
            body: body.clone(),
            seen: Cell::new(None),
        });
        world.attach_controller(board, probe.clone());

        world.publish(&Event::player_moved(Vec3::new(50.0, 50.0, 0.0), Vec3::new(60.0, 50.0, 0.0)));
        assert_eq!(probe.seen.get(), Some(5.0));
        assert_eq!(body.borrow().position, Vec3::new(60.0, 50.0, 0.0));
    }
}
