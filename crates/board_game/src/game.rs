//! Headless game: board, player, gauge and camera wired into one world

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use board_engine::board::{BoardController, CellManager, MapFormatError, TileCoord, TileGrid};
use board_engine::config::ConfigError;
use board_engine::ecs::World;
use board_engine::events::Event;
use board_engine::foundation::math::Vec3;
use board_engine::foundation::time::FixedTimestep;
use board_engine::physics::Body;
use thiserror::Error;

use crate::camera::FollowCamera;
use crate::config::GameConfig;
use crate::player::{spawn_player, Player};
use crate::power::{spawn_gauge, PowerGauge};
use crate::script::{Action, Script, ScriptError};

/// Distance from the board corner at which the player appears
const SPAWN_OFFSET: f32 = 10.0;

/// Game setup errors
#[derive(Error, Debug)]
pub enum GameError {
    /// The map could not be loaded
    #[error("map error: {0}")]
    Map(#[from] MapFormatError),

    /// The configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The input script could not be loaded
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// An entity disappeared while being set up
    #[error("failed to spawn {0}")]
    Spawn(&'static str),
}

/// Running game state
pub struct Game {
    world: World,
    config: GameConfig,
    player: Player,
    grid: Rc<RefCell<TileGrid>>,
    board: Rc<BoardController>,
    camera: Rc<FollowCamera>,
    gauge: Rc<PowerGauge>,
    timestep: FixedTimestep,
    ticks: u64,
}

impl Game {
    /// Load the configured map and set up the game
    pub fn load(config: GameConfig) -> Result<Self, GameError> {
        let grid = TileGrid::load(&config.board.map_path, &config.board.cells, &config.board.layout())?;
        Self::new(config, grid)
    }

    /// Set up the game from map text
    pub fn from_map_text(config: GameConfig, text: &str) -> Result<Self, GameError> {
        let grid = TileGrid::parse(text, &config.board.cells, &config.board.layout())?;
        Self::new(config, grid)
    }

    /// Set up the game on an already parsed grid
    pub fn new(config: GameConfig, mut grid: TileGrid) -> Result<Self, GameError> {
        let world = World::new();
        let manager = CellManager::new(&mut grid, &config.board.cells, config.physics.collision);
        let playfield = grid.playfield();
        let grid = Rc::new(RefCell::new(grid));

        let spawn = Vec3::new(config.board.border + SPAWN_OFFSET, config.board.border + SPAWN_OFFSET, 0.0);
        let player = spawn_player(&world, spawn, config.motion, &config.physics, &config.power)
            .ok_or(GameError::Spawn("player"))?;

        let board_entity = world.create_entity("board");
        let board = Rc::new(BoardController::new(manager, Rc::clone(&grid), Rc::clone(&player.body)));
        world.attach_controller(board_entity, board.clone());

        let camera_entity = world.create_entity("camera");
        let camera = Rc::new(FollowCamera::new(spawn, &config.camera));
        world.attach_controller(camera_entity, camera.clone());

        let (_, gauge) = spawn_gauge(&world, config.power).ok_or(GameError::Spawn("power gauge"))?;

        world.publish(&Event::board_size(playfield));
        let timestep = FixedTimestep::new(config.engine.tick_rate);

        Ok(Self {
            world,
            config,
            player,
            grid,
            board,
            camera,
            gauge,
            timestep,
            ticks: 0,
        })
    }

    /// Run one fixed tick
    pub fn tick(&mut self) {
        self.world.tick(self.timestep.step());
        self.ticks += 1;
    }

    /// Feed elapsed wall time and run the ticks that became due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.timestep.advance(elapsed);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Run `ticks` more fixed ticks, applying scripted input before each one
    ///
    /// Script ticks count from the start of the game, not of this call.
    pub fn run(&mut self, ticks: u64, script: Option<&Script>) {
        for _ in 0..ticks {
            if let Some(script) = script {
                for action in script.actions_at(self.ticks) {
                    self.apply(action);
                }
            }
            self.tick();
        }
    }

    /// Publish the events produced by one input action
    ///
    /// A pointer release sends the gauge level reached before the gauge is
    /// reset.
    pub fn apply(&self, action: Action) {
        log::debug!("Input {action:?}");
        match action {
            Action::StartPower => self.world.publish(&Event::start_power()),
            Action::StopPower(target) => {
                let power = self.gauge.level();
                self.world.publish(&Event::stop_power());
                self.world.publish(&Event::move_player_to(target, power));
            }
            Action::Key(direction) => self.world.publish(&Event::move_player_key(direction)),
        }
    }

    /// Current body state
    pub fn body(&self) -> Body {
        self.player.body.borrow().clone()
    }

    /// Current camera position
    pub fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }

    /// Current gauge level
    pub fn power_level(&self) -> f32 {
        self.gauge.level()
    }

    /// Solid tiles touched by the last move
    pub fn colliding(&self) -> Vec<TileCoord> {
        self.board.colliding()
    }

    /// Shared board grid
    pub fn grid(&self) -> Rc<RefCell<TileGrid>> {
        Rc::clone(&self.grid)
    }

    /// The world every controller lives in
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Active configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ticks run since the game started
    pub const fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }
}
