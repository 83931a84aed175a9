//! A deterministic, scripted game engine.
//!
//! This is not a simulation of the arcade game. Pursuers walk fixed looping
//! paths and the player steers through open cells. It exists so the frame
//! loop, the demo binary and the tests have a predictable collaborator.

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::GameEngine;
use crate::field::Field;
use crate::types::{
    Cell, CellType, Difficulty, Heading, MovingEntity, PursuerColor, SCORE_DOT, SCORE_PELLET,
    SCORE_PURSUER,
};

/// Ticks a pellet keeps pursuers vulnerable on [`Difficulty::Normal`].
pub const VULNERABLE_TICKS_NORMAL: u32 = 30;

/// Ticks a pellet keeps pursuers vulnerable on [`Difficulty::Expert`].
pub const VULNERABLE_TICKS_EXPERT: u32 = 15;

/// Reasons a script cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("pursuer path is empty")]
    EmptyPath,

    #[error("path step {index} at ({y}, {x}) is outside the field")]
    OutOfBounds { index: usize, y: u32, x: u32 },

    #[error("path step {index} at ({y}, {x}) is a wall")]
    ThroughWall { index: usize, y: u32, x: u32 },

    #[error("path step {index} is not adjacent to the previous step")]
    NotAdjacent { index: usize },

    #[error("player start ({y}, {x}) is not an open cell")]
    BlockedStart { y: u32, x: u32 },
}

#[derive(Debug, Clone)]
struct Route {
    steps: Vec<Cell>,
    pos: usize,
}

impl Route {
    fn advance(&mut self) -> Cell {
        self.pos = (self.pos + 1) % self.steps.len();
        self.steps[self.pos]
    }

    fn reset(&mut self) -> Cell {
        self.pos = 0;
        self.steps[0]
    }
}

/// Scripted engine with a steerable player and path-following pursuers.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    field: Field,
    difficulty: Difficulty,
    player: MovingEntity,
    player_start: Cell,
    pending: Heading,
    pursuers: Vec<MovingEntity>,
    routes: Vec<Route>,
    lives: u8,
    score: u32,
    vulnerable_ticks: u32,
    ticks: u64,
    tick_limit: Option<u64>,
    game_over: bool,
}

impl ScriptedEngine {
    pub fn new(
        field: Field,
        difficulty: Difficulty,
        player_start: Cell,
        lives: u8,
    ) -> Result<Self, ScriptError> {
        if !is_open(&field, player_start) {
            return Err(ScriptError::BlockedStart {
                y: player_start.y,
                x: player_start.x,
            });
        }
        Ok(Self {
            field,
            difficulty,
            player: MovingEntity::player(player_start),
            player_start,
            pending: Heading::None,
            pursuers: Vec::new(),
            routes: Vec::new(),
            lives,
            score: 0,
            vulnerable_ticks: 0,
            ticks: 0,
            tick_limit: None,
            game_over: false,
        })
    }

    /// Add a pursuer that loops over `path`.
    ///
    /// Consecutive steps (including last back to first) must be equal or
    /// orthogonally adjacent and must not cross walls.
    pub fn with_pursuer(mut self, color: PursuerColor, path: Vec<Cell>) -> Result<Self, ScriptError> {
        let first = *path.first().ok_or(ScriptError::EmptyPath)?;
        for (index, step) in path.iter().enumerate() {
            match self.field.get(*step) {
                None => {
                    return Err(ScriptError::OutOfBounds {
                        index,
                        y: step.y,
                        x: step.x,
                    })
                }
                Some(CellType::Wall) => {
                    return Err(ScriptError::ThroughWall {
                        index,
                        y: step.y,
                        x: step.x,
                    })
                }
                Some(_) => {}
            }
        }
        for index in 0..path.len() {
            let from = path[index];
            let to = path[(index + 1) % path.len()];
            if from != to && from.heading_to(to).is_none() {
                return Err(ScriptError::NotAdjacent {
                    index: (index + 1) % path.len(),
                });
            }
        }

        let id = self.pursuers.len() as u32 + 1;
        self.pursuers.push(MovingEntity::pursuer(id, color, first));
        self.routes.push(Route { steps: path, pos: 0 });
        Ok(self)
    }

    /// End the game after `limit` ticks.
    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }

    /// Heading the player will try on the next tick.
    pub fn pending_heading(&self) -> Heading {
        self.pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn vulnerable_duration(&self) -> u32 {
        match self.difficulty {
            Difficulty::Normal => VULNERABLE_TICKS_NORMAL,
            Difficulty::Expert => VULNERABLE_TICKS_EXPERT,
        }
    }

    fn step_player(&mut self) {
        let from = self.player.cell;
        let next = [self.pending, self.player.heading]
            .into_iter()
            .filter(|h| !h.is_none())
            .find_map(|h| from.step(h).filter(|c| is_open(&self.field, *c)))
            .unwrap_or(from);
        self.player = self.player.moved(from, next);
    }

    fn step_pursuers(&mut self) {
        let vulnerable = self.vulnerable_ticks > 0;
        for (pursuer, route) in self.pursuers.iter_mut().zip(self.routes.iter_mut()) {
            let from = pursuer.cell;
            let to = route.advance();
            *pursuer = pursuer.moved(from, to);
            if !vulnerable {
                pursuer.vulnerable = false;
            }
        }
    }

    fn eat(&mut self) {
        match self.field.consume(self.player.cell) {
            Some(CellType::Dot) => self.score += SCORE_DOT,
            Some(CellType::Pellet) => {
                self.score += SCORE_PELLET;
                self.vulnerable_ticks = self.vulnerable_duration();
                for p in &mut self.pursuers {
                    p.vulnerable = true;
                }
                debug!(ticks = self.vulnerable_ticks, "pursuers vulnerable");
            }
            _ => {}
        }
    }

    fn collide(&mut self) {
        let player = self.player;
        for (pursuer, route) in self.pursuers.iter_mut().zip(self.routes.iter_mut()) {
            let swapped = pursuer.prev_cell == player.cell && player.prev_cell == pursuer.cell;
            if !swapped && pursuer.cell != player.cell {
                continue;
            }
            if pursuer.vulnerable {
                let home = route.reset();
                *pursuer = MovingEntity::pursuer(pursuer.id, pursuer_color(pursuer), home);
                self.score += SCORE_PURSUER;
                continue;
            }

            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.game_over = true;
            } else {
                self.player = MovingEntity::player(self.player_start);
                self.pending = Heading::None;
            }
            debug!(lives = self.lives, "player caught");
            break;
        }
    }
}

fn is_open(field: &Field, cell: Cell) -> bool {
    matches!(
        field.get(cell),
        Some(CellType::Empty | CellType::Dot | CellType::Pellet)
    )
}

fn pursuer_color(entity: &MovingEntity) -> PursuerColor {
    match entity.kind {
        crate::types::EntityKind::Pursuer(color) => color,
        crate::types::EntityKind::Player => PursuerColor::Red,
    }
}

impl GameEngine for ScriptedEngine {
    fn tick(&mut self) -> bool {
        if self.game_over {
            return true;
        }
        self.ticks += 1;
        self.vulnerable_ticks = self.vulnerable_ticks.saturating_sub(1);

        self.step_player();
        self.step_pursuers();
        self.eat();
        self.collide();

        if self.field.dot_count() == 0 {
            self.game_over = true;
        }
        if self.tick_limit.is_some_and(|limit| self.ticks >= limit) {
            self.game_over = true;
        }
        if self.game_over {
            info!(score = self.score, ticks = self.ticks, "game over");
        }
        self.game_over
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn player(&self) -> MovingEntity {
        self.player
    }

    fn pursuers(&self) -> &[MovingEntity] {
        &self.pursuers
    }

    fn set_heading(&mut self, code: &str) {
        if let Some(heading) = Heading::from_key_code(code) {
            self.pending = heading;
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn lives_remaining(&self) -> u8 {
        self.lives
    }
}
