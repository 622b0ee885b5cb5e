use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::{
    AnswerTracker, Cell, Coord, GameConfig, GameError, Heading, Question, QuestionBank,
    RandomTileSpawner, Result, Snake, Tile, TileSpawner, WrongTilePolicy, types,
};

/// Valid transitions:
/// - Running -> Collided
/// - Running -> QuestionComplete
/// - QuestionComplete -> Running (next question loaded in the same tick)
/// - QuestionComplete -> QuizComplete (no more questions)
/// - Collided -> Running (external `restart`)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Running,
    Collided,
    QuestionComplete,
    QuizComplete,
}

impl RoundState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Terminal pending an external reset.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Collided | Self::QuizComplete)
    }
}

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round not running, nothing mutated.
    Idle,
    Moved,
    AteLetter,
    /// Decoy consumed under the lives policy, round still running.
    LostLife,
    Collided,
    /// Answer finished, next question loaded.
    QuestionComplete,
    QuizComplete,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Read-only per-tick view handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub state: RoundState,
    pub score: u32,
    /// `None` under the hard-fail policy.
    pub lives: Option<u8>,
    pub progress: f32,
    pub prompt: String,
    pub eaten: Vec<char>,
    /// Head first, for per-segment styling.
    pub snake: Vec<Cell>,
    pub tiles: Vec<Tile>,
}

/// One quiz run: drives the snake, the tile batches, and answer progress
/// through a fixed question list, one instance per active game.
#[derive(Clone, Debug)]
pub struct RoundEngine {
    config: GameConfig,
    questions: Vec<Question>,
    question_index: usize,
    tracker: AnswerTracker,
    snake: Snake,
    tiles: Vec<Tile>,
    spawner: RandomTileSpawner,
    score: u32,
    question_start_score: u32,
    lives: u8,
    state: RoundState,
    rng: SmallRng,
}

impl RoundEngine {
    pub fn new(config: GameConfig, questions: Vec<Question>, seed: u64) -> Result<Self> {
        if questions.is_empty() {
            return Err(GameError::InvalidSelection);
        }

        let (question_index, tracker) =
            seek_question(&questions, 0).ok_or(GameError::InvalidQuestion)?;

        let spawner = RandomTileSpawner::new(config.grid_size, config.edge_inset, config.decoy_count);
        let mut engine = Self {
            config,
            questions,
            question_index,
            tracker,
            snake: starting_snake(config.grid_size),
            tiles: Vec::new(),
            spawner,
            score: 0,
            question_start_score: 0,
            lives: config.starting_lives,
            state: RoundState::Running,
            rng: SmallRng::seed_from_u64(seed),
        };
        engine.spawn_batch()?;
        Ok(engine)
    }

    /// Convenience constructor resolving a category/lesson path first.
    pub fn from_bank(
        config: GameConfig,
        bank: &QuestionBank,
        category: &str,
        lesson: &str,
        seed: u64,
    ) -> Result<Self> {
        let questions = bank.select(category, lesson)?.to_vec();
        Self::new(config, questions, seed)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> Option<u8> {
        match self.config.policy {
            WrongTilePolicy::HardFail => None,
            WrongTilePolicy::Lives => Some(self.lives),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.questions[self.question_index].prompt
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn tracker(&self) -> &AnswerTracker {
        &self.tracker
    }

    /// Heading-change requests take effect at the next tick; reversals and
    /// input on a non-running round are dropped.
    pub fn set_heading(&mut self, heading: Heading) {
        if !self.state.is_running() {
            return;
        }
        self.snake.set_heading(heading);
    }

    /// One fixed time step. The heartbeat of the whole system.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.state.is_running() {
            return Ok(TickOutcome::Idle);
        }

        self.snake.apply_pending_heading();

        let Some(head) =
            types::step_cell(self.snake.head(), self.snake.heading(), self.config.grid_size)
        else {
            log::debug!("hit wall at {:?}", self.snake.head());
            self.state = RoundState::Collided;
            return Ok(TickOutcome::Collided);
        };

        if self.snake.collides_with_body(head) {
            log::debug!("hit own body at {:?}", head);
            self.state = RoundState::Collided;
            return Ok(TickOutcome::Collided);
        }

        self.snake.commit_head(head);

        let Some(index) = self.tiles.iter().position(|tile| tile.cell == head) else {
            self.snake.pop_tail();
            return Ok(TickOutcome::Moved);
        };

        let tile = self.tiles.remove(index);
        if tile.correct {
            self.eat_correct_tile()
        } else {
            self.eat_decoy_tile(tile)
        }
    }

    /// Correct capture: grow (tail retained), advance, rescore, respawn.
    fn eat_correct_tile(&mut self) -> Result<TickOutcome> {
        self.tracker.advance();
        self.score += 1;

        if self.tracker.is_complete() {
            self.finish_question()
        } else {
            self.spawn_batch()?;
            Ok(TickOutcome::AteLetter)
        }
    }

    fn eat_decoy_tile(&mut self, tile: Tile) -> Result<TickOutcome> {
        log::debug!("ate decoy '{}' at {:?}", tile.letter, tile.cell);
        // a decoy is not a capture, so the move does not grow the snake
        self.snake.pop_tail();

        match self.config.policy {
            WrongTilePolicy::HardFail => {
                self.state = RoundState::Collided;
                Ok(TickOutcome::Collided)
            }
            WrongTilePolicy::Lives => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    self.state = RoundState::Collided;
                    Ok(TickOutcome::Collided)
                } else {
                    // the depleted batch stays in place, minus the consumed decoy
                    Ok(TickOutcome::LostLife)
                }
            }
        }
    }

    /// Entered with a fully captured answer; either rolls into the next
    /// question within the same tick or ends the quiz.
    fn finish_question(&mut self) -> Result<TickOutcome> {
        self.state = RoundState::QuestionComplete;

        match seek_question(&self.questions, self.question_index + 1) {
            Some((index, tracker)) => {
                log::debug!("question {} complete, loading {}", self.question_index, index);
                self.question_index = index;
                self.tracker = tracker;
                self.reset_round();
                self.spawn_batch()?;
                self.state = RoundState::Running;
                Ok(TickOutcome::QuestionComplete)
            }
            None => {
                log::debug!("quiz complete, final score {}", self.score);
                self.tiles.clear();
                self.state = RoundState::QuizComplete;
                Ok(TickOutcome::QuizComplete)
            }
        }
    }

    /// Re-enters `Running` with the current question reloaded from scratch.
    /// Used after `Collided`; score earned on this question is forfeited.
    pub fn restart(&mut self) -> Result<()> {
        if matches!(self.state, RoundState::QuizComplete) {
            return Err(GameError::AlreadyEnded);
        }

        let answer = &self.questions[self.question_index].answer;
        self.tracker = AnswerTracker::new(answer)?;
        self.score = self.question_start_score;
        self.reset_round();
        self.spawn_batch()?;
        self.state = RoundState::Running;
        Ok(())
    }

    fn reset_round(&mut self) {
        self.snake = starting_snake(self.config.grid_size);
        self.lives = self.config.starting_lives;
        self.question_start_score = self.score;
    }

    /// Replaces the whole batch for the current required letter; leaves the
    /// board empty once the answer is complete.
    fn spawn_batch(&mut self) -> Result<()> {
        self.tiles.clear();

        let Some(required) = self.tracker.next_required() else {
            return Ok(());
        };

        let occupied: Vec<Cell> = self.snake.cells().collect();
        self.tiles = self.spawner.spawn_batch(
            required,
            self.tracker.cursor(),
            &occupied,
            &mut self.rng,
        )?;
        Ok(())
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            state: self.state,
            score: self.score,
            lives: self.lives(),
            progress: self.tracker.progress(),
            prompt: self.prompt().to_string(),
            eaten: self.tracker.eaten().to_vec(),
            snake: self.snake.cells().collect(),
            tiles: self.tiles.clone(),
        }
    }
}

fn starting_snake(grid_size: Coord) -> Snake {
    Snake::new((grid_size / 2, grid_size / 2), Heading::Right)
}

/// First question at or after `from` with a usable answer; unusable ones are
/// skipped with a warning.
fn seek_question(questions: &[Question], from: usize) -> Option<(usize, AnswerTracker)> {
    for (offset, question) in questions[from.min(questions.len())..].iter().enumerate() {
        let index = from + offset;
        match AnswerTracker::new(&question.answer) {
            Ok(tracker) => return Some((index, tracker)),
            Err(err) => log::warn!("skipping question {}: {}", index, err),
        }
    }
    None
}
