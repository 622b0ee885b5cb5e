use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::HtmlSelectElement;
use wordsnake_core as game;
use yew::prelude::*;

use crate::bank;
use crate::settings::{Settings, Speed};
use crate::theme::Theme;
use crate::utils::{LocalOrDefault, LocalSave, js_random_seed};

/// Per-cell render state derived from an engine snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCell {
    Empty,
    SnakeHead,
    SnakeBody,
    Tile(char),
}

fn view_cell(snapshot: &game::RoundSnapshot, cell: game::Cell) -> ViewCell {
    if snapshot.snake.first() == Some(&cell) {
        ViewCell::SnakeHead
    } else if snapshot.snake.contains(&cell) {
        ViewCell::SnakeBody
    } else if let Some(tile) = snapshot.tiles.iter().find(|tile| tile.cell == cell) {
        ViewCell::Tile(tile.letter)
    } else {
        ViewCell::Empty
    }
}

fn cell_class(view: ViewCell) -> Classes {
    use ViewCell::*;
    classes!(
        "cell",
        match view {
            Empty => classes!(),
            SnakeHead => classes!("snake", "head"),
            SnakeBody => classes!("snake"),
            Tile(_) => classes!("tile"),
        }
    )
}

fn cell_text(view: ViewCell) -> Html {
    match view {
        ViewCell::Tile(letter) => html! { { letter.to_uppercase().to_string() } },
        _ => Html::default(),
    }
}

fn heading_for_key(key: &str) -> Option<game::Heading> {
    use game::Heading::*;
    match key {
        "ArrowUp" | "w" | "W" => Some(Up),
        "ArrowDown" | "s" | "S" => Some(Down),
        "ArrowLeft" | "a" | "A" => Some(Left),
        "ArrowRight" | "d" | "D" => Some(Right),
        _ => None,
    }
}

fn policy_label(policy: game::WrongTilePolicy) -> &'static str {
    match policy {
        game::WrongTilePolicy::HardFail => "Strict",
        game::WrongTilePolicy::Lives => "Lives",
    }
}

fn policy_from_label(label: &str) -> game::WrongTilePolicy {
    match label {
        "Lives" => game::WrongTilePolicy::Lives,
        _ => game::WrongTilePolicy::HardFail,
    }
}

#[derive(Debug)]
enum BankState {
    Loading,
    Ready(game::QuestionBank),
    Failed(game::GameError),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    BankLoaded(Result<game::QuestionBank, game::GameError>),
    Tick,
    KeyDown(String),
    Steer(game::Heading),
    StartQuiz,
    Restart,
    ToggleSettings,
    UpdateSettings(Settings),
    SetTheme(Option<Theme>),
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct QuizProps {
    /// Forced RNG seed from the URL hash, if any.
    pub seed: Option<u64>,
}

pub(crate) struct QuizView {
    settings: Settings,
    bank: BankState,
    engine: Option<game::RoundEngine>,
    error: Option<game::GameError>,
    settings_open: bool,
    tick_interval: Option<Interval>,
    _keydown: EventListener,
}

impl QuizView {
    fn start_quiz(&mut self, ctx: &Context<Self>) -> bool {
        let BankState::Ready(bank) = &self.bank else {
            return false;
        };

        let (Some(category), Some(lesson)) = (
            self.settings.category.clone(),
            self.settings.lesson.clone(),
        ) else {
            self.error = Some(game::GameError::InvalidSelection);
            return true;
        };

        let config = self.settings.game_config();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::debug!("starting quiz {}/{} with seed {}", category, lesson, seed);

        match game::RoundEngine::from_bank(config, bank, &category, &lesson, seed) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.error = None;
                let link = ctx.link().clone();
                self.tick_interval = Some(Interval::new(config.tick_ms, move || {
                    link.send_message(Msg::Tick)
                }));
            }
            // a bad selection rejects the start and leaves prior state untouched
            Err(err) => {
                log::warn!("could not start quiz: {}", err);
                self.error = Some(err);
            }
        }
        true
    }

    fn on_tick(&mut self) -> bool {
        let Some(engine) = &mut self.engine else {
            return false;
        };

        match engine.tick() {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::error!("tick failed: {}", err);
                self.error = Some(err);
                self.tick_interval = None;
                true
            }
        }
    }

    fn view_bank_controls(&self, ctx: &Context<Self>) -> Html {
        let bank = match &self.bank {
            BankState::Loading => return html! { <p class="hint">{"Loading question bank…"}</p> },
            BankState::Failed(err) => {
                return html! { <p class="error">{format!("Cannot start: {}", err)}</p> };
            }
            BankState::Ready(bank) => bank,
        };

        let selected_category = self.settings.category.clone();
        let lessons: Vec<&str> = selected_category
            .as_deref()
            .map(|category| bank.lessons(category).collect())
            .unwrap_or_default();

        let on_category = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.category = Some(select.value()).filter(|v| !v.is_empty());
                settings.lesson = None;
                Msg::UpdateSettings(settings)
            })
        };
        let on_lesson = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.lesson = Some(select.value()).filter(|v| !v.is_empty());
                Msg::UpdateSettings(settings)
            })
        };
        let cb_start = ctx.link().callback(|_| Msg::StartQuiz);
        let cb_show_settings = ctx.link().callback(|_| Msg::ToggleSettings);

        html! {
            <nav class="quiz-controls">
                <select onchange={on_category}>
                    <option value="" selected={selected_category.is_none()}>{"Category…"}</option>
                    {
                        for bank.categories().map(|category| html! {
                            <option
                                value={category.to_string()}
                                selected={selected_category.as_deref() == Some(category)}
                            >
                                {category}
                            </option>
                        })
                    }
                </select>
                <select onchange={on_lesson}>
                    <option value="" selected={self.settings.lesson.is_none()}>{"Lesson…"}</option>
                    {
                        for lessons.iter().map(|lesson| html! {
                            <option
                                value={lesson.to_string()}
                                selected={self.settings.lesson.as_deref() == Some(*lesson)}
                            >
                                {*lesson}
                            </option>
                        })
                    }
                </select>
                <button onclick={cb_start}>{"Start"}</button>
                <small onclick={cb_show_settings}>{"···"}</small>
            </nav>
        }
    }

    fn view_board(&self) -> Html {
        let Some(engine) = &self.engine else {
            return html! {
                <p class="hint">{"Choose a category and lesson, then press Start."}</p>
            };
        };

        let snapshot = engine.snapshot();
        let size = engine.config().grid_size;
        let eaten: String = snapshot.eaten.iter().collect();
        let progress = (snapshot.progress * 100.0).round() as u32;

        html! {
            <>
                <header>
                    <h2 class="prompt">{ snapshot.prompt.clone() }</h2>
                    <nav class="hud">
                        <aside>{format!("Score: {}", snapshot.score)}</aside>
                        {
                            match snapshot.lives {
                                Some(lives) => html! { <aside>{format!("Lives: {}", lives)}</aside> },
                                None => Html::default(),
                            }
                        }
                        <aside>{format!("{}%", progress)}</aside>
                        <aside class="eaten">{eaten}</aside>
                    </nav>
                </header>
                <table class="board">
                    {
                        for (0..size).map(|y| html! {
                            <tr>
                                {
                                    for (0..size).map(|x| {
                                        let view = view_cell(&snapshot, (x, y));
                                        html! {
                                            <td class={cell_class(view)}>{ cell_text(view) }</td>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                { Self::view_state_banner(snapshot.state) }
            </>
        }
    }

    fn view_state_banner(state: game::RoundState) -> Html {
        match state {
            game::RoundState::Collided => html! {
                <p class="banner game-over">{"Game over — press R to retry this question"}</p>
            },
            game::RoundState::QuizComplete => html! {
                <p class="banner quiz-complete">{"Quiz completed!"}</p>
            },
            _ => Html::default(),
        }
    }

    fn view_touch_controls(&self, ctx: &Context<Self>) -> Html {
        use game::Heading::*;
        let steer = |heading| ctx.link().callback(move |_| Msg::Steer(heading));
        let cb_restart = ctx.link().callback(|_| Msg::Restart);

        html! {
            <nav class="touch-controls">
                <button onclick={steer(Up)}>{"↑"}</button>
                <button onclick={steer(Left)}>{"←"}</button>
                <button onclick={steer(Down)}>{"↓"}</button>
                <button onclick={steer(Right)}>{"→"}</button>
                <button onclick={cb_restart}>{"R"}</button>
            </nav>
        }
    }

    fn view_settings_dialog(&self, ctx: &Context<Self>) -> Html {
        let on_speed = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.speed = Speed::from_label(&select.value());
                Msg::UpdateSettings(settings)
            })
        };
        let on_policy = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.policy = policy_from_label(&select.value());
                Msg::UpdateSettings(settings)
            })
        };
        let on_lives = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.starting_lives = select.value().parse().unwrap_or(3);
                Msg::UpdateSettings(settings)
            })
        };
        let on_decoys = {
            let settings = self.settings.clone();
            ctx.link().callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut settings = settings.clone();
                settings.decoy_count = select.value().parse().unwrap_or(4);
                Msg::UpdateSettings(settings)
            })
        };
        let theme = |theme| ctx.link().callback(move |_| Msg::SetTheme(theme));
        let cb_close = ctx.link().callback(|_| Msg::ToggleSettings);

        html! {
            <dialog id="settings" open={self.settings_open}>
                <article>
                    <h2>{"Settings"}</h2>
                    <label>{"Speed"}
                        <select onchange={on_speed}>
                            {
                                for Speed::ALL.map(|speed| html! {
                                    <option selected={self.settings.speed == speed}>
                                        {speed.label()}
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <label>{"Wrong tile"}
                        <select onchange={on_policy}>
                            {
                                for [game::WrongTilePolicy::HardFail, game::WrongTilePolicy::Lives]
                                    .map(|policy| html! {
                                        <option selected={self.settings.policy == policy}>
                                            {policy_label(policy)}
                                        </option>
                                    })
                            }
                        </select>
                    </label>
                    <label>{"Lives"}
                        <select onchange={on_lives}>
                            {
                                for (1..=5u8).map(|n| html! {
                                    <option selected={self.settings.starting_lives == n}>
                                        {n.to_string()}
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <label>{"Decoys"}
                        <select onchange={on_decoys}>
                            {
                                for (1..=8u8).map(|n| html! {
                                    <option selected={self.settings.decoy_count == n}>
                                        {n.to_string()}
                                    </option>
                                })
                            }
                        </select>
                    </label>
                    <ul class="theme">
                        <li><a href="#" onclick={theme(None)}>{"Auto"}</a></li>
                        <li><a href="#" onclick={theme(Some(Theme::Light))}>{"Light"}</a></li>
                        <li><a href="#" onclick={theme(Some(Theme::Dark))}>{"Dark"}</a></li>
                    </ul>
                    <footer>
                        <button onclick={cb_close}>{"Close"}</button>
                    </footer>
                </article>
            </dialog>
        }
    }
}

impl Component for QuizView {
    type Message = Msg;
    type Properties = QuizProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            link.send_message(Msg::BankLoaded(bank::fetch_bank().await));
        });

        let link = ctx.link().clone();
        let keydown = EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                link.send_message(Msg::KeyDown(event.key()));
            }
        });

        Self {
            settings: LocalOrDefault::local_or_default(),
            bank: BankState::Loading,
            engine: None,
            error: None,
            settings_open: false,
            tick_interval: None,
            _keydown: keydown,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            BankLoaded(Ok(bank)) => {
                log::debug!("question bank loaded");
                self.bank = BankState::Ready(bank);
                true
            }
            BankLoaded(Err(err)) => {
                log::error!("question bank load failed: {}", err);
                self.bank = BankState::Failed(err);
                true
            }
            Tick => self.on_tick(),
            KeyDown(key) => {
                if key == "r" || key == "R" {
                    ctx.link().send_message(Restart);
                    return false;
                }
                if let (Some(heading), Some(engine)) = (heading_for_key(&key), &mut self.engine) {
                    engine.set_heading(heading);
                }
                false
            }
            Steer(heading) => {
                if let Some(engine) = &mut self.engine {
                    engine.set_heading(heading);
                }
                false
            }
            StartQuiz => self.start_quiz(ctx),
            Restart => {
                let Some(engine) = &mut self.engine else {
                    return false;
                };
                match engine.restart() {
                    Ok(()) => {
                        self.error = None;
                        true
                    }
                    Err(err) => {
                        log::debug!("restart rejected: {}", err);
                        false
                    }
                }
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => {
                if self.settings != settings {
                    self.settings = settings;
                    self.settings.local_save();
                    true
                } else {
                    false
                }
            }
            SetTheme(theme) => {
                Theme::apply(theme);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let error = self
            .error
            .as_ref()
            .map(|err| html! { <p class="error">{err.to_string()}</p> })
            .unwrap_or_default();

        html! {
            <div class="wordsnake">
                { self.view_bank_controls(ctx) }
                { error }
                { self.view_board() }
                { self.view_touch_controls(ctx) }
                { self.view_settings_dialog(ctx) }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsnake_core::{RoundSnapshot, RoundState, Tile};

    fn snapshot() -> RoundSnapshot {
        RoundSnapshot {
            state: RoundState::Running,
            score: 2,
            lives: None,
            progress: 0.5,
            prompt: "q".to_string(),
            eaten: vec!['c', 'a'],
            snake: vec![(3, 2), (2, 2), (1, 2)],
            tiles: vec![Tile {
                cell: (5, 5),
                letter: 't',
                answer_index: 2,
                correct: true,
            }],
        }
    }

    #[test]
    fn view_cell_maps_head_body_tile_and_empty() {
        let snapshot = snapshot();

        assert_eq!(view_cell(&snapshot, (3, 2)), ViewCell::SnakeHead);
        assert_eq!(view_cell(&snapshot, (1, 2)), ViewCell::SnakeBody);
        assert_eq!(view_cell(&snapshot, (5, 5)), ViewCell::Tile('t'));
        assert_eq!(view_cell(&snapshot, (0, 0)), ViewCell::Empty);
    }

    #[test]
    fn arrows_and_wasd_both_steer() {
        use game::Heading::*;

        assert_eq!(heading_for_key("ArrowUp"), Some(Up));
        assert_eq!(heading_for_key("w"), Some(Up));
        assert_eq!(heading_for_key("S"), Some(Down));
        assert_eq!(heading_for_key("ArrowLeft"), Some(Left));
        assert_eq!(heading_for_key("d"), Some(Right));
        assert_eq!(heading_for_key("x"), None);
    }

    #[test]
    fn policy_labels_round_trip() {
        for policy in [game::WrongTilePolicy::HardFail, game::WrongTilePolicy::Lives] {
            assert_eq!(policy_from_label(policy_label(policy)), policy);
        }
    }
}
