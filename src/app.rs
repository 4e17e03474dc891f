use crate::algorithm::{Algorithm, Registry};
use crate::color::Rgb;
use crate::config::{Mode, Settings};
use crate::grid::{
    generate, new_canvas, random_seed, resolve_seed, GenerationRun, SeedInput, GRID_W,
};
use crate::input::{collect_input, map_event_to_action, Action, Scene};
use crate::render::{
    canvas_to_cells, draw_box, draw_center_box, draw_text, draw_text_clipped, CellBuffer,
    PixelCanvas, Terminal,
};
use crate::stats::{RunSummary, Stats};
use anyhow::{Context, Result};
use crossterm::style::Color;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const SEED_MAX_LEN: usize = 20;
const PANEL_W: u16 = 36;

/// Everything the UI mutates: selection, seed field, raster, last run.
pub(crate) struct Controller {
    registry: Registry,
    /// Name of the active algorithm.
    selected: &'static str,
    seed_text: String,
    seed_edit: String,
    canvas: PixelCanvas,
    last_run: Option<GenerationRun>,
    stats: Option<Stats>,
    status: String,
    scene: Scene,
    rng: StdRng,
}

impl Controller {
    pub(crate) fn new(registry: Registry, settings: &Settings, mut rng: StdRng) -> Self {
        let selected = settings
            .algorithm
            .or_else(|| registry.first().map(|a| a.name))
            .unwrap_or_default();
        let seed_text = settings
            .seed_text
            .clone()
            .unwrap_or_else(|| random_seed(&mut rng).to_string());
        Self {
            registry,
            selected,
            seed_text,
            seed_edit: String::new(),
            canvas: new_canvas(),
            last_run: None,
            stats: None,
            status: "Press G to generate".to_string(),
            scene: Scene::Main,
            rng,
        }
    }

    pub(crate) fn algorithm(&self) -> &Algorithm {
        active_algorithm(&self.registry, self.selected)
    }

    pub(crate) fn scene(&self) -> Scene {
        self.scene
    }

    /// Returns `false` once the user asked to quit.
    pub(crate) fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                info!("quit");
                return false;
            }
            Action::Back => self.scene = Scene::Main,
            Action::HelpToggle => {
                self.scene = if self.scene == Scene::Help {
                    Scene::Main
                } else {
                    Scene::Help
                }
            }
            Action::SelectPrev => {
                let n = self.registry.len();
                self.select((self.selected_index() + n - 1) % n);
            }
            Action::SelectNext => self.select((self.selected_index() + 1) % self.registry.len()),
            Action::Select(i) => {
                if i < self.registry.len() {
                    self.select(i);
                }
            }
            Action::Generate => {
                self.generate();
            }
            Action::RandomizeSeed => {
                self.seed_text = random_seed(&mut self.rng).to_string();
                debug!(seed = %self.seed_text, "randomized seed");
            }
            Action::Clear => {
                self.canvas.clear(Rgb::new(0, 0, 0));
                debug!("cleared raster");
            }
            Action::SeedEditOpen => {
                self.seed_edit = self.seed_text.clone();
                self.scene = Scene::EditSeed;
            }
            Action::SeedChar(ch) => {
                if self.seed_edit.chars().count() < SEED_MAX_LEN {
                    self.seed_edit.push(ch);
                }
            }
            Action::SeedBackspace => {
                self.seed_edit.pop();
            }
            Action::SeedCommit => {
                self.seed_text = std::mem::take(&mut self.seed_edit);
                self.scene = Scene::Main;
            }
            Action::SeedCancel => {
                self.seed_edit.clear();
                self.scene = Scene::Main;
            }
        }
        true
    }

    fn selected_index(&self) -> usize {
        self.registry.position(self.selected).unwrap_or(0)
    }

    fn select(&mut self, i: usize) {
        if let Some(algo) = self.registry.by_index(i) {
            self.selected = algo.name;
            info!(algorithm = algo.name, "selected");
        }
    }

    /// Resolves the seed field and replaces the previous run.
    pub(crate) fn generate(&mut self) -> &GenerationRun {
        let input = resolve_seed(&self.seed_text, &mut self.rng);
        if let SeedInput::Substituted(s) = input {
            debug!(text = %self.seed_text, seed = s, "seed substituted");
            self.seed_text = s.to_string();
        }
        let seed = input.seed();
        let algo = active_algorithm(&self.registry, self.selected);
        let run = generate(&mut self.canvas, seed, algo);
        let stats = Stats::from_run(&run, algo);
        info!(
            seed,
            algorithm = algo.name,
            elapsed_ms = run.elapsed_ms(),
            "generated"
        );
        self.status = stats.status.clone();
        self.stats = Some(stats);
        self.last_run.insert(run)
    }

    pub(crate) fn draw(&self, buf: &mut CellBuffer) {
        let (fg, bg, dim) = (Color::White, Color::Black, Color::DarkGrey);
        buf.clear(bg);

        draw_text(buf, 1, 0, "prngrid", fg, bg);
        let w = PANEL_W - 2;

        let mut y = 2;
        draw_text(buf, 1, y, "Algorithm", dim, bg);
        y += 1;
        for (i, algo) in self.registry.iter().enumerate() {
            let active = algo.name == self.selected;
            let marker = if active { '▶' } else { ' ' };
            let name_fg = if active { algo.color.term() } else { fg };
            let label = format!("{marker} {} {}", i + 1, algo.name);
            draw_text_clipped(buf, 1, y, w, &label, name_fg, bg);
            draw_text_clipped(buf, 5, y + 1, w - 4, algo.description, dim, bg);
            y += 2;
        }

        y += 1;
        let seed = if self.scene == Scene::EditSeed {
            format!("Seed: {}_", self.seed_edit)
        } else {
            format!("Seed: {}", self.seed_text)
        };
        draw_text_clipped(buf, 1, y, w, &seed, fg, bg);
        y += 2;

        if let Some(stats) = &self.stats {
            for (label, value) in stats.lines() {
                draw_text_clipped(buf, 1, y, w, &format!("{label:<11}{value}"), fg, bg);
                y += 1;
            }
        }

        let status_y = buf.h.saturating_sub(2);
        draw_text_clipped(buf, 1, status_y, buf.w.saturating_sub(2), &self.status, fg, bg);
        draw_text_clipped(
            buf,
            1,
            buf.h.saturating_sub(1),
            buf.w.saturating_sub(2),
            "G generate  R random seed  S edit seed  C clear  ↑↓ algorithm  H help  Q quit",
            dim,
            bg,
        );

        let gx = PANEL_W;
        let gh = (self.canvas.h as u16).div_ceil(2);
        draw_box(buf, gx, 1, GRID_W as u16 + 2, gh + 2, dim);
        canvas_to_cells(&self.canvas, buf, gx + 1, 2);

        match self.scene {
            Scene::Help => draw_center_box(
                buf,
                "How it works",
                "Each cell advances the PRNG by one step from\n\
                 the seed, row by row. Brightness is value /\n\
                 modulus; the tint is the algorithm's color.\n\n\
                 G/Enter  generate       R  random seed\n\
                 S        edit seed      C  clear the grid\n\
                 1-4 ↑↓   pick algorithm Q  quit\n\n\
                 A seed that is not a number is replaced\n\
                 by a random one in 0..=999999.\n\n\
                 Esc or H to close.",
            ),
            Scene::EditSeed => {
                let msg = "Type a seed, Enter to keep, Esc to cancel";
                let w = buf.w.saturating_sub(2);
                draw_text_clipped(buf, 1, status_y, w, msg, Color::Yellow, bg);
            }
            Scene::Main => {}
        }
    }
}

/// The selector is built from the registry, so a missing name is a bug.
fn active_algorithm<'r>(registry: &'r Registry, name: &str) -> &'r Algorithm {
    match registry.get(name) {
        Ok(algo) => algo,
        Err(e) => panic!("active algorithm is not registered: {e}"),
    }
}

fn clock_rng() -> StdRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos() as u64;
    StdRng::seed_from_u64(nanos)
}

pub(crate) fn run(settings: Settings) -> Result<()> {
    let registry = Registry::builtin();
    match settings.mode {
        Mode::List => {
            for algo in registry.iter() {
                println!("{:<22}{}  {}", algo.name, algo.color.to_hex(), algo.description);
            }
            Ok(())
        }
        Mode::Headless { json } => run_headless(registry, &settings, json),
        Mode::Interactive => run_interactive(registry, &settings),
    }
}

fn run_headless(registry: Registry, settings: &Settings, json: bool) -> Result<()> {
    let mut ctl = Controller::new(registry, settings, clock_rng());
    let run = ctl.generate().clone();
    if json {
        println!("{}", serde_json::to_string_pretty(&RunSummary::from_run(&run))?);
        return Ok(());
    }
    let stats = ctl.stats.as_ref().context("generation left no stats")?;
    println!("Seed       {}", run.seed);
    for (label, value) in stats.lines() {
        println!("{label:<11}{value}");
    }
    println!("{}", stats.status);
    Ok(())
}

fn run_interactive(registry: Registry, settings: &Settings) -> Result<()> {
    let mut ctl = Controller::new(registry, settings, clock_rng());
    info!(algorithm = ctl.algorithm().name, seed = %ctl.seed_text, "starting");

    let mut term = Terminal::begin()?;
    let result = event_loop(&mut ctl, &mut term);
    term.end()?;
    result
}

fn event_loop(ctl: &mut Controller, term: &mut Terminal) -> Result<()> {
    let mut dirty = true;
    loop {
        if term.resize_if_needed()? {
            dirty = true;
        }
        if dirty {
            ctl.draw(&mut term.cur);
            term.present()?;
            dirty = false;
        }

        for ev in collect_input(Duration::from_millis(250))? {
            if let Some(action) = map_event_to_action(ctl.scene(), &ev) {
                if !ctl.apply(action) {
                    return Ok(());
                }
                dirty = true;
            }
        }
    }
}
