use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use rand::Rng;
use unicode_width::UnicodeWidthStr;

use crate::agent::Agent;
use crate::connectivity::flood;
use crate::grid::{Cell, Coord, Grid};
use crate::session::{Session, Status};

const CELL_W: usize = 2;
const HELP: &str = "s: new maze   q: quit";

/// Everything a frame needs, borrowed from a session.
pub struct Scene<'a> {
    pub grid: &'a Grid,
    pub agent: &'a Agent,
    pub route: &'a [Coord],
    pub status: Status,
    pub run: u32,
}

impl<'a> Scene<'a> {
    pub fn from_session<R: Rng>(session: &'a Session<R>) -> Self {
        Self {
            grid: session.grid(),
            agent: session.agent(),
            route: session.remaining(),
            status: session.status(),
            run: session.runs(),
        }
    }

    fn hud(&self) -> String {
        format!(
            "Energy: {}  Pickups left: {}  Reachable: {}  Run: {}  | {}",
            self.agent.energy,
            self.grid.count(|c| c.bonus() > 0),
            self.reachable(),
            self.run,
            self.status
        )
    }

    /// Cells the agent could still walk to, ignoring energy.
    fn reachable(&self) -> usize {
        flood(self.grid, self.agent.position)
            .iter()
            .flatten()
            .filter(|seen| **seen)
            .count()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Glyph {
    Agent,
    Obstacle,
    Clear,
    Energy(u32),
    Route,
    Exit,
}

#[derive(Clone, Copy, PartialEq, Debug)]
struct CellView {
    glyph: Glyph,
    color: Color,
}

/// Terminal renderer that redraws only cells that changed since the last
/// frame.
pub struct Renderer {
    last: Vec<CellView>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(size: usize) -> Self {
        Self {
            last: vec![
                CellView {
                    glyph: Glyph::Clear,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn render(&mut self, out: &mut impl Write, scene: &Scene<'_>) -> io::Result<()> {
        let size = scene.grid.size();
        if self.last.len() != size * size {
            *self = Renderer::new(size);
        }
        let needed_h = (size + 3) as u16;
        let needed_w = (size * CELL_W) as u16;

        out.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
            out.queue(MoveTo(self.origin_x, self.origin_y + size as u16))?;
            out.queue(SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(HELP))?;
            out.queue(ResetColor)?;
        }

        let hud = scene.hud();
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            out.queue(SetForegroundColor(status_color(scene.status)))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for row in 0..size {
            for col in 0..size {
                let view = cell_for(scene, Coord::new(row, col));
                let idx = row * size + col;
                if self.needs_full || view != self.last[idx] {
                    self.last[idx] = view;
                    self.draw_cell(out, row, col, view)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()?;
        Ok(())
    }

    fn draw_cell(
        &self,
        out: &mut impl Write,
        row: usize,
        col: usize,
        view: CellView,
    ) -> io::Result<()> {
        let text = glyph_text(view.glyph);
        let x = self.origin_x + (col * CELL_W) as u16;
        let y = self.origin_y + row as u16;
        out.queue(MoveTo(x, y))?;
        out.queue(SetForegroundColor(view.color))?;
        out.queue(Print(&text))?;
        let w = UnicodeWidthStr::width(text.as_str());
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Idle => Color::White,
        Status::Searching => Color::Yellow,
        Status::Arrived => Color::Green,
        Status::EnergyExhausted => Color::Red,
    }
}

fn cell_for(scene: &Scene<'_>, pos: Coord) -> CellView {
    if pos == scene.agent.position {
        return CellView {
            glyph: Glyph::Agent,
            color: Color::Yellow,
        };
    }
    match scene.grid.cell(pos) {
        Cell::Obstacle => CellView {
            glyph: Glyph::Obstacle,
            color: Color::Blue,
        },
        Cell::Energy(value) => CellView {
            glyph: Glyph::Energy(value),
            color: Color::Magenta,
        },
        Cell::Clear if pos == scene.grid.end() => CellView {
            glyph: Glyph::Exit,
            color: Color::Green,
        },
        Cell::Clear if scene.route.contains(&pos) => CellView {
            glyph: Glyph::Route,
            color: Color::DarkGreen,
        },
        Cell::Clear => CellView {
            glyph: Glyph::Clear,
            color: Color::Reset,
        },
    }
}

fn glyph_text(glyph: Glyph) -> String {
    match glyph {
        Glyph::Agent => "🤖".to_string(),
        Glyph::Obstacle => "██".to_string(),
        Glyph::Clear => "· ".to_string(),
        Glyph::Energy(value) if value < 100 => format!("{:<2}", value),
        Glyph::Energy(_) => "++".to_string(),
        Glyph::Route => "∙∙".to_string(),
        Glyph::Exit => "[]".to_string(),
    }
}

/// Plain-text frame for headless output: the HUD line, then one line per
/// grid row.
pub fn render_text(scene: &Scene<'_>) -> String {
    let size = scene.grid.size();
    let mut out = scene.hud();
    for row in 0..size {
        out.push('\n');
        for col in 0..size {
            let text = glyph_text(cell_for(scene, Coord::new(row, col)).glyph);
            out.push_str(&text);
        }
    }
    out
}
