//! Startup splash: timeline and painter.
//!
//! The timeline is a pure function of the time elapsed since the splash
//! appeared, so the painter only has to sample it each frame.

use std::time::Duration;

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Shape, Stroke, Vec2};

use crate::theme;

pub const FADE_IN: Duration = Duration::from_millis(1000);
pub const BAR_DURATION: Duration = Duration::from_millis(9000);
pub const DOTS_INTERVAL: Duration = Duration::from_millis(600);
pub const FINISH_DELAY: Duration = Duration::from_millis(700);
pub const FADE_OUT: Duration = Duration::from_millis(800);

/// Size of the splash card in points.
pub const SPLASH_SIZE: Vec2 = Vec2::new(720.0, 360.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPhase {
    FadingIn,
    Loading,
    /// Bar is full, waiting out the finish delay.
    Finishing,
    FadingOut,
    Done,
}

fn in_out_cubic(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

fn out_cubic(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(3)
}

fn fraction(t: Duration, total: Duration) -> f64 {
    t.as_secs_f64() / total.as_secs_f64()
}

/// When each stage of the splash happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplashTimeline {
    skipped_at: Option<Duration>,
}

impl SplashTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump straight to the fade-out at `t`. Later skips are ignored.
    pub fn skip(&mut self, t: Duration) {
        if self.skipped_at.is_none() && t < self.fade_out_start() {
            tracing::debug!("Splash skipped at {} ms", t.as_millis());
            self.skipped_at = Some(t);
        }
    }

    fn fade_out_start(&self) -> Duration {
        let natural = BAR_DURATION + FINISH_DELAY;
        self.skipped_at.map_or(natural, |t| t.min(natural))
    }

    /// Total time until the splash is gone.
    pub fn total(&self) -> Duration {
        self.fade_out_start() + FADE_OUT
    }

    pub fn phase(&self, t: Duration) -> SplashPhase {
        let fade_out_start = self.fade_out_start();
        if t >= fade_out_start + FADE_OUT {
            SplashPhase::Done
        } else if t >= fade_out_start {
            SplashPhase::FadingOut
        } else if t >= BAR_DURATION {
            SplashPhase::Finishing
        } else if t < FADE_IN {
            SplashPhase::FadingIn
        } else {
            SplashPhase::Loading
        }
    }

    /// Progress bar fill in `0.0..=1.0`.
    pub fn progress(&self, t: Duration) -> f64 {
        out_cubic(fraction(t.min(self.fade_out_start()), BAR_DURATION))
    }

    /// Whole-splash opacity in `0.0..=1.0`.
    pub fn opacity(&self, t: Duration) -> f64 {
        let fade_in = |t: Duration| in_out_cubic(fraction(t, FADE_IN));
        let start = self.fade_out_start();
        if t < start {
            fade_in(t)
        } else {
            // Fade out from wherever the fade-in had reached.
            fade_in(start) * (1.0 - in_out_cubic(fraction(t - start, FADE_OUT)))
        }
    }

    /// Number of dots after "Loading", cycling 0 to 3.
    pub fn dots(&self, t: Duration) -> usize {
        ((t.as_millis() / DOTS_INTERVAL.as_millis()) % 4) as usize
    }

    pub fn loading_text(&self, t: Duration) -> String {
        format!("Loading{}", ".".repeat(self.dots(t)))
    }

    pub fn percent_text(&self, t: Duration) -> String {
        format!("{}%", (self.progress(t) * 100.0) as u32)
    }
}

/// Paint the splash card centred in `screen` at time `t`.
pub fn render(painter: &Painter, screen: Rect, timeline: &SplashTimeline, t: Duration) {
    let alpha = timeline.opacity(t) as f32;
    let fade = |c: Color32| c.gamma_multiply(alpha);

    let rect = Rect::from_center_size(screen.center(), SPLASH_SIZE);
    painter.add(gradient_rect(
        rect,
        [
            fade(theme::SPLASH_TOP),
            fade(theme::SPLASH_MID),
            fade(theme::SPLASH_BOTTOM),
        ],
    ));

    let card = rect.shrink(40.0);
    painter.rect_filled(card, Rounding::same(14.0), fade(theme::SPLASH_CARD));

    painter.text(
        Pos2::new(rect.center().x, card.top() + 70.0),
        Align2::CENTER_CENTER,
        "ComCAD V1",
        FontId::proportional(30.0),
        fade(theme::SPLASH_TEXT),
    );
    painter.text(
        Pos2::new(rect.center().x, card.top() + 108.0),
        Align2::CENTER_CENTER,
        "CAD management interface",
        FontId::proportional(14.0),
        fade(theme::SPLASH_SUBTEXT),
    );

    // Progress bar with the percentage beside it
    let bar_width = SPLASH_SIZE.x * 0.62;
    let bar = Rect::from_min_size(
        Pos2::new(rect.center().x - bar_width / 2.0 - 34.0, card.bottom() - 70.0),
        Vec2::new(bar_width, 12.0),
    );
    painter.rect_filled(bar, Rounding::same(6.0), fade(theme::PROGRESS_TRACK));
    painter.rect_stroke(
        bar,
        Rounding::same(6.0),
        Stroke::new(1.0, fade(Color32::from_white_alpha(16))),
    );
    let progress = timeline.progress(t) as f32;
    if progress > 0.0 {
        let mut fill = bar.shrink(2.0);
        fill.set_width(fill.width() * progress);
        painter.rect_filled(fill, Rounding::same(5.0), fade(theme::PROGRESS_FILL));
    }
    painter.text(
        Pos2::new(bar.right() + 34.0, bar.center().y),
        Align2::CENTER_CENTER,
        timeline.percent_text(t),
        FontId::proportional(12.0),
        fade(theme::SPLASH_TEXT),
    );

    painter.text(
        Pos2::new(rect.center().x, bar.bottom() + 22.0),
        Align2::CENTER_CENTER,
        timeline.loading_text(t),
        FontId::proportional(12.0),
        fade(theme::SPLASH_SUBTEXT),
    );
}

/// Vertical three-stop gradient as a vertex-coloured mesh, middle stop at 60%.
fn gradient_rect(rect: Rect, colors: [Color32; 3]) -> Shape {
    let mut mesh = egui::Mesh::default();
    let split = rect.top() + rect.height() * 0.6;
    let rows = [
        (rect.top(), colors[0]),
        (split, colors[1]),
        (rect.bottom(), colors[2]),
    ];
    for (y, color) in rows {
        mesh.colored_vertex(Pos2::new(rect.left(), y), color);
        mesh.colored_vertex(Pos2::new(rect.right(), y), color);
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(1, 3, 2);
    mesh.add_triangle(2, 3, 4);
    mesh.add_triangle(3, 5, 4);
    Shape::mesh(mesh)
}
