use crate::scene::View;
use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_millis(500);

pub struct AppState {
    pub demo_open: bool,
    pub paused: bool,
    pub active_view: Option<View>,
    pub hide_hud: bool,
    pub cached_hud: String,
    pub hud_needs_update: bool,
    pub frame_meter: FrameMeter,
    resume_pending: bool,
}

pub struct FrameMeter {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl AppState {
    pub fn new(hide_hud: bool) -> Self {
        Self {
            demo_open: false,
            paused: false,
            active_view: None,
            hide_hud,
            cached_hud: String::new(),
            hud_needs_update: true,
            frame_meter: FrameMeter::new(),
            resume_pending: false,
        }
    }

    pub fn open_demo(&mut self, view: View) {
        self.demo_open = true;
        self.paused = false;
        self.active_view = Some(view);
        self.resume_pending = true;
        self.hud_needs_update = true;
    }

    pub fn close_demo(&mut self) {
        self.demo_open = false;
        self.hud_needs_update = true;
    }

    pub fn set_view(&mut self, view: View) {
        self.active_view = Some(view);
        self.hud_needs_update = true;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.resume_pending = true;
        }
        self.hud_needs_update = true;
    }

    /// True once after the demo opens or resumes, so the first tick after a
    /// gap can run with a zero delta.
    pub fn take_resume(&mut self) -> bool {
        std::mem::take(&mut self.resume_pending)
    }

    pub fn record_frame(&mut self) {
        if self.frame_meter.record() {
            self.hud_needs_update = true;
        }
    }

    pub fn update_cached_hud(&mut self) {
        if !self.hud_needs_update {
            return;
        }

        let view = self.active_view.map(View::label).unwrap_or("None");
        let paused = if self.paused { " (paused)" } else { "" };
        self.cached_hud = format!(
            "View: {}{} | {:.0} fps | 1 Fields  2 Crops  3 Livestock  4 Equipment | Esc close | 'q' quit",
            view,
            paused,
            self.frame_meter.fps()
        );

        self.hud_needs_update = false;
    }

    pub fn should_show_hud(&self) -> bool {
        self.demo_open && !self.hide_hud
    }
}

impl FrameMeter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
            fps: 0.0,
        }
    }

    /// Counts a frame; returns true when a new rate has been measured.
    pub fn record(&mut self) -> bool {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < FPS_WINDOW {
            return false;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = Instant::now();
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameMeter {
    fn default() -> Self {
        Self::new()
    }
}
