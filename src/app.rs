use crate::app_state::AppState;
use crate::config::Config;
use crate::landing::Landing;
use crate::render::{FrameBuffer, TerminalRenderer};
use crate::scene::factories::ThreadRandom;
use crate::scene::{FarmScene, SceneSettings, View};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

const ORBIT_STEP: f32 = 0.15;
const ZOOM_STEP: f32 = 0.9;
const MAX_FRAME_DELTA: f32 = 0.25;

/// Host-level actions. Every input maps to at most one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Open,
    Close,
    SelectView(View),
    Resize(u16, u16),
    Orbit { left: f32, up: f32 },
    Zoom(f32),
    TogglePause,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub fn translate(event: &Event) -> Option<HostEvent> {
    match event {
        Event::Resize(width, height) => Some(HostEvent::Resize(*width, *height)),
        Event::Key(key) if key.kind != KeyEventKind::Release => translate_key(key),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<HostEvent> {
    let event = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => HostEvent::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => HostEvent::Quit,
        KeyCode::Enter | KeyCode::Char('d') => HostEvent::Open,
        KeyCode::Esc | KeyCode::Char('x') => HostEvent::Close,
        KeyCode::Char('1') | KeyCode::Char('f') => HostEvent::SelectView(View::Fields),
        KeyCode::Char('2') | KeyCode::Char('c') => HostEvent::SelectView(View::Crops),
        KeyCode::Char('3') | KeyCode::Char('l') => HostEvent::SelectView(View::Livestock),
        KeyCode::Char('4') | KeyCode::Char('e') => HostEvent::SelectView(View::Equipment),
        KeyCode::Left => HostEvent::Orbit {
            left: ORBIT_STEP,
            up: 0.0,
        },
        KeyCode::Right => HostEvent::Orbit {
            left: -ORBIT_STEP,
            up: 0.0,
        },
        KeyCode::Up => HostEvent::Orbit {
            left: 0.0,
            up: ORBIT_STEP,
        },
        KeyCode::Down => HostEvent::Orbit {
            left: 0.0,
            up: -ORBIT_STEP,
        },
        KeyCode::Char('+') | KeyCode::Char('=') => HostEvent::Zoom(ZOOM_STEP),
        KeyCode::Char('-') => HostEvent::Zoom(1.0 / ZOOM_STEP),
        KeyCode::Char(' ') => HostEvent::TogglePause,
        _ => return None,
    };
    Some(event)
}

/// Ends a running frame loop from anywhere.
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

pub struct App {
    state: AppState,
    settings: SceneSettings,
    default_view: View,
    scene: Option<FarmScene>,
    scene_builds: usize,
    frame: FrameBuffer,
    landing: Landing,
    width: u16,
    height: u16,
    frame_duration: Duration,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl App {
    pub fn new(config: &Config, term_width: u16, term_height: u16) -> Self {
        let (tx, rx) = watch::channel(false);
        let fps = config.animation.fps.max(1) as u64;

        Self {
            state: AppState::new(config.hide_hud),
            settings: config.scene_settings(),
            default_view: config.default_view,
            scene: None,
            scene_builds: 0,
            frame: FrameBuffer::new(term_width, term_height),
            landing: Landing,
            width: term_width,
            height: term_height,
            frame_duration: Duration::from_millis(1000 / fps),
            stop_tx: Arc::new(tx),
            stop_rx: rx,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn scene(&self) -> Option<&FarmScene> {
        self.scene.as_ref()
    }

    pub fn scene_builds(&self) -> usize {
        self.scene_builds
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn handle(&mut self, event: HostEvent) -> Flow {
        match event {
            HostEvent::Open => self.open(),
            HostEvent::Close => {
                if self.state.demo_open {
                    log::debug!("demo closed");
                }
                self.state.close_demo();
            }
            HostEvent::SelectView(view) => {
                if let (true, Some(scene)) = (self.state.demo_open, self.scene.as_mut()) {
                    scene.set_view(view);
                    self.state.set_view(view);
                }
            }
            HostEvent::Resize(width, height) => self.resize(width, height),
            HostEvent::Orbit { left, up } => {
                if let (true, Some(scene)) = (self.state.demo_open, self.scene.as_mut()) {
                    let controls = scene.controls_mut();
                    controls.rotate_left(left);
                    controls.rotate_up(up);
                }
            }
            HostEvent::Zoom(scale) => {
                if let (true, Some(scene)) = (self.state.demo_open, self.scene.as_mut()) {
                    scene.controls_mut().dolly(scale);
                }
            }
            HostEvent::TogglePause => {
                if self.state.demo_open {
                    self.state.toggle_pause();
                }
            }
            HostEvent::Quit => return Flow::Stop,
        }
        Flow::Continue
    }

    /// Builds the scene the first time, then resets it to the default view
    /// on every open.
    fn open(&mut self) {
        if self.scene.is_none() {
            match FarmScene::initialize(&self.settings, self.width, self.height, &mut ThreadRandom) {
                Ok(scene) => {
                    self.scene = Some(scene);
                    self.scene_builds += 1;
                }
                Err(e) => {
                    log::error!("failed to build farm scene: {}", e);
                    return;
                }
            }
        }

        if let Some(scene) = self.scene.as_mut() {
            scene.on_resize(self.width, self.height);
            scene.set_view(self.default_view);
            self.state.open_demo(self.default_view);
            log::debug!("demo opened on {}", self.default_view);
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.frame.resize(width, height);
        if let Some(scene) = self.scene.as_mut() {
            scene.on_resize(width, height);
        }
    }

    /// Runs one frame step while the demo is open. Animation holds while
    /// paused and the first step after opening or resuming is zero; the
    /// camera controls update either way.
    pub fn advance(&mut self, elapsed: f32) {
        if !self.state.demo_open {
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if !self.state.paused {
            let delta = if self.state.take_resume() {
                0.0
            } else {
                elapsed.clamp(0.0, MAX_FRAME_DELTA)
            };
            scene.tick(delta);
        }
        scene.update_controls();
    }

    pub fn draw(&mut self, renderer: &mut TerminalRenderer) -> io::Result<()> {
        if let (true, Some(scene)) = (self.state.demo_open, self.scene.as_ref()) {
            scene.render(&mut self.frame);
            renderer.present(&self.frame)?;

            self.state.record_frame();
            self.state.update_cached_hud();
            if self.state.should_show_hud() {
                renderer.render_line_colored(
                    2,
                    1,
                    &self.state.cached_hud,
                    crossterm::style::Color::Cyan,
                )?;
            }
        } else {
            renderer.clear()?;
            self.landing.render(renderer, self.width, self.height)?;
        }
        renderer.flush()
    }

    pub async fn run(&mut self, renderer: &mut TerminalRenderer) -> io::Result<()> {
        let stop = self.stop_handle();
        let ctrl_c = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.stop();
            }
        });

        let mut stopped = self.stop_rx.clone();
        let mut ticker = tokio::time::interval(self.frame_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
            }
            if stop.is_stopped() {
                break;
            }

            while event::poll(Duration::ZERO)? {
                let Some(host_event) = translate(&event::read()?) else {
                    continue;
                };
                if let HostEvent::Resize(width, height) = host_event {
                    renderer.manual_resize(width, height)?;
                }
                if self.handle(host_event) == Flow::Stop {
                    stop.stop();
                }
            }
            if stop.is_stopped() {
                break;
            }

            let now = Instant::now();
            let elapsed = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            self.advance(elapsed);
            self.draw(renderer)?;
        }

        log::info!("frame loop stopped");
        Ok(())
    }
}
