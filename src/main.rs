//! Wavewall - an audio-reactive wallpaper
//!
//! Floating shapes pulse and drift with the microphone or a WAV track,
//! over a grid that tightens and a ring that blooms as the sound gets louder.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavewall::audio::{AudioSession, AudioTrack, CpalBackend, SourceState};
use wavewall::cli::Args;
use wavewall::export::Exporter;
use wavewall::params::*;
use wavewall::recording;
use wavewall::rendering::{Canvas, Painter, Presenter};
use wavewall::scene::SceneSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    canvas: Canvas,
    painter: Painter,

    // Frame pipeline
    session: AudioSession<CpalBackend>,
    scene: SceneSystem,
    exporter: Exporter,

    // Configuration
    render_config: RenderConfig,
    start_mic: bool,
    file: Option<PathBuf>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let render_config = args.render_config();
        let analyser_config = AnalyserConfig::default();

        let session = AudioSession::new(CpalBackend::new(), analyser_config)?;
        let scene = SceneSystem::new(
            args.scene_config(),
            render_config.window_width,
            render_config.window_height,
            session.bin_count(),
        )?;

        Ok(Self {
            window: None,
            presenter: None,
            canvas: Canvas::new(render_config.window_width, render_config.window_height),
            painter: Painter::new(Palette::default(), RenderStyle::default()),
            session,
            scene,
            exporter: Exporter::new(args.capture_config()),
            render_config,
            start_mic: args.mic,
            file: args.file.clone(),
            start_time: Instant::now(),
        })
    }

    fn start_microphone(&mut self) {
        if let Err(e) = self.session.start_microphone() {
            tracing::warn!("Microphone unavailable, rendering silence: {}", e);
        }
    }

    fn load_file(&mut self) {
        let Some(path) = self.file.clone() else {
            tracing::warn!("No --file given; nothing to load");
            return;
        };
        if let Err(e) = self.session.load_file(&path) {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
            return;
        }
        if let Some(track) = self.session.track() {
            tracing::info!("Press Space to play {}", track.name());
        }
    }

    fn toggle_playback(&mut self) {
        if self.session.state() == SourceState::Idle && self.file.is_some() {
            self.load_file();
        }
        if let Err(e) = self.session.toggle_playback() {
            tracing::warn!("Playback: {}", e);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
        self.canvas.resize(width, height);
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyM => self.start_microphone(),
            KeyCode::KeyF => self.load_file(),
            KeyCode::Space => self.toggle_playback(),
            KeyCode::KeyX => self.session.stop(),
            KeyCode::KeyR => self.scene.regenerate(),
            KeyCode::KeyS => match self.exporter.screenshot(&self.canvas) {
                Ok(Some(path)) => tracing::info!("Screenshot saved to {}", path.display()),
                Ok(None) => tracing::warn!("Canvas is empty; no screenshot taken"),
                Err(e) => tracing::error!("Screenshot failed: {}", e),
            },
            KeyCode::KeyE => {
                match self
                    .exporter
                    .settings(self.scene.shapes(), self.painter.palette())
                {
                    Ok(path) => tracing::info!("Settings exported to {}", path.display()),
                    Err(e) => tracing::error!("Settings export failed: {}", e),
                }
            }
            _ => {}
        }
    }

    /// Sample, tick, paint, present
    fn render_frame(&mut self) {
        let time_s = self.start_time.elapsed().as_secs_f32();

        self.session.poll();
        let spectrum = self.session.sample_or_silent();
        self.scene.ensure_bin_count(spectrum.bin_count());

        let frame = self.scene.tick(time_s, &spectrum);
        self.painter.paint(&mut self.canvas, &frame);

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        match presenter.render(&self.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = self.scene.size();
                presenter.resize(width, height);
            }
            Err(e) => tracing::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Wavewall")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let presenter = match pollster::block_on(Presenter::new(Arc::clone(&window))) {
            Ok(presenter) => presenter,
            Err(e) => {
                tracing::error!("Failed to initialize graphics: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.window = Some(window);
        self.presenter = Some(presenter);
        self.resize(size.width, size.height);

        if self.start_mic {
            self.start_microphone();
        } else if self.file.is_some() {
            self.load_file();
            if let Err(e) = self.session.play() {
                tracing::warn!("Playback: {}", e);
            }
        }

        tracing::info!("Wavewall is running");
        tracing::info!("M mic | F load | Space play/pause | X stop | R regenerate");
        tracing::info!("S screenshot | E export settings | Esc quit");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

/// Offline mode: render the track frame by frame without a window
fn run_recording(args: &Args, config: &RecordingConfig) -> anyhow::Result<()> {
    let path = args
        .file
        .as_ref()
        .context("--record needs --file")?;
    let track = AudioTrack::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let analyser_config = AnalyserConfig::default();
    let scene = SceneSystem::new(
        args.scene_config(),
        config.width,
        config.height,
        analyser_config.bin_count(),
    )?;
    let painter = Painter::new(Palette::default(), RenderStyle::default());

    let written = recording::record(&track, &scene, &painter, &analyser_config, config)?;
    println!("Wrote {} frames to {}", written, config.frames_dir().display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    wavewall::logging::init(args.verbose);

    if let Some(config) = args.recording_config() {
        return run_recording(&args, &config);
    }

    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
