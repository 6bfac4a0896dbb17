/// Terminal front-end: presents rendered frames and turns key presses into camera commands
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use sw3d_core::{CameraState, ControlCommand, Error, Mesh, RenderConfig, Renderer};

pub mod renderer;

pub use renderer::HalfBlockRenderer;

/// Map a key to the camera/object command it drives
pub fn command_for(code: KeyCode) -> Option<ControlCommand> {
    match code {
        KeyCode::Left => Some(ControlCommand::RotateLeft),
        KeyCode::Right => Some(ControlCommand::RotateRight),
        KeyCode::Up => Some(ControlCommand::RotateUp),
        KeyCode::Down => Some(ControlCommand::RotateDown),
        KeyCode::Char('w') => Some(ControlCommand::MoveForward),
        KeyCode::Char('s') => Some(ControlCommand::MoveBack),
        KeyCode::Char('a') => Some(ControlCommand::MoveLeft),
        KeyCode::Char('d') => Some(ControlCommand::MoveRight),
        KeyCode::Char('n') => Some(ControlCommand::DollyOut),
        KeyCode::Char('m') => Some(ControlCommand::DollyIn),
        _ => None,
    }
}

fn to_io(e: Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// Render one frame and time it. A refused camera yields `None` and the
/// previous frame stays in the framebuffer.
fn render_frame(renderer: &mut Renderer, camera: &CameraState) -> io::Result<Option<Duration>> {
    let start = Instant::now();
    match renderer.render(camera) {
        Ok(_) => Ok(Some(start.elapsed())),
        // Already reported by the renderer
        Err(Error::DegenerateCamera(_)) => Ok(None),
        Err(e) => Err(to_io(e)),
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    renderer: Renderer,
    camera: CameraState,
    display: HalfBlockRenderer,
    running: bool,
    dirty: bool,
    frame_time: Duration,
}

impl TerminalApp {
    /// Sizes the framebuffer to the current terminal, overriding the configured size
    pub fn new(mesh: Mesh, config: RenderConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let display = HalfBlockRenderer::new(1);
        let (width, height) = display.pixel_size(cols, rows);

        let config = RenderConfig {
            width,
            height,
            ..config
        };
        let renderer = Renderer::new(mesh, config).map_err(to_io)?;

        Ok(Self {
            renderer,
            camera: CameraState::default(),
            display,
            running: true,
            dirty: true,
            frame_time: Duration::ZERO,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS cap

        while self.running {
            let frame_start = Instant::now();

            self.handle_input()?;

            // Redraw only when something changed
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    /// Drain pending events and apply every command together
    fn handle_input(&mut self) -> io::Result<()> {
        let mut commands = Vec::new();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                        code => commands.extend(command_for(code)),
                    }
                }
                Event::Resize(cols, rows) => {
                    let (width, height) = self.display.pixel_size(cols, rows);
                    self.renderer.resize(width, height).map_err(to_io)?;
                    debug!("terminal resized to {}x{} pixels", width, height);
                    self.dirty = true;
                }
                _ => {}
            }
        }

        if !commands.is_empty() {
            self.camera.apply_all(commands);
            self.dirty = true;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        if let Some(elapsed) = render_frame(&mut self.renderer, &self.camera)? {
            self.frame_time = elapsed;
        }

        let fb = self.renderer.framebuffer();
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        self.display
            .draw(&mut stdout, &fb.to_argb(), fb.width(), fb.height())?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SW3D Terminal Renderer | {}x{} | frame {:.1} ms | Arrows=Rotate WASD=Move N/M=Dolly Q=Quit",
                fb.width(),
                fb.height(),
                self.frame_time.as_secs_f64() * 1000.0
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for(KeyCode::Left), Some(ControlCommand::RotateLeft));
        assert_eq!(command_for(KeyCode::Char('w')), Some(ControlCommand::MoveForward));
        assert_eq!(command_for(KeyCode::Char('n')), Some(ControlCommand::DollyOut));
        assert_eq!(command_for(KeyCode::Char('m')), Some(ControlCommand::DollyIn));
        assert_eq!(command_for(KeyCode::Char('q')), None);
    }

    #[test]
    fn test_refused_camera_keeps_last_frame() {
        let mut renderer = Renderer::new(Mesh::cube(8.0), RenderConfig::with_size(40, 30)).unwrap();
        let mut camera = CameraState::default();
        assert!(render_frame(&mut renderer, &camera).unwrap().is_some());
        let before = renderer.framebuffer().to_argb();

        camera.camera_up = camera.view_direction();
        assert_eq!(render_frame(&mut renderer, &camera).unwrap(), None);
        assert_eq!(renderer.framebuffer().to_argb(), before);
    }
}
