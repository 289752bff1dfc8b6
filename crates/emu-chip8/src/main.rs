//! CHIP-8 emulator binary.
//!
//! Runs a program image in a winit window with a pixels framebuffer, or in
//! headless mode for screenshots and ASCII display dumps.

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use chip8_core::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu_chip8::{capture, keyboard_map};
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Instructions per pacing tick. Together with [`BATCH_INTERVAL`] and the
/// core's every-ninth-instruction timer rule, this reproduces the reference
/// interpreter's 60 Hz-adjacent timer decay. Programs calibrate against
/// that ratio, so neither number is tunable.
const BATCH_SIZE: u32 = 5;

/// Wall-clock interval between instruction batches.
const BATCH_INTERVAL: Duration = Duration::from_millis(10);

/// Default window scale factor (pixels per display cell).
const DEFAULT_SCALE: u32 = 8;

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    rom_path: Option<PathBuf>,
    scale: u32,
    headless: bool,
    batches: u32,
    screenshot_path: Option<PathBuf>,
    ascii: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        rom_path: None,
        scale: DEFAULT_SCALE,
        headless: false,
        batches: 1000,
        screenshot_path: None,
        ascii: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scale" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.scale = s.parse().unwrap_or(DEFAULT_SCALE);
                }
            }
            "--headless" => {
                cli.headless = true;
            }
            "--batches" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.batches = s.parse().unwrap_or(1000);
                }
            }
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--ascii" => {
                cli.ascii = true;
            }
            "--help" | "-h" => {
                eprintln!("Usage: emu-chip8 [OPTIONS] <rom>");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --scale <n>          Window scale factor [default: 8]");
                eprintln!("  --headless           Run without a window");
                eprintln!(
                    "  --batches <n>        Instruction batches in headless mode [default: 1000]"
                );
                eprintln!("  --screenshot <file>  Save a PNG of the final display (headless)");
                eprintln!("  --ascii              Print the final display as text (headless)");
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
            rom => {
                cli.rom_path = Some(PathBuf::from(rom));
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(cli: &CliArgs, mut chip: Chip8) {
    for _ in 0..cli.batches {
        if !chip.running() {
            break;
        }
        // No key source in headless mode, so a key wait never resolves.
        if chip.awaiting_key() {
            break;
        }
        chip.run_batch(BATCH_SIZE);
    }

    if cli.ascii {
        print!("{}", capture::ascii_dump(&chip));
    }

    if let Some(ref path) = cli.screenshot_path {
        if let Err(e) = capture::save_screenshot(&chip, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
}

// ---------------------------------------------------------------------------
// Windowed mode (winit + pixels)
// ---------------------------------------------------------------------------

/// Lit pixel colour, RGBA.
const PIXEL_ON: [u8; 4] = [0x00, 0xFF, 0x00, 0xFF];
/// Dark pixel colour, RGBA.
const PIXEL_OFF: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

struct App {
    chip: Chip8,
    window: Option<&'static Window>,
    pixels: Option<Pixels<'static>>,
    last_batch_time: Instant,
    scale: u32,
}

impl App {
    fn new(chip: Chip8, scale: u32) -> Self {
        Self {
            chip,
            window: None,
            pixels: None,
            last_batch_time: Instant::now(),
            scale,
        }
    }

    fn handle_key(&mut self, keycode: KeyCode, pressed: bool) {
        if let Some(key) = keyboard_map::map_keycode(keycode) {
            if pressed {
                self.chip.press_key(key);
            } else {
                self.chip.release_key(key);
            }
        }
    }

    /// Expand the 1-bit display into the RGBA pixels frame.
    fn update_pixels(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };

        let frame = pixels.frame_mut();
        for (cell, &px) in frame.chunks_exact_mut(4).zip(self.chip.display()) {
            let colour = if px != 0 { PIXEL_ON } else { PIXEL_OFF };
            cell.copy_from_slice(&colour);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already created
        }

        let window_size = winit::dpi::LogicalSize::new(
            DISPLAY_WIDTH as u32 * self.scale,
            DISPLAY_HEIGHT as u32 * self.scale,
        );
        let attrs = WindowAttributes::default()
            .with_title("CHIP-8")
            .with_inner_size(window_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                // Leak the window to get a 'static reference. This is intentional:
                // the window lives for the entire application lifetime and is never
                // reclaimed (the OS reclaims it on process exit).
                let window: &'static Window = Box::leak(Box::new(window));
                let inner = window.inner_size();
                let surface = SurfaceTexture::new(inner.width, inner.height, window);
                match Pixels::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32, surface) {
                    Ok(pixels) => {
                        self.pixels = Some(pixels);
                    }
                    Err(e) => {
                        eprintln!("Failed to create pixels: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                self.window = Some(window);
                self.chip.request_redraw();
            }
            Err(e) => {
                eprintln!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.chip.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        eprintln!("Resize error: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                self.chip.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    // Escape exits
                    if keycode == KeyCode::Escape && event.state == ElementState::Pressed {
                        self.chip.stop();
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(keycode, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                // Pacing: one batch per interval, skipped entirely while the
                // machine waits on a key (the press itself unblocks it).
                let now = Instant::now();
                if now.duration_since(self.last_batch_time) >= BATCH_INTERVAL {
                    if !self.chip.awaiting_key() {
                        self.chip.run_batch(BATCH_SIZE);
                    }
                    self.last_batch_time = now;
                }

                if self.chip.take_redraw() {
                    self.update_pixels();
                }

                if let Some(pixels) = self.pixels.as_ref() {
                    if let Err(e) = pixels.render() {
                        eprintln!("Render error: {e}");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.chip.running() {
            event_loop.exit();
            return;
        }
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn make_chip(cli: &CliArgs) -> Chip8 {
    let Some(ref path) = cli.rom_path else {
        eprintln!("Usage: emu-chip8 [OPTIONS] <rom>");
        process::exit(1);
    };

    let image = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read ROM file {}: {e}", path.display());
            process::exit(1);
        }
    };

    let mut chip = Chip8::new();
    if let Err(e) = chip.load_program(&image) {
        eprintln!("Failed to load ROM {}: {e}", path.display());
        process::exit(1);
    }
    chip
}

fn main() {
    let cli = parse_args();
    let chip = make_chip(&cli);

    if cli.headless {
        run_headless(&cli, chip);
        return;
    }

    let mut app = App::new(chip, cli.scale);

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            eprintln!("Failed to create event loop: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {e}");
        process::exit(1);
    }
}
