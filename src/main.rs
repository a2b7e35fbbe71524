use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use tilecaster::framebuffer::{blit_stretch, pack_rgb};
use tilecaster::texture::CHROMA_KEY;
use tilecaster::{GridMap, Player, Renderer, Sprite, Texture, TextureSet};

const FOV: f32 = 60.0 * (std::f32::consts::PI / 180.0);
const MAP_ROWS: usize = 13;
const MAP_COLS: usize = 20;

#[rustfmt::skip]
const LEVEL: [u8; MAP_ROWS * MAP_COLS] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 2, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 5,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 5,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 5,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 5, 5, 5, 5, 5, 5,
];

/// Index of the billboard texture appended after the eight wall textures.
const SPRITE_TEXTURE: usize = 8;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    map: GridMap,
    player: Player,
    sprites: Vec<Sprite>,
    textures: TextureSet,
    renderer: Renderer,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal framebuffer, stretched to the window on present
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl Default for App {
    fn default() -> Self {
        let map = GridMap::new(MAP_ROWS, MAP_COLS, LEVEL.to_vec());
        // Start at the map center, facing south.
        let player = Player::new(
            0.5 * map.width(),
            0.5 * map.height(),
            std::f32::consts::FRAC_PI_2,
        );
        let sprites = vec![
            Sprite {
                x: 640.0,
                y: 630.0,
                texture: SPRITE_TEXTURE,
            },
            Sprite {
                x: 250.0,
                y: 600.0,
                texture: SPRITE_TEXTURE,
            },
            Sprite {
                x: 300.0,
                y: 400.0,
                texture: SPRITE_TEXTURE,
            },
        ];

        let (fb_w, fb_h) = (640, 400);
        Self {
            window: None,
            surface: None,
            map,
            player,
            sprites,
            textures: build_textures(),
            renderer: Renderer::new(fb_w, fb_h, FOV),

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb_small: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("tilecaster")
            .with_inner_size(LogicalSize::new(1280.0, 800.0));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        let size = window.inner_size();
        self.rebuild_internal_fb(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.window = Some(window);

        self.last_tick = Instant::now();
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            if code == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            if code == KeyCode::KeyM && !repeat {
                                self.renderer.show_minimap = !self.renderer.show_minimap;
                            }
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // Minimized window, skip drawing
                }

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();

                let missed = self
                    .renderer
                    .render_frame(
                        &mut self.fb_small,
                        &self.map,
                        &self.player,
                        &self.sprites,
                        &self.textures,
                    )
                    .expect("render frame");
                if missed > 0 {
                    eprintln!("warning: {missed} columns found no wall hit");
                }

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                blit_stretch(&mut buf, dw, dh, &self.fb_small, self.fb_w, self.fb_h);
                buf.present().unwrap();

                // Print FPS
                self.frame_counter += 1;
                let now = Instant::now();
                if now.duration_since(self.last_fps_print).as_secs_f32() >= 1.0 {
                    let fps = self.frame_counter as f32
                        / now.duration_since(self.last_fps_print).as_secs_f32();
                    println!("FPS: {fps:.1}");
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                let (dw, dh) = (new_size.width as usize, new_size.height as usize);
                self.rebuild_internal_fb(dw, dh);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let mut dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        if dt > Duration::from_millis(100) {
            dt = Duration::from_millis(100);
        }

        let down = |code| self.keys_down.contains(&code) as i8;
        self.player.walk_intent = (down(KeyCode::ArrowUp) + down(KeyCode::KeyW)
            - down(KeyCode::ArrowDown)
            - down(KeyCode::KeyS))
        .clamp(-1, 1);
        self.player.turn_intent = (down(KeyCode::ArrowRight) + down(KeyCode::KeyD)
            - down(KeyCode::ArrowLeft)
            - down(KeyCode::KeyA))
        .clamp(-1, 1);

        self.player.advance(&self.map, dt.as_secs_f32());
    }

    fn rebuild_internal_fb(&mut self, dst_w: usize, dst_h: usize) {
        // Keep internal height fixed (controls pixel size look)
        let target_h = 400usize;
        let aspect = if dst_h > 0 {
            dst_w as f32 / dst_h as f32
        } else {
            1.0
        };

        // Derive width from aspect
        let mut target_w = (target_h as f32 * aspect).round() as usize;
        if target_w < 160 {
            target_w = 160;
        }
        if target_w % 2 != 0 {
            target_w += 1;
        }

        if target_w != self.fb_w || target_h != self.fb_h {
            self.fb_w = target_w;
            self.fb_h = target_h;
            self.fb_small = vec![0u32; self.fb_w * self.fb_h];
        }

        // One ray per column: the renderer is sized to the framebuffer.
        let show_minimap = self.renderer.show_minimap;
        self.renderer = Renderer::new(self.fb_w, self.fb_h, FOV);
        self.renderer.show_minimap = show_minimap;
    }
}

/// Eight procedural 64x64 wall textures (one per map content code) plus a
/// chroma-keyed barrel billboard. Stands in for decoded image files; the
/// renderer only sees width/height/pixels.
fn build_textures() -> TextureSet {
    let tints: [(f32, f32, f32); 8] = [
        (0.9, 0.45, 0.35),  // red brick
        (0.6, 0.6, 0.65),   // gray stone
        (0.4, 0.55, 0.8),   // blue stone
        (0.55, 0.75, 0.45), // mossy
        (0.8, 0.7, 0.4),    // sandstone
        (0.7, 0.5, 0.75),   // purple stone
        (0.5, 0.7, 0.7),    // teal
        (0.75, 0.6, 0.5),   // wood
    ];
    let mut textures: Vec<Texture> = tints
        .iter()
        .enumerate()
        .map(|(i, &tint)| {
            if i % 2 == 0 {
                brick_texture(tint)
            } else {
                block_texture(tint)
            }
        })
        .collect();
    textures.push(barrel_texture());
    TextureSet::new(textures)
}

fn shade(tint: (f32, f32, f32), v: f32) -> u32 {
    let c = |ch: f32| (ch * v * 255.0).clamp(0.0, 255.0) as u8;
    pack_rgb(c(tint.0), c(tint.1), c(tint.2))
}

fn brick_texture(tint: (f32, f32, f32)) -> Texture {
    let size = 64u32;
    let (brick_w, brick_h) = (16u32, 8u32);
    let mut pixels = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let row = y / brick_h;
            let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
            let bx = (x + offset) % brick_w;
            let by = y % brick_h;
            if bx < 1 || by < 1 {
                pixels.push(pack_rgb(40, 38, 35)); // mortar
            } else {
                let id = (row * 13 + (x + offset) / brick_w * 29) & 0x3F;
                pixels.push(shade(tint, 0.55 + id as f32 / 128.0));
            }
        }
    }
    Texture::new(size, size, pixels)
}

fn block_texture(tint: (f32, f32, f32)) -> Texture {
    let size = 64u32;
    let block = 32u32;
    let mut pixels = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let bx = x % block;
            let by = y % block;
            if bx < 2 || by < 2 {
                pixels.push(shade(tint, 0.25));
            } else {
                // mild per-block variation
                let id = ((x / block) * 7 + (y / block) * 11) & 0x1F;
                pixels.push(shade(tint, 0.7 + id as f32 / 160.0));
            }
        }
    }
    Texture::new(size, size, pixels)
}

fn barrel_texture() -> Texture {
    let size = 64u32;
    let mut pixels = vec![CHROMA_KEY; (size * size) as usize];
    let center = 31.5f32;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 - center) / 24.0;
            let dy = (y as f32 - center) / 30.0;
            let r2 = dx * dx + dy * dy;
            if r2 <= 1.0 {
                // darker metal hoops across the staves
                let hoop = matches!(y, 12..=14 | 30..=32 | 48..=50);
                let light = (1.0 - r2).sqrt();
                let v = if hoop { 0.35 } else { 0.5 + 0.4 * light };
                pixels[(y * size + x) as usize] = shade((0.55, 0.35, 0.2), v.clamp(0.0, 1.0));
            }
        }
    }
    Texture::new(size, size, pixels)
}

fn main() {
    let event_loop = EventLoop::new().unwrap();

    // Continuously run the event loop; the simulation advances every redraw.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    let _ = event_loop.run_app(&mut app);
}
