use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use clearing_scatter::prelude::*;
use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// How instances of one prototype are drawn.
#[derive(Debug, Clone, Copy)]
pub struct PrototypeStyle {
    pub color: [u8; 3],
    /// Dot radius in pixels; `None` draws the proximity extent to scale.
    pub radius_px: Option<i32>,
    /// Draw a short tick along the instance's facing direction.
    pub show_heading: bool,
}

impl PrototypeStyle {
    pub fn dot(color: [u8; 3], radius_px: i32) -> Self {
        Self {
            color,
            radius_px: Some(radius_px),
            show_heading: false,
        }
    }

    pub fn extent(color: [u8; 3]) -> Self {
        Self {
            color,
            radius_px: None,
            show_heading: false,
        }
    }

    pub fn with_heading(mut self) -> Self {
        self.show_heading = true;
        self
    }
}

/// Top-down preview settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: u32,
    pub background: [u8; 3],
    pub clearing_color: [u8; 3],
    pub zone_or_color: [u8; 3],
    pub zone_not_color: [u8; 3],
    pub path_color: [u8; 3],
    pub surround_color: [u8; 3],
    /// Fraction of the clearing radius added around the disc.
    pub margin: f32,
    styles: HashMap<PrototypeId, PrototypeStyle>,
}

impl RenderConfig {
    pub fn new(image_size: u32) -> Self {
        Self {
            image_size,
            background: [240, 238, 228],
            clearing_color: [90, 90, 90],
            zone_or_color: [40, 150, 60],
            zone_not_color: [200, 60, 50],
            path_color: [120, 90, 50],
            surround_color: [180, 150, 100],
            margin: 0.08,
            styles: HashMap::new(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn set_style(&mut self, prototype: impl Into<PrototypeId>, style: PrototypeStyle) {
        self.styles.insert(prototype.into(), style);
    }

    fn style_for(&self, prototype: &str) -> PrototypeStyle {
        self.styles
            .get(prototype)
            .copied()
            .unwrap_or(PrototypeStyle::dot([30, 30, 30], 2))
    }
}

/// Maps world XZ onto image pixels, +X to the right and +Z up.
struct Frame {
    centre: Vec2,
    half_extent: f32,
    size: f32,
}

impl Frame {
    fn new(clearing: &Clearing, rc: &RenderConfig) -> Self {
        Self {
            centre: Vec2::new(clearing.origin.x, clearing.origin.z),
            half_extent: clearing.radius() * (1.0 + rc.margin),
            size: rc.image_size as f32,
        }
    }

    fn px(&self, world: Vec3) -> (i32, i32) {
        let rel = (Vec2::new(world.x, world.z) - self.centre) / (2.0 * self.half_extent);
        let x = (rel.x + 0.5) * self.size;
        let y = (0.5 - rel.y) * self.size;
        (x.round() as i32, y.round() as i32)
    }

    fn scale(&self, world_len: f32) -> f32 {
        world_len / (2.0 * self.half_extent) * self.size
    }
}

/// Renders the clearing, its zones and paths, and the placed instances to a PNG.
pub fn render_pass_to_png(
    clearing: &Clearing,
    result: &PassResult,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(rc.image_size, rc.image_size, Rgb(rc.background));
    let frame = Frame::new(clearing, rc);

    let rim: Vec<Vec3> = circle_points(clearing.origin, clearing.radius(), 256);
    draw_polyline(&mut img, &frame, &rim, true, rc.clearing_color);

    for zone in &clearing.zones {
        let color = match zone.mode {
            ZoneMode::Or => rc.zone_or_color,
            ZoneMode::Not => rc.zone_not_color,
        };
        let outline = zone_outline(clearing, zone);
        draw_polyline(&mut img, &frame, &outline, true, color);
    }

    for object_path in &clearing.paths {
        let cache = object_path.cache_or_build(true);
        let closed = cache.is_closed();
        draw_polyline(&mut img, &frame, cache.centre(), closed, rc.path_color);
        draw_polyline(&mut img, &frame, cache.left(), closed, rc.path_color);
        draw_polyline(&mut img, &frame, cache.right(), closed, rc.path_color);
        if cache.has_surround() {
            draw_polyline(&mut img, &frame, cache.left_surround(), closed, rc.surround_color);
            draw_polyline(&mut img, &frame, cache.right_surround(), closed, rc.surround_color);
            // Connections at the knots show the blend cross-over at the path ends.
            for &i in cache.knot_sample_indices() {
                for side in [Side::Left, Side::Right] {
                    if let Some(c) = cache.surround_connection(i, side) {
                        let (a, b) = (frame.px(c.surround), frame.px(c.edge));
                        draw_line(&mut img, a, b, rc.surround_color);
                    }
                }
            }
        }
    }

    for instance in &result.instances {
        let style = rc.style_for(&instance.prototype);
        let radius = style
            .radius_px
            .unwrap_or_else(|| frame.scale(instance.proximity_extent).round().max(1.0) as i32);
        let centre = frame.px(instance.position);
        fill_circle(&mut img, centre, radius, style.color);
        if style.show_heading {
            let forward = instance.rotation * Vec3::Z;
            let tip = instance.position + forward * (instance.proximity_extent.max(1.0) * 1.5);
            draw_line(&mut img, centre, frame.px(tip), style.color);
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Installs a formatting subscriber so the pass's own logging is shown.
///
/// Honours `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Prints one line per member outcome.
pub fn print_pass_summary(result: &PassResult) {
    for outcome in &result.outcomes {
        let status = if outcome.is_exhausted() {
            "exhausted"
        } else {
            "complete"
        };
        println!(
            "member {} '{}': {}/{} placed in {} iterations ({status})",
            outcome.member_index,
            outcome.prototype,
            outcome.placed,
            outcome.target,
            outcome.iterations
        );
    }
}

fn circle_points(centre: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            centre + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
        })
        .collect()
}

fn zone_outline(clearing: &Clearing, zone: &Zone) -> Vec<Vec3> {
    let r = clearing.radius();
    let c = zone.centre_local(r);
    match zone.shape {
        ZoneShape::Circle => {
            let centre = clearing.to_world(c, 0.0);
            circle_points(centre, zone.width * r, 96)
        }
        ZoneShape::Rectangle => {
            let h = Vec2::new(zone.width * 0.5 * r, zone.length * 0.5 * r);
            [
                Vec2::new(-h.x, -h.y),
                Vec2::new(h.x, -h.y),
                Vec2::new(h.x, h.y),
                Vec2::new(-h.x, h.y),
            ]
            .into_iter()
            .map(|corner| clearing.to_world(c + corner, 0.0))
            .collect()
        }
    }
}

fn draw_polyline(
    img: &mut RgbImage,
    frame: &Frame,
    points: &[Vec3],
    closed: bool,
    color: [u8; 3],
) {
    for pair in points.windows(2) {
        draw_line(img, frame.px(pair[0]), frame.px(pair[1]), color);
    }
    if closed {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            draw_line(img, frame.px(last), frame.px(first), color);
        }
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_line(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: [u8; 3]) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_circle(img: &mut RgbImage, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}
