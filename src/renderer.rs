//! CPU ray caster
//!
//! One primary ray per character cell, intersected with the planet, lit by the sun
//! and shaded from the day/night textures. Rows are rendered in parallel.

use std::time::Instant;

use rayon::prelude::*;

use crate::camera::Camera;
use crate::canvas::{Canvas, Viewport};
use crate::math::{normalize, Vec3};
use crate::scene::Planet;
use crate::texture::{texture_coordinates, TexturePair};

/// A ray in 3D space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Near intersection with the planet
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub t: f64,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Intersect a unit-direction ray with a sphere of `radius` centred on the origin.
///
/// Returns the nearer root; a negative discriminant is a miss.
pub fn intersect_sphere(ray: &Ray, radius: f64) -> Option<Hit> {
    let b = ray.direction.dot(&ray.origin);
    let discriminant = b * b - ray.origin.dot(&ray.origin) + radius * radius;
    if discriminant < 0.0 {
        return None;
    }

    let t = -discriminant.sqrt() - b;
    let point = ray.at(t);

    Some(Hit {
        t,
        point,
        normal: normalize(point),
    })
}

/// Renders the planet onto a canvas for a given spin angle
#[derive(Debug, Clone)]
pub struct Renderer {
    viewport: Viewport,
    camera: Camera,
    planet: Planet,
    textures: TexturePair,
    background: char,
}

impl Renderer {
    /// A viewport with a zero cell size renders empty canvases.
    pub fn new(viewport: Viewport, camera: Camera, planet: Planet, textures: TexturePair) -> Self {
        Self {
            viewport,
            camera,
            planet,
            textures,
            background: crate::BACKGROUND,
        }
    }

    pub fn with_background(mut self, background: char) -> Self {
        self.background = background;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn textures(&self) -> &TexturePair {
        &self.textures
    }

    /// World-space ray through the centre of cell `(xi, yi)`
    pub fn primary_ray(&self, xi: usize, yi: usize) -> Ray {
        let local = self.viewport.ray_direction(xi, yi);
        let direction = normalize(self.camera.world_direction(&local));
        Ray::new(self.camera.position, direction)
    }

    /// Character for one cell, or `None` when the ray misses the planet
    pub fn shade_cell(&self, xi: usize, yi: usize, angle_offset: f64) -> Option<char> {
        let ray = self.primary_ray(xi, yi);
        // Misses keep the background
        let hit = intersect_sphere(&ray, self.planet.radius)?;

        // Light at the world-space hit point, before the tilt is undone
        let luminance = self.planet.luminance(&hit.point, &hit.normal);

        // Texture lookup happens in the planet's own frame
        let surface = self.planet.untilt(&hit.point);
        let (phi, theta) = texture_coordinates(&surface, self.planet.radius, angle_offset);

        Some(self.textures.shade(phi, theta, luminance))
    }

    /// Render a fresh canvas
    pub fn render(&self, angle_offset: f64) -> Canvas {
        let mut canvas = Canvas::for_viewport(&self.viewport, self.background);
        self.fill(&mut canvas, angle_offset);
        canvas
    }

    /// Render into an existing canvas, reallocating it if the grid size changed
    pub fn render_into(&self, canvas: &mut Canvas, angle_offset: f64) {
        // Reuse the buffer unless the grid or background changed
        if canvas.columns() != self.viewport.columns()
            || canvas.rows() != self.viewport.rows()
            || canvas.background() != self.background
        {
            *canvas = Canvas::for_viewport(&self.viewport, self.background);
        } else {
            canvas.clear();
        }
        self.fill(canvas, angle_offset);
    }

    fn fill(&self, canvas: &mut Canvas, angle_offset: f64) {
        let columns = canvas.columns();
        if columns == 0 {
            return;
        }

        let start = Instant::now();

        // Split the canvas into rows and render them in parallel.
        // Every worker owns one row; camera, planet and textures are read-only.
        canvas
            .cells_mut()
            .par_chunks_mut(columns)
            .enumerate()
            .for_each(|(yi, row)| {
                for (xi, cell) in row.iter_mut().enumerate() {
                    // Cells are pre-filled with the background, so only hits are written
                    if let Some(c) = self.shade_cell(xi, yi, angle_offset) {
                        *cell = c;
                    }
                }
            });

        tracing::debug!(
            angle_offset,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Rendered frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Illumination;
    use crate::texture::{Palette, Texture};

    fn textures(day: &str, night: &str) -> TexturePair {
        let palette = Palette::default();
        let day = Texture::parse("day", day, &palette).unwrap();
        let night = Texture::parse("night", night, &palette).unwrap();
        TexturePair::new(palette, day, night).unwrap()
    }

    fn renderer(illumination: Illumination, day: &str, night: &str) -> Renderer {
        Renderer::new(
            Viewport::from_cells(40, 16),
            Camera::default(),
            Planet::new(1.0, 23.5, illumination),
            textures(day, night),
        )
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert!((ray.at(5.0).x - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_intersection_head_on() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_sphere(&ray, 1.3).unwrap();
        assert!((hit.t - 3.7).abs() < 1e-12);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.3)).norm() < 1e-12);
        assert!((hit.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_ray_towards_centre_lands_on_surface() {
        for (r, alpha, beta, radius) in [
            (3.0, 0.4, 0.9, 1.7),
            (2.0, 0.0, 0.0, 1.0),
            (10.0, -2.5, -1.2, 0.25),
            (1.5, 3.0, 0.1, 1.49),
        ] {
            let origin = Camera::new(r, alpha, beta).position;
            let ray = Ray::new(origin, normalize(-origin));
            let hit = intersect_sphere(&ray, radius).unwrap();
            assert!((hit.point.norm() - radius).abs() < 1e-9);
            assert!(hit.t > 0.0);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, 1.0).is_none());
    }

    #[test]
    fn test_sphere_tangent_is_hit() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_sphere(&ray, 1.0).unwrap();
        assert!((hit.point - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_primary_ray_is_unit() {
        let r = renderer(Illumination::Sun, "@", ".");
        for (x, y) in [(0, 0), (39, 15), (20, 8), (5, 12)] {
            let ray = r.primary_ray(x, y);
            assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
            assert_eq!(ray.origin, r.camera().position);
        }
    }

    #[test]
    fn test_corners_miss_centre_hits() {
        let r = renderer(Illumination::Sun, "@", ".");
        assert!(r.shade_cell(0, 0, 0.0).is_none());
        assert!(r.shade_cell(39, 15, 0.0).is_none());
        assert!(r.shade_cell(20, 8, 0.0).is_some());
    }

    #[test]
    fn test_uniform_daylight_uses_day_rank() {
        // columns differ in rank so every texel is checked against the day side
        let r = renderer(Illumination::Uniform(1.0), "wiog\nOLXH", " .:;\n',wi");
        let palette = Palette::default();
        let day_chars: Vec<char> = "wiogOLXH".chars().collect();
        let canvas = r.render(0.7);
        assert!(canvas.filled() > 0);
        for y in 0..canvas.rows() {
            for &c in canvas.row(y) {
                if c != ' ' {
                    assert!(day_chars.contains(&c), "unexpected {c:?}");
                    assert!(palette.rank(c).unwrap() >= 6);
                }
            }
        }
    }

    #[test]
    fn test_sunlit_side_faces_sun() {
        let r = renderer(Illumination::Sun, "@@\n@@", "..\n..");
        let canvas = r.render(0.0);
        let row = canvas.row(8);
        let hits: Vec<char> = row.iter().copied().filter(|&c| c != ' ').collect();
        assert!(hits.len() > 2);
        // screen left is world +y, where the sun is
        assert_eq!(hits.first(), Some(&'@'));
        assert_eq!(hits.last(), Some(&'.'));
    }

    #[test]
    fn test_render_into_reuses_canvas() {
        let r = renderer(Illumination::Sun, "@", ".");
        let mut canvas = Canvas::new(3, 3, ' ');
        r.render_into(&mut canvas, 0.0);
        assert_eq!(canvas.columns(), 40);
        assert_eq!(canvas.rows(), 16);
        let first = canvas.clone();
        r.render_into(&mut canvas, 0.0);
        assert_eq!(canvas, first);
        assert_eq!(r.render(0.0), first);
    }

    #[test]
    fn test_degenerate_viewport_renders_empty() {
        let mut viewport = Viewport::from_cells(40, 16);
        viewport.cell_width = 0;
        viewport.cell_height = 0;
        let r = Renderer::new(
            viewport,
            Camera::default(),
            Planet::default(),
            textures("@", "."),
        );
        let canvas = r.render(0.0);
        assert_eq!(canvas.columns(), 0);
        assert_eq!(canvas.rows(), 0);
        assert_eq!(canvas.to_frame(), "");
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = renderer(Illumination::Sun, "@:o\n.wX", "...\n :;");
        assert_eq!(r.render(1.25), r.render(1.25));
    }
}
