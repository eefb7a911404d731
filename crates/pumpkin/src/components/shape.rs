use glam::{Affine2, Vec2, Vec4};

use crate::components::visual::Visual;
use crate::extensions::tweenable::{AlphaTweenable, ColorTweenable};
use crate::renderer::traits::Primitive;
use crate::renderer::vertex::{pack_color, ColoredVertex};

/// Visual made of flat-colored triangles in node-local space.
#[derive(Debug, Clone)]
pub struct Shape {
    needs_redraw: bool,
    hidden: bool,
    color: Vec4,
    alpha: f32,
    vertices: Vec<Vec2>,
    primitive: Primitive,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            needs_redraw: true,
            hidden: false,
            color: Vec4::ONE,
            alpha: 1.0,
            vertices: Vec::new(),
            primitive: Primitive::Triangles,
        }
    }
}

impl Shape {
    /// Shape from raw triangle geometry.
    pub fn new(vertices: Vec<Vec2>, primitive: Primitive) -> Self {
        Self {
            vertices,
            primitive,
            ..Self::default()
        }
    }

    /// Rectangle centered on the node, as a 4-vertex triangle strip.
    pub fn rectangle(size: Vec2) -> Self {
        let h = size * 0.5;
        Self::new(
            vec![
                Vec2::new(-h.x, -h.y),
                Vec2::new(h.x, -h.y),
                Vec2::new(-h.x, h.y),
                Vec2::new(h.x, h.y),
            ],
            Primitive::TriangleStrip,
        )
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.needs_redraw = true;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.needs_redraw = true;
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vec2>, primitive: Primitive) {
        self.vertices = vertices;
        self.primitive = primitive;
        self.needs_redraw = true;
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Vertices in world space, ready for the colored draw path.
    /// Empty when hidden.
    pub fn world_vertices(&self, world: &Affine2) -> Vec<ColoredVertex> {
        if self.hidden {
            return Vec::new();
        }
        let color = pack_color(self.color, self.alpha);
        self.vertices
            .iter()
            .map(|&v| ColoredVertex::new(world.transform_point2(v), color))
            .collect()
    }
}

impl Visual for Shape {
    fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn set_needs_redraw(&mut self, needs_redraw: bool) {
        self.needs_redraw = needs_redraw;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.needs_redraw = true;
    }

    fn content_size(&self) -> Vec2 {
        let Some(&first) = self.vertices.first() else {
            return Vec2::ZERO;
        };
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        max - min
    }

    fn bounding_box(&self, world: &Affine2) -> Vec4 {
        if self.vertices.is_empty() {
            let origin = world.translation;
            return Vec4::new(origin.x, origin.y, origin.x, origin.y);
        }
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for &v in &self.vertices {
            let p = world.transform_point2(v);
            min = min.min(p);
            max = max.max(p);
        }
        Vec4::new(min.x, min.y, max.x, max.y)
    }
}

impl ColorTweenable for Shape {
    fn color(&self) -> Vec4 {
        self.color
    }

    fn set_color(&mut self, color: Vec4) {
        Shape::set_color(self, color);
    }
}

impl AlphaTweenable for Shape {
    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        Shape::set_alpha(self, alpha);
    }
}
