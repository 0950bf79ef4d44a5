// ECS components and resources shared by the walker population and the demo.

use bevy_ecs::prelude::*;

/// RGB color the renderer tints a walker's prop with.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WalkerTint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl WalkerTint {
    /// Deterministic palette entry for the `index`-th walker: hues step by the
    /// golden angle so neighbours in spawn order stay distinguishable.
    pub fn from_index(index: usize) -> Self {
        let hue = (index as f32 * 137.507_77).rem_euclid(360.0);
        let (r, g, b) = hsv_to_rgb(hue, 0.65, 0.95);
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (f32, f32, f32) {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = value - c;
    let (r, g, b) = match hue as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

/// Outcome counts for the most recent population tick.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub moved: usize,
    pub crossed: usize,
    pub bounced: usize,
}

impl TickStats {
    pub fn total(&self) -> usize {
        self.moved + self.crossed + self.bounced
    }

    pub fn accumulate(&mut self, other: TickStats) {
        self.moved += other.moved;
        self.crossed += other.crossed;
        self.bounced += other.bounced;
    }
}
