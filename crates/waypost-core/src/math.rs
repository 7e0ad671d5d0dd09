// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// A world-space position, in the host engine's block coordinates.
///
/// Double precision because game worlds are large and hologram anchors are
/// persisted verbatim; this is an anchor type, not a render-math library.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the same position with `y` replaced.
    pub const fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    /// The anchor of line `index` in a stack of floating text lines.
    ///
    /// Lines stack downward from the anchor: line `i` sits at
    /// `y - i * spacing`.
    pub fn line_anchor(self, index: usize, spacing: f64) -> Self {
        self.with_y(self.y - index as f64 * spacing)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_anchor_stacks_downward() {
        let anchor = Vec3::new(4.0, 10.0, -3.0);
        let line2 = anchor.line_anchor(2, 0.25);
        assert_eq!(line2, Vec3::new(4.0, 9.5, -3.0));
    }

    #[test]
    fn line_zero_is_the_anchor_itself() {
        let anchor = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(anchor.line_anchor(0, 0.25), anchor);
    }
}
