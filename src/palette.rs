use crate::style::color::Color;

// Default discrete palette parameters: evenly spaced hues at fixed
// lightness/saturation, offset slightly so the first color is not pure red.
const HUE_OFFSET: f64 = 0.01;
const LIGHTNESS: f64 = 0.6;
const SATURATION: f64 = 0.65;

/// Generates `n` visually distinct colors by walking the hue circle.
pub fn discrete(n: usize) -> Vec<Color> {
    (0..n)
        .map(|i| {
            let hue = (i as f64 / n.max(1) as f64 + HUE_OFFSET) % 1.0;
            hsl_to_color(hue, LIGHTNESS, SATURATION)
        })
        .collect()
}

/// ColorBrewer "Spectral" anchors, low to high.
static SPECTRAL_ANCHORS: &[[u8; 3]] = &[
    [158, 1, 66],
    [213, 62, 79],
    [244, 109, 67],
    [253, 174, 97],
    [254, 224, 139],
    [255, 255, 191],
    [230, 245, 152],
    [171, 221, 164],
    [102, 194, 165],
    [50, 136, 189],
    [94, 79, 162],
];

/// Resolves a point of the continuous spectral palette. `t` outside [0, 1]
/// is clamped.
pub fn spectral(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let segments = SPECTRAL_ANCHORS.len() - 1;
    let scaled = t * segments as f64;
    let index = (scaled.floor() as usize).min(segments - 1);
    let local = scaled - index as f64;

    let a = anchor_color(SPECTRAL_ANCHORS[index]);
    let b = anchor_color(SPECTRAL_ANCHORS[index + 1]);
    Color::lerp(&a, &b, local)
}

fn anchor_color([r, g, b]: [u8; 3]) -> Color {
    Color::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        1.0,
    )
}

// HSL with h, l, s in [0, 1].
fn hsl_to_color(h: f64, l: f64, s: f64) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h * 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Color::new(r + m, g + m, b + m, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_sizes_and_distinctness() {
        assert!(discrete(0).is_empty());
        assert_eq!(discrete(1).len(), 1);

        let p = discrete(8);
        assert_eq!(p.len(), 8);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j], "palette entries {i} and {j} collide");
            }
        }
    }

    #[test]
    fn discrete_is_deterministic() {
        assert_eq!(discrete(5), discrete(5));
    }

    #[test]
    fn spectral_endpoints_match_anchors() {
        assert_eq!(spectral(0.0), anchor_color([158, 1, 66]));
        assert_eq!(spectral(1.0), anchor_color([94, 79, 162]));
        // Out-of-range points clamp instead of failing.
        assert_eq!(spectral(-3.0), spectral(0.0));
        assert_eq!(spectral(42.0), spectral(1.0));
    }

    #[test]
    fn spectral_midpoint_is_neutral() {
        assert_eq!(spectral(0.5), anchor_color([255, 255, 191]));
    }
}
