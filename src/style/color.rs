use crate::error::{AlgomotionError, AlgomotionResult};

// Float comparisons on normalized channels tolerate rounding introduced by
// the different literal notations (percent vs. integer vs. hex).
const CHANNEL_EPSILON: f64 = 5e-6;

/// An RGBA color normalized to the unit interval per channel.
///
/// Accepted literal notations: CSS3 color keywords, `#rgb`/`#rgba`/
/// `#rrggbb`/`#rrggbbaa` hex, and `rgb()`/`rgba()` with either integer
/// (0-255) or percentage channel parts and an optional float-or-percent
/// alpha. Whitespace padding is tolerated everywhere the CSS grammar
/// tolerates it.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    rgba: [f64; 4],
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { rgba: [r, g, b, a] }
    }

    /// Parses a color literal in any recognized notation.
    pub fn parse(literal: &str) -> AlgomotionResult<Self> {
        let trimmed = literal.trim();

        if let Some(rgba) = keyword_rgba(trimmed) {
            return Ok(Self { rgba });
        }
        if let Some(rgba) = parse_hex(trimmed) {
            return Ok(Self { rgba });
        }
        if let Some(rgba) = parse_rgb_fn(trimmed) {
            return Ok(Self { rgba });
        }

        Err(AlgomotionError::invalid_style(format!(
            "'{literal}' is not a recognized color"
        )))
    }

    /// Whether the literal would parse as a color. Used by identity-guessing.
    pub fn is_color(literal: &str) -> bool {
        Self::parse(literal).is_ok()
    }

    pub fn rgba(&self) -> [f64; 4] {
        self.rgba
    }

    /// Lowercase `#rrggbbaa` form used by the frame output contract.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.rgba;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            channel_u8(r),
            channel_u8(g),
            channel_u8(b),
            channel_u8(a)
        )
    }

    /// Linear interpolation in RGBA space, `t` clamped to [0, 1].
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut rgba = [0.0; 4];
        for (i, slot) in rgba.iter_mut().enumerate() {
            *slot = a.rgba[i] + (b.rgba[i] - a.rgba[i]) * t;
        }
        Self { rgba }
    }
}

fn channel_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgba
            .iter()
            .zip(other.rgba.iter())
            .all(|(x, y)| (x - y).abs() <= CHANNEL_EPSILON)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn keyword_rgba(name: &str) -> Option<[f64; 4]> {
    let [r, g, b] = CSS3_KEYWORDS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, rgb)| *rgb)?;
    Some([
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        1.0,
    ])
}

fn parse_hex(literal: &str) -> Option<[f64; 4]> {
    let digits = literal.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    // Short forms duplicate each digit; three-channel forms get opaque alpha.
    let long: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };
    let long = if long.len() == 6 {
        format!("{long}ff")
    } else {
        long
    };

    let mut rgba = [0.0; 4];
    for (i, slot) in rgba.iter_mut().enumerate() {
        let part = u8::from_str_radix(&long[i * 2..i * 2 + 2], 16).ok()?;
        *slot = f64::from(part) / 255.0;
    }
    Some(rgba)
}

fn parse_rgb_fn(literal: &str) -> Option<[f64; 4]> {
    let body = literal
        .strip_prefix("rgba")
        .or_else(|| literal.strip_prefix("rgb"))?;
    let body = body.trim().strip_prefix('(')?.strip_suffix(')')?;

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channels = &parts[..3];
    let all_percent = channels.iter().all(|p| p.ends_with('%'));
    let all_int = channels.iter().all(|p| p.parse::<u16>().is_ok());
    if !all_percent && !all_int {
        return None; // Integer and percentage channels must not be mixed.
    }

    let mut rgba = [0.0, 0.0, 0.0, 1.0];
    for (slot, part) in rgba.iter_mut().zip(channels) {
        *slot = if all_percent {
            parse_percent(part)?
        } else {
            let v: u16 = part.parse().ok()?;
            if v > 255 {
                return None;
            }
            f64::from(v) / 255.0
        };
    }

    if let Some(alpha) = parts.get(3) {
        rgba[3] = if alpha.ends_with('%') {
            parse_percent(alpha)?
        } else {
            let a: f64 = alpha.parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            a
        };
    }

    Some(rgba)
}

fn parse_percent(part: &str) -> Option<f64> {
    let v: f64 = part.strip_suffix('%')?.trim().parse().ok()?;
    if !(0.0..=100.0).contains(&v) {
        return None;
    }
    Some(v / 100.0)
}

/// CSS Color Module Level 3 extended keywords.
static CSS3_KEYWORDS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];
