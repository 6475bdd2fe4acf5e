pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const MAX_TILT_DEG: f64 = 7.0;
pub const MAX_SHAPE_TRANSLATE_PX: f64 = 12.0;
pub const PARALLAX_RESIZE_DEBOUNCE_MS: u32 = 120;
pub const PARALLAX_SELECTOR: &str = ".geometric-shapes .shape, .orb-tray .orb";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionPreference {
    Full,
    Reduced,
}

impl MotionPreference {
    pub fn from_reduce_match(matches: bool) -> Self {
        if matches {
            Self::Reduced
        } else {
            Self::Full
        }
    }

    pub fn allows_motion(self) -> bool {
        matches!(self, Self::Full)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let reduced = web_sys::window()
            .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
            .map(|mq| mq.matches())
            .unwrap_or(false);

        Self::from_reduce_match(reduced)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Pointer position relative to the center of a box, each axis in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub fn from_pointer(client_x: f64, client_y: f64, rect: Rect) -> Self {
        fn axis(client: f64, start: f64, extent: f64) -> f64 {
            let half = extent / 2.0;
            if half.is_nan() || half <= 0.0 {
                return 0.0;
            }
            ((client - (start + half)) / half).clamp(-1.0, 1.0)
        }

        Self {
            x: axis(client_x, rect.left, rect.width),
            y: axis(client_y, rect.top, rect.height),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TiltFrame {
    pub image: String,
    pub shapes: Vec<String>,
}

impl TiltFrame {
    pub fn at(offset: PointerOffset, shape_count: usize) -> Self {
        let rotate_y = -offset.x * MAX_TILT_DEG;
        let rotate_x = offset.y * MAX_TILT_DEG;
        let translate_x = offset.x * MAX_SHAPE_TRANSLATE_PX * 0.6;
        let translate_y = offset.y * MAX_SHAPE_TRANSLATE_PX * 0.6;

        let shapes = (0..shape_count)
            .map(|index| {
                let depth = (index % 3) as f64 * 0.45 + 0.6;
                translate3d(-translate_x * depth, -translate_y * depth)
            })
            .collect();

        Self {
            image: format!("rotateX({rotate_x:.2}deg) rotateY({rotate_y:.2}deg) translateZ(6px)"),
            shapes,
        }
    }

    pub fn neutral(shape_count: usize) -> Self {
        Self {
            image: String::new(),
            shapes: vec![String::new(); shape_count],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParallaxLayer {
    Shape,
    Orb,
}

impl ParallaxLayer {
    fn range(self) -> f64 {
        match self {
            Self::Shape => 28.0,
            Self::Orb => 18.0,
        }
    }

    fn damping(self) -> f64 {
        match self {
            Self::Shape => 1.0,
            Self::Orb => 0.7,
        }
    }

    fn sway(self) -> f64 {
        match self {
            Self::Shape => 1.0,
            Self::Orb => 0.2,
        }
    }
}

/// Horizontal sway and vertical offset for the `index`-th parallax element.
pub fn parallax_offset(
    layer: ParallaxLayer,
    index: usize,
    rect: Rect,
    viewport_height: f64,
    now_ms: f64,
) -> (f64, f64) {
    let half_viewport = viewport_height / 2.0;
    let distance = if half_viewport > 0.0 {
        (rect.top + rect.height / 2.0 - half_viewport) / half_viewport
    } else {
        0.0
    };

    let ty = -distance * layer.range() * layer.damping();
    let tx = ((index as f64 + 1.0) * 0.7 + now_ms / 6_000.0).sin() * 6.0 * layer.sway();
    (tx, ty)
}

pub fn translate3d(x: f64, y: f64) -> String {
    format!("translate3d({x:.2}px, {y:.2}px, 0)")
}
