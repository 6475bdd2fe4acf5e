//! Floating bubble decoration for page landmarks.

pub const BUBBLE_TARGETS: &str = "header, section, footer";
pub const BUBBLE_VARIANTS: [&str; 4] =
    ["bubbles-soft", "bubbles-glass", "bubbles-spot", "bubbles-ghost"];
pub const MIN_BUBBLES: usize = 3;
pub const MAX_BUBBLES: usize = 12;
pub const RESIZE_DEBOUNCE_MS: u32 = 250;

const FALLBACK_HEIGHT: f64 = 600.0;
const PIXELS_PER_BUBBLE: f64 = 160.0;

pub fn bubble_count(height: f64) -> usize {
    let height = if height.is_finite() && height > 0.0 {
        height
    } else {
        FALLBACK_HEIGHT
    };

    let estimate = (height / PIXELS_PER_BUBBLE).round();
    (estimate.min(MAX_BUBBLES as f64) as usize).clamp(MIN_BUBBLES, MAX_BUBBLES)
}

pub fn container_class(index: usize) -> String {
    format!("bubbles {}", BUBBLE_VARIANTS[index % BUBBLE_VARIANTS.len()])
}

/// Randomized presentation of a single bubble. Every field is already
/// formatted as the CSS value it is written as.
#[derive(Clone, Debug, PartialEq)]
pub struct BubbleStyle {
    pub size: String,
    pub left: String,
    pub bottom: String,
    pub duration: String,
    pub drift: String,
    pub opacity: String,
    pub blur: String,
    pub scale: String,
    pub delay: String,
}

impl BubbleStyle {
    /// `random` yields uniform samples in `[0, 1)`.
    pub fn generate(random: &mut impl FnMut() -> f64) -> Self {
        let mut between = |min: f64, max: f64| random() * (max - min) + min;

        let size = between(14.0, 80.0).round();
        // `+ 0.0` turns a rounded `-0.0` into `0.0`, which prints without a sign.
        let left = between(-8.0, 108.0).round() + 0.0;
        let bottom = between(-30.0, 20.0).round() + 0.0;
        let duration = between(10.0, 36.0);
        let drift = between(-80.0, 80.0).round() + 0.0;
        let opacity = between(0.02, 0.12);
        let blur = between(2.0, 10.0);
        let scale = between(0.6, 1.2);
        let delay = between(-20.0, 0.0);

        Self {
            size: format!("{size}px"),
            left: format!("{left}%"),
            bottom: format!("{bottom}%"),
            duration: format!("{duration:.1}s"),
            drift: format!("{drift}px"),
            opacity: format!("{opacity:.3}"),
            blur: format!("{blur:.1}px"),
            scale: format!("{scale:.2}"),
            delay: format!("{delay:.2}s"),
        }
    }

    /// Style properties in the order they are applied.
    pub fn properties(&self) -> [(&'static str, &str); 10] {
        [
            ("width", self.size.as_str()),
            ("height", self.size.as_str()),
            ("left", self.left.as_str()),
            ("bottom", self.bottom.as_str()),
            ("--b-dur", self.duration.as_str()),
            ("--b-drift", self.drift.as_str()),
            ("--b-opa", self.opacity.as_str()),
            ("--b-blur", self.blur.as_str()),
            ("--b-scale", self.scale.as_str()),
            ("animation-delay", self.delay.as_str()),
        ]
    }
}
