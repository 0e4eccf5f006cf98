use serde::{Deserialize, Serialize};

pub type Rgba = [f32; 4];

const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub visible: bool,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f32,
    /// Dash length in pixels; `None` draws solid strokes.
    pub dash: Option<f32>,
}

impl LayerStyle {
    pub const fn new(
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        dash: Option<f32>,
    ) -> Self {
        Self {
            visible: true,
            fill,
            stroke,
            stroke_width,
            dash,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::new(None, Some([1.0, 1.0, 1.0, 1.0]), 1.0, None)
    }
}

/// Per-layer styles plus the two highlight colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbology {
    pub background: Rgba,
    pub graticule: LayerStyle,
    pub countries: LayerStyle,
    pub lakes: LayerStyle,
    pub rivers: LayerStyle,
    pub guide_lines: LayerStyle,
    pub markers: LayerStyle,
    pub highlight_rings: LayerStyle,
    pub correct: Rgba,
    pub incorrect: Rgba,
}

impl Default for Symbology {
    fn default() -> Self {
        Self {
            background: rgb(0x000000),
            graticule: LayerStyle::new(None, Some(rgb(0x333333)), 1.0, Some(2.0)),
            countries: LayerStyle::new(Some(rgb(0x99ffff)), Some(rgb(0x000000)), 1.1, None),
            lakes: LayerStyle::new(Some(rgb(0x000000)), None, 0.0, None),
            rivers: LayerStyle::new(None, Some(rgb(0x000000)), 0.8, Some(2.0)),
            guide_lines: LayerStyle::new(None, Some(rgb(0xffffff)), 1.5, Some(4.0)),
            markers: LayerStyle::new(Some(rgb(0xff0000)), None, 0.0, None),
            highlight_rings: LayerStyle::new(None, Some(rgb(0xffffff)), 2.0, None),
            correct: rgb(0x00c853),
            incorrect: rgb(0xd50000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Symbology, rgb};

    #[test]
    fn hex_colours() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let s = Symbology::default();
        assert!(s.countries.fill.is_some());
        assert!(s.rivers.fill.is_none());
    }
}
