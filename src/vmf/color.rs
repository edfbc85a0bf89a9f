/// Editor display colour of a solid or group, written as `"r g b"`
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Visible ramp brushes
    pub const VISUAL: Color = Color::new(220, 220, 220);
    /// Player clip brushes
    pub const CLIP: Color = Color::new(220, 30, 220);
    pub const GROUP: Color = Color::new(192, 192, 0);
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}
