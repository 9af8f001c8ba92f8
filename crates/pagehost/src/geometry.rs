#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// CSS horizontal translation, e.g. `translateX(-400px)`.
pub fn translate_x(offset: f64) -> String {
    // adding zero folds -0.0 into 0.0
    format!("translateX({}px)", offset + 0.0)
}
