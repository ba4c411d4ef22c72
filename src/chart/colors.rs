use egui::Color32;

/// Base RGB per class; indices past the table wrap around.
const CLASS_RGB: [(u8, u8, u8); 3] = [(255, 99, 132), (54, 162, 235), (75, 192, 192)];

const FILL_ALPHA: u8 = 153;

pub const ERROR_FILL: Color32 = Color32::from_rgba_premultiplied(153, 0, 0, 153);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(255, 0, 0);

pub fn class_fill(class: usize) -> Color32 {
    let (r, g, b) = CLASS_RGB[class % CLASS_RGB.len()];
    Color32::from_rgba_unmultiplied(r, g, b, FILL_ALPHA)
}

pub fn class_stroke(class: usize) -> Color32 {
    let (r, g, b) = CLASS_RGB[class % CLASS_RGB.len()];
    Color32::from_rgb(r, g, b)
}
