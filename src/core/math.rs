// Math utilities and pixel/meter unit conversions

use glam::Vec2;

/// Viewport width in meters. The height follows the screen ratio.
pub const VIEWPORT_WIDTH: f32 = 4.0;

/// Meters per pixel-unit. A football is 22cm across and its sprite is 200px wide.
pub const PIXEL_TO_METER: f32 = 0.22 / 200.0;

/// Convert a length in pixel-units to meters
pub fn to_meters(pixels: f32) -> f32 {
    pixels * PIXEL_TO_METER
}

/// Convert a length in meters to pixel-units
pub fn to_pixels(meters: f32) -> f32 {
    meters / PIXEL_TO_METER
}

/// Convert a point in pixel-units to meters
pub fn pixels_to_meters(pixels: Vec2) -> Vec2 {
    Vec2::new(to_meters(pixels.x), to_meters(pixels.y))
}

/// Convert a point in meters to pixel-units
pub fn meters_to_pixels(meters: Vec2) -> Vec2 {
    Vec2::new(to_pixels(meters.x), to_pixels(meters.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sprite_width_is_ball_diameter() {
        assert_relative_eq!(to_meters(200.0), 0.22, epsilon = 1e-6);
        assert_relative_eq!(to_pixels(0.22), 200.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pixel_meter_round_trip() {
        for &(x, y) in &[(0.0, 0.0), (400.0, 300.0), (-123.5, 987.25), (3636.36, 2727.27)] {
            let pixels = Vec2::new(x, y);
            let back = meters_to_pixels(pixels_to_meters(pixels));
            assert_relative_eq!(back.x, pixels.x, max_relative = 1e-5);
            assert_relative_eq!(back.y, pixels.y, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_viewport_width_in_pixels() {
        // 4m at 1.1mm per pixel
        assert_relative_eq!(to_pixels(VIEWPORT_WIDTH), 3636.3636, epsilon = 0.01);
    }
}
