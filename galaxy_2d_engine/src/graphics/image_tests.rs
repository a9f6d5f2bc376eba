use super::*;
use crate::error::Error;

#[test]
fn test_new_fills_color() {
    let image = Image::new(3, 2, Color::RED);
    assert_eq!(image.size(), UVec2::new(3, 2));
    assert_eq!(image.pixels().len(), 24);
    assert_eq!(image.pixel(2, 1), Some(Color::RED));
}

#[test]
fn test_from_pixels_checks_length() {
    let result = Image::from_pixels(2, 2, vec![0; 15]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(Image::from_pixels(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn test_pixel_out_of_bounds() {
    let mut image = Image::new(2, 2, Color::BLACK);
    assert_eq!(image.pixel(2, 0), None);
    image.set_pixel(5, 5, Color::WHITE);
    assert!(image.pixels().iter().all(|&b| b == 0 || b == 255));
}

#[test]
fn test_flip_vertically_odd_height() {
    let mut image = Image::new(1, 3, Color::BLACK);
    image.set_pixel(0, 0, Color::RED);
    image.set_pixel(0, 1, Color::GREEN);
    image.set_pixel(0, 2, Color::BLUE);
    image.flip_vertically();
    assert_eq!(image.pixel(0, 0), Some(Color::BLUE));
    assert_eq!(image.pixel(0, 1), Some(Color::GREEN));
    assert_eq!(image.pixel(0, 2), Some(Color::RED));
}
