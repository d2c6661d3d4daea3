/// One 24-bit pixel in logical red, green, blue order.
pub type Pixel = rgb::RGB8;

/// Pack a pixel as `0xRRGGBB00`.
pub fn to_rgbx_u32(p: Pixel) -> u32 {
    u32::from_be_bytes([p.r, p.g, p.b, 0])
}

/// Inverse of [`to_rgbx_u32`]; the low byte is ignored.
pub fn from_rgbx_u32(v: u32) -> Pixel {
    let [r, g, b, _] = v.to_be_bytes();
    Pixel::new(r, g, b)
}

/// Pack every pixel with [`to_rgbx_u32`].
pub fn pixels_to_u32(pixels: &[Pixel]) -> Vec<u32> {
    pixels.iter().copied().map(to_rgbx_u32).collect()
}

/// Unpack every value with [`from_rgbx_u32`].
pub fn pixels_from_u32(values: &[u32]) -> Vec<Pixel> {
    values.iter().copied().map(from_rgbx_u32).collect()
}
