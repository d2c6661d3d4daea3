#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new()
        .with_limits(&limits)
        .decode(data, enough::Unstoppable)
    else {
        return;
    };
    let (width, height) = (decoded.width(), decoded.height());
    let Ok(pixels) = decoded.into_pixels() else {
        return;
    };

    let reencoded = BitmapImage::create(width, height, pixels.clone())
        .and_then(|image| image.to_bytes())
        .expect("decoded image failed to re-encode");
    let Ok(decoded2) = BitmapImage::from_bytes(&reencoded) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded2.width(), width);
    assert_eq!(decoded2.height(), height);
    assert_eq!(decoded2.into_pixels().unwrap(), pixels, "roundtrip pixel mismatch");
});
