#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::{DecodeRequest, Limits};

fuzz_target!(|data: &[u8]| {
    // Header inspection and full decode must never panic
    let _ = zenbmp::probe(data);

    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let request = DecodeRequest::new().with_limits(&limits);
    if let Ok(mut image) = request.decode(data, enough::Unstoppable) {
        let _ = image.decode_pixels();
        let _ = image.get_pixel(0, 0);
    }

    let _ = request.read_from(std::io::Cursor::new(data), enough::Unstoppable);
});
