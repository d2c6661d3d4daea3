use std::path::PathBuf;

use zenbmp::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("zenbmp-{}-{name}.bmp", std::process::id()))
}

#[test]
fn bmp_roundtrip_rgb8() {
    let w = 3;
    let h = 2;
    let pixels = vec![
        Pixel::new(255, 0, 0),
        Pixel::new(0, 255, 0),
        Pixel::new(0, 0, 255), // row 0: R G B
        Pixel::new(128, 128, 128),
        Pixel::new(64, 64, 64),
        Pixel::new(0, 0, 0), // row 1: gray dark black
    ];

    let encoded = BitmapImage::create(w, h, pixels.clone())
        .unwrap()
        .to_bytes()
        .unwrap();
    assert_eq!(&encoded[0..2], b"BM");
    assert_eq!(encoded.len(), 54 + 12 * 2);

    let mut decoded = BitmapImage::from_bytes(&encoded).unwrap();
    assert_eq!(decoded.width(), w);
    assert_eq!(decoded.height(), h);
    assert_eq!(decoded.decode_pixels().unwrap(), &pixels[..]);
}

#[test]
fn create_5x3_red_layout() {
    let image = BitmapImage::create(5, 3, vec![Pixel::new(255, 0, 0); 15]).unwrap();
    assert_eq!(image.stride(), 16);
    assert_eq!(image.pixel_data_size(), 48);

    let encoded = image.to_bytes().unwrap();
    for row in encoded[54..].chunks_exact(16) {
        assert_eq!(&row[..15], &[0x00u8, 0x00, 0xff].repeat(5)[..]);
        assert_eq!(row[15], 0x00);
    }
}

#[test]
fn file_roundtrip_white_2x2() {
    let path = temp_path("white");
    let white = Pixel::new(255, 255, 255);
    BitmapImage::create(2, 2, vec![white; 4])
        .unwrap()
        .write(&path)
        .unwrap();

    let mut image = BitmapImage::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.bit_depth(), 24);
    assert_eq!(image.compression(), Compression::Rgb);
    assert_eq!(image.compression().to_u32(), 0);
    assert_eq!(image.decode_pixels().unwrap(), &[white; 4][..]);
}

#[test]
fn written_file_matches_to_bytes() {
    let path = temp_path("bytes");
    let pixels: Vec<Pixel> = (0..35u8).map(|i| Pixel::new(i, 100 + i, 200 - i)).collect();
    let image = BitmapImage::create(7, 5, pixels).unwrap();
    image.write(&path).unwrap();
    let on_disk = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(on_disk, image.to_bytes().unwrap());
    assert_eq!(on_disk.len(), image.file_size());
    assert_eq!(
        u32::from_le_bytes(on_disk[2..6].try_into().unwrap()) as usize,
        on_disk.len()
    );
}

#[test]
fn write_overwrites_existing_file() {
    let path = temp_path("overwrite");
    std::fs::write(&path, vec![0xaa; 4096]).unwrap();
    let image = BitmapImage::create(1, 1, vec![Pixel::new(1, 2, 3)]).unwrap();
    image.write(&path).unwrap();
    let back = BitmapImage::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back.get_pixel(0, 0), Some(Pixel::new(1, 2, 3)));
    assert_eq!(back.file_size(), 58);
}

#[test]
fn missing_file_reports_path() {
    let path = temp_path("does-not-exist");
    match BitmapImage::read(&path) {
        Err(BitmapError::File { path: p, source }) => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected File error, got {other:?}"),
    }
}

#[test]
fn non_bitmap_file_is_format_error() {
    let path = temp_path("text");
    std::fs::write(&path, b"this is a plain text file, not an image at all....").unwrap();
    let result = BitmapImage::read(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(BitmapError::Format(_))));
}

#[test]
fn non_bm_signature_always_format_error() {
    let mut valid = BitmapImage::create(2, 2, vec![Pixel::default(); 4])
        .unwrap()
        .to_bytes()
        .unwrap();
    for sig in [*b"MB", *b"BA", *b"\0\0", *b"bm"] {
        valid[0..2].copy_from_slice(&sig);
        assert!(matches!(
            BitmapImage::from_bytes(&valid),
            Err(BitmapError::Format(_))
        ));
    }
}

#[test]
fn rle_compression_is_unsupported() {
    let mut data = BitmapImage::create(2, 2, vec![Pixel::default(); 4])
        .unwrap()
        .to_bytes()
        .unwrap();
    data[30..34].copy_from_slice(&1u32.to_le_bytes());
    match BitmapImage::from_bytes(&data) {
        Err(BitmapError::Unsupported(Unsupported::Compression(c))) => {
            assert_eq!(c, Compression::Rle8);
        }
        other => panic!("expected unsupported compression, got {other:?}"),
    }
}

#[test]
fn zero_size_create_fails() {
    assert!(matches!(
        BitmapImage::create(0, 4, Vec::new()),
        Err(BitmapError::Size {
            width: 0,
            height: 4
        })
    ));
    assert!(matches!(
        BitmapImage::create(4, 0, Vec::new()),
        Err(BitmapError::Size {
            width: 4,
            height: 0
        })
    ));
}

#[test]
fn limits_reject_large() {
    let encoded = BitmapImage::create(2, 1, vec![Pixel::default(); 2])
        .unwrap()
        .to_bytes()
        .unwrap();

    let limits = Limits {
        max_pixels: Some(1), // only 1 pixel allowed
        ..Default::default()
    };

    let result = DecodeRequest::new()
        .with_limits(&limits)
        .decode(&encoded, Unstoppable);
    match result.unwrap_err() {
        BitmapError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn probe_reports_raw_fields() {
    let encoded = BitmapImage::create(3, 4, vec![Pixel::default(); 12])
        .unwrap()
        .to_bytes()
        .unwrap();
    let header = probe(&encoded).unwrap();
    assert_eq!(header.width, 3);
    assert_eq!(header.height, 4);
    assert_eq!(header.bit_depth, 24);
    assert_eq!(header.planes, 1);
    assert_eq!(header.info_size, 40);
    assert_eq!(header.data_offset, 54);
    assert_eq!(header.image_size, 48);
    assert_eq!(header.file_size, 102);
    assert_eq!(header.compression, Compression::Rgb);
}

#[test]
fn packed_u32_helpers_roundtrip_through_file() {
    let values: Vec<u32> = (0..6u32).map(|i| (i * 0x0102_0300) & 0xffff_ff00).collect();
    let image = BitmapImage::create(3, 2, pixels_from_u32(&values)).unwrap();
    let bytes = image.to_bytes().unwrap();
    let back = BitmapImage::from_bytes(&bytes).unwrap().into_pixels().unwrap();
    assert_eq!(pixels_to_u32(&back), values);
}

#[test]
fn header_only_file_claiming_huge_image_is_short_read() {
    let path = temp_path("huge-claim");
    let mut header = BitmapImage::create(1, 1, vec![Pixel::default()])
        .unwrap()
        .to_bytes()
        .unwrap();
    header.truncate(54);
    header[2..6].copy_from_slice(&(54u32 + 3_888_000_000).to_le_bytes());
    header[18..22].copy_from_slice(&36000i32.to_le_bytes());
    header[22..26].copy_from_slice(&36000i32.to_le_bytes());
    header[34..38].copy_from_slice(&3_888_000_000u32.to_le_bytes());
    std::fs::write(&path, &header).unwrap();

    let result = BitmapImage::read(&path);
    std::fs::remove_file(&path).unwrap();
    match result {
        Err(BitmapError::File { path: p, source }) => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected File error, got {other:?}"),
    }
}
