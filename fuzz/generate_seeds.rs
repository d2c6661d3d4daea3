#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp(width: i32, height: i32, info_size: u32, pixel_data: &[u8]) -> Vec<u8> {
    let offset = 14 + info_size;
    let mut out = vec![0u8; offset as usize];
    out[0] = b'B'; out[1] = b'M';
    out[2..6].copy_from_slice(&(offset + pixel_data.len() as u32).to_le_bytes()); // file size
    out[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    out[14..18].copy_from_slice(&info_size.to_le_bytes()); // DIB header size
    out[18..22].copy_from_slice(&width.to_le_bytes());
    out[22..26].copy_from_slice(&height.to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&24u16.to_le_bytes()); // bpp
    out[34..38].copy_from_slice(&(pixel_data.len() as u32).to_le_bytes()); // image size
    out.extend_from_slice(pixel_data);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1, 3 bytes + 1 padding
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp(1, 1, 40, &[0x00, 0x00, 0xff, 0x00])).unwrap();

    // 2x2 bottom-up and top-down, 6 bytes + 2 padding per row
    let rows = [0xffu8, 0, 0, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0xff, 0, 0xff, 0, 0, 0];
    fs::write(format!("{dir}/bmp_2x2.bmp"), bmp(2, 2, 40, &rows)).unwrap();
    fs::write(format!("{dir}/bmp_2x2_topdown.bmp"), bmp(2, -2, 40, &rows)).unwrap();

    // 3x1 with a V5 info header
    fs::write(format!("{dir}/bmp_3x1_v5.bmp"), bmp(3, 1, 124, &[0x80; 12])).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut rle = bmp(2, 2, 40, &rows);
    rle[30] = 1; // BI_RLE8
    fs::write(format!("{dir}/bmp_rle8.bin"), rle).unwrap();
    let full = bmp(2, 2, 40, &rows);
    fs::write(format!("{dir}/bmp_truncated.bin"), &full[..full.len() - 5]).unwrap();

    println!("Generated seed corpus in {dir}/");
}
