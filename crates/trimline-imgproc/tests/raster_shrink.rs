use trimline_image::{Image, ImageError};
use trimline_imgproc::alpha::{count_opaque, shrink_alpha, ALPHA_CHANNEL};

/// A soft edged blob: alpha falls off linearly with the distance to the center.
fn soft_blob(side: usize) -> Result<Image<u8, 4>, ImageError> {
    let c = side as f64 / 2.0;
    let mut img = Image::<u8, 4>::from_size_val([side, side].into(), 0)?;
    for y in 0..side {
        for x in 0..side {
            let d = (x as f64 - c).hypot(y as f64 * 1.3 - c);
            let a = (255.0 - 6.0 * d).clamp(0.0, 255.0) as u8;
            img.set_pixel(x, y, 1, 100)?;
            img.set_pixel(x, y, ALPHA_CHANNEL, a)?;
        }
    }
    Ok(img)
}

#[test]
fn raster_shrink_is_monotonic() -> Result<(), ImageError> {
    let img = soft_blob(80)?;

    let counts = (0..8)
        .map(|d| shrink_alpha(&img, d).map(|s| count_opaque(&s, 0)))
        .collect::<Result<Vec<_>, _>>()?;

    for pair in counts.windows(2) {
        assert!(pair[1] <= pair[0], "{counts:?}");
    }
    assert!(counts[7] < counts[0]);
    Ok(())
}

#[test]
fn raster_shrink_is_pointwise_below_the_input() -> Result<(), ImageError> {
    let img = soft_blob(40)?;
    let shrunk = shrink_alpha(&img, 2)?;

    for (a, b) in img.as_slice().chunks_exact(4).zip(shrunk.as_slice().chunks_exact(4)) {
        assert!(b[ALPHA_CHANNEL] <= a[ALPHA_CHANNEL]);
        assert_eq!(a[..3], b[..3]);
    }
    Ok(())
}
