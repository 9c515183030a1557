//! Website photo preparation: cover-fit resizing, height normalization,
//! scaling, trimming, size variants and tonal enhancement

use crate::io::animation::{Animation, load_animation, write_atomic};
use crate::io::configuration::{VARIANT_JPEG_QUALITY, WEB_VARIANTS};
use crate::io::error::{GaborError, Result, invalid_parameter};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Which part of an over-sized resize survives the crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CropAnchor {
    /// Keep the middle
    #[default]
    Center,
    /// Keep the top edge, centred horizontally
    Top,
    /// Keep the bottom edge, centred horizontally
    Bottom,
    /// Keep the left edge, centred vertically
    Left,
    /// Keep the right edge, centred vertically
    Right,
}

/// Target geometry and encoding of a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Crop anchor applied after scaling
    pub anchor: CropAnchor,
    /// JPEG quality in `1..=100`, ignored for other formats
    pub quality: u8,
}

impl ResizeOptions {
    fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(invalid_parameter("width", &self.width, &"must be positive"));
        }
        if self.height == 0 {
            return Err(invalid_parameter(
                "height",
                &self.height,
                &"must be positive",
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(invalid_parameter(
                "quality",
                &self.quality,
                &"JPEG quality must lie in 1..=100",
            ));
        }
        Ok(())
    }
}

/// Which rows a trim removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TrimMode {
    /// Drop the bottom share, where screenshots carry their caption
    Bottom,
    /// Drop the same share from the top and from the bottom
    Vertical,
}

fn to_dimension(value: u64, parameter: &'static str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&dimension| dimension > 0)
        .ok_or_else(|| {
            invalid_parameter(
                parameter,
                &value,
                &"resulting dimension must lie in 1..=4294967295",
            )
        })
}

/// Scaled size that covers `target` while keeping the source aspect ratio
///
/// # Errors
///
/// Returns an error if the scaled side does not fit in a `u32` or is zero
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> Result<(u32, u32)> {
    let (src_w, src_h) = (u64::from(source.0.max(1)), u64::from(source.1.max(1)));
    let (dst_w, dst_h) = (u64::from(target.0), u64::from(target.1));

    // Compare src_w/src_h against dst_w/dst_h without floating point
    if src_w * dst_h > dst_w * src_h {
        let width = (src_w * dst_h / src_h).max(dst_w);
        Ok((to_dimension(width, "width")?, target.1))
    } else {
        let height = (src_h * dst_w / src_w).max(dst_h);
        Ok((target.0, to_dimension(height, "height")?))
    }
}

/// Size with the given height and the source aspect ratio, width truncated
///
/// # Errors
///
/// Returns an error if `height` is zero or the width leaves the `u32` range
/// or rounds down to zero
pub fn height_fit_dimensions(source: (u32, u32), height: u32) -> Result<(u32, u32)> {
    if height == 0 {
        return Err(invalid_parameter("height", &height, &"must be positive"));
    }
    let width = u64::from(source.0) * u64::from(height) / u64::from(source.1.max(1));
    Ok((to_dimension(width, "width")?, height))
}

/// Both sides multiplied by `factor`, truncated
///
/// # Errors
///
/// Returns an error if `factor` is not a positive finite number or a side
/// leaves `1..=u32::MAX`
pub fn scaled_dimensions(source: (u32, u32), factor: f64) -> Result<(u32, u32)> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(invalid_parameter(
            "scale",
            &factor,
            &"must be a positive finite number",
        ));
    }
    let side = |value: u32, parameter: &'static str| {
        let scaled = (f64::from(value) * factor).floor();
        if (1.0..=f64::from(u32::MAX)).contains(&scaled) {
            Ok(scaled as u32)
        } else {
            Err(invalid_parameter(
                parameter,
                &scaled,
                &"scaled dimension must lie in 1..=4294967295",
            ))
        }
    };
    Ok((side(source.0, "width")?, side(source.1, "height")?))
}

/// First kept row and number of kept rows after a trim
///
/// # Errors
///
/// Returns an error if `fraction` is outside `[0, 1)` for a bottom trim or
/// `[0, 0.5)` for a vertical trim, or nothing would remain
pub fn trim_rows(height: u32, mode: TrimMode, fraction: f64) -> Result<(u32, u32)> {
    let limit = match mode {
        TrimMode::Bottom => 1.0,
        TrimMode::Vertical => 0.5,
    };
    if !fraction.is_finite() || !(0.0..limit).contains(&fraction) {
        return Err(invalid_parameter(
            "fraction",
            &fraction,
            &format!("must lie in [0, {limit})"),
        ));
    }
    let (top, kept) = match mode {
        TrimMode::Bottom => (0, (f64::from(height) * (1.0 - fraction)).floor() as u32),
        TrimMode::Vertical => {
            let trim = (f64::from(height) * fraction).floor() as u32;
            (trim, height.saturating_sub(trim.saturating_mul(2)))
        }
    };
    if kept == 0 {
        return Err(invalid_parameter(
            "fraction",
            &fraction,
            &format!("trimming a {height} px tall image leaves no rows"),
        ));
    }
    Ok((top, kept))
}

/// Top-left corner of the crop window inside a scaled image
pub const fn crop_origin(anchor: CropAnchor, scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let spare_x = scaled.0.saturating_sub(target.0);
    let spare_y = scaled.1.saturating_sub(target.1);
    match anchor {
        CropAnchor::Center => (spare_x / 2, spare_y / 2),
        CropAnchor::Top => (spare_x / 2, 0),
        CropAnchor::Bottom => (spare_x / 2, spare_y),
        CropAnchor::Left => (0, spare_y / 2),
        CropAnchor::Right => (spare_x, spare_y / 2),
    }
}

/// Scale to cover `width`×`height`, then crop to exactly that size
///
/// # Errors
///
/// Returns an error if either target dimension is zero
pub fn resize_cover(
    image: &DynamicImage,
    width: u32,
    height: u32,
    anchor: CropAnchor,
) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(invalid_parameter(
            "dimensions",
            &format!("{width}x{height}"),
            &"target dimensions must be positive",
        ));
    }
    let (scaled_w, scaled_h) = cover_dimensions(image.dimensions(), (width, height))?;
    let scaled = image.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);
    let (x, y) = crop_origin(anchor, (scaled_w, scaled_h), (width, height));
    Ok(scaled.crop_imm(x, y, width, height))
}

/// Resize to `height` rows, keeping the aspect ratio
///
/// # Errors
///
/// Returns an error under the conditions of [`height_fit_dimensions`]
pub fn resize_to_height(image: &DynamicImage, height: u32) -> Result<DynamicImage> {
    let (width, height) = height_fit_dimensions(image.dimensions(), height)?;
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Resize both sides by `factor`
///
/// # Errors
///
/// Returns an error under the conditions of [`scaled_dimensions`]
pub fn scale_image(image: &DynamicImage, factor: f64) -> Result<DynamicImage> {
    let (width, height) = scaled_dimensions(image.dimensions(), factor)?;
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Remove a share of the rows as selected by `mode`
///
/// # Errors
///
/// Returns an error under the conditions of [`trim_rows`]
pub fn trim_image(image: &DynamicImage, mode: TrimMode, fraction: f64) -> Result<DynamicImage> {
    let (top, kept) = trim_rows(image.height(), mode, fraction)?;
    Ok(image.crop_imm(0, top, image.width(), kept))
}

/// Load an image from disk
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| GaborError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

// JPEG has no alpha channel; composite onto white like a web page would
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = rgba.get_pixel_checked(x, y).copied().unwrap_or(Rgba([0; 4]));
        let alpha = f32::from(a) / 255.0;
        let over = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([over(r), over(g), over(b)])
    })
}

/// Encode `image` in the format implied by `path` and write it atomically
///
/// # Errors
///
/// Returns an error if the extension names no supported format, encoding
/// fails, or the file cannot be written
pub fn save_image(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let export_error = |source| GaborError::ImageExport {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    if is_jpeg(path) {
        let rgb = flatten_on_white(image);
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder.encode_image(&rgb).map_err(export_error)?;
    } else {
        let format = ImageFormat::from_path(path).map_err(export_error)?;
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(export_error)?;
    }
    write_atomic(path, &bytes)
}

/// Resize and crop the image at `input` and save it to `output`
///
/// Returns the source dimensions.
///
/// # Errors
///
/// Returns an error if the options are invalid, the input cannot be
/// decoded, or the output cannot be written
#[tracing::instrument(level = "debug", skip(options))]
pub fn resize_file(input: &Path, output: &Path, options: &ResizeOptions) -> Result<(u32, u32)> {
    options.validate()?;
    let source = load_image(input)?;
    let original = source.dimensions();
    let resized = resize_cover(&source, options.width, options.height, options.anchor)?;
    save_image(&resized, output, options.quality)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        from = %format!("{}x{}", original.0, original.1),
        to = %format!("{}x{}", options.width, options.height),
        "image resized"
    );
    Ok(original)
}

// Load, transform and save one still image, returning the new dimensions
fn transform_file(
    input: &Path,
    output: &Path,
    quality: u8,
    transform: impl FnOnce(&DynamicImage) -> Result<DynamicImage>,
) -> Result<(u32, u32)> {
    if !(1..=100).contains(&quality) {
        return Err(invalid_parameter(
            "quality",
            &quality,
            &"JPEG quality must lie in 1..=100",
        ));
    }
    let source = load_image(input)?;
    let transformed = transform(&source)?;
    save_image(&transformed, output, quality)?;
    let (width, height) = transformed.dimensions();
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        from = %format!("{}x{}", source.width(), source.height()),
        to = %format!("{width}x{height}"),
        "image transformed"
    );
    Ok((width, height))
}

/// Resize the image at `input` to `height` rows and save it to `output`
///
/// Returns the output dimensions.
///
/// # Errors
///
/// Returns an error if the height or quality is invalid, the input cannot be
/// decoded, or the output cannot be written
#[tracing::instrument(level = "debug")]
pub fn fit_height_file(input: &Path, output: &Path, height: u32, quality: u8) -> Result<(u32, u32)> {
    transform_file(input, output, quality, |image| resize_to_height(image, height))
}

/// Scale the image at `input` by `factor` and save it to `output`
///
/// Returns the output dimensions.
///
/// # Errors
///
/// Returns an error if the factor or quality is invalid, the input cannot be
/// decoded, or the output cannot be written
#[tracing::instrument(level = "debug")]
pub fn scale_file(input: &Path, output: &Path, factor: f64, quality: u8) -> Result<(u32, u32)> {
    transform_file(input, output, quality, |image| scale_image(image, factor))
}

/// Trim rows from the image at `input` and save it to `output`
///
/// Returns the output dimensions.
///
/// # Errors
///
/// Returns an error if the fraction or quality is invalid, the input cannot
/// be decoded, or the output cannot be written
#[tracing::instrument(level = "debug")]
pub fn trim_file(
    input: &Path,
    output: &Path,
    mode: TrimMode,
    fraction: f64,
    quality: u8,
) -> Result<(u32, u32)> {
    transform_file(input, output, quality, |image| {
        trim_image(image, mode, fraction)
    })
}

/// Resize every frame of the GIF at `input` to `height` rows
///
/// The first frame's delay applies to the whole output, which loops forever.
/// Returns the output dimensions.
///
/// # Errors
///
/// Returns an error if the height is invalid, the input is not a decodable
/// GIF, or the output cannot be encoded or written
#[tracing::instrument(level = "debug")]
pub fn resize_animation_to_height(input: &Path, output: &Path, height: u32) -> Result<(u32, u32)> {
    let animation = load_animation(input)?;
    let (width, height) = height_fit_dimensions(animation.dimensions(), height)?;
    let frames: Vec<RgbaImage> = animation
        .frames()
        .par_iter()
        .map(|frame| imageops::resize(frame, width, height, FilterType::Lanczos3))
        .collect();
    Animation::from_images(frames, animation.frame_duration_ms())?.write(output)?;
    tracing::info!(
        input = %input.display(),
        frames = animation.frame_count(),
        to = %format!("{width}x{height}"),
        "animation resized"
    );
    Ok((width, height))
}

/// Output path of one named web variant of `input`
///
/// JPEG inputs keep their extension; everything else becomes `.jpg`.
pub fn variant_path(input: &Path, output_dir: &Path, variant: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let extension = input
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| ext == "jpg" || ext == "jpeg")
        .unwrap_or_else(|| "jpg".to_string());
    output_dir.join(format!("{stem}_{variant}.{extension}"))
}

/// Write every standard website size of `input` into `output_dir`
///
/// The source is decoded once and each variant is centre-cropped.
///
/// # Errors
///
/// Returns an error if the input cannot be decoded or any variant cannot be
/// written
pub fn create_web_variants(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let source = load_image(input)?;
    WEB_VARIANTS
        .iter()
        .map(|&(name, width, height)| -> Result<PathBuf> {
            let path = variant_path(input, output_dir, name);
            let resized = resize_cover(&source, width, height, CropAnchor::Center)?;
            save_image(&resized, &path, VARIANT_JPEG_QUALITY)?;
            tracing::info!(variant = name, path = %path.display(), "variant written");
            Ok(path)
        })
        .collect()
}

/// Multiplicative enhancement factors; 1.0 leaves a channel untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enhancement {
    /// Scales every channel towards black (<1) or white (>1)
    pub brightness: f32,
    /// Scales distance from the mean luminance
    pub contrast: f32,
    /// Scales distance from each pixel's own gray value
    pub saturation: f32,
    /// Scales distance from a blurred copy
    pub sharpness: f32,
}

impl Default for Enhancement {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            sharpness: 1.0,
        }
    }
}

impl Enhancement {
    fn validate(&self) -> Result<()> {
        for (name, factor) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("sharpness", self.sharpness),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(invalid_parameter(
                    name,
                    &factor,
                    &"enhancement factors must be non-negative",
                ));
            }
        }
        Ok(())
    }

    /// Apply the factors in brightness, contrast, saturation, sharpness order
    ///
    /// # Errors
    ///
    /// Returns an error if any factor is negative or not finite
    pub fn apply(&self, image: &DynamicImage) -> Result<RgbaImage> {
        self.validate()?;
        let mut out = image.to_rgba8();

        if (self.brightness - 1.0).abs() > f32::EPSILON {
            let black = RgbaImage::from_pixel(out.width(), out.height(), Rgba([0, 0, 0, 255]));
            out = blend(&black, &out, self.brightness);
        }
        if (self.contrast - 1.0).abs() > f32::EPSILON {
            let mean = mean_luma(&out);
            let flat =
                RgbaImage::from_pixel(out.width(), out.height(), Rgba([mean, mean, mean, 255]));
            out = blend(&flat, &out, self.contrast);
        }
        if (self.saturation - 1.0).abs() > f32::EPSILON {
            let gray = DynamicImage::ImageLuma8(imageops::grayscale(&out)).to_rgba8();
            out = blend(&gray, &out, self.saturation);
        }
        if (self.sharpness - 1.0).abs() > f32::EPSILON {
            let smooth = imageops::blur(&out, 1.0);
            out = blend(&smooth, &out, self.sharpness);
        }
        Ok(out)
    }
}

// base + (image - base) * factor per colour channel; alpha comes from `image`
fn blend(base: &RgbaImage, image: &RgbaImage, factor: f32) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba(top) = image.get_pixel_checked(x, y).copied().unwrap_or(Rgba([0; 4]));
        let Rgba(bottom) = base.get_pixel_checked(x, y).copied().unwrap_or(Rgba(top));
        let mix = |b: u8, t: u8| {
            (f32::from(t) - f32::from(b))
                .mul_add(factor, f32::from(b))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba([
            mix(bottom[0], top[0]),
            mix(bottom[1], top[1]),
            mix(bottom[2], top[2]),
            top[3],
        ])
    })
}

fn mean_luma(image: &RgbaImage) -> u8 {
    let luma = imageops::grayscale(image);
    let count = u64::from(luma.width()) * u64::from(luma.height());
    if count == 0 {
        return 0;
    }
    let total: u64 = luma.pixels().map(|pixel| u64::from(pixel.0[0])).sum();
    ((total + count / 2) / count) as u8
}

/// Enhance the image at `input` and save it to `output`
///
/// # Errors
///
/// Returns an error if a factor is invalid, the input cannot be decoded, or
/// the output cannot be written
#[tracing::instrument(level = "debug", skip(enhancement))]
pub fn enhance_file(
    input: &Path,
    output: &Path,
    enhancement: &Enhancement,
    quality: u8,
) -> Result<()> {
    let source = load_image(input)?;
    let enhanced = enhancement.apply(&source)?;
    save_image(&DynamicImage::ImageRgba8(enhanced), output, quality)?;
    tracing::info!(output = %output.display(), "image enhanced");
    Ok(())
}
