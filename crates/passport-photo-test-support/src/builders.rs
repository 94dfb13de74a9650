//! Synthetic image and face builders for testing.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use passport_photo_core::domain::{
    BlurLevel, DetectedFace, ExposureLevel, FaceDetection, FaceRectangle, HeadPose, MaskType,
    Occlusion, PhotoImage, RecognitionQuality,
};
use passport_photo_core::PreconditionError;

/// Builder for creating synthetic test photos.
///
/// Every photo carries real PNG bytes so it can be handed to gateways or
/// uploaded through the HTTP endpoint.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a uniform gray photo. Brightness equals `value`, background
    /// deviation is zero.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> PhotoImage {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        Self::photo("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a uniform RGB photo.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> PhotoImage {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        Self::photo("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a portrait: a flat `background` with a darker square "face"
    /// filling `face` (edges included).
    #[must_use]
    pub fn portrait(width: u32, height: u32, face: FaceRectangle, background: u8) -> PhotoImage {
        let skin = background.saturating_sub(60);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if face.covers(x, y) {
                Luma([skin])
            } else {
                Luma([background])
            }
        });
        Self::photo("synthetic://portrait", DynamicImage::ImageLuma8(img))
    }

    /// Creates a black and white checkerboard. Background deviation is
    /// close to 127.5, far above any sensible limit.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> PhotoImage {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        Self::photo("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    /// Returns PNG bytes for a uniform gray image, e.g. for multipart uploads
    /// or files on disk.
    #[must_use]
    pub fn png_bytes(width: u32, height: u32, value: u8) -> Vec<u8> {
        encode_png(&DynamicImage::ImageLuma8(GrayImage::from_pixel(
            width,
            height,
            Luma([value]),
        )))
    }

    /// Returns a standard passing photo: 100x100 at brightness 150 with a
    /// centered 40x40 face, matching [`FaceBuilder::passing`].
    #[must_use]
    pub fn passport_photo() -> PhotoImage {
        Self::portrait(100, 100, FaceBuilder::CENTERED, 150)
    }

    #[allow(clippy::expect_used)]
    fn photo(source: &str, image: DynamicImage) -> PhotoImage {
        let encoded = encode_png(&image);
        PhotoImage::from_parts(source, &image, encoded).expect("synthetic image has pixels")
    }
}

#[allow(clippy::expect_used)]
fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("PNG encoding into memory");
    buf.into_inner()
}

/// Builder for face records as a face service would return them.
///
/// Starts from a face that passes every attribute check.
#[derive(Debug, Clone)]
pub struct FaceBuilder {
    detection: FaceDetection,
}

impl FaceBuilder {
    /// A 40x40 face centered in a 100x100 image.
    pub const CENTERED: FaceRectangle = FaceRectangle::new(30, 30, 40, 40);

    /// A face at [`Self::CENTERED`] with passing attributes.
    #[must_use]
    pub fn passing() -> Self {
        Self::at(Self::CENTERED)
    }

    /// A face at `rectangle` with passing attributes.
    #[must_use]
    pub fn at(rectangle: FaceRectangle) -> Self {
        Self {
            detection: FaceDetection {
                rectangle,
                quality: Some(RecognitionQuality::High),
                exposure: Some(ExposureLevel::GoodExposure),
                head_pose: Some(HeadPose::default()),
                blur: Some(BlurLevel::Low),
                mask: Some(MaskType::NoMask),
                occlusion: Some(Occlusion::default()),
            },
        }
    }

    /// Sets the recognition quality.
    #[must_use]
    pub fn quality(mut self, quality: RecognitionQuality) -> Self {
        self.detection.quality = Some(quality);
        self
    }

    /// Sets the exposure level.
    #[must_use]
    pub fn exposure(mut self, exposure: ExposureLevel) -> Self {
        self.detection.exposure = Some(exposure);
        self
    }

    /// Sets yaw and roll in degrees.
    #[must_use]
    pub fn pose(mut self, yaw: f64, roll: f64) -> Self {
        self.detection.head_pose = Some(HeadPose {
            yaw,
            roll,
            pitch: 0.0,
        });
        self
    }

    /// Sets the blur level.
    #[must_use]
    pub fn blur(mut self, blur: BlurLevel) -> Self {
        self.detection.blur = Some(blur);
        self
    }

    /// Sets the mask type.
    #[must_use]
    pub fn mask(mut self, mask: MaskType) -> Self {
        self.detection.mask = Some(mask);
        self
    }

    /// Sets the occlusion flags.
    #[must_use]
    pub fn occluded(mut self, eye: bool, forehead: bool, mouth: bool) -> Self {
        self.detection.occlusion = Some(Occlusion {
            eye_occluded: eye,
            forehead_occluded: forehead,
            mouth_occluded: mouth,
        });
        self
    }

    /// Removes the head pose, as a service asked for too few attributes would.
    #[must_use]
    pub fn without_head_pose(mut self) -> Self {
        self.detection.head_pose = None;
        self
    }

    /// The raw detection.
    #[must_use]
    pub fn build(self) -> FaceDetection {
        self.detection
    }

    /// The detection converted for the evaluators.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute was removed.
    pub fn detected(self) -> Result<DetectedFace, PreconditionError> {
        DetectedFace::try_from(self.detection)
    }
}
