use super::{Backend, RecognitionError, RecognitionStatus};
use crate::encode::EncodedImage;

/// An in-page recognition engine. It receives the cropped image (or the
/// re-encoded source when nothing was cropped) and recognizes English text.
pub trait LocalRecognizer {
    fn recognize(&self, image: &EncodedImage) -> Result<String, RecognitionError>;
}

/// Run `recognizer` on `image` and turn the outcome into panel status.
pub fn recognize_local<R: LocalRecognizer + ?Sized>(
    recognizer: &R,
    image: &EncodedImage,
) -> RecognitionStatus {
    log::info!(
        "local OCR on {}x{} {}",
        image.width,
        image.height,
        image.format
    );
    RecognitionStatus::from_result(Backend::Local, recognizer.recognize(image))
}
