//! The interactive cropper: an explicit state machine owned by the host page.
//!
//! The host feeds it file selections, pointer events and button presses; the
//! rendering layer subscribes to [`CropperEvent`]s and repaints from
//! [`Cropper::frame`]. Nothing here knows about a particular UI framework.
//!
//! # Loading
//!
//! Reading file bytes is asynchronous in the browser, so loading is split in
//! two: [`Cropper::begin_load`] classifies the file and hands out a
//! [`LoadTicket`], and [`Cropper::finish_load`] decodes the bytes. Any newer
//! selection or a [`Cropper::discard`] in between makes the ticket stale and
//! its result is dropped.
//!
//! # Example
//!
//! ```ignore
//! let mut cropper = Cropper::new(CropperConfig::default())?;
//! cropper.load(FileInput::new("scan.jpg", "image/jpeg", bytes))?;
//! cropper.begin_drag(Point::new(100.0, 100.0))?;
//! cropper.update_drag(Point::new(300.0, 250.0));
//! cropper.end_drag();
//! let cropped = cropper.apply_crop()?;
//! ```

mod events;
mod state;

pub use events::{CropperEvent, ListenerId};
pub use state::{CroppedImage, CropperState, LoadOutcome, LoadTicket};

use log::{debug, info, warn};

use crate::config::CropperConfig;
use crate::decode::{decode_image, DecodedImage, FileInput, FileKind, RawFile};
use crate::encode::{encode_image, EncodedImage};
use crate::error::CropError;
use crate::transform::{
    apply_crop, compute_projection, draw_outline, CropRect, DisplayProjection, Point,
};
use events::Listeners;

/// A file accepted by `begin_load` whose bytes have not arrived yet.
#[derive(Debug)]
struct PendingLoad {
    ticket: LoadTicket,
    name: String,
    mime_type: String,
    kind: FileKind,
    /// State to fall back to if decoding fails.
    resume: CropperState,
}

/// A raster together with its on-screen projection.
#[derive(Debug, Clone)]
struct View {
    projection: DisplayProjection,
    display: DecodedImage,
}

#[derive(Debug)]
pub struct Cropper {
    config: CropperConfig,
    state: CropperState,
    generation: u64,
    pending: Option<PendingLoad>,
    source: Option<DecodedImage>,
    source_view: Option<View>,
    raw_file: Option<RawFile>,
    cropped: Option<CroppedImage>,
    cropped_view: Option<View>,
    drag_start: Option<Point>,
    selection: Option<CropRect>,
    listeners: Listeners,
}

impl Default for Cropper {
    fn default() -> Self {
        Self::build(CropperConfig::default())
    }
}

impl Cropper {
    pub fn new(config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CropperConfig) -> Self {
        Self {
            config,
            state: CropperState::Empty,
            generation: 0,
            pending: None,
            source: None,
            source_view: None,
            raw_file: None,
            cropped: None,
            cropped_view: None,
            drag_start: None,
            selection: None,
            listeners: Listeners::default(),
        }
    }

    /// Load a file whose bytes are already available.
    pub fn load(&mut self, file: FileInput) -> Result<LoadOutcome, CropError> {
        let ticket = self.begin_load(&file.name, &file.mime_type)?;
        self.finish_load(ticket, file.bytes)
    }

    /// Accept a new file selection and supersede any load in flight.
    ///
    /// Unsupported types are rejected without touching current state. The
    /// current image stays in place until the new bytes decode, but drag
    /// input is refused meanwhile.
    pub fn begin_load(&mut self, name: &str, mime_type: &str) -> Result<LoadTicket, CropError> {
        let kind = FileKind::from_mime(mime_type);
        if kind == FileKind::Unsupported {
            return Err(self.reject(CropError::UnsupportedFileType {
                mime_type: mime_type.to_string(),
            }));
        }

        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        let resume = match &self.pending {
            Some(previous) => {
                debug!("load #{} superseded by #{}", previous.ticket.generation, ticket.generation);
                previous.resume
            }
            None => self.state,
        };

        info!("loading {:?} ({}) as #{}", name, mime_type, ticket.generation);
        self.pending = Some(PendingLoad {
            ticket,
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            kind,
            resume,
        });
        self.drag_start = None;
        self.set_state(CropperState::Decoding);
        Ok(ticket)
    }

    /// Complete a load started with [`Cropper::begin_load`].
    ///
    /// Returns `LoadOutcome::Superseded` and changes nothing if `ticket` is
    /// no longer current. On a decode failure the state from before the
    /// selection is restored.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        bytes: Vec<u8>,
    ) -> Result<LoadOutcome, CropError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                warn!("ignoring stale load #{}", ticket.generation);
                return Ok(LoadOutcome::Superseded);
            }
        };

        match pending.kind {
            FileKind::Document => {
                self.clear_document();
                self.raw_file = Some(FileInput::new(pending.name, pending.mime_type, bytes));
                info!("document kept for whole-document OCR");
                self.set_state(CropperState::PassThrough);
                self.listeners.emit(&CropperEvent::Redraw);
                Ok(LoadOutcome::Document)
            }
            FileKind::Image => {
                let decoded = decode_image(&bytes)
                    .map_err(CropError::from)
                    .and_then(|image| Ok((self.make_view(&image)?, image)));

                let (view, image) = match decoded {
                    Ok(loaded) => loaded,
                    Err(e) => {
                        self.set_state(pending.resume);
                        return Err(self.reject(e));
                    }
                };

                let (width, height) = (image.width, image.height);
                info!(
                    "decoded {}x{} image, display {}x{} at scale {:.4}",
                    width,
                    height,
                    view.projection.display_width,
                    view.projection.display_height,
                    view.projection.scale
                );

                self.clear_document();
                self.source = Some(image);
                self.source_view = Some(view);
                self.raw_file = Some(FileInput::new(pending.name, pending.mime_type, bytes));
                self.set_state(CropperState::Loaded);
                self.listeners.emit(&CropperEvent::SelectionChanged(None));
                self.listeners.emit(&CropperEvent::Redraw);
                Ok(LoadOutcome::Image { width, height })
            }
            FileKind::Unsupported => {
                self.set_state(pending.resume);
                Err(self.reject(CropError::UnsupportedFileType {
                    mime_type: pending.mime_type,
                }))
            }
        }
    }

    /// Drop everything, including any load in flight. Idempotent.
    pub fn discard(&mut self) {
        self.generation += 1;
        let had_pending = self.pending.take().is_some();
        self.clear_document();
        if had_pending || self.state != CropperState::Empty {
            debug!("discarded document");
        }
        self.set_state(CropperState::Empty);
    }

    /// Start a selection at `point` (display coordinates).
    pub fn begin_drag(&mut self, point: Point) -> Result<(), CropError> {
        if let Err(e) = self.ensure_croppable() {
            return Err(self.reject(e));
        }

        debug!("drag started at ({:.1}, {:.1})", point.x, point.y);
        self.drag_start = Some(point);
        self.selection = Some(CropRect::from_points(point, point));
        self.set_state(CropperState::Cropping);
        self.listeners
            .emit(&CropperEvent::SelectionChanged(self.selection));
        self.listeners.emit(&CropperEvent::Redraw);
        Ok(())
    }

    /// Stretch the selection to `point`. Returns false (and does nothing)
    /// when no drag is active.
    pub fn update_drag(&mut self, point: Point) -> bool {
        let Some(start) = self.drag_start else {
            return false;
        };
        if self.pending.is_some() || self.source_view.is_none() {
            return false;
        }

        self.selection = Some(CropRect::from_points(start, point));
        self.listeners
            .emit(&CropperEvent::SelectionChanged(self.selection));
        self.listeners.emit(&CropperEvent::Redraw);
        true
    }

    /// Stop dragging. The selection is kept.
    pub fn end_drag(&mut self) -> Option<CropRect> {
        if let Some(start) = self.drag_start.take() {
            debug!(
                "drag from ({:.1}, {:.1}) ended with {:?}",
                start.x, start.y, self.selection
            );
        }
        self.selection
    }

    /// Cut the current selection out of the source image.
    ///
    /// On success the cropped image becomes the working image. On failure
    /// nothing changes.
    pub fn apply_crop(&mut self) -> Result<&CroppedImage, CropError> {
        if let Err(e) = self.ensure_croppable() {
            return Err(self.reject(e));
        }
        self.drag_start = None;

        let cropped = match self.cut_selection() {
            Ok(cropped) => cropped,
            Err(e) => return Err(self.reject(e)),
        };
        let view = match self.make_view(&cropped.image) {
            Ok(view) => view,
            Err(e) => return Err(self.reject(e)),
        };

        info!(
            "cropped source region {:?} to {}x{} {}",
            cropped.source_region,
            cropped.image.width,
            cropped.image.height,
            cropped.encoded.format
        );
        self.cropped = Some(cropped);
        self.cropped_view = Some(view);
        self.selection = None;
        self.set_state(CropperState::Cropped);
        self.listeners.emit(&CropperEvent::SelectionChanged(None));
        self.listeners.emit(&CropperEvent::Redraw);

        self.cropped.as_ref().ok_or(CropError::NoImage)
    }

    fn cut_selection(&self) -> Result<CroppedImage, CropError> {
        let source = self.source.as_ref().ok_or(CropError::NoImage)?;
        let view = self.source_view.as_ref().ok_or(CropError::NoImage)?;
        let selection = self.selection.ok_or(CropError::DegenerateCrop)?;

        let (image, source_region) = apply_crop(source, &selection, &view.projection)?;
        let encoded = encode_image(&image, self.config.output_format, self.config.jpeg_quality)?;

        Ok(CroppedImage {
            image,
            encoded,
            source_region,
        })
    }

    /// Go back to the uncropped source so the user can crop again.
    pub fn reset_to_original(&mut self) -> Result<(), CropError> {
        let check = match self.state {
            CropperState::Empty => Err(CropError::NoImage),
            CropperState::Decoding => Err(CropError::DecodePending),
            CropperState::PassThrough => Err(CropError::NotCroppable),
            CropperState::Loaded | CropperState::Cropping | CropperState::Cropped => Ok(()),
        };
        if let Err(e) = check {
            return Err(self.reject(e));
        }

        self.cropped = None;
        self.cropped_view = None;
        self.drag_start = None;
        self.selection = None;
        self.set_state(CropperState::Loaded);
        self.listeners.emit(&CropperEvent::SelectionChanged(None));
        self.listeners.emit(&CropperEvent::Redraw);
        Ok(())
    }

    /// The display raster with the selection outline, if an image is shown.
    pub fn frame(&self) -> Option<DecodedImage> {
        let view = self.current_view()?;
        let mut frame = view.display.clone();
        if self.cropped.is_none() {
            if let Some(selection) = &self.selection {
                draw_outline(
                    &mut frame,
                    selection,
                    self.config.outline_color,
                    self.config.outline_width,
                );
            }
        }
        Some(frame)
    }

    /// The image to hand to local OCR: the crop if one was applied,
    /// otherwise the re-encoded source.
    pub fn output(&self) -> Result<EncodedImage, CropError> {
        if let Some(cropped) = &self.cropped {
            return Ok(cropped.encoded.clone());
        }
        match (&self.source, self.state) {
            (_, CropperState::PassThrough) => Err(CropError::NotCroppable),
            (Some(source), _) => Ok(encode_image(
                source,
                self.config.output_format,
                self.config.jpeg_quality,
            )?),
            (None, CropperState::Decoding) => Err(CropError::DecodePending),
            (None, _) => Err(CropError::NoImage),
        }
    }

    /// The upload as received, for remote whole-document OCR.
    pub fn original_file(&self) -> Option<&RawFile> {
        self.raw_file.as_ref()
    }

    pub fn state(&self) -> CropperState {
        self.state
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_ref()
    }

    pub fn cropped(&self) -> Option<&CroppedImage> {
        self.cropped.as_ref()
    }

    /// Projection of the image currently on screen.
    pub fn projection(&self) -> Option<&DisplayProjection> {
        self.current_view().map(|view| &view.projection)
    }

    /// Display raster of the image currently on screen, without overlay.
    pub fn display(&self) -> Option<&DecodedImage> {
        self.current_view().map(|view| &view.display)
    }

    pub fn selection(&self) -> Option<CropRect> {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CropperEvent) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn current_view(&self) -> Option<&View> {
        if self.cropped.is_some() {
            self.cropped_view.as_ref()
        } else {
            self.source_view.as_ref()
        }
    }

    fn ensure_croppable(&self) -> Result<(), CropError> {
        match self.state {
            CropperState::Empty => Err(CropError::NoImage),
            CropperState::Decoding => Err(CropError::DecodePending),
            CropperState::PassThrough => Err(CropError::NotCroppable),
            CropperState::Cropped => Err(CropError::AlreadyCropped),
            CropperState::Loaded | CropperState::Cropping => Ok(()),
        }
    }

    fn make_view(&self, image: &DecodedImage) -> Result<View, CropError> {
        let projection = compute_projection(
            image.width,
            image.height,
            self.config.max_display_width,
            self.config.max_display_height,
        );
        let display = projection.render(image, self.config.display_filter)?;
        Ok(View {
            projection,
            display,
        })
    }

    fn clear_document(&mut self) {
        self.source = None;
        self.source_view = None;
        self.raw_file = None;
        self.cropped = None;
        self.cropped_view = None;
        self.drag_start = None;
        self.selection = None;
    }

    fn set_state(&mut self, state: CropperState) {
        if self.state != state {
            debug!("cropper {} -> {}", self.state, state);
            self.state = state;
            self.listeners.emit(&CropperEvent::StateChanged(state));
        }
    }

    fn reject(&mut self, error: CropError) -> CropError {
        warn!("cropper rejected operation in state {}: {}", self.state, error);
        self.listeners.emit(&CropperEvent::Rejected(error.clone()));
        error
    }
}
