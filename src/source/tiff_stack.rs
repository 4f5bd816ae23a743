use crate::foundation::error::{VizError, VizResult};
use crate::source::{FrameSource, LabelMask, MaskSource, RawFrame, RawPixels};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

/// Multi-page TIFF opened for random page access.
///
/// Pages are counted and their sizes checked once at open; page pixels are decoded on demand.
pub struct TiffStack {
    path: PathBuf,
    decoder: Decoder<BufReader<File>>,
    pages: usize,
    dims: (u32, u32),
}

impl std::fmt::Debug for TiffStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiffStack")
            .field("path", &self.path)
            .field("pages", &self.pages)
            .field("dims", &self.dims)
            .finish()
    }
}

impl TiffStack {
    /// Open `path` and index its pages.
    #[tracing::instrument]
    pub fn open(path: &Path) -> VizResult<Self> {
        let f = File::open(path)
            .map_err(|e| VizError::source(format!("open tiff '{}': {e}", path.display())))?;
        let mut decoder = Decoder::new(BufReader::new(f)).map_err(|e| tiff_err(path, e))?;

        let dims = decoder.dimensions().map_err(|e| tiff_err(path, e))?;
        let mut pages = 1usize;
        while decoder.more_images() {
            decoder.next_image().map_err(|e| tiff_err(path, e))?;
            let page_dims = decoder.dimensions().map_err(|e| tiff_err(path, e))?;
            if page_dims != dims {
                return Err(VizError::shape(format!(
                    "'{}' page {pages} is {}x{}, expected {}x{}",
                    path.display(),
                    page_dims.0,
                    page_dims.1,
                    dims.0,
                    dims.1
                )));
            }
            pages += 1;
        }
        tracing::debug!(pages, width = dims.0, height = dims.1, "indexed tiff stack");

        Ok(Self {
            path: path.to_path_buf(),
            decoder,
            pages,
            dims,
        })
    }

    /// Number of pages.
    pub fn pages(&self) -> usize {
        self.pages
    }

    fn decode_page(&mut self, index: usize) -> VizResult<(ColorType, DecodingResult)> {
        if index >= self.pages {
            return Err(VizError::source(format!(
                "'{}' has {} pages, page {index} requested",
                self.path.display(),
                self.pages
            )));
        }
        self.decoder
            .seek_to_image(index)
            .map_err(|e| tiff_err(&self.path, e))?;
        let color = self
            .decoder
            .colortype()
            .map_err(|e| tiff_err(&self.path, e))?;
        let data = self
            .decoder
            .read_image()
            .map_err(|e| tiff_err(&self.path, e))?;
        Ok((color, data))
    }
}

impl FrameSource for TiffStack {
    fn frame_count(&self) -> usize {
        self.pages
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn read_frame(&mut self, index: usize) -> VizResult<RawFrame> {
        let (color, data) = self.decode_page(index)?;
        let pixels = match (color, data) {
            (ColorType::Gray(8), DecodingResult::U8(v)) => RawPixels::Gray8(v),
            (ColorType::Gray(16), DecodingResult::U16(v)) => RawPixels::Gray16(v),
            (ColorType::RGB(8), DecodingResult::U8(v)) => RawPixels::Rgb8(v),
            (ColorType::RGB(16), DecodingResult::U16(v)) => RawPixels::Rgb16(v),
            (ColorType::RGBA(8), DecodingResult::U8(v)) => RawPixels::Rgb8(drop_alpha(&v)),
            (ColorType::RGBA(16), DecodingResult::U16(v)) => RawPixels::Rgb16(drop_alpha(&v)),
            (other, _) => {
                return Err(VizError::source(format!(
                    "'{}' page {index}: unsupported frame colour type {other:?}",
                    self.path.display()
                )));
            }
        };
        RawFrame::new(self.dims.0, self.dims.1, pixels)
    }
}

impl MaskSource for TiffStack {
    fn frame_count(&self) -> usize {
        self.pages
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn read_mask(&mut self, index: usize) -> VizResult<LabelMask> {
        let (color, data) = self.decode_page(index)?;
        let classes = match (color, data) {
            (ColorType::Gray(8), DecodingResult::U8(v)) => v.into_iter().map(u32::from).collect(),
            (ColorType::Gray(16), DecodingResult::U16(v)) => {
                v.into_iter().map(u32::from).collect()
            }
            (ColorType::Gray(32), DecodingResult::U32(v)) => v,
            (other, _) => {
                return Err(VizError::source(format!(
                    "'{}' page {index}: label masks must be single-channel integer, got {other:?}",
                    self.path.display()
                )));
            }
        };
        LabelMask::new(self.dims.0, self.dims.1, classes)
    }
}

fn drop_alpha<T: Copy>(rgba: &[T]) -> Vec<T> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

fn tiff_err(path: &Path, e: tiff::TiffError) -> VizError {
    VizError::source(format!("decode tiff '{}': {e}", path.display()))
}
