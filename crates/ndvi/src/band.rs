//! Band retrieval and decoding.
//!
//! A band is one spectral channel of a scene, decoded to `f32` samples in
//! row-major order. Readers fetch the raster behind an asset href; decoding
//! is shared and always goes through [`decode_tiff`].

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::RwLock;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;
use tracing::debug;

use stac_client::SasSigner;

use crate::error::{NdviError, NdviResult};

/// A single decoded raster band.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub width: usize,
    pub height: usize,
    /// Row-major samples, `width * height` long.
    pub data: Vec<f32>,
}

impl Band {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> NdviResult<Self> {
        if width == 0 || height == 0 {
            return Err(NdviError::EmptyRaster);
        }
        if data.len() != width * height {
            return Err(NdviError::Decode(format!(
                "expected {} samples for {}x{}, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Band filled with one value.
    pub fn filled(width: usize, height: usize, value: f32) -> NdviResult<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.height, self.width]
    }
}

/// Decode a single-band TIFF/GeoTIFF payload at full resolution.
///
/// Only the first image (the full-resolution IFD of a COG) is read.
pub fn decode_tiff(data: &[u8]) -> NdviResult<Band> {
    let mut decoder = Decoder::new(Cursor::new(data))
        .map_err(|e| NdviError::Decode(e.to_string()))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| NdviError::Decode(format!("cannot read dimensions: {e}")))?;

    match decoder
        .colortype()
        .map_err(|e| NdviError::Decode(format!("cannot read color type: {e}")))?
    {
        ColorType::Gray(_) => {}
        other => {
            return Err(NdviError::UnsupportedLayout(format!(
                "expected one sample per pixel, got {:?}",
                other
            )))
        }
    }

    let image = decoder
        .read_image()
        .map_err(|e| NdviError::Decode(format!("cannot read image data: {e}")))?;

    #[allow(unreachable_patterns)]
    let samples: Vec<f32> = match image {
        DecodingResult::U8(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        _ => {
            return Err(NdviError::UnsupportedLayout(
                "unsupported sample format".to_string(),
            ))
        }
    };

    Band::new(width as usize, height as usize, samples)
}

/// Fetches and decodes the raster behind an asset href.
#[async_trait]
pub trait BandReader: Send + Sync {
    async fn read_band(&self, href: &str) -> NdviResult<Band>;
}

/// Reads bands over HTTP. With a signer, hrefs on SAS-protected hosts are
/// signed first; all other hrefs are fetched as given.
pub struct HttpBandReader {
    client: reqwest::Client,
    signer: Option<SasSigner>,
}

impl HttpBandReader {
    pub fn new(client: reqwest::Client, signer: Option<SasSigner>) -> Self {
        Self { client, signer }
    }

    async fn fetch(&self, href: &str) -> NdviResult<Bytes> {
        let retrieval = |message: String| NdviError::Retrieval {
            href: href.to_string(),
            message,
        };

        let url = match &self.signer {
            Some(signer) if signer.needs_signing(href) => {
                signer.sign(href).await.map_err(|e| retrieval(e.to_string()))?
            }
            _ => href.to_string(),
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| retrieval(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(retrieval(format!("HTTP {}", status.as_u16())));
        }

        resp.bytes().await.map_err(|e| retrieval(e.to_string()))
    }
}

#[async_trait]
impl BandReader for HttpBandReader {
    async fn read_band(&self, href: &str) -> NdviResult<Band> {
        let payload = self.fetch(href).await?;
        debug!(href, bytes = payload.len(), "Fetched band raster");

        tokio::task::spawn_blocking(move || decode_tiff(&payload))
            .await
            .map_err(|e| NdviError::Task(e.to_string()))?
    }
}

/// In-process reader over pre-encoded TIFF payloads keyed by href.
#[derive(Default)]
pub struct MemoryBandReader {
    rasters: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBandReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, href: impl Into<String>, tiff: impl Into<Bytes>) {
        self.rasters
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(href.into(), tiff.into());
    }

    pub fn with_raster(self, href: impl Into<String>, tiff: impl Into<Bytes>) -> Self {
        self.insert(href, tiff);
        self
    }
}

#[async_trait]
impl BandReader for MemoryBandReader {
    async fn read_band(&self, href: &str) -> NdviResult<Band> {
        let payload = self
            .rasters
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(href)
            .cloned()
            .ok_or_else(|| NdviError::Retrieval {
                href: href.to_string(),
                message: "no such raster".to_string(),
            })?;
        decode_tiff(&payload)
    }
}
