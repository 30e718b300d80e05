//! Image (OCR) adapter.

use async_trait::async_trait;

use super::{require_content, AdapterContext, Extractor};
use crate::error::Result;
use crate::traits::fetcher::RawSource;
use crate::types::platform::SourceKind;
use crate::types::records::{BoundingBox, ExtractionResult, ImageRecord, TextBlock};

const LINE_HEIGHT: u32 = 24;
const CHAR_WIDTH: u32 = 11;
const MARGIN: u32 = 16;
const DEFAULT_CONFIDENCE: f32 = 0.9;

pub struct ImageAdapter {
    context: AdapterContext,
}

impl ImageAdapter {
    pub fn new(context: AdapterContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Extractor for ImageAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Image
    }

    async fn extract(&self, locator: &str) -> Result<ExtractionResult> {
        let raw = self.context.acquire(self.kind(), locator).await?;
        let raw = require_content(raw)?;
        Ok(ExtractionResult::Image(structure_ocr(&raw)))
    }
}

/// Lay OCR lines out as blocks, top to bottom.
///
/// Per-line confidence is read from `confidence.<index>` metadata, falling
/// back to the source-wide `confidence` value.
pub fn structure_ocr(raw: &RawSource) -> ImageRecord {
    let base = raw
        .meta("confidence")
        .and_then(|c| c.parse::<f32>().ok())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let blocks: Vec<TextBlock> = raw
        .content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let confidence = raw
                .meta(&format!("confidence.{index}"))
                .and_then(|c| c.parse::<f32>().ok())
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(base);
            TextBlock {
                text: line.to_string(),
                confidence,
                bounds: BoundingBox {
                    x: MARGIN,
                    y: MARGIN + index as u32 * LINE_HEIGHT,
                    width: line.chars().count() as u32 * CHAR_WIDTH,
                    height: LINE_HEIGHT,
                },
            }
        })
        .collect();

    let confidence = if blocks.is_empty() {
        0.0
    } else {
        blocks.iter().map(|b| b.confidence).sum::<f32>() / blocks.len() as f32
    };

    ImageRecord {
        locator: raw.locator.clone(),
        text: blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        confidence,
        blocks,
    }
}
