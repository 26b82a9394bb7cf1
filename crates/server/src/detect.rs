//! Stand-in object detection.
//!
//! Real detection and depth estimation are upstream services; this module
//! only exists so the app runs end-to-end without them. [`LumaBlockDetector`]
//! scans the photo in coarse luma blocks, scores each block's local contrast
//! as saliency, derives confidence from the contrast margin over the
//! detection threshold, assigns a pseudo depth from the vertical position
//! (lower in frame = closer to camera) and promotes the most textured blocks
//! to candidates. Deterministic for a given image.

use image::DynamicImage;
use peekaboo_protocol::{DetectedObject, Region};

pub trait ObjectDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Vec<DetectedObject>;
}

pub struct LumaBlockDetector {
    /// Blocks per axis.
    pub grid: u32,
    pub max_objects: usize,
    /// Minimum luma standard deviation for a block to count as "something".
    pub min_std: f32,
}

impl Default for LumaBlockDetector {
    fn default() -> Self {
        Self {
            grid: 6,
            max_objects: 8,
            min_std: 6.0,
        }
    }
}

struct Block {
    index: usize,
    region: Region,
    std: f32,
}

impl LumaBlockDetector {
    fn block_stats(&self, luma: &image::GrayImage, region: Region) -> f32 {
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut n = 0.0f64;
        for y in region.y..region.y + region.h {
            for x in region.x..region.x + region.w {
                let v = f64::from(luma.get_pixel(x, y).0[0]);
                sum += v;
                sum_sq += v * v;
                n += 1.0;
            }
        }
        if n == 0.0 {
            return 0.0;
        }
        let mean = sum / n;
        ((sum_sq / n - mean * mean).max(0.0)).sqrt() as f32
    }
}

impl ObjectDetector for LumaBlockDetector {
    fn detect(&self, image: &DynamicImage) -> Vec<DetectedObject> {
        let luma = image.to_luma8();
        let (w, h) = (luma.width(), luma.height());
        if w == 0 || h == 0 || self.grid == 0 {
            return Vec::new();
        }

        let bw = (w / self.grid).max(1);
        let bh = (h / self.grid).max(1);
        let mut blocks = Vec::new();
        let mut index = 0usize;
        let mut gy = 0;
        while gy + bh <= h {
            let mut gx = 0;
            while gx + bw <= w {
                let region = Region::new(gx, gy, bw, bh);
                let std = self.block_stats(&luma, region);
                if std >= self.min_std {
                    blocks.push(Block { index, region, std });
                }
                index += 1;
                gx += bw;
            }
            gy += bh;
        }

        // Most textured first; index keeps the order stable across runs.
        blocks.sort_by(|a, b| {
            b.std
                .partial_cmp(&a.std)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        blocks.truncate(self.max_objects);

        let max_std = blocks.first().map(|b| b.std).unwrap_or(1.0).max(1.0);
        blocks
            .into_iter()
            .map(|b| {
                let (_, cy) = b.region.centroid();
                let saliency = (b.std / max_std).clamp(0.0, 1.0);
                // Margin over the detection threshold: how far past min_std
                // the block's contrast sits, independent of the frame-wide
                // saliency normalization.
                let confidence = if b.std > 0.0 {
                    (1.0 - self.min_std / b.std).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                DetectedObject {
                    label: format!("region-{}", b.index),
                    region: b.region,
                    confidence,
                    // Vertical-gradient pseudo depth: the bottom of a photo is
                    // usually nearer the camera.
                    depth: (1.0 - cy / h as f32).clamp(0.0, 1.0),
                    saliency,
                }
            })
            .collect()
    }
}
