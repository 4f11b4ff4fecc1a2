use crate::fields::{parse_blob, FieldSpec};
use crate::palette::Palette;

// ---------------------------------------------------------------------------
// Composition - one classification result
// ---------------------------------------------------------------------------

/// Per-mineral pixel counts in palette order (zero counts omitted; absent
/// means zero) and the RMS of the nearest-neighbour distances. The error is
/// exactly 0 when every pixel hits a palette colour, and comparable across
/// classifiers because the search is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub rms_error: f64,
    pub counts: Vec<(String, u64)>,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// A palette plus its optional metadata field extractors. Built once per
/// run and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Classifier {
    palette: Palette,
    fields: Vec<FieldSpec>,
}

impl Classifier {
    pub fn new(palette: Palette, fields: Vec<FieldSpec>) -> Self {
        Self { palette, fields }
    }

    pub fn minerals(&self) -> &[String] {
        self.palette.minerals()
    }

    /// Exact k=1 nearest-neighbour classification over RGB space.
    ///
    /// Brute force over the palette: exhaustive squared-distance scan per
    /// pixel, ties resolved to the lowest palette index. Approximate search
    /// would break the cross-classifier error comparison.
    pub fn classify(&self, pixels: &[[u8; 3]]) -> Composition {
        let colours = self.palette.colours();
        let mut counts = vec![0u64; colours.len()];
        let mut sum_sq = 0.0f64;

        for pixel in pixels {
            let mut best = 0usize;
            let mut best_dist = u32::MAX;
            for (idx, colour) in colours.iter().enumerate() {
                let dist = dist_sq(pixel, colour);
                if dist < best_dist {
                    best = idx;
                    best_dist = dist;
                }
            }
            counts[best] += 1;
            sum_sq += best_dist as f64;
        }

        let rms_error = if pixels.is_empty() {
            0.0
        } else {
            (sum_sq / pixels.len() as f64).sqrt()
        };

        let counts = self
            .palette
            .minerals()
            .iter()
            .zip(counts)
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| (name.clone(), n))
            .collect();

        Composition { rms_error, counts }
    }

    /// Parse an image's metadata blob and run every configured field
    /// extraction against it. Results come back in configured-field order,
    /// so callers appending them produce a stable column order. No blob, or
    /// nothing matching, yields an empty list.
    pub fn extract_fields(&self, blob: Option<&str>) -> Vec<(String, String)> {
        let metadata = match blob {
            Some(blob) => parse_blob(blob),
            None => return Vec::new(),
        };
        self.fields
            .iter()
            .filter_map(|f| f.extract(&metadata).map(|v| (f.name().to_string(), v)))
            .collect()
    }
}

fn dist_sq(a: &[u8; 3], b: &[u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
