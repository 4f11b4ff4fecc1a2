use crate::error::FrameError;
use crate::model::Value;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Palette - ordered mineral-name-to-colour mapping
// ---------------------------------------------------------------------------

/// One classification scheme: an ordered list of mineral names and the RGB
/// colour each one is rendered as in a classified micrograph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    minerals: Vec<String>,
    colours: Vec<[u8; 3]>,
}

impl Palette {
    /// Build a palette from a pre-parsed table. Accepted shapes:
    ///
    /// * 2 columns: name, colour string (`#rrggbb`, `#rgb`, or CSS name)
    /// * 4 columns: name, R, G, B channel values
    pub fn from_table(table: &Table) -> Result<Self, FrameError> {
        let ncols = table.columns().len();
        if ncols != 2 && ncols != 4 {
            return Err(FrameError::InvalidPalette(format!(
                "mapping must have 2 or 4 columns, got {ncols}"
            )));
        }
        if table.is_empty() {
            return Err(FrameError::InvalidPalette("mapping has no rows".into()));
        }

        let mut minerals = Vec::with_capacity(table.row_count());
        let mut colours = Vec::with_capacity(table.row_count());

        for row in 0..table.row_count() {
            minerals.push(table.value(row, 0).to_string());
            let colour = if ncols == 2 {
                parse_colour(&table.value(row, 1).to_string())?
            } else {
                let mut rgb = [0u8; 3];
                for (i, slot) in rgb.iter_mut().enumerate() {
                    *slot = channel(table.value(row, 1 + i))?;
                }
                rgb
            };
            colours.push(colour);
        }

        Ok(Self { minerals, colours })
    }

    pub fn minerals(&self) -> &[String] {
        &self.minerals
    }

    pub fn colours(&self) -> &[[u8; 3]] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.minerals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minerals.is_empty()
    }
}

fn channel(value: &Value) -> Result<u8, FrameError> {
    let v = value
        .as_f64()
        .ok_or_else(|| FrameError::InvalidPalette(format!("'{value}' is not a channel value")))?;
    if !(0.0..=255.0).contains(&v) || v.fract() != 0.0 {
        return Err(FrameError::InvalidPalette(format!(
            "channel value {v} outside 0..=255"
        )));
    }
    Ok(v as u8)
}

/// Parse `#rrggbb`, `#rgb`, or a small set of CSS colour names.
pub fn parse_colour(s: &str) -> Result<[u8; 3], FrameError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return match hex.len() {
            6 => {
                let n = u32::from_str_radix(hex, 16)
                    .map_err(|_| FrameError::InvalidPalette(format!("bad colour '{s}'")))?;
                Ok([(n >> 16) as u8, (n >> 8) as u8, n as u8])
            }
            3 => {
                let n = u32::from_str_radix(hex, 16)
                    .map_err(|_| FrameError::InvalidPalette(format!("bad colour '{s}'")))?;
                let (r, g, b) = ((n >> 8) & 0xF, (n >> 4) & 0xF, n & 0xF);
                Ok([(r * 17) as u8, (g * 17) as u8, (b * 17) as u8])
            }
            _ => Err(FrameError::InvalidPalette(format!("bad colour '{s}'"))),
        };
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Ok([0, 0, 0]),
        "white" => Ok([255, 255, 255]),
        "red" => Ok([255, 0, 0]),
        "green" => Ok([0, 128, 0]),
        "lime" => Ok([0, 255, 0]),
        "blue" => Ok([0, 0, 255]),
        "yellow" => Ok([255, 255, 0]),
        "cyan" => Ok([0, 255, 255]),
        "magenta" => Ok([255, 0, 255]),
        "gray" | "grey" => Ok([128, 128, 128]),
        "brown" => Ok([165, 42, 42]),
        "orange" => Ok([255, 165, 0]),
        "purple" => Ok([128, 0, 128]),
        other => Err(FrameError::InvalidPalette(format!(
            "unknown colour name '{other}'"
        ))),
    }
}
