use crate::classify::Classifier;
use crate::error::{FrameError, SchemaCandidate};
use crate::fields::RequiredField;
use crate::model::{ImageInput, Row, Value};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Frame - parallel accumulators, one per classifier
// ---------------------------------------------------------------------------

/// Owns the ordered classifier list and one accumulator table per
/// classifier. Rows and classified images are routed to the accumulator
/// whose mineral set they satisfy; a consistency check runs after every
/// mutation and failed mutations are rolled back whole.
#[derive(Debug)]
pub struct Frame {
    classifiers: Vec<Classifier>,
    data: Vec<Table>,
}

impl Frame {
    pub fn new(classifiers: Vec<Classifier>) -> Self {
        let data = classifiers.iter().map(|_| Table::new()).collect();
        Self { classifiers, data }
    }

    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    pub(crate) fn accumulator_mut(&mut self, index: usize) -> &mut Table {
        &mut self.data[index]
    }

    pub(crate) fn accumulator(&self, index: usize) -> &Table {
        &self.data[index]
    }

    // -----------------------------------------------------------------------
    // Schema matching
    // -----------------------------------------------------------------------

    /// Pick the accumulator for a candidate column set (case-insensitive).
    ///
    /// A classifier qualifies when its mineral set, minus the always
    /// optional background category, is a subset of the supplied columns.
    /// Among qualifiers the smallest surplus wins (fewest supplied columns
    /// outside the mineral set); ties break by registration order.
    pub fn select_accumulator(&self, columns: &[String]) -> Result<usize, FrameError> {
        let supplied: Vec<String> = columns.iter().map(|c| c.to_ascii_lowercase()).collect();

        let mut best: Option<(usize, usize)> = None; // (surplus, index)
        let mut candidates = Vec::new();

        for (index, classifier) in self.classifiers.iter().enumerate() {
            let minerals: Vec<String> = classifier
                .minerals()
                .iter()
                .map(|m| m.to_ascii_lowercase())
                .collect();

            let background = RequiredField::Background.column_name().to_ascii_lowercase();
            let missing = minerals
                .iter()
                .find(|m| **m != background && !supplied.contains(m));

            match missing {
                Some(missing) => {
                    // Report the original-cased mineral name, not the folded one.
                    let pos = minerals.iter().position(|m| m == missing).unwrap();
                    candidates.push(SchemaCandidate {
                        index,
                        missing: classifier.minerals()[pos].clone(),
                    });
                }
                None => {
                    let surplus = supplied.iter().filter(|c| !minerals.contains(c)).count();
                    if best.map_or(true, |(s, _)| surplus < s) {
                        best = Some((surplus, index));
                    }
                }
            }
        }

        match best {
            Some((_, index)) => Ok(index),
            None => Err(FrameError::SchemaMismatch {
                supplied: columns.to_vec(),
                candidates,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Append one tabular row, synthesizing the background column when the
    /// source did not measure one.
    pub fn append_row(&mut self, mut row: Row) -> Result<(), FrameError> {
        let columns: Vec<String> = row.iter().map(|(name, _)| name.clone()).collect();
        let index = self.select_accumulator(&columns)?;

        let background = RequiredField::Background.column_name();
        if !row.iter().any(|(name, _)| name.eq_ignore_ascii_case(background)) {
            let value = synthesize_background(&row, self.classifiers[index].minerals());
            row.push((background.to_string(), value));
        }

        self.commit(index, row)
    }

    /// Classify an image against every classifier and append the winning
    /// composition merged with its extracted metadata fields.
    ///
    /// The winner minimizes (RMS error, mineral count) lexicographically: a
    /// coarse palette can reach spuriously low error on simple images, so a
    /// genuine tie defaults to the simpler model.
    pub fn append_classified(&mut self, image: &ImageInput) -> Result<(), FrameError> {
        if self.classifiers.is_empty() {
            return Err(FrameError::SchemaMismatch {
                supplied: Vec::new(),
                candidates: Vec::new(),
            });
        }
        let compositions: Vec<_> = self
            .classifiers
            .iter()
            .map(|c| c.classify(&image.pixels))
            .collect();

        let mut index = 0usize;
        for (i, comp) in compositions.iter().enumerate().skip(1) {
            let best = &compositions[index];
            let ord = comp
                .rms_error
                .total_cmp(&best.rms_error)
                .then(self.classifiers[i].minerals().len().cmp(&self.classifiers[index].minerals().len()));
            if ord.is_lt() {
                index = i;
            }
        }

        let fields = self.classifiers[index].extract_fields(image.description.as_deref());

        let mut row: Row = compositions[index]
            .counts
            .iter()
            .map(|(name, count)| (name.clone(), Value::Int(*count as i64)))
            .collect();
        for (name, value) in fields {
            row.push((name, Value::Str(value)));
        }

        let background = RequiredField::Background.column_name();
        if !row.iter().any(|(name, _)| name.eq_ignore_ascii_case(background)) {
            // Image pixels are raw counts; background is just another
            // classified colour, so absent means none was seen.
            row.push((background.to_string(), Value::Int(0)));
        }

        self.commit(index, row)
    }

    /// Append, validate, and roll back the append if validation fails.
    /// Observably equivalent to commit-then-fail.
    fn commit(&mut self, index: usize, row: Row) -> Result<(), FrameError> {
        let mark = self.data[index].mark();
        self.data[index].append(row);
        if let Err(err) = self.check_consistency() {
            self.data[index].rollback(mark);
            return Err(err);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Consistency
    // -----------------------------------------------------------------------

    /// Every required field must be present in every accumulator that holds
    /// data, and single-valued where its policy demands it.
    pub fn check_consistency(&self) -> Result<(), FrameError> {
        for table in self.data.iter().filter(|t| !t.is_empty()) {
            for field in RequiredField::ALL {
                let col = table.find_column(field.column_name()).ok_or(
                    FrameError::ConsistencyViolation {
                        field: field.column_name(),
                        conflicting: None,
                    },
                )?;
                if field.must_be_uniform() {
                    let distinct = table.distinct(col);
                    if distinct.len() != 1 {
                        return Err(FrameError::ConsistencyViolation {
                            field: field.column_name(),
                            conflicting: Some(
                                distinct.iter().map(|v| v.to_string()).collect(),
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    fn active_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// True while data is spread over more than one accumulator.
    pub fn requires_translation(&self) -> bool {
        self.active_indices().len() > 1
    }

    fn single_active(&self) -> Result<usize, FrameError> {
        let active = self.active_indices();
        match active.as_slice() {
            [index] => Ok(*index),
            [] => Err(FrameError::NoActiveAccumulator),
            _ => Err(FrameError::MultipleActiveAccumulators { active: active.len() }),
        }
    }

    /// The single active accumulator's table.
    pub fn result(&self) -> Result<&Table, FrameError> {
        Ok(&self.data[self.single_active()?])
    }

    /// The mineral list of the classifier whose accumulator holds the data.
    pub fn minerals(&self) -> Result<&[String], FrameError> {
        Ok(self.classifiers[self.single_active()?].minerals())
    }
}

/// Background synthesis for tabular rows: the mineral sum `s` approximates
/// measured area; under 100 it is read as a percentage shortfall, otherwise
/// the unmeasured remainder of the smallest square scan frame that fits it.
fn synthesize_background(row: &Row, minerals: &[String]) -> Value {
    let background = RequiredField::Background.column_name();
    let s: f64 = row
        .iter()
        .filter(|(name, _)| {
            !name.eq_ignore_ascii_case(background)
                && minerals.iter().any(|m| m.eq_ignore_ascii_case(name))
        })
        .filter_map(|(_, value)| value.as_f64())
        .sum();

    let value = if s < 100.0 {
        100.0 - s
    } else {
        let side = s.sqrt().ceil();
        side * side
    };

    if value.fract() == 0.0 {
        Value::Int(value as i64)
    } else {
        Value::Float(value)
    }
}
