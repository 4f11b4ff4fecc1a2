use crate::error::FrameError;
use crate::frame::Frame;
use crate::model::Value;
use crate::table::Table;

impl Frame {
    /// Collapse the fine-grained accumulator into the reduced one via a
    /// many-to-one taxonomy table (column 0 = reduced category, column 1 =
    /// fine category).
    ///
    /// Non-mineral source columns pass through unchanged, in their original
    /// order, ahead of the reduced columns (first-seen group order). Each
    /// reduced column is the per-row sum of its group's fine columns; a fine
    /// category the source never measured contributes 0. The source is
    /// drained, so total mass moves rather than duplicates.
    pub fn apply_translation(&mut self, translation: &Table) -> Result<(), FrameError> {
        let ncols = translation.columns().len();
        if ncols != 2 {
            return Err(FrameError::InvalidTranslation { columns: ncols });
        }

        let reduced_names: Vec<String> = (0..translation.row_count())
            .map(|r| translation.value(r, 0).to_string())
            .collect();
        let fine_names: Vec<String> = (0..translation.row_count())
            .map(|r| translation.value(r, 1).to_string())
            .collect();

        let source = self.select_accumulator(&fine_names)?;
        let target = self.select_accumulator(&reduced_names)?;

        // Group fine categories by reduced category, first-seen order.
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for (reduced, fine) in reduced_names.iter().zip(&fine_names) {
            match groups.iter_mut().find(|(name, _)| name == reduced) {
                Some((_, fines)) => fines.push(fine.clone()),
                None => groups.push((reduced.clone(), vec![fine.clone()])),
            }
        }

        let (source_columns, source_rows) = self.accumulator_mut(source).drain();

        // Pass-through columns: everything that is not a fine category.
        let passthrough: Vec<usize> = source_columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !fine_names.iter().any(|f| f.eq_ignore_ascii_case(name)))
            .map(|(idx, _)| idx)
            .collect();

        let group_columns: Vec<(String, Vec<usize>)> = groups
            .iter()
            .map(|(reduced, fines)| {
                let cols = fines
                    .iter()
                    .filter_map(|fine| {
                        source_columns.iter().position(|c| c.eq_ignore_ascii_case(fine))
                    })
                    .collect();
                (reduced.clone(), cols)
            })
            .collect();

        let mark = self.accumulator(target).mark();
        for cells in &source_rows {
            let mut row = Vec::with_capacity(passthrough.len() + group_columns.len());
            for &idx in &passthrough {
                row.push((
                    source_columns[idx].clone(),
                    cells.get(idx).cloned().unwrap_or(Value::Null),
                ));
            }
            for (reduced, cols) in &group_columns {
                row.push((reduced.clone(), sum_cells(cells, cols)));
            }
            self.accumulator_mut(target).append(row);
        }

        if let Err(err) = self.check_consistency() {
            self.accumulator_mut(target).rollback(mark);
            self.accumulator_mut(source).restore(source_columns, source_rows);
            return Err(err);
        }
        Ok(())
    }
}

/// Sum a row's cells at the given columns; integer while every summand is an
/// integer, float as soon as one is. Null and string cells contribute 0.
fn sum_cells(cells: &[Value], cols: &[usize]) -> Value {
    let mut int_sum = 0i64;
    let mut float_sum = 0.0f64;
    let mut is_float = false;

    for &col in cols {
        match cells.get(col) {
            Some(Value::Int(i)) => {
                int_sum += i;
                float_sum += *i as f64;
            }
            Some(Value::Float(v)) => {
                is_float = true;
                float_sum += v;
            }
            _ => {}
        }
    }

    if is_float {
        Value::Float(float_sum)
    } else {
        Value::Int(int_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::model::Row;
    use crate::palette::Palette;

    fn palette(entries: &[(&str, &str)]) -> Palette {
        let mut t = Table::with_columns(vec!["Names".into(), "Colours".into()]);
        for (name, colour) in entries {
            t.append(vec![
                ("Names".to_string(), Value::Str(name.to_string())),
                ("Colours".to_string(), Value::Str(colour.to_string())),
            ]);
        }
        Palette::from_table(&t).unwrap()
    }

    fn frame() -> Frame {
        Frame::new(vec![
            Classifier::new(
                palette(&[
                    ("A0", "#000000"),
                    ("A1", "#333333"),
                    ("A2", "#777777"),
                    ("B0", "#aaaaaa"),
                    ("B1", "#ffffff"),
                ]),
                vec![],
            ),
            Classifier::new(palette(&[("A", "#000000"), ("B", "#ffffff")]), vec![]),
        ])
    }

    fn translation() -> Table {
        let mut t = Table::with_columns(vec!["Reduced".into(), "Detailed".into()]);
        for (reduced, fine) in [("A", "A0"), ("A", "A1"), ("A", "A2"), ("B", "B0"), ("B", "B1")] {
            t.append(vec![
                ("Reduced".to_string(), Value::Str(reduced.into())),
                ("Detailed".to_string(), Value::Str(fine.into())),
            ]);
        }
        t
    }

    fn meta_row(minerals: &[(&str, i64)]) -> Row {
        let mut row: Row = minerals
            .iter()
            .map(|(name, v)| (name.to_string(), Value::Int(*v)))
            .collect();
        row.push(("Depth".to_string(), Value::Float(1590.0)));
        row.push(("Well".to_string(), Value::Str("25/2-18 C".into())));
        row.push(("Depth unit".to_string(), Value::Str("m".into())));
        if !row.iter().any(|(name, _)| name == "Background") {
            row.push(("Background".to_string(), Value::Int(0)));
        }
        row
    }

    #[test]
    fn translation_collapses_fine_into_reduced() {
        let mut f = frame();
        f.append_row(meta_row(&[("A", 1), ("B", 1)])).unwrap();
        f.append_row(meta_row(&[("A0", 1), ("A1", 1), ("A2", 1), ("B0", 1), ("B1", 1)]))
            .unwrap();
        assert!(f.requires_translation());

        f.apply_translation(&translation()).unwrap();
        assert!(!f.requires_translation());

        let result = f.result().unwrap();
        assert_eq!(result.row_count(), 2);
        let a = result.find_column("A").unwrap();
        let b = result.find_column("B").unwrap();
        // Row 0 was native reduced data, row 1 the translated detailed row.
        assert_eq!(*result.value(0, a), Value::Int(1));
        assert_eq!(*result.value(0, b), Value::Int(1));
        assert_eq!(*result.value(1, a), Value::Int(3));
        assert_eq!(*result.value(1, b), Value::Int(2));
    }

    #[test]
    fn mass_is_conserved_per_row_and_group() {
        let mut f = frame();
        let fine = [("A0", 7), ("A1", 11), ("A2", 13), ("B0", 17), ("B1", 19)];
        f.append_row(meta_row(&fine)).unwrap();
        f.apply_translation(&translation()).unwrap();

        let result = f.result().unwrap();
        let a = result.find_column("A").unwrap();
        let b = result.find_column("B").unwrap();
        assert_eq!(*result.value(0, a), Value::Int(7 + 11 + 13));
        assert_eq!(*result.value(0, b), Value::Int(17 + 19));
    }

    #[test]
    fn absent_fine_categories_contribute_zero() {
        let mut f = frame();
        // A2 never measured: classify-style rows omit zero counts.
        let mut row = meta_row(&[("A0", 2), ("A1", 3), ("B0", 4), ("B1", 5)]);
        row.push(("A2".to_string(), Value::Null));
        f.append_row(row).unwrap();
        f.apply_translation(&translation()).unwrap();

        let result = f.result().unwrap();
        let a = result.find_column("A").unwrap();
        assert_eq!(*result.value(0, a), Value::Int(5));
    }

    #[test]
    fn passthrough_columns_precede_reduced_columns() {
        let mut f = frame();
        f.append_row(meta_row(&[("A0", 1), ("A1", 1), ("A2", 1), ("B0", 1), ("B1", 1)]))
            .unwrap();
        f.apply_translation(&translation()).unwrap();

        let result = f.result().unwrap();
        let columns = result.columns();
        let depth = result.find_column("Depth").unwrap();
        let background = result.find_column("Background").unwrap();
        let a = result.find_column("A").unwrap();
        let b = result.find_column("B").unwrap();
        assert!(depth < a && background < a, "{columns:?}");
        assert!(a < b, "first-seen group order");
    }

    #[test]
    fn wrong_arity_is_invalid_translation() {
        let mut f = frame();
        f.append_row(meta_row(&[("A", 1), ("B", 1)])).unwrap();

        let one = Table::with_columns(vec!["Missing".into()]);
        assert!(matches!(
            f.apply_translation(&one),
            Err(FrameError::InvalidTranslation { columns: 1 })
        ));

        let three = Table::with_columns(vec!["a".into(), "b".into(), "c".into()]);
        assert!(matches!(
            f.apply_translation(&three),
            Err(FrameError::InvalidTranslation { columns: 3 })
        ));
    }

    #[test]
    fn unmatched_category_names_are_schema_mismatch() {
        let mut f = frame();
        f.append_row(meta_row(&[("A", 1), ("B", 1)])).unwrap();
        let mut t = Table::with_columns(vec!["Missing".into(), "Something".into()]);
        t.append(vec![
            ("Missing".to_string(), Value::Str("Undefined".into())),
            ("Something".to_string(), Value::Str("Undefined".into())),
        ]);
        assert!(matches!(
            f.apply_translation(&t),
            Err(FrameError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn background_in_the_fine_palette_is_summed_like_any_category() {
        let mut f = Frame::new(vec![
            Classifier::new(
                palette(&[("A0", "#000000"), ("A1", "#333333"), ("Background", "#ffffff")]),
                vec![],
            ),
            Classifier::new(palette(&[("A", "#000000"), ("Background", "#ffffff")]), vec![]),
        ]);
        f.append_row(meta_row(&[("A0", 2), ("A1", 3), ("Background", 4)]))
            .unwrap();

        let mut t = Table::with_columns(vec!["Reduced".into(), "Detailed".into()]);
        for (reduced, fine) in [("A", "A0"), ("A", "A1"), ("Background", "Background")] {
            t.append(vec![
                ("Reduced".to_string(), Value::Str(reduced.into())),
                ("Detailed".to_string(), Value::Str(fine.into())),
            ]);
        }
        f.apply_translation(&t).unwrap();

        let result = f.result().unwrap();
        let a = result.find_column("A").unwrap();
        let bg = result.find_column("Background").unwrap();
        assert_eq!(*result.value(0, a), Value::Int(5));
        assert_eq!(*result.value(0, bg), Value::Int(4));
    }
}
