//! Schema merge for row-object decoding.

use crate::field::Field;

/// Result of merging incoming keys into an existing field list.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMerge {
    /// Existing fields followed by one new field per unseen key.
    pub fields: Vec<Field>,
    /// Column index of each incoming key, in input order.
    pub positions: Vec<usize>,
}

/// Merge `keys` into `existing`.
///
/// Keys already present as a label reuse that column (the first one, if
/// labels repeat). Unseen keys append trailing columns in first-seen order,
/// so the same inputs always produce the same column assignment. New fields
/// carry only a label.
pub fn merge_schema<'a>(
    existing: &[Field],
    keys: impl IntoIterator<Item = &'a str>,
) -> SchemaMerge {
    let mut fields = existing.to_vec();
    let mut positions = Vec::new();
    for key in keys {
        let position = match fields.iter().position(|field| field.label() == key) {
            Some(idx) => idx,
            None => {
                fields.push(Field::labeled(key));
                fields.len() - 1
            }
        };
        positions.push(position);
    }
    SchemaMerge { fields, positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    #[test]
    fn reuses_known_labels_and_appends_unknown() {
        let existing = vec![
            Field::labeled("A").with_type(FieldType::Number),
            Field::labeled("B"),
        ];
        let merged = merge_schema(&existing, ["B", "C", "A", "D"]);
        let labels: Vec<&str> = merged.fields.iter().map(Field::label).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D"]);
        assert_eq!(merged.positions, vec![1, 2, 0, 3]);
        assert_eq!(merged.fields[0].field_type(), FieldType::Number);
    }

    #[test]
    fn repeated_unseen_key_maps_to_one_column() {
        let merged = merge_schema(&[], ["X", "X"]);
        assert_eq!(merged.fields.len(), 1);
        assert_eq!(merged.positions, vec![0, 0]);
    }
}
