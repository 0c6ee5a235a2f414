//! JSON document format for persisted Q-tables.
//!
//! A table is stored as a JSON object keyed by the decimal state id, each
//! value an object keyed by the decimal action code:
//!
//! ```json
//! {"121": {"0": 0.25, "2": -0.01}, "13": {"1": 0.1}}
//! ```
//!
//! Only written entries are stored, so loading reproduces exactly the saved
//! `(state, action) -> value` set.

use std::{
    collections::BTreeMap,
    io::{Read, Write},
};

use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::{
    Error, Result,
    types::{Action, DiscreteState},
};

/// On-disk shape of a [`QTable`]
///
/// serde_json writes the integer keys as strings and parses them back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableDocument(BTreeMap<u16, BTreeMap<u8, f64>>);

impl From<QTable> for TableDocument {
    fn from(table: QTable) -> Self {
        let mut document = BTreeMap::new();
        for (state, action, value) in table.entries() {
            document
                .entry(state.value())
                .or_insert_with(BTreeMap::new)
                .insert(u8::from(action), value);
        }
        TableDocument(document)
    }
}

impl TryFrom<TableDocument> for QTable {
    type Error = Error;

    fn try_from(document: TableDocument) -> Result<Self> {
        let mut table = QTable::new();
        for (state_id, actions) in document.0 {
            let state = DiscreteState::try_from(state_id)?;
            for (code, value) in actions {
                let action = Action::try_from(code)?;
                ensure_finite(state, action, value)?;
                table.set(state, action, value);
            }
        }
        Ok(table)
    }
}

fn ensure_finite(state: DiscreteState, action: Action, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteQValue {
            state: state.value(),
            action: u8::from(action),
            value,
        })
    }
}

/// Write a table as JSON
///
/// Fails before writing anything if a value is NaN or infinite, since JSON
/// would store it as `null` and the file could not be read back.
pub fn write_table<W: Write>(writer: W, table: &QTable) -> Result<()> {
    for (state, action, value) in table.entries() {
        ensure_finite(state, action, value)?;
    }
    serde_json::to_writer(writer, table)?;
    Ok(())
}

/// Read a table from JSON, rejecting unknown states, actions and non-numeric values
pub fn read_table<R: Read>(reader: R) -> Result<QTable> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_string_encoded() {
        let mut table = QTable::new();
        table.set(DiscreteState::try_from(121).unwrap(), Action::Stay, 0.5);

        let mut buffer = Vec::new();
        write_table(&mut buffer, &table).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), r#"{"121":{"2":0.5}}"#);
    }

    #[test]
    fn test_empty_table_is_empty_object() {
        let mut buffer = Vec::new();
        write_table(&mut buffer, &QTable::new()).unwrap();
        assert_eq!(buffer, b"{}");
        assert!(read_table(buffer.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_reads_original_layout() {
        let json = r#"{"0": {"0": 0.0, "1": 0.0, "2": 0.0}, "323": {"1": -0.75}}"#;
        let table = read_table(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get(DiscreteState::try_from(323).unwrap(), Action::Down),
            -0.75
        );
        assert!(table.is_visited(DiscreteState::try_from(0).unwrap()));
    }

    #[test]
    fn test_rejects_out_of_range_keys() {
        assert!(read_table(r#"{"324": {"0": 1.0}}"#.as_bytes()).is_err());
        assert!(read_table(r#"{"4": {"3": 1.0}}"#.as_bytes()).is_err());
        assert!(read_table(r#"{"x": {"0": 1.0}}"#.as_bytes()).is_err());
        assert!(read_table(r#"{"4": {"0": "high"}}"#.as_bytes()).is_err());
        assert!(read_table(r#"[1, 2]"#.as_bytes()).is_err());
    }

    #[test]
    fn test_non_finite_values_are_not_written() {
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut table = QTable::new();
            table.set(DiscreteState::try_from(1).unwrap(), Action::Up, 1e308);
            table.set(DiscreteState::try_from(2).unwrap(), Action::Down, value);

            let mut buffer = Vec::new();
            let result = write_table(&mut buffer, &table);

            assert!(matches!(
                result,
                Err(Error::NonFiniteQValue {
                    state: 2,
                    action: 1,
                    ..
                })
            ));
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn test_non_finite_document_rejected() {
        let mut actions = BTreeMap::new();
        actions.insert(0, f64::NAN);
        let mut document = BTreeMap::new();
        document.insert(7, actions);

        let result = QTable::try_from(TableDocument(document));
        assert!(matches!(result, Err(Error::NonFiniteQValue { state: 7, .. })));
    }
}
