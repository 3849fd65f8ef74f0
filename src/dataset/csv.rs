//! CSV loading into a [`Table`].

use super::table::{Column, Table};
use crate::error::Result;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Reads a headed CSV file into a [`Table`].
///
/// A column whose every field parses as `f64` becomes [`Column::Numeric`];
/// any other column becomes [`Column::Categorical`]. With `columns` set, only
/// those columns are kept, in the given order.
///
/// # Errors
/// I/O and CSV errors, and [`PreprocessingError::MissingColumn`] when a
/// requested column is absent from the header.
///
/// [`PreprocessingError::MissingColumn`]: crate::preprocessing::PreprocessingError::MissingColumn
pub fn read_csv<P: AsRef<Path>>(path: P, columns: Option<&[&str]>) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    let table = read_csv_from_reader(BufReader::new(file), columns)?;
    debug!(
        path = %path.as_ref().display(),
        rows = table.n_rows(),
        columns = table.n_columns(),
        "loaded csv"
    );
    Ok(table)
}

/// Same as [`read_csv`] over any reader.
pub fn read_csv_from_reader<R: Read>(reader: R, columns: Option<&[&str]>) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result?;
        for (col, field) in raw.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
    }

    let mut table = Table::new();
    for (name, values) in headers.into_iter().zip(raw) {
        table.push_column(name, infer_column(values))?;
    }

    match columns {
        Some(names) => Ok(table.select(names)?),
        None => Ok(table),
    }
}

fn infer_column(values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
    match parsed {
        Some(numbers) if !values.is_empty() => Column::Numeric(numbers),
        _ => Column::Categorical(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::preprocessing::PreprocessingError;
    use std::io::Write;

    const DATA: &str = "red,green,blue,label\n\
                        10,20,30,raspberry\n\
                        11, 19.5 ,29,leaf\n\
                        12,21,31,raspberry\n";

    #[test]
    fn test_infers_numeric_and_categorical() {
        let table = read_csv_from_reader(DATA.as_bytes(), None).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.column("green"),
            Some(&Column::Numeric(vec![20.0, 19.5, 21.0]))
        );
        assert!(matches!(table.column("label"), Some(Column::Categorical(v)) if v[1] == "leaf"));
    }

    #[test]
    fn test_column_selection_order() {
        let table = read_csv_from_reader(DATA.as_bytes(), Some(&["label", "red"])).unwrap();
        assert_eq!(table.names(), &["label".to_string(), "red".to_string()]);
    }

    #[test]
    fn test_missing_selected_column() {
        let err = read_csv_from_reader(DATA.as_bytes(), Some(&["width"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Preprocessing(PreprocessingError::MissingColumn(name)) if name == "width"
        ));
    }

    #[test]
    fn test_read_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();
        let table = read_csv(file.path(), Some(&["blue", "label"])).unwrap();
        assert_eq!(table.column("blue"), Some(&Column::Numeric(vec![30.0, 29.0, 31.0])));
    }

    #[test]
    fn test_ragged_record_is_csv_error() {
        let bad = "a,b\n1,2\n3\n";
        let err = read_csv_from_reader(bad.as_bytes(), None).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }
}
