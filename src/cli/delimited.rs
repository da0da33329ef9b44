//! Delimited text <-> raw row conversion

use std::io;

use super::CliError;

/// Decodes raw input bytes. `input` names the source in the error.
pub fn decode_input(bytes: Vec<u8>, input: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        input: input.to_string(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Reads every record as a row of fields. There is no header row and
/// records may differ in length.
pub fn read_rows<R: io::Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

/// Writes one record per row, quoting fields only where needed.
pub fn write_rows<W: io::Write>(
    writer: W,
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_writer(writer);

    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn rows_to_string(rows: &[Vec<String>], delimiter: u8) -> Result<String, CliError> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows, delimiter)?;
    // Every field came from a String
    String::from_utf8(buffer).map_err(|e| CliError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
