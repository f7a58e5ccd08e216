//! CSV output shared by every pipeline.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("could not write {path}: {source}")]
pub struct WriteError {
    pub path: String,
    #[source]
    pub source: csv::Error,
}

/// Writes a header row followed by data rows. Rows are written as given;
/// callers shape them to the header width first.
pub fn write_csv(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<(), WriteError> {
    let wrap = |source: csv::Error| WriteError {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    writer.write_record(headers).map_err(wrap)?;
    for row in rows {
        writer.write_record(row).map_err(wrap)?;
    }
    writer.flush().map_err(|err| wrap(csv::Error::from(err)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");

        write_csv(
            &path,
            &strings(&["Owner_Name", "Action"]),
            &[strings(&["Alice", "SEND_OFFER"]), strings(&["Bob", "ASK_CONDITION"])],
        )
        .expect("write succeeds");

        let written = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(
            written,
            "Owner_Name,Action\nAlice,SEND_OFFER\nBob,ASK_CONDITION\n"
        );
    }

    #[test]
    fn quotes_fields_containing_the_delimiter() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");

        write_csv(
            &path,
            &strings(&["Address"]),
            &[strings(&["12 Oak St, Houston, TX"])],
        )
        .expect("write succeeds");

        let written = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(written, "Address\n\"12 Oak St, Houston, TX\"\n");
    }

    #[test]
    fn unwritable_path_reports_the_target() {
        let missing = Path::new("/nonexistent-dir/out.csv");
        let err = write_csv(missing, &strings(&["A"]), &[]).expect_err("write fails");

        assert!(err.to_string().contains("/nonexistent-dir/out.csv"));
    }
}
