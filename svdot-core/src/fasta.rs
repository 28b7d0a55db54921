//! FASTA reading and writing
//!
//! Writes the single-record files handed to the aligner and reads FASTA
//! inputs with needletail for whole-sequence dotplots.

use std::io::Write;
use std::path::Path;

use needletail::parse_fastx_file;
use thiserror::Error;

/// Residues per line in written FASTA records
pub const LINE_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found: {0}")]
    EmptyFile(String),
}

pub type FastaResult<T> = Result<T, FastaError>;

/// A sequence read from a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSequence {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Write one FASTA record, wrapping the sequence at [`LINE_WIDTH`].
pub fn write_record<W: Write>(writer: &mut W, id: &str, seq: &[u8]) -> FastaResult<()> {
    writeln!(writer, ">{}", id)?;
    for chunk in seq.chunks(LINE_WIDTH) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `seq` as a single-record FASTA file at `path`.
pub fn write_single_record<P: AsRef<Path>>(path: P, id: &str, seq: &[u8]) -> FastaResult<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_record(&mut file, id, seq)
}

/// Read every record of a FASTA/FASTQ file.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> FastaResult<Vec<NamedSequence>> {
    let path = path.as_ref();
    let mut reader = parse_fastx_file(path).map_err(|e| FastaError::Parse(e.to_string()))?;

    let mut sequences = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
        let id = String::from_utf8_lossy(record.id())
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        sequences.push(NamedSequence { id, seq: record.seq().to_vec() });
    }

    if sequences.is_empty() {
        return Err(FastaError::EmptyFile(path.display().to_string()));
    }
    Ok(sequences)
}

/// Read the first record of a FASTA/FASTQ file.
pub fn read_first_sequence<P: AsRef<Path>>(path: P) -> FastaResult<NamedSequence> {
    let path = path.as_ref();
    read_sequences(path)?
        .into_iter()
        .next()
        .ok_or_else(|| FastaError::EmptyFile(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_record_wraps_lines() {
        let seq = vec![b'A'; 170];
        let mut out = Vec::new();
        write_record(&mut out, "seq", &seq).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">seq");
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 80);
        assert_eq!(lines[3].len(), 10);
    }

    #[test]
    fn test_write_then_read_first_sequence() {
        let file = NamedTempFile::new().unwrap();
        write_single_record(file.path(), "alt_1", b"ACGTACGTTT").unwrap();

        let record = read_first_sequence(file.path()).unwrap();
        assert_eq!(record.id, "alt_1");
        assert_eq!(record.seq, b"ACGTACGTTT".to_vec());
    }

    #[test]
    fn test_header_description_is_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">chr1_part some description").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, ">chr2_part").unwrap();
        writeln!(file, "TTTT").unwrap();
        file.flush().unwrap();

        let records = read_sequences(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "chr1_part");
        assert_eq!(records[1].seq, b"TTTT".to_vec());
    }
}
