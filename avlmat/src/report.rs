//! CSV and JSON report writers for experiment records

use crate::error::HarnessResult;
use crate::experiment::{OperationTimes, SizeRecord, TimeRecord};
use serde::Serialize;
use std::io::Write;

/// Placeholder written for timings that were not measured
const MISSING: i64 = -1;

/// A record that can be written as one CSV line
pub trait CsvRecord {
    /// Header line, without the trailing newline
    const HEADER: &'static str;

    fn write_row<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl CsvRecord for SizeRecord {
    const HEADER: &'static str = "n,sparsity,k,dense_bytes,avl_bytes,hash_bytes";

    fn write_row<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{},{:.12},{},{},{},{}",
            self.n, self.sparsity, self.k, self.dense_bytes, self.avl_bytes, self.hash_bytes
        )
    }
}

fn write_times<W: Write>(writer: &mut W, times: Option<&OperationTimes>) -> std::io::Result<()> {
    match times {
        Some(t) => write!(
            writer,
            ",{},{},{},{},{},{}",
            t.get_ns, t.set_ns, t.transpose_ns, t.scalar_ns, t.sum_ns, t.mul_ns
        ),
        None => write!(writer, "{}", format!(",{MISSING}").repeat(6)),
    }
}

impl CsvRecord for TimeRecord {
    const HEADER: &'static str = "n,sparsity,k,\
        dense_get_ns,dense_set_ns,dense_trans_ns,dense_scalar_ns,dense_sum_ns,dense_mul_ns,\
        avl_get_ns,avl_set_ns,avl_trans_ns,avl_scalar_ns,avl_sum_ns,avl_mul_ns,\
        hash_get_ns,hash_set_ns,hash_trans_ns,hash_scalar_ns,hash_sum_ns,hash_mul_ns";

    fn write_row<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{},{:.12},{}", self.n, self.sparsity, self.k)?;
        write_times(writer, self.dense.as_ref())?;
        write_times(writer, Some(&self.avl))?;
        write_times(writer, Some(&self.hash))?;
        writeln!(writer)
    }
}

/// Write a header line followed by one line per record
///
/// Dense timings that were skipped are written as `-1`.
pub fn write_csv<R: CsvRecord, W: Write>(records: &[R], mut writer: W) -> HarnessResult<()> {
    writeln!(writer, "{}", R::HEADER)?;
    for record in records {
        record.write_row(&mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write records as a pretty-printed JSON array
pub fn write_json<R: Serialize, W: Write>(records: &[R], mut writer: W) -> HarnessResult<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(base: u64) -> OperationTimes {
        OperationTimes {
            get_ns: base,
            set_ns: base + 1,
            transpose_ns: base + 2,
            scalar_ns: base + 3,
            sum_ns: base + 4,
            mul_ns: base + 5,
        }
    }

    #[test]
    fn test_size_csv() {
        let records = [SizeRecord {
            n: 100,
            sparsity: 0.01,
            k: 100,
            dense_bytes: 40_000,
            avl_bytes: 9_000,
            hash_bytes: 5_000,
        }];
        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "n,sparsity,k,dense_bytes,avl_bytes,hash_bytes");
        assert_eq!(lines[1], "100,0.010000000000,100,40000,9000,5000");
    }

    #[test]
    fn test_time_csv_missing_dense() {
        let records = [
            TimeRecord {
                n: 10,
                sparsity: 0.5,
                k: 50,
                dense: Some(times(0)),
                avl: times(10),
                hash: times(20),
            },
            TimeRecord {
                n: 10,
                sparsity: 0.5,
                k: 50,
                dense: None,
                avl: times(10),
                hash: times(20),
            },
        ];
        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), 21);
        assert!(lines[0].starts_with("n,sparsity,k,dense_get_ns,"));
        assert!(lines[0].ends_with(",hash_mul_ns"));
        assert_eq!(
            lines[1],
            "10,0.500000000000,50,0,1,2,3,4,5,10,11,12,13,14,15,20,21,22,23,24,25"
        );
        assert_eq!(
            lines[2],
            "10,0.500000000000,50,-1,-1,-1,-1,-1,-1,10,11,12,13,14,15,20,21,22,23,24,25"
        );
    }

    #[test]
    fn test_json() {
        let records = [TimeRecord {
            n: 4,
            sparsity: 0.25,
            k: 4,
            dense: None,
            avl: times(1),
            hash: times(2),
        }];
        let mut out = Vec::new();
        write_json(&records, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["n"], 4);
        assert!(value[0]["dense"].is_null());
        assert_eq!(value[0]["avl"]["mul_ns"], 6);
    }
}
