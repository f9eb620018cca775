use crate::claim::pipeline::{CheckRecord, ClaimRecord};
use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CSV_HEADER: &str = "index,address,privateKey,status,txHash,to,valueWei,note";

/// Write one CSV row per wallet outcome.
pub fn write_claim_csv(path: &str, records: &[ClaimRecord]) -> Result<()> {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        let fields = [
            record.index.to_string(),
            record.address.clone(),
            record.private_key.clone(),
            record.status.to_string(),
            record.tx_hash.clone().unwrap_or_default(),
            record.to.clone().unwrap_or_default(),
            record.value_wei.clone().unwrap_or_default(),
            record.note.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        lines.push(row.join(","));
    }

    fs::write(path, lines.join("\n"))?;
    info!("Wrote {} claim results to {}", records.len(), path);
    Ok(())
}

/// Write the check-mode results as pretty JSON.
pub fn write_check_json(path: &str, records: &[CheckRecord]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    info!("Wrote {} check results to {}", records.len(), path);
    Ok(())
}

/// Persist a raw eligibility record for offline inspection, creating the
/// dump directory on demand. Files are keyed by lowercased address so a
/// rerun overwrites rather than accumulates.
pub fn dump_record(dir: &str, address: &str, tag: &str, payload: &Value) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file = Path::new(dir).join(format!("{}-{}.json", tag, address.to_lowercase()));
    fs::write(&file, serde_json::to_string_pretty(payload)?)?;
    Ok(file)
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::pipeline::ClaimStatus;
    use serde_json::json;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_write_claim_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let records = vec![
            ClaimRecord {
                index: 0,
                address: "0xaaaa".to_string(),
                private_key: "0x01".to_string(),
                status: ClaimStatus::DryRun,
                tx_hash: None,
                to: Some("0xbbbb".to_string()),
                value_wei: Some("500000000000000".to_string()),
                note: "payload=$.submission.tx".to_string(),
            },
            ClaimRecord {
                index: 1,
                address: "0xcccc".to_string(),
                private_key: "0x02".to_string(),
                status: ClaimStatus::Fail,
                tx_hash: None,
                to: None,
                value_wei: None,
                note: "nonce failed: 429, body".to_string(),
            },
        ];

        write_claim_csv(path.to_str().unwrap(), &records).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "0,0xaaaa,0x01,dry_run,,0xbbbb,500000000000000,payload=$.submission.tx"
        );
        assert_eq!(lines[2], "1,0xcccc,0x02,fail,,,,\"nonce failed: 429, body\"");
    }

    #[test]
    fn test_dump_record_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let dump_dir = dir.path().join("debug");

        let payload = json!({ "submitted": true });
        let file = dump_record(
            dump_dir.to_str().unwrap(),
            "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "accounts",
            &payload,
        )
        .unwrap();

        assert!(file.ends_with(
            "accounts-0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266.json"
        ));
        let written: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(written, payload);
    }
}
