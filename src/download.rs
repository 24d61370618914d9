//! Saving rendered contract documents
//!
//! The backend renders the document; this module only picks a destination
//! under the user's download directory and writes the bytes.

use crate::{PactumError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// File name for a rendered document, derived from the contract type
pub fn document_file_name(contract_type: &str) -> String {
    let cleaned: String = contract_type
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if cleaned.is_empty() {
        "contract.docx".to_string()
    } else {
        format!("{}_contract.docx", cleaned)
    }
}

/// Directory documents are saved to
pub fn download_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(|| dirs::data_dir().map(|d| d.join("pactum")))
        .ok_or_else(|| {
            PactumError::StorageError("No download directory available on this platform".to_string())
        })
}

/// Write rendered document bytes next to the user's other downloads.
///
/// An existing file is never overwritten; a numeric suffix is appended
/// instead. Returns the path written.
pub fn save_document(bytes: &[u8], contract_type: &str) -> Result<PathBuf> {
    if bytes.is_empty() {
        return Err(PactumError::DecodeError(
            "The rendered document was empty".to_string(),
        ));
    }

    let dir = download_dir()?;
    fs::create_dir_all(&dir)?;

    let name = document_file_name(contract_type);
    let mut path = dir.join(&name);
    let mut counter = 1;
    while path.exists() {
        let stem = name.trim_end_matches(".docx");
        path = dir.join(format!("{} ({}).docx", stem, counter));
        counter += 1;
    }

    fs::write(&path, bytes)?;
    info!("Saved document to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_type() {
        assert_eq!(
            document_file_name("Real Estate Lease Agreement"),
            "Real_Estate_Lease_Agreement_contract.docx"
        );
        assert_eq!(document_file_name("Lease"), "Lease_contract.docx");
    }

    #[test]
    fn test_file_name_fallback_for_empty_type() {
        assert_eq!(document_file_name(""), "contract.docx");
        assert_eq!(document_file_name("  "), "contract.docx");
    }

    #[test]
    fn test_file_name_strips_punctuation() {
        assert_eq!(
            document_file_name("Power of attorney!"),
            "Power_of_attorney_contract.docx"
        );
    }

    #[test]
    fn test_save_rejects_empty_body() {
        assert!(save_document(&[], "Lease").is_err());
    }
}
