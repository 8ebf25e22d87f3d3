//! Static reference documents written alongside the dataset samples

use crate::foundations::datasets::write_json;
use anyhow::Result;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const CONSTITUTIONAL_PRINCIPLES_FILE: &str = "constitutional_principles.json";
pub const INTERPRETATION_PRINCIPLES_FILE: &str = "legal_interpretation_principles.json";

/// Basic structure of the U.S. constitutional framework
pub fn constitutional_principles() -> Value {
    json!({
        "document_type": "CONSTITUTIONAL_FRAMEWORK",
        "title": "U.S. Constitutional Principles",
        "principles": [
            {
                "principle": "Separation of Powers",
                "description": "Division of government into three branches",
                "constitutional_basis": "Articles I, II, III",
                "impact": "Checks and balances system",
                "examples": [
                    "Congress makes laws",
                    "President enforces laws",
                    "Courts interpret laws"
                ]
            },
            {
                "principle": "Federalism",
                "description": "Power division between federal and state governments",
                "constitutional_basis": "10th Amendment",
                "impact": "Dual sovereignty system",
                "examples": ["Federal immigration law", "State education policy"]
            }
        ]
    })
}

/// Core principles of statutory interpretation
pub fn interpretation_principles() -> Value {
    json!({
        "document_type": "LEGAL_INTERPRETATION_PRINCIPLES",
        "principles": [
            {
                "principle": "Stare Decisis",
                "definition": "Courts generally follow precedent from previous decisions",
                "application": "Provides stability and predictability in law",
                "importance": "high"
            },
            {
                "principle": "Plain Meaning Rule",
                "definition": "Statutes should be interpreted based on ordinary meaning of words",
                "application": "First step in statutory interpretation",
                "importance": "high"
            }
        ]
    })
}

/// Writes both reference documents into `output_dir`
pub fn write_reference_documents(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let documents = [
        (CONSTITUTIONAL_PRINCIPLES_FILE, constitutional_principles()),
        (INTERPRETATION_PRINCIPLES_FILE, interpretation_principles()),
    ];

    let mut written = Vec::new();
    for (file_name, document) in documents {
        let path = output_dir.join(file_name);
        write_json(&path, &document)?;
        written.push(path);
    }

    Ok(written)
}
