//! Drug file entity

use core_kernel::Ndc;
use serde::{Deserialize, Serialize};

/// A drug product on the drug file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drug {
    pub ndc: Ndc,
    pub label_name: String,
    pub strength: Option<String>,
    pub is_generic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drug_serializes_with_plain_ndc() {
        let drug = Drug {
            ndc: Ndc::new("00002323730").unwrap(),
            label_name: "LISINOPRIL 10MG TAB".to_string(),
            strength: Some("10 mg".to_string()),
            is_generic: true,
        };

        let json = serde_json::to_string(&drug).unwrap();
        assert!(json.contains("\"00002323730\""));
    }
}
