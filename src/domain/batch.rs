use serde::{Deserialize, Serialize};

use crate::domain::types::{BatchSize, Prefix};

/// Request body for `POST /bilhetes/gerar-lote`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewBatch {
    #[serde(rename = "quantidade")]
    pub quantity: BatchSize,
    #[serde(rename = "prefixo")]
    pub prefix: Prefix,
}

impl NewBatch {
    pub fn new(quantity: BatchSize, prefix: Prefix) -> Self {
        Self { quantity, prefix }
    }
}

/// Summary echoed back after a batch was generated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchReceipt {
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "prefixo", default)]
    pub prefix: String,
}
