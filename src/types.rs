use crate::error::Error;

/// A single transaction as returned by `getParsedTransaction` / `getTransaction`.
///
/// Only `meta` is read; every other field of the RPC response is ignored.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TransactionTrace {
    /// Post-execution metadata. `None` when the node returned no metadata.
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    /// Transaction-level error, `None` on success.
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    /// Inner instructions grouped by the top-level instruction that invoked them.
    #[serde(default)]
    pub inner_instructions: Option<Vec<InstructionGroup>>,
}

/// All instructions invoked, directly or transitively, by one top-level instruction.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionGroup {
    /// Position of the invoking top-level instruction within the transaction.
    #[serde(default)]
    pub index: Option<u8>,
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

/// One inner instruction as the RPC exposes it.
///
/// Instructions rendered by the `jsonParsed` encoding carry a `parsed` object
/// instead of `data`; they deserialize with `data == None`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstruction {
    /// Invoked program (base58).
    #[serde(default)]
    pub program_id: Option<String>,
    /// Instruction data (base58).
    #[serde(default)]
    pub data: Option<String>,
    /// CPI depth; top-level instructions have height 1.
    #[serde(default)]
    pub stack_height: Option<u32>,
}

impl TransactionTrace {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_groups(groups: Vec<InstructionGroup>) -> Self {
        Self {
            meta: Some(TransactionMeta {
                err: None,
                inner_instructions: Some(groups),
            }),
        }
    }

    /// Instruction groups in transaction order; empty when metadata is absent.
    pub fn instruction_groups(&self) -> &[InstructionGroup] {
        self.meta
            .as_ref()
            .and_then(|meta| meta.inner_instructions.as_deref())
            .unwrap_or(&[])
    }

    pub fn has_meta(&self) -> bool {
        self.meta.is_some()
    }

    pub fn has_trace(&self) -> bool {
        !self.instruction_groups().is_empty()
    }

    pub fn failed(&self) -> bool {
        self.meta.as_ref().is_some_and(|meta| meta.err.is_some())
    }
}

impl RawInstruction {
    pub fn new(program_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            program_id: Some(program_id.into()),
            data: Some(data.into()),
            stack_height: None,
        }
    }
}

impl InstructionGroup {
    pub fn new(index: u8, instructions: Vec<RawInstruction>) -> Self {
        Self {
            index: Some(index),
            instructions,
        }
    }
}
