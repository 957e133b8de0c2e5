//! Training Schema - Centralized Feature Layout
//!
//! **CRITICAL: This type controls the positional contract with the model**
//!
//! ## Rules (NEVER break these):
//! 1. The column list is fixed when the schema artifact is loaded
//! 2. Encoding only looks names up, it never adds or drops a column
//! 3. Column order is the oracle's input order
//!
//! The CRC32 layout hash identifies a column list so vectors built against a
//! different schema can be rejected before they reach the oracle.

use std::collections::{BTreeMap, HashMap};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::observation::CategoricalField;
use crate::error::SchemaError;

// ============================================================================
// COLUMN DESCRIPTORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Numeric column copied verbatim from the observation
    Passthrough,
    /// One-hot column for `field == value`
    Indicator { field: CategoricalField, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Classify a training column by its name.
    pub fn parse(name: &str) -> Self {
        let kind = CategoricalField::ALL
            .into_iter()
            .find_map(|field| {
                name.strip_prefix(field.column_prefix())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|value| ColumnKind::Indicator {
                        field,
                        value: value.to_string(),
                    })
            })
            .unwrap_or(ColumnKind::Passthrough);

        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn is_indicator_for(&self, field: CategoricalField) -> bool {
        matches!(&self.kind, ColumnKind::Indicator { field: f, .. } if *f == field)
    }
}

// ============================================================================
// SCHEMA ARTIFACT (on-disk shape)
// ============================================================================

/// Either the bare column list exported at training time, or the list plus
/// the baseline categories dropped by the one-hot step.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaArtifact {
    Columns(Vec<String>),
    Described {
        columns: Vec<String>,
        #[serde(default)]
        baselines: BTreeMap<String, String>,
    },
}

// ============================================================================
// TRAINING SCHEMA
// ============================================================================

#[derive(Debug, Clone)]
pub struct TrainingSchema {
    columns: Vec<ColumnDescriptor>,
    positions: HashMap<String, usize>,
    baselines: BTreeMap<CategoricalField, String>,
    layout_hash: u32,
}

impl TrainingSchema {
    pub fn from_columns<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<ColumnDescriptor> = names
            .into_iter()
            .map(|n| ColumnDescriptor::parse(n.as_ref()))
            .collect();

        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if positions.insert(col.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateColumn(col.name.clone()));
            }
        }

        let layout_hash = compute_layout_hash(&columns);

        Ok(Self {
            columns,
            positions,
            baselines: BTreeMap::new(),
            layout_hash,
        })
    }

    pub fn from_artifact(artifact: SchemaArtifact) -> Result<Self, SchemaError> {
        match artifact {
            SchemaArtifact::Columns(columns) => Self::from_columns(columns),
            SchemaArtifact::Described { columns, baselines } => {
                let mut schema = Self::from_columns(columns)?;
                for (prefix, value) in baselines {
                    let field = CategoricalField::from_prefix(&prefix)
                        .ok_or(SchemaError::UnknownBaselineField(prefix))?;
                    schema.baselines.insert(field, value);
                }
                Ok(schema)
            }
        }
    }

    /// Declare the dropped reference category for a field.
    pub fn with_baseline(mut self, field: CategoricalField, value: impl Into<String>) -> Self {
        self.baselines.insert(field, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// O(1) name lookup
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn indicator_positions(&self, field: CategoricalField) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_indicator_for(field))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn baseline(&self, field: CategoricalField) -> Option<&str> {
        self.baselines.get(&field).map(String::as_str)
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            hash: self.layout_hash,
            column_count: self.columns.len(),
            indicator_count: self
                .columns
                .iter()
                .filter(|c| matches!(c.kind, ColumnKind::Indicator { .. }))
                .count(),
            column_names: self.column_names().map(str::to_string).collect(),
        }
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

fn compute_layout_hash(columns: &[ColumnDescriptor]) -> u32 {
    let mut hasher = Hasher::new();

    for col in columns {
        hasher.update(col.name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout summary for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: u32,
    pub column_count: usize,
    pub indicator_count: usize,
    pub column_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
