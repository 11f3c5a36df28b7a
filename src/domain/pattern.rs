//! Pattern Alerts
//!
//! Advisory conditions spotted in the recent window. Alerts are recomputed on
//! every query and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named heuristic conditions, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Several low multipliers in a row
    SequenceBaixa,
    /// Wide spread between recent extremes
    AltaVolatilidade,
    /// Strong move between the two halves of the last ten rounds
    TendenciaForte,
    /// Low run that just ended on a low value
    Oportunidade,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::SequenceBaixa => "sequence_baixa",
            PatternKind::AltaVolatilidade => "alta_volatilidade",
            PatternKind::TendenciaForte => "tendencia_forte",
            PatternKind::Oportunidade => "oportunidade",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAlert {
    pub kind: PatternKind,
    pub message: String,
    pub severity: AlertSeverity,
}

impl PatternAlert {
    pub fn new(kind: PatternKind, severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&PatternKind::AltaVolatilidade).unwrap();
        assert_eq!(json, "\"alta_volatilidade\"");
        assert_eq!(PatternKind::Oportunidade.to_string(), "oportunidade");
    }
}
