use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::schema::Schema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} value: {value}")]
pub struct InvalidEnum {
    pub kind: &'static str,
    pub value: String,
}

/// Macro to generate a wire enum with as_str + std::str::FromStr + schema.
///
/// Every generated enum carries an `Unspecified` variant that absorbs values
/// outside the declared set, so a sloppy model answer never fails a decode.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        str_enum!($name default Unspecified { $($variant => $s),+ });
    };
    ($name:ident default $default:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant,
            )+
            #[serde(other)]
            Unspecified,
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($s),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                    Self::Unspecified => "",
                }
            }

            /// Enum descriptor listing the accepted wire values.
            pub fn schema() -> Schema {
                Schema::enumeration(Self::VALUES)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(InvalidEnum {
                        kind: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ProjectPhase default Formulation {
    Formulation => "Formulation",
    Execution => "Execution",
    Closed => "Closed",
});

str_enum!(ProjectType default Infrastructure {
    Mitigation => "Mitigation",
    Emergency => "Emergency",
    Resettlement => "Resettlement",
    Infrastructure => "Infrastructure",
});

str_enum!(RiskLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

str_enum!(MilestoneStatus {
    Completed => "completed",
    InProgress => "in-progress",
    Pending => "pending",
    Delayed => "delayed",
});

str_enum!(FinancialType {
    Capex => "CAPEX",
    Opex => "OPEX",
});

str_enum!(StrategicType {
    Proactive => "Proactive",
    Reactive => "Reactive",
});

str_enum!(ResourceType {
    Personnel => "Personnel",
    Machinery => "Machinery",
    Material => "Material",
});

str_enum!(StakeholderType {
    Professional => "Profesional",
    PublicEntity => "Entidad Pública",
    PrivateEntity => "Entidad Privada",
    Community => "Comunidad",
    Financial => "Financiera",
    Insurer => "Aseguradora",
});

// Feminine agreement ("relevancia", "criticidad", "complejidad").
str_enum!(Priority {
    High => "Alta",
    Medium => "Media",
    Low => "Baja",
});

// Masculine agreement ("impacto", "nivel").
str_enum!(Intensity {
    High => "Alto",
    Medium => "Medio",
    Low => "Bajo",
});

str_enum!(ActorCategory {
    Executor => "Executor",
    Control => "Control",
    Beneficiary => "Beneficiario",
    Affected => "Afectado",
});

str_enum!(BottleneckStatus {
    Blocked => "Bloqueado",
    InProcess => "En Trámite",
    Resolved => "Resuelto",
});

str_enum!(BottleneckImpact {
    Critical => "Crítico",
    Moderate => "Moderado",
    Low => "Bajo",
});

str_enum!(PolicyStatus {
    Active => "Active",
    Expired => "Expired",
    Pending => "Pending",
});

str_enum!(AlertKind {
    Critical => "critical",
    Warning => "warning",
    Info => "info",
});

str_enum!(Verdict {
    Optimal => "Optimo",
    Regular => "Regular",
    Critical => "Critico",
});

str_enum!(PrimaryProcess default Corrective {
    Corrective => "Intervención Correctiva",
    Prospective => "Intervención Prospectiva",
    FinancialProtection => "Protección Financiera",
});

str_enum!(TechnicalConcept default NotViable {
    Viable => "Viable",
    ViableWithObservations => "Viable con Observaciones",
    NotViable => "No Viable",
});

str_enum!(ProjectedStatus {
    Surplus => "Superávit",
    Deficit => "Déficit",
    Balanced => "Equilibrio",
});

str_enum!(StepStatus {
    Optimal => "Optimo",
    NeedsAttention => "Requiere Atención",
    Critical => "Crítico",
});

str_enum!(CommandClarity {
    Clear => "Clara",
    Ambiguous => "Ambiguo",
    Missing => "Inexistente",
});

str_enum!(PrincipleStatus {
    Optimized => "Optimized",
    Managed => "Managed",
    AttentionRequired => "Attention Required",
});

str_enum!(DocumentKind default Petition {
    Petition => "petition",
    Memo => "memo",
    Meeting => "meeting",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_values_round_trip_through_serde() {
        let json = serde_json::to_string(&MilestoneStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: MilestoneStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MilestoneStatus::InProgress);
    }

    #[test]
    fn unknown_wire_value_becomes_unspecified() {
        let status: BottleneckStatus = serde_json::from_str("\"Paralizado\"").unwrap();
        assert_eq!(status, BottleneckStatus::Unspecified);
    }

    #[test]
    fn accented_values_parse() {
        assert_eq!(
            StakeholderType::from_str("Entidad Pública").unwrap(),
            StakeholderType::PublicEntity
        );
        assert_eq!(
            PrimaryProcess::from_str("Protección Financiera").unwrap(),
            PrimaryProcess::FinancialProtection
        );
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = Verdict::from_str("Excelente").unwrap_err();
        assert_eq!(err.kind, "Verdict");
        assert_eq!(err.value, "Excelente");
    }

    #[test]
    fn declared_defaults() {
        assert_eq!(ProjectPhase::default(), ProjectPhase::Formulation);
        assert_eq!(ProjectType::default(), ProjectType::Infrastructure);
        assert_eq!(TechnicalConcept::default(), TechnicalConcept::NotViable);
        assert_eq!(RiskLevel::default(), RiskLevel::Unspecified);
    }

    #[test]
    fn schema_lists_all_values() {
        let schema = Verdict::schema();
        assert_eq!(
            schema,
            Schema::enumeration(&["Optimo", "Regular", "Critico"])
        );
    }
}
