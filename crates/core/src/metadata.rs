//! Static per-class display metadata. The cascade itself only ever emits
//! label identifiers and confidences; transports attach this prose.

use serde::Serialize;

/// Clinical severity tier attached to a class for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Display metadata for one label in the unified taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct ClassInfo {
    pub label: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub recommendation: &'static str,
    /// UI hex color for the class.
    pub color: &'static str,
}

const GREEN: &str = "#10b981";
const BLUE: &str = "#3b82f6";
const RED: &str = "#ef4444";
const DARK_RED: &str = "#dc2626";
const ORANGE: &str = "#f59e0b";
const GRAY: &str = "#6b7280";

impl ClassInfo {
    pub const HEALTHY: ClassInfo = ClassInfo {
        label: "healthy",
        name: "Healthy Skin",
        severity: Severity::None,
        description: "No lesion or abnormality detected. The skin appears normal.",
        recommendation: "Continue your usual skincare routine and regular self-checks.",
        color: GREEN,
    };

    pub const NON_CANCEROUS_LESION: ClassInfo = ClassInfo {
        label: "non_cancerous_lesion",
        name: "Non-Cancerous Lesion",
        severity: Severity::Low,
        description: "A benign or non-neoplastic lesion was detected. These lesions are \
                      usually harmless but warrant monitoring.",
        recommendation: "Consult a dermatologist for confirmation and follow-up.",
        color: BLUE,
    };

    pub const BENIGN: ClassInfo = ClassInfo {
        label: "benign",
        name: "Benign Lesion",
        severity: Severity::Low,
        description: "A benign lesion was detected. Not cancerous, but medical follow-up \
                      is advised.",
        recommendation: "Monitoring by a healthcare professional is recommended.",
        color: BLUE,
    };

    pub const NON_NEOPLASTIC: ClassInfo = ClassInfo {
        label: "non-neoplastic",
        name: "Non-Neoplastic Lesion",
        severity: Severity::Low,
        description: "An inflammatory lesion or other non-tumoral condition.",
        recommendation: "A dermatology consultation is recommended for evaluation.",
        color: BLUE,
    };

    pub const MALIGNANT: ClassInfo = ClassInfo {
        label: "malignant",
        name: "Malignant Lesion",
        severity: Severity::High,
        description: "A potentially cancerous lesion was detected. Urgent medical \
                      evaluation is required.",
        recommendation: "URGENT consultation with a dermatologist is recommended.",
        color: RED,
    };

    pub const MELANOMA: ClassInfo = ClassInfo {
        label: "melanoma",
        name: "Melanoma",
        severity: Severity::Critical,
        description: "The most serious form of skin cancer, developing from melanocytes.",
        recommendation: "URGENT medical consultation required. Melanoma needs prompt \
                         treatment.",
        color: DARK_RED,
    };

    pub const KAPOSI_SARCOMA: ClassInfo = ClassInfo {
        label: "kaposi_sarcoma",
        name: "Kaposi Sarcoma",
        severity: Severity::Critical,
        description: "A cancer that forms lesions on the skin, mucous membranes or \
                      internal organs.",
        recommendation: "URGENT medical consultation required.",
        color: DARK_RED,
    };

    pub const MYCOSIS_FUNGOIDES: ClassInfo = ClassInfo {
        label: "mycosis_fungoides",
        name: "Mycosis Fungoides",
        severity: Severity::Critical,
        description: "A cutaneous T-cell lymphoma; the most common form of skin lymphoma.",
        recommendation: "URGENT medical consultation required.",
        color: DARK_RED,
    };

    pub const KERATINOCYTES: ClassInfo = ClassInfo {
        label: "keratinocytes",
        name: "Keratinocyte Carcinoma",
        severity: Severity::High,
        description: "Skin cancer affecting keratinocyte cells. Generally treatable when \
                      detected early.",
        recommendation: "URGENT dermatology consultation recommended.",
        color: ORANGE,
    };

    pub const ACTINIC_KERATOSIS: ClassInfo = ClassInfo {
        label: "actinic_keratosis",
        name: "Actinic Keratosis",
        severity: Severity::Medium,
        description: "A precancerous lesion caused by excessive sun exposure. May \
                      progress to carcinoma.",
        recommendation: "Dermatology consultation recommended for preventive treatment.",
        color: ORANGE,
    };

    pub const BASAL_CELL_CARCINOMA: ClassInfo = ClassInfo {
        label: "basal_cell_carcinoma",
        name: "Basal Cell Carcinoma",
        severity: Severity::High,
        description: "The most common form of skin cancer. Slow-growing, rarely \
                      metastatic.",
        recommendation: "Dermatology consultation required for treatment.",
        color: ORANGE,
    };

    pub const SQUAMOUS_CELL_CARCINOMA: ClassInfo = ClassInfo {
        label: "squamous_cell_carcinoma",
        name: "Squamous Cell Carcinoma",
        severity: Severity::High,
        description: "The second most common skin cancer. Can metastasize if untreated.",
        recommendation: "URGENT dermatology consultation required.",
        color: ORANGE,
    };

    pub const ALL: &'static [ClassInfo] = &[
        Self::HEALTHY,
        Self::NON_CANCEROUS_LESION,
        Self::BENIGN,
        Self::NON_NEOPLASTIC,
        Self::MALIGNANT,
        Self::MELANOMA,
        Self::KAPOSI_SARCOMA,
        Self::MYCOSIS_FUNGOIDES,
        Self::KERATINOCYTES,
        Self::ACTINIC_KERATOSIS,
        Self::BASAL_CELL_CARCINOMA,
        Self::SQUAMOUS_CELL_CARCINOMA,
    ];
}

/// Metadata lookup for a label; `None` for labels outside the taxonomy.
pub fn class_info(label: &str) -> Option<&'static ClassInfo> {
    ClassInfo::ALL.iter().find(|info| info.label == label)
}

/// UI color for a label; unknown labels get a neutral gray.
pub fn class_color(label: &str) -> &'static str {
    class_info(label).map(|info| info.color).unwrap_or(GRAY)
}
