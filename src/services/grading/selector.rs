use crate::db::types::SubmissionRunType;
use crate::services::grading::GradingTestCase;

/// Why a grading request was made. Governs selection, redaction and
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunMode {
    /// Exploratory run against empty stdin, no test cases.
    Run,
    /// Visible test cases only.
    Sample,
    /// Final scoring run.
    All,
    /// Practice run over every test case; hidden outputs are redacted.
    TestAll,
    /// Final scoring run triggered by the exam closing.
    AutoFinal,
    Unknown(String),
}

impl RunMode {
    pub(crate) fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "run" | "exploratory" => Self::Run,
            "sample" => Self::Sample,
            "all" | "final" | "submit" => Self::All,
            "test_all" | "testall" => Self::TestAll,
            "auto_final" | "auto" | "auto_submit" => Self::AutoFinal,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Run => "run",
            Self::Sample => "sample",
            Self::All => "all",
            Self::TestAll => "test_all",
            Self::AutoFinal => "auto_final",
            Self::Unknown(tag) => tag,
        }
    }

    /// The stored run type, for modes that produce a submission record.
    pub(crate) fn persisted_as(&self) -> Option<SubmissionRunType> {
        match self {
            Self::All => Some(SubmissionRunType::All),
            Self::TestAll => Some(SubmissionRunType::TestAll),
            Self::AutoFinal => Some(SubmissionRunType::AutoFinal),
            Self::Run | Self::Sample | Self::Unknown(_) => None,
        }
    }

    /// Hidden outputs are withheld only on practice runs; final runs keep
    /// them so the stored record is auditable.
    pub(crate) fn redacts_hidden_output(&self) -> bool {
        matches!(self, Self::TestAll)
    }
}

/// Chooses which test cases to execute, preserving input order.
pub(crate) fn select<'a>(test_cases: &'a [GradingTestCase], mode: &RunMode) -> Vec<&'a GradingTestCase> {
    match mode {
        RunMode::Sample => test_cases.iter().filter(|case| !case.hidden).collect(),
        RunMode::All | RunMode::TestAll | RunMode::AutoFinal => test_cases.iter().collect(),
        RunMode::Run => Vec::new(),
        RunMode::Unknown(tag) => {
            tracing::warn!(run_type = %tag, "Unrecognized run type; no test cases selected");
            Vec::new()
        }
    }
}
