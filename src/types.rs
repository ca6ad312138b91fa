use std::fmt;
use std::str::FromStr;

/// Agent framework named in the `framework` key of a runtime config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    SpringAiAlibabaGraph,
    Langgraph4j,
    AdkJava,
}

impl Framework {
    pub const ALL: [Framework; 3] = [
        Framework::SpringAiAlibabaGraph,
        Framework::Langgraph4j,
        Framework::AdkJava,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::SpringAiAlibabaGraph => "SPRING_AI_ALIBABA_GRAPH",
            Framework::Langgraph4j => "LANGGRAPH4J",
            Framework::AdkJava => "ADK_JAVA",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    /// Matching is exact: the config format only knows the upper-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Framework::ALL
            .into_iter()
            .find(|fw| fw.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unsupported framework: {s} (expected SPRING_AI_ALIBABA_GRAPH, LANGGRAPH4J or ADK_JAVA)"
                )
            })
    }
}

/// Port the launched server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8080;
