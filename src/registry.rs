//! Static tool registry for the gait dispatcher.
//!
//! The tool set is fixed at distribution time, so the registry is const data:
//! an ordered table of (command name, binary name, description). No dynamic
//! registration, no runtime mutation.

/// One registered tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolEntry {
    /// Command name as typed by the user
    pub name: &'static str,
    /// Binary file name, resolved as a sibling of the dispatcher
    pub bin: &'static str,
    /// One-line description shown in the help listing
    pub description: &'static str,
}

/// The full tool table, in listing order
pub const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        name: "agt",
        bin: "agt",
        description: "Text analysis (sentiment, emotion, intent, ...) via OpenAI",
    },
    ToolEntry {
        name: "cchat",
        bin: "cchat",
        description: "Interactive Claude chat with slash commands",
    },
    ToolEntry {
        name: "cct",
        bin: "cct",
        description: "Code completion, explanation, refactoring via OpenAI",
    },
    ToolEntry {
        name: "cgen",
        bin: "cgen",
        description: "Code generation from a description via OpenAI",
    },
    ToolEntry {
        name: "cgt",
        bin: "cgt",
        description: "One-shot Claude completion",
    },
    ToolEntry {
        name: "cia",
        bin: "cia",
        description: "Claude interactive agent with streaming and transcripts",
    },
    ToolEntry {
        name: "ochat",
        bin: "ochat",
        description: "Interactive OpenAI chat with shell tool calling",
    },
    ToolEntry {
        name: "oge",
        bin: "oge",
        description: "Embedding generation via OpenAI",
    },
    ToolEntry {
        name: "ogt",
        bin: "ogt",
        description: "One-shot OpenAI completion",
    },
    ToolEntry {
        name: "oia",
        bin: "oia",
        description: "OpenAI interactive agent with shell and code tools",
    },
    ToolEntry {
        name: "osum",
        bin: "osum",
        description: "Text summarization via OpenAI",
    },
    ToolEntry {
        name: "tc",
        bin: "tc",
        description: "Token counting with tiktoken encodings (local)",
    },
    ToolEntry {
        name: "tlt",
        bin: "tlt",
        description: "Text translation via OpenAI",
    },
];

/// Look up a tool by its command name (case-sensitive)
pub fn find(name: &str) -> Option<&'static ToolEntry> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Render the help listing: usage text plus every tool, names column-aligned
/// to the longest registered name.
pub fn render_help() -> String {
    let width = TOOLS.iter().map(|t| t.name.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str("gait - AI toolbelt dispatcher\n");
    out.push_str("\n");
    out.push_str("Usage:\n");
    out.push_str("  gait <tool> [args...]\n");
    out.push_str("  gait help\n");
    out.push_str("\n");
    out.push_str("Tools:\n");
    for tool in TOOLS {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            tool.name,
            tool.description,
            width = width
        ));
    }
    out.push_str("\n");
    out.push_str("Tools that call an API read OPENAI_API_KEY or ANTHROPIC_API_KEY.\n");
    out
}
