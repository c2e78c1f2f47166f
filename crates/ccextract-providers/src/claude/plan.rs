use regex::Regex;
use std::sync::LazyLock;

static APPROVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"⏺\s*User approved Claude's plan").unwrap());

static SAVED_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Plan saved to:\s*~[/\\]\.claude[/\\]plans[/\\]").unwrap());

static PLAN_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Plan saved to:\s*(~[/\\]\.claude[/\\]plans[/\\][^\s·]+\.md)").unwrap()
});

const UNTITLED: &str = "Untitled Plan";
const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPlan {
    pub title: String,
    /// Empty when the text did not name the saved plan file
    pub path: String,
    pub content: String,
}

/// Whether text carries the client's plan-approval notice
pub fn contains_plan_approval(text: &str) -> bool {
    APPROVAL_RE.is_match(text) || SAVED_TO_RE.is_match(text)
}

/// Recover title, path and body from a plan-approval notice.
///
/// The expected layout is
///
/// ```text
/// ⏺ User approved Claude's plan
///   ⎿  Plan saved to: ~/.claude/plans/xxx.md · /plan to edit
///      Plan Title
///
///      Body...
/// ```
///
/// Missing pieces degrade to an empty path and the untitled fallback.
pub fn parse_plan_approval(text: &str) -> ParsedPlan {
    let (path, anchor) = match PLAN_PATH_RE.captures(text).and_then(|c| c.get(1)) {
        Some(m) => (m.as_str().to_string(), m.end()),
        None => {
            let marker_end = SAVED_TO_RE
                .find(text)
                .or_else(|| APPROVAL_RE.find(text))
                .map(|m| m.end())
                .unwrap_or(0);
            (String::new(), end_of_line(text, marker_end))
        }
    };

    let mut remaining = text[anchor..].trim();
    if remaining.starts_with('·') {
        remaining = match remaining.find('\n') {
            Some(pos) => &remaining[pos + 1..],
            None => "",
        };
    }
    let remaining = remaining.trim();

    let lines: Vec<&str> = remaining.split('\n').collect();
    let title_idx = lines.iter().position(|l| !l.trim().is_empty());
    let (title, body) = match title_idx {
        Some(idx) => (lines[idx].trim().to_string(), &lines[idx + 1..]),
        None => (String::new(), &lines[lines.len()..]),
    };

    ParsedPlan {
        title: if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        },
        path,
        content: dedent(body).trim().to_string(),
    }
}

/// Build a plan from the exit-plan tool's `input.plan` and the entry's `slug`
pub fn plan_from_exit_tool(plan: &str, slug: &str) -> ParsedPlan {
    let path = if slug.is_empty() {
        "~/.claude/plans/unknown.md".to_string()
    } else {
        format!("~/.claude/plans/{}.md", slug)
    };

    let mut title = UNTITLED.to_string();
    for line in plan.trim().lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("# ") {
            title = heading.trim().to_string();
            break;
        }
        if !line.is_empty() && !line.starts_with('#') {
            title = crate::tool_analyzer::take_chars(line, TITLE_MAX_CHARS).to_string();
            break;
        }
    }

    ParsedPlan {
        title,
        path,
        content: plan.to_string(),
    }
}

fn end_of_line(text: &str, from: usize) -> usize {
    match text[from..].find('\n') {
        Some(pos) => from + pos,
        None => text.len(),
    }
}

/// Strip the indentation shared by all non-blank lines
fn dedent(lines: &[&str]) -> String {
    let indent_of = |l: &str| l.chars().take_while(|c| c.is_whitespace()).count();
    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            let skip = l.char_indices().nth(min_indent).map(|(i, _)| i);
            match skip {
                Some(i) => &l[i..],
                None if l.chars().count() == min_indent => "",
                None => l,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
